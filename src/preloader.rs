use web_sys as web;

/// Detach a finished element (the preloader panel once it slid away).
#[inline]
pub fn remove(el: &web::HtmlElement) {
    el.remove();
    if el.is_connected() {
        // fallback for environments without ChildNode.remove
        _ = el.style().set_property("display", "none");
    }
}
