use super::{element, with_lifecycle};
use crate::dom;
use crate::frame::SharedFrame;
use web_sys as web;

/// Resize, visibility, load and unload.
pub fn wire_lifecycle_events(shared: &SharedFrame) {
    let (window, document) = {
        let ctx = shared.borrow();
        (ctx.window.clone(), ctx.document.clone())
    };

    let s = shared.clone();
    let win = window.clone();
    dom::add_listener(&window, "resize", true, move |_: web::Event| {
        let width = dom::viewport_width(&win);
        with_lifecycle(&s, |lc, now| lc.resize(width, now));
    });

    let s = shared.clone();
    let doc = document.clone();
    dom::add_listener(&document, "visibilitychange", true, move |_: web::Event| {
        let hidden = doc.visibility_state() == web::VisibilityState::Hidden;
        log::info!("[page] hidden={}", hidden);
        with_lifecycle(&s, |lc, _| lc.visibility(hidden));
    });

    let s = shared.clone();
    dom::add_listener(&window, "load", true, move |_: web::Event| {
        with_lifecycle(&s, |lc, _| lc.request_refresh(true));
    });

    let s = shared.clone();
    dom::add_listener(&window, "beforeunload", true, move |_: web::Event| {
        with_lifecycle(&s, |lc, _| lc.teardown());
    });
}

/// Menu toggle and the links inside the panel.
pub fn wire_menu(shared: &SharedFrame) {
    let menu = shared.borrow().lifecycle.bindings().menu.clone();
    let (Some(toggle), Some(_)) = (menu.toggle, menu.panel) else {
        return;
    };
    if let Some(el) = element(shared, toggle) {
        let s = shared.clone();
        dom::add_listener(&el, "click", true, move |_: web::Event| {
            with_lifecycle(&s, |lc, now| lc.menu_toggle(now));
        });
    }
    for link in menu.links {
        if let Some(el) = element(shared, link) {
            let s = shared.clone();
            dom::add_listener(&el, "click", true, move |_: web::Event| {
                with_lifecycle(&s, |lc, now| lc.menu_link(now));
            });
        }
    }
}

/// Simulated contact form submission.
pub fn wire_form(shared: &SharedFrame) {
    let form = shared.borrow().lifecycle.bindings().contact.form;
    let Some(el) = form.and_then(|id| element(shared, id)) else {
        return;
    };
    let s = shared.clone();
    dom::add_listener(&el, "submit", false, move |ev: web::Event| {
        if with_lifecycle(&s, |lc, now| lc.submit_form(now)).unwrap_or(false) {
            ev.prevent_default();
            log::info!("[form] submitted");
        }
    });
}
