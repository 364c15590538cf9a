use super::with_lifecycle;
use crate::dom;
use crate::frame::SharedFrame;
use wasm_bindgen::JsCast;
use web_sys as web;

// WheelEvent.deltaMode
const DOM_DELTA_LINE: u32 = 1;
const DOM_DELTA_PAGE: u32 = 2;
const LINE_HEIGHT_PX: f64 = 16.0;

fn wheel_pixels(ev: &web::WheelEvent, viewport_height: f64) -> f32 {
    let dy = ev.delta_y();
    (match ev.delta_mode() {
        DOM_DELTA_LINE => dy * LINE_HEIGHT_PX,
        DOM_DELTA_PAGE => dy * viewport_height,
        _ => dy,
    }) as f32
}

/// Wheel feeds the smooth scroll (non-passive, so it can take over); native
/// scroll events keep it in sync with touch and keyboard scrolling.
pub fn wire_scroll_input(shared: &SharedFrame) {
    let Some(window) = web::window() else {
        return;
    };

    let s = shared.clone();
    let win = window.clone();
    dom::add_listener(&window, "wheel", false, move |ev: web::WheelEvent| {
        if ev.ctrl_key() {
            return; // pinch zoom
        }
        let vh = win
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let delta = wheel_pixels(&ev, vh);
        if with_lifecycle(&s, |lc, _| lc.wheel(delta)).unwrap_or(false) {
            ev.prevent_default();
        }
    });

    let s = shared.clone();
    let win = window.clone();
    dom::add_listener(&window, "scroll", true, move |_: web::Event| {
        let y = win.scroll_y().unwrap_or(0.0) as f32;
        with_lifecycle(&s, |lc, _| lc.native_scroll(y));
    });
}

/// In-page `#target` links glide instead of jumping.
pub fn wire_anchors(shared: &SharedFrame) {
    let document = shared.borrow().document.clone();
    let list = document.query_selector_all("a[href^=\"#\"]");
    let Ok(list) = list else {
        return;
    };
    for i in 0..list.length() {
        let Some(anchor) = list.item(i).and_then(|n| n.dyn_into::<web::Element>().ok()) else {
            continue;
        };
        let href = anchor.get_attribute("href").unwrap_or_default();
        if href == "#" {
            continue;
        }
        let s = shared.clone();
        let doc = document.clone();
        dom::add_listener(&anchor, "click", false, move |ev: web::MouseEvent| {
            let target = doc
                .query_selector(&href)
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
                .map(|el| dom::document_top(&el));
            if with_lifecycle(&s, |lc, now| lc.anchor(target, now)).unwrap_or(false) {
                ev.prevent_default();
            }
        });
    }
}
