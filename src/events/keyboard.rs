use super::with_lifecycle;
use crate::core::{key_action, KeyAction};
use crate::dom;
use crate::frame::SharedFrame;
use web_sys as web;

pub fn handle_global_keydown(ev: &web::KeyboardEvent, shared: &SharedFrame) {
    let key = ev.key();
    match key_action(key.as_str()) {
        Some(KeyAction::CloseMenu) => {
            with_lifecycle(shared, |lc, now| {
                if lc.state().menu.is_open() {
                    log::info!("[keys] {} closes menu", key);
                    lc.escape(now);
                }
            });
        }
        None => {}
    }
}

pub fn wire_global_keydown(shared: &SharedFrame) {
    if let Some(window) = web::window() {
        let s = shared.clone();
        dom::add_listener(&window, "keydown", true, move |ev: web::KeyboardEvent| {
            handle_global_keydown(&ev, &s);
        });
    }
}
