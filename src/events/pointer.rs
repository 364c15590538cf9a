use super::{element, with_lifecycle};
use crate::core::{ElementId, Lifecycle};
use crate::dom;
use crate::frame::SharedFrame;
use glam::Vec2;
use web_sys as web;

/// Custom cursor, cursor looks, magnetic buttons and project-card hover.
pub fn wire_pointer_handlers(shared: &SharedFrame) {
    let (document, cursor_enabled, bindings) = {
        let ctx = shared.borrow();
        (
            ctx.document.clone(),
            ctx.lifecycle.cursor_enabled(),
            ctx.lifecycle.bindings().clone(),
        )
    };

    if cursor_enabled {
        wire_cursor(shared, &document);
        for id in &bindings.interactive {
            on_element(shared, *id, "mouseenter", |lc| lc.interactive_hover(true));
            on_element(shared, *id, "mouseleave", |lc| lc.interactive_hover(false));
        }
        for id in &bindings.view_targets {
            on_element(shared, *id, "mouseenter", |lc| lc.view_hover(true));
            on_element(shared, *id, "mouseleave", |lc| lc.view_hover(false));
        }
        log::info!(
            "[mouse] cursor on, {} interactive, {} view targets",
            bindings.interactive.len(),
            bindings.view_targets.len()
        );
    }

    for magnetic in &bindings.magnetic {
        wire_magnetic(shared, magnetic.element);
    }

    for card in &bindings.projects {
        let id = card.element;
        on_element(shared, id, "mouseenter", move |lc| lc.card_hover(id, true));
        on_element(shared, id, "mouseleave", move |lc| lc.card_hover(id, false));
    }
}

fn wire_cursor(shared: &SharedFrame, document: &web::Document) {
    let s = shared.clone();
    dom::add_listener(document, "mousemove", true, move |ev: web::MouseEvent| {
        let (x, y) = (ev.client_x() as f32, ev.client_y() as f32);
        with_lifecycle(&s, |lc, _| lc.pointer_move(x, y));
    });
    let s = shared.clone();
    dom::add_listener(document, "mouseleave", true, move |_: web::Event| {
        with_lifecycle(&s, |lc, _| lc.pointer_presence(false));
    });
    let s = shared.clone();
    dom::add_listener(document, "mouseenter", true, move |_: web::Event| {
        with_lifecycle(&s, |lc, _| lc.pointer_presence(true));
    });
}

fn wire_magnetic(shared: &SharedFrame, id: ElementId) {
    let Some(el) = element(shared, id) else {
        return;
    };
    let s = shared.clone();
    let target = el.clone();
    dom::add_listener(&el, "mousemove", true, move |ev: web::MouseEvent| {
        let rect = target.get_bounding_client_rect();
        let pointer = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
        let min = Vec2::new(rect.left() as f32, rect.top() as f32);
        let size = Vec2::new(rect.width() as f32, rect.height() as f32);
        with_lifecycle(&s, |lc, _| lc.magnetic_move(id, pointer, min, size));
    });
    let s = shared.clone();
    dom::add_listener(&el, "mouseleave", true, move |_: web::Event| {
        with_lifecycle(&s, |lc, _| lc.magnetic_leave(id));
    });
}

fn on_element(
    shared: &SharedFrame,
    id: ElementId,
    event: &str,
    mut handler: impl FnMut(&mut Lifecycle) + 'static,
) {
    let Some(el) = element(shared, id) else {
        return;
    };
    let s = shared.clone();
    dom::add_listener(&el, event, true, move |_: web::Event| {
        with_lifecycle(&s, |lc, _| handler(lc));
    });
}
