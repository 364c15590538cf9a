pub mod keyboard;
pub mod page;
pub mod pointer;
pub mod scroll;

pub use keyboard::wire_global_keydown;
pub use page::{wire_form, wire_lifecycle_events, wire_menu};
pub use pointer::wire_pointer_handlers;
pub use scroll::{wire_anchors, wire_scroll_input};

use crate::core::{ElementId, Lifecycle};
use crate::frame::SharedFrame;
use web_sys as web;

/// Run `f` against the lifecycle with the current clock. Skipped if the
/// shared state is already borrowed (re-entrant dispatch).
pub(crate) fn with_lifecycle<R>(
    shared: &SharedFrame,
    f: impl FnOnce(&mut Lifecycle, f64) -> R,
) -> Option<R> {
    let mut ctx = shared.try_borrow_mut().ok()?;
    let now = ctx.now();
    Some(f(&mut ctx.lifecycle, now))
}

pub(crate) fn element(shared: &SharedFrame, id: ElementId) -> Option<web::HtmlElement> {
    let ctx = shared.borrow();
    ctx.table.get(id).cloned()
}
