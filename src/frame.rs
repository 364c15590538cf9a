use crate::core::Lifecycle;
use crate::dom::{self, DomLayout, ElementTable};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Everything the frame loop and the event handlers share.
pub struct FrameContext {
    pub lifecycle: Lifecycle,
    pub table: ElementTable,
    pub window: web::Window,
    pub document: web::Document,
    pub epoch: Instant,
}

pub type SharedFrame = Rc<RefCell<FrameContext>>;

impl FrameContext {
    /// Seconds since startup; the core's clock.
    #[inline]
    pub fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Apply queued mutations to the page.
    pub fn flush(&mut self) {
        for mutation in self.lifecycle.take_mutations() {
            dom::apply(&self.table, &self.window, &mutation);
        }
    }

    /// One tick. Returns `false` once the loop should stop.
    pub fn frame(&mut self) -> bool {
        let now = self.now();
        let layout = DomLayout {
            table: &self.table,
            window: &self.window,
            document: &self.document,
        };
        self.lifecycle.frame(now, &layout);
        self.flush();
        !self.lifecycle.is_torn_down()
    }
}

/// requestAnimationFrame loop; stops rescheduling after teardown.
pub fn start_loop(frame_ctx: SharedFrame) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !frame_ctx_tick.borrow_mut().frame() {
            log::info!("[frame] loop stopped");
            return;
        }
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
