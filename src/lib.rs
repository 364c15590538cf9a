pub mod constants;
pub mod core;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod preloader;

#[cfg(target_arch = "wasm32")]
pub use web_entry::start;

#[cfg(target_arch = "wasm32")]
mod web_entry {
    use crate::core::{Environment, Lifecycle};
    use crate::{dom, events, frame};
    use instant::Instant;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::{spawn_local, JsFuture};
    use web_sys as web;

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        log::info!("folio-motion starting");

        spawn_local(async move {
            if let Err(e) = init().await {
                log::error!("init error: {:?}", e);
            }
        });
        Ok(())
    }

    fn read_environment(window: &web::Window) -> Environment {
        Environment {
            viewport_width: dom::viewport_width(window),
            reduced_motion: dom::media_matches(window, "(prefers-reduced-motion: reduce)"),
            touch_primary: dom::media_matches(window, "(pointer: coarse)"),
        }
    }

    async fn init() -> anyhow::Result<()> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::anyhow!("no document"))?;

        let env = read_environment(&window);
        log::info!(
            "[boot] width={:.0} reduced={} touch={}",
            env.viewport_width,
            env.reduced_motion,
            env.touch_primary
        );

        let mut table = dom::ElementTable::default();
        let bindings = dom::bind_page(&document, &mut table);
        let epoch = Instant::now();
        let shared: frame::SharedFrame = Rc::new(RefCell::new(frame::FrameContext {
            lifecycle: Lifecycle::new(env, bindings),
            table,
            window: window.clone(),
            document: document.clone(),
            epoch,
        }));

        // js-enabled marker, static state and hidden states land before the
        // first paint.
        {
            let mut ctx = shared.borrow_mut();
            let now = ctx.now();
            ctx.lifecycle.boot(now);
            ctx.flush();
        }

        events::wire_lifecycle_events(&shared);
        events::wire_scroll_input(&shared);
        events::wire_anchors(&shared);
        events::wire_pointer_handlers(&shared);
        events::wire_global_keydown(&shared);
        events::wire_menu(&shared);
        events::wire_form(&shared);

        frame::start_loop(shared.clone());

        // Web fonts change line heights, so boundaries measured before they
        // load are stale.
        match document.fonts().ready() {
            Ok(ready) => {
                if JsFuture::from(ready).await.is_ok() {
                    if let Ok(mut ctx) = shared.try_borrow_mut() {
                        ctx.lifecycle.request_refresh(true);
                    }
                    log::info!("[boot] fonts ready");
                }
            }
            Err(e) => log::warn!("[boot] fonts unavailable: {:?}", e),
        }
        Ok(())
    }
}
