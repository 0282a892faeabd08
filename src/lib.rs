pub mod camera;
pub mod config;
pub mod debounce;
pub mod error;
pub mod gesture;
pub mod gl;
pub mod input;
pub mod onboarding;
pub mod renderer;
pub mod shader;
pub mod uniforms;
pub mod view;

pub use config::Config;
pub use error::{ConfigError, RenderError};
pub use renderer::{FrameOutcome, Renderer, RendererState};
pub use shader::{ProgramSource, ShaderOptions, ShaderVariant};
pub use view::ViewState;

// Browser glue only exists on wasm32; everything above builds and tests
// natively.
#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;

    mod console;
    mod dialog;
    pub mod frame_loop;
    pub mod page;
    pub mod render;
    pub mod storage;

    thread_local! {
        static MOUNTED: RefCell<Option<page::PageHandle>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        console::init();
        let window = web_sys::window().ok_or("no window")?;
        if let Err(err) = dialog::show_if_first_visit(&window) {
            log::warn!("welcome dialog unavailable: {err:?}");
        }
        mount()
    }

    /// Mount the visualisation if nothing is mounted yet. Config is re-read
    /// from the page on every call.
    #[wasm_bindgen]
    pub fn mount() -> Result<(), JsValue> {
        if MOUNTED.with(|m| m.borrow().is_some()) {
            return Ok(());
        }
        let window = web_sys::window().ok_or("no window")?;
        let config = page::load_config(&window);
        log::set_max_level(config.log_level);

        let handle = page::mount(&window, &config)?;
        MOUNTED.with(|m| *m.borrow_mut() = Some(handle));
        Ok(())
    }

    /// Stop the frame loop, detach listeners and remove the canvas.
    #[wasm_bindgen]
    pub fn unmount() {
        if let Some(handle) = MOUNTED.with(|m| m.borrow_mut().take()) {
            drop(handle);
        }
    }

    pub fn is_mounted() -> bool {
        MOUNTED.with(|m| m.borrow().is_some())
    }
}
