use std::cell::{Cell, RefCell};
use std::ops::ControlFlow;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::Window;

type FrameClosure = Closure<dyn FnMut(f64)>;

/// Self-rescheduling `requestAnimationFrame` loop with a stop switch.
///
/// The callback checks `running` before drawing and before asking for the
/// next frame, and `stop` cancels the request already queued, so nothing
/// runs against a torn-down page. A tick that returns `Break` ends the loop
/// from the inside.
pub struct FrameLoop {
    window: Window,
    running: Rc<Cell<bool>>,
    request: Rc<Cell<Option<i32>>>,
    // Holds the closure, which holds a clone of this Rc so it can requeue
    // itself; `stop` breaks the cycle.
    callback: Rc<RefCell<Option<FrameClosure>>>,
}

impl FrameLoop {
    pub fn start(
        window: &Window,
        mut tick: impl FnMut(f64) -> ControlFlow<()> + 'static,
    ) -> Result<Self, JsValue> {
        let running = Rc::new(Cell::new(true));
        let request = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<FrameClosure>>> = Rc::new(RefCell::new(None));

        let closure = {
            let window = window.clone();
            let running = running.clone();
            let request = request.clone();
            let callback = callback.clone();
            Closure::wrap(Box::new(move |timestamp: f64| {
                request.set(None);
                if !running.get() {
                    return;
                }
                if tick(timestamp).is_break() {
                    running.set(false);
                }
                if !running.get() {
                    return;
                }
                if let Some(next) = callback.borrow().as_ref() {
                    match window.request_animation_frame(next.as_ref().unchecked_ref()) {
                        Ok(id) => request.set(Some(id)),
                        Err(err) => {
                            log::error!("requestAnimationFrame failed: {err:?}");
                            running.set(false);
                        }
                    }
                }
            }) as Box<dyn FnMut(f64)>)
        };

        let id = window.request_animation_frame(closure.as_ref().unchecked_ref())?;
        request.set(Some(id));
        *callback.borrow_mut() = Some(closure);

        Ok(Self {
            window: window.clone(),
            running,
            request,
            callback,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Whether a frame request is queued with the browser.
    pub fn is_scheduled(&self) -> bool {
        self.request.get().is_some()
    }

    /// Stop scheduling. Must not be called from inside the frame callback.
    pub fn stop(&self) {
        self.running.set(false);
        if let Some(id) = self.request.take() {
            if let Err(err) = self.window.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame failed: {err:?}");
            }
        }
        self.callback.borrow_mut().take();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
