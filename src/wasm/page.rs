use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::Rc;

use glam::Vec2;
use log::{info, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    Element, Event, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent,
    WheelEvent, Window,
};

use super::frame_loop::FrameLoop;
use super::render::WebGlBackend;
use crate::config::Config;
use crate::input::{Controls, KeyAction};
use crate::renderer::{Renderer, RendererState};
use crate::shader::ProgramSource;

type SharedRenderer = Rc<RefCell<Renderer<WebGlBackend>>>;

const CONFIG_ELEMENT_ID: &str = "viz-config";

/// Defaults, then the `<script id="viz-config">` JSON, then the URL query.
pub fn load_config(window: &Window) -> Config {
    let mut config = Config::default();

    let embedded = window
        .document()
        .and_then(|doc| doc.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|el| el.text_content());
    if let Some(text) = embedded {
        match Config::from_json(&text) {
            Ok(parsed) => config = parsed,
            Err(err) => warn!("ignoring #{CONFIG_ELEMENT_ID}: {err}"),
        }
    }

    if let Ok(search) = window.location().search() {
        if let Err(err) = config.apply_query(&search) {
            warn!("ignoring query override: {err}");
        }
    }
    config
}

/// An event listener that detaches itself when dropped.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref())
        {
            warn!("removing {} listener failed: {err:?}", self.kind);
        }
    }
}

/// Everything one mount put on the page. Dropping it tears the mount down.
pub struct PageHandle {
    frame_loop: Option<FrameLoop>,
    listeners: Vec<Listener>,
    container: Element,
    renderer: SharedRenderer,
}

impl PageHandle {
    pub fn state(&self) -> RendererState {
        self.renderer.borrow().state()
    }
}

impl Drop for PageHandle {
    fn drop(&mut self) {
        if let Some(frame_loop) = self.frame_loop.take() {
            frame_loop.stop();
        }
        self.listeners.clear();
        self.container.remove();
        info!("unmounted");
    }
}

/// Create the canvas, set up the renderer and, if that succeeds, wire input
/// and start the frame loop.
pub fn mount(window: &Window, config: &Config) -> Result<PageHandle, JsValue> {
    let document = window.document().ok_or("no document")?;
    let body = document.body().ok_or("no body")?;

    let container = document.create_element("div")?;
    container.set_class_name("raymarch-viz");
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.style().set_property("display", "block")?;
    canvas.style().set_property("touch-action", "none")?;
    container.append_child(&canvas)?;
    body.append_child(&container)?;

    let (width, height) = window_size(window);
    canvas.set_width(width);
    canvas.set_height(height);

    let program = ProgramSource::for_variant(config.variant, &config.shader_options());
    let controls = Controls::new(config.initial, config.debounce_ms);
    let renderer = Renderer::mount(WebGlBackend::from_canvas(&canvas), &program, controls);
    let renderer: SharedRenderer = Rc::new(RefCell::new(renderer));

    let mut handle = PageHandle {
        frame_loop: None,
        listeners: Vec::new(),
        container,
        renderer: renderer.clone(),
    };
    if handle.state() != RendererState::Running {
        return Ok(handle);
    }
    info!("mounted {} variant", config.variant);

    fit_to_window(window, &canvas, &renderer);
    handle.listeners = attach_listeners(window, &canvas, &renderer)?;
    handle.frame_loop = Some(FrameLoop::start(window, move |timestamp| {
        renderer.borrow_mut().frame(timestamp);
        ControlFlow::Continue(())
    })?);
    Ok(handle)
}

fn attach_listeners(
    window: &Window,
    canvas: &HtmlCanvasElement,
    renderer: &SharedRenderer,
) -> Result<Vec<Listener>, JsValue> {
    let window_target: &EventTarget = window.as_ref();
    let canvas_target: &EventTarget = canvas.as_ref();
    let mut listeners = Vec::new();

    listeners.push(Listener::attach(window_target, "resize", {
        let window = window.clone();
        let canvas = canvas.clone();
        let renderer = renderer.clone();
        move |_| fit_to_window(&window, &canvas, &renderer)
    })?);

    listeners.push(Listener::attach(window_target, "keydown", {
        let renderer = renderer.clone();
        move |event: Event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if let Some(action) = KeyAction::from_key(&key.key()) {
                event.prevent_default();
                renderer
                    .borrow_mut()
                    .controls_mut()
                    .key(action, event.time_stamp());
            }
        }
    })?);

    listeners.push(Listener::attach(canvas_target, "touchstart", {
        let renderer = renderer.clone();
        move |event: Event| {
            if let Some(touch) = event.dyn_ref::<TouchEvent>() {
                renderer.borrow_mut().controls_mut().touch_start(&contacts(touch));
            }
        }
    })?);

    listeners.push(Listener::attach(canvas_target, "touchmove", {
        let renderer = renderer.clone();
        move |event: Event| {
            if let Some(touch) = event.dyn_ref::<TouchEvent>() {
                renderer.borrow_mut().controls_mut().touch_move(&contacts(touch));
            }
        }
    })?);

    for kind in ["touchend", "touchcancel"] {
        listeners.push(Listener::attach(canvas_target, kind, {
            let renderer = renderer.clone();
            move |event: Event| {
                if let Some(touch) = event.dyn_ref::<TouchEvent>() {
                    renderer.borrow_mut().controls_mut().touch_end(&contacts(touch));
                }
            }
        })?);
    }

    listeners.push(Listener::attach(canvas_target, "mousedown", {
        let renderer = renderer.clone();
        move |event: Event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                if mouse.button() == 0 {
                    renderer.borrow_mut().controls_mut().drag_start(client_pos(mouse));
                }
            }
        }
    })?);

    listeners.push(Listener::attach(window_target, "mousemove", {
        let renderer = renderer.clone();
        move |event: Event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                renderer.borrow_mut().controls_mut().drag_move(client_pos(mouse));
            }
        }
    })?);

    listeners.push(Listener::attach(window_target, "mouseup", {
        let renderer = renderer.clone();
        move |_| renderer.borrow_mut().controls_mut().drag_end()
    })?);

    listeners.push(Listener::attach(canvas_target, "wheel", {
        let renderer = renderer.clone();
        move |event: Event| {
            if let Some(wheel) = event.dyn_ref::<WheelEvent>() {
                renderer.borrow_mut().controls_mut().wheel(wheel.delta_y() as f32);
            }
        }
    })?);

    Ok(listeners)
}

fn window_size(window: &Window) -> (u32, u32) {
    let dim = |v: Result<JsValue, JsValue>| {
        v.ok()
            .and_then(|v| v.as_f64())
            .filter(|v| v.is_finite() && *v > 0.0)
            .map_or(0, |v| v as u32)
    };
    (dim(window.inner_width()), dim(window.inner_height()))
}

fn fit_to_window(window: &Window, canvas: &HtmlCanvasElement, renderer: &SharedRenderer) {
    let (width, height) = window_size(window);
    canvas.set_width(width);
    canvas.set_height(height);
    renderer.borrow_mut().resize(width, height);
}

fn contacts(event: &TouchEvent) -> Vec<Vec2> {
    let touches = event.touches();
    (0..touches.length())
        .filter_map(|i| touches.item(i))
        .map(|t| Vec2::new(t.client_x() as f32, t.client_y() as f32))
        .collect()
}

fn client_pos(event: &MouseEvent) -> Vec2 {
    Vec2::new(event.client_x() as f32, event.client_y() as f32)
}
