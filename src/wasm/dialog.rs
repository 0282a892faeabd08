use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::Window;

use super::storage::LocalStorageFlags;
use crate::onboarding::Onboarding;

const HEADING: &str = "Welcome to the 3D Raymarching Project!";
const BODY: [&str; 2] = [
    "This project showcases a fractal rendered using raytracing techniques in a WebGL context.",
    "Use the arrow keys to control the rotation and roughness of the sphere.",
];

/// Show the welcome panel unless this profile has dismissed it before.
pub fn show_if_first_visit(window: &Window) -> Result<(), JsValue> {
    if !Onboarding::on_mount(&LocalStorageFlags::new(window)) {
        return Ok(());
    }

    let document = window.document().ok_or("no document")?;
    let body = document.body().ok_or("no body")?;

    let panel = document.create_element("div")?;
    panel.set_class_name("dialogue-box");

    let heading = document.create_element("h2")?;
    heading.set_text_content(Some(HEADING));
    panel.append_child(&heading)?;
    for text in BODY {
        let p = document.create_element("p")?;
        p.set_text_content(Some(text));
        panel.append_child(&p)?;
    }

    let button = document.create_element("button")?;
    button.set_text_content(Some("Got it!"));
    panel.append_child(&button)?;

    let on_close = {
        let window = window.clone();
        let panel = panel.clone();
        Closure::once_into_js(move || {
            Onboarding::dismiss(&LocalStorageFlags::new(&window));
            panel.remove();
        })
    };
    button.add_event_listener_with_callback("click", on_close.unchecked_ref())?;

    body.append_child(&panel)?;
    Ok(())
}
