use glam::Vec2;

use crate::debounce::Debounced;
use crate::gesture::PinchTracker;
use crate::view::{clamp_roughness, ViewState};

pub const ROUGHNESS_STEP: f32 = 0.01;
pub const ROTATION_STEP: f32 = 0.1;
/// Radians of rotation per CSS pixel of mouse drag.
pub const DRAG_SENSITIVITY: f32 = 0.01;
pub const WHEEL_SENSITIVITY: f32 = 0.001;

/// What a keydown asks for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyAction {
    /// Debounced roughness change.
    Roughness(f32),
    /// Immediate rotation about the Y axis.
    RotateY(f32),
}

impl KeyAction {
    /// Map a `KeyboardEvent.key` value. Anything but the arrow keys is ignored.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Self::Roughness(ROUGHNESS_STEP)),
            "ArrowDown" => Some(Self::Roughness(-ROUGHNESS_STEP)),
            "ArrowLeft" => Some(Self::RotateY(-ROTATION_STEP)),
            "ArrowRight" => Some(Self::RotateY(ROTATION_STEP)),
            _ => None,
        }
    }
}

/// Owns the view state and routes every input through its setters.
#[derive(Clone, Debug)]
pub struct Controls {
    view: ViewState,
    roughness: Debounced<f32>,
    pinch: PinchTracker,
    drag_anchor: Option<Vec2>,
}

impl Controls {
    pub fn new(view: ViewState, debounce_ms: f64) -> Self {
        Self {
            view,
            roughness: Debounced::new(debounce_ms),
            pinch: PinchTracker::new(),
            drag_anchor: None,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Roughness the user has asked for but that is not committed yet.
    pub fn pending_roughness(&self) -> Option<f32> {
        self.roughness.pending()
    }

    pub fn key(&mut self, action: KeyAction, now_ms: f64) {
        match action {
            KeyAction::Roughness(delta) => {
                let base = self.roughness.pending().unwrap_or(self.view.roughness());
                self.roughness.request(clamp_roughness(base + delta), now_ms);
            }
            KeyAction::RotateY(delta) => self.view.rotate_y(delta),
        }
    }

    /// Commit a debounced roughness value if its quiet period is over.
    /// Returns true when the view changed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        match self.roughness.poll(now_ms) {
            Some(value) => {
                self.view.set_roughness(value);
                true
            }
            None => false,
        }
    }

    pub fn touch_start(&mut self, contacts: &[Vec2]) {
        if contacts.len() >= 2 {
            self.pinch.begin(contacts, self.view.zoom());
        }
    }

    pub fn touch_move(&mut self, contacts: &[Vec2]) {
        if contacts.len() < 2 {
            return;
        }
        if let Some(zoom) = self.pinch.update(contacts) {
            self.view.set_zoom(zoom);
        }
    }

    pub fn touch_end(&mut self, remaining: &[Vec2]) {
        self.pinch.end(remaining);
    }

    pub fn drag_start(&mut self, at: Vec2) {
        self.drag_anchor = Some(at);
    }

    pub fn drag_move(&mut self, at: Vec2) {
        let Some(anchor) = self.drag_anchor else {
            return;
        };
        let delta = at - anchor;
        self.view.rotate_y(delta.x * DRAG_SENSITIVITY);
        self.view.rotate_x(delta.y * DRAG_SENSITIVITY);
        self.drag_anchor = Some(at);
    }

    pub fn drag_end(&mut self) {
        self.drag_anchor = None;
    }

    pub fn wheel(&mut self, delta_y: f32) {
        let zoom = self.view.zoom() * (-delta_y * WHEEL_SENSITIVITY).exp();
        self.view.set_zoom(zoom);
    }
}
