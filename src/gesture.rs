use glam::Vec2;

use crate::view::MIN_ZOOM;

/// Two-finger pinch tracking. Zoom follows the ratio of the current finger
/// spread to the spread at gesture start, relative to the zoom at that time.
#[derive(Clone, Debug, Default)]
pub struct PinchTracker {
    gesture: Option<Pinch>,
}

#[derive(Clone, Copy, Debug)]
struct Pinch {
    start_distance: f32,
    start_zoom: f32,
}

impl PinchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Start a gesture if at least two contacts are down.
    pub fn begin(&mut self, contacts: &[Vec2], zoom: f32) {
        self.gesture = spread(contacts)
            .filter(|d| *d > f32::EPSILON)
            .map(|start_distance| Pinch {
                start_distance,
                start_zoom: zoom,
            });
    }

    /// New zoom for the current contacts, or `None` if no gesture is running.
    pub fn update(&self, contacts: &[Vec2]) -> Option<f32> {
        let pinch = self.gesture?;
        let current = spread(contacts)?;
        let zoom = pinch.start_zoom * (current / pinch.start_distance);
        Some(if zoom.is_finite() { zoom.max(MIN_ZOOM) } else { MIN_ZOOM })
    }

    /// Called on touchend/touchcancel with the contacts still down.
    pub fn end(&mut self, remaining: &[Vec2]) {
        if remaining.len() < 2 {
            self.gesture = None;
        }
    }
}

fn spread(contacts: &[Vec2]) -> Option<f32> {
    match contacts {
        [a, b, ..] => Some(a.distance(*b)),
        _ => None,
    }
}
