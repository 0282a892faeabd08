use serde::Deserialize;

/// Smallest zoom factor any input path can reach.
pub const MIN_ZOOM: f32 = 0.1;

/// Mutable view parameters read once per frame by the renderer.
///
/// Fields are private so every change goes through a setter that keeps
/// zoom above [`MIN_ZOOM`] and roughness inside `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(from = "RawView")]
pub struct ViewState {
    zoom: f32,
    rotation_x: f32,
    rotation_y: f32,
    roughness: f32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            rotation_x: 0.0,
            rotation_y: 0.0,
            roughness: 0.1,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn rotation_x(&self) -> f32 {
        self.rotation_x
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    pub fn roughness(&self) -> f32 {
        self.roughness
    }

    /// Store `zoom`, floored at [`MIN_ZOOM`]. NaN and infinities are ignored.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.max(MIN_ZOOM);
        }
    }

    /// Store `roughness` clamped to `[0, 1]`. NaN and infinities are ignored.
    pub fn set_roughness(&mut self, roughness: f32) {
        if roughness.is_finite() {
            self.roughness = clamp_roughness(roughness);
        }
    }

    pub fn rotate_x(&mut self, radians: f32) {
        if radians.is_finite() {
            self.rotation_x += radians;
        }
    }

    pub fn rotate_y(&mut self, radians: f32) {
        if radians.is_finite() {
            self.rotation_y += radians;
        }
    }
}

pub(crate) fn clamp_roughness(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

// Config JSON goes through the setters so out-of-range starting values
// get the same treatment as input.
#[derive(Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawView {
    zoom: f32,
    rotation_x: f32,
    rotation_y: f32,
    roughness: f32,
}

impl Default for RawView {
    fn default() -> Self {
        let v = ViewState::default();
        Self {
            zoom: v.zoom,
            rotation_x: v.rotation_x,
            rotation_y: v.rotation_y,
            roughness: v.roughness,
        }
    }
}

impl From<RawView> for ViewState {
    fn from(raw: RawView) -> Self {
        let mut view = ViewState::default();
        view.set_zoom(raw.zoom);
        view.rotate_x(raw.rotation_x);
        view.rotate_y(raw.rotation_y);
        view.set_roughness(raw.roughness);
        view
    }
}
