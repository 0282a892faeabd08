use glam::Vec2;

use crate::camera::{light_position, rotation_matrix};
use crate::gl::UniformValue;
use crate::view::ViewState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformKind {
    Float,
    Vec2,
    Vec3,
    Mat4,
}

/// Where a uniform's per-frame value comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformSource {
    /// Canvas size in pixels.
    Resolution,
    /// Seconds since the page's time origin.
    Time,
    Zoom,
    Roughness,
    /// Orbiting light, recomputed from time every frame.
    LightPos,
    /// `R_y(rotationY) · R_x(rotationX)`.
    Rotation,
}

impl UniformSource {
    pub fn kind(self) -> UniformKind {
        match self {
            UniformSource::Resolution => UniformKind::Vec2,
            UniformSource::Time | UniformSource::Zoom | UniformSource::Roughness => {
                UniformKind::Float
            }
            UniformSource::LightPos => UniformKind::Vec3,
            UniformSource::Rotation => UniformKind::Mat4,
        }
    }
}

/// One entry of a shader variant's uniform table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformSpec {
    pub name: &'static str,
    pub kind: UniformKind,
    pub source: UniformSource,
}

impl UniformSpec {
    pub const fn new(name: &'static str, kind: UniformKind, source: UniformSource) -> Self {
        Self { name, kind, source }
    }
}

/// Everything a frame's uniforms are derived from, sampled once at the top
/// of the frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameInputs {
    pub resolution: Vec2,
    pub time: f32,
    pub view: ViewState,
}

impl FrameInputs {
    pub fn value(&self, source: UniformSource) -> UniformValue {
        match source {
            UniformSource::Resolution => UniformValue::Vec2(self.resolution),
            UniformSource::Time => UniformValue::Float(self.time),
            UniformSource::Zoom => UniformValue::Float(self.view.zoom()),
            UniformSource::Roughness => UniformValue::Float(self.view.roughness()),
            UniformSource::LightPos => UniformValue::Vec3(light_position(self.time)),
            UniformSource::Rotation => UniformValue::Mat4(rotation_matrix(
                self.view.rotation_x(),
                self.view.rotation_y(),
            )),
        }
    }
}
