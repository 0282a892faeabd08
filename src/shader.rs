use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::uniforms::{UniformKind, UniformSource, UniformSpec};

pub const POSITION_ATTRIBUTE: &str = "a_position";

const QUAD_VERT: &str = include_str!("shaders/quad.vert");
const NOISE_GLSL: &str = include_str!("shaders/noise.glsl");
const FRACTAL_FRAG: &str = include_str!("shaders/fractal.frag");
const SPHERE_FRAG: &str = include_str!("shaders/sphere.frag");
const NOISY_SPHERE_FRAG: &str = include_str!("shaders/noisy_sphere.frag");
const LIT_FRAG: &str = include_str!("shaders/lit.frag");

const RESOLUTION: UniformSpec =
    UniformSpec::new("u_resolution", UniformKind::Vec2, UniformSource::Resolution);
const TIME: UniformSpec = UniformSpec::new("u_time", UniformKind::Float, UniformSource::Time);
const ZOOM: UniformSpec = UniformSpec::new("u_zoom", UniformKind::Float, UniformSource::Zoom);
const ROUGHNESS: UniformSpec =
    UniformSpec::new("u_roughness", UniformKind::Float, UniformSource::Roughness);
const LIGHT_POS: UniformSpec =
    UniformSpec::new("u_lightPos", UniformKind::Vec3, UniformSource::LightPos);
const ROTATION: UniformSpec =
    UniformSpec::new("u_rotation", UniformKind::Mat4, UniformSource::Rotation);

/// The successive fragment programs, from the plain fractal to the lit
/// noisy sphere.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShaderVariant {
    Fractal,
    Sphere,
    NoisySphere,
    #[default]
    Lit,
}

impl ShaderVariant {
    pub const ALL: [ShaderVariant; 4] = [
        ShaderVariant::Fractal,
        ShaderVariant::Sphere,
        ShaderVariant::NoisySphere,
        ShaderVariant::Lit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShaderVariant::Fractal => "fractal",
            ShaderVariant::Sphere => "sphere",
            ShaderVariant::NoisySphere => "noisySphere",
            ShaderVariant::Lit => "lit",
        }
    }

    pub fn uniforms(self) -> &'static [UniformSpec] {
        match self {
            ShaderVariant::Fractal => &[RESOLUTION, TIME],
            ShaderVariant::Sphere => &[RESOLUTION, TIME, ZOOM],
            ShaderVariant::NoisySphere => &[RESOLUTION, TIME, ZOOM, ROUGHNESS],
            ShaderVariant::Lit => &[RESOLUTION, TIME, ZOOM, ROUGHNESS, LIGHT_POS, ROTATION],
        }
    }
}

impl fmt::Display for ShaderVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShaderVariant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShaderVariant::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownVariant(s.to_string()))
    }
}

/// Compile-time switches for the lit variant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShaderOptions {
    /// Report a miss once the march passes this distance. `None` keeps the
    /// unbounded march where stalled rays shade with their last distance.
    pub miss_cutoff: Option<f32>,
    /// Paint fragments that land on the light position yellow.
    pub light_marker: bool,
}

impl Default for ShaderOptions {
    fn default() -> Self {
        Self {
            miss_cutoff: None,
            light_marker: true,
        }
    }
}

/// Vertex and fragment text plus the uniforms the fragment stage reads.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgramSource {
    pub vertex: String,
    pub fragment: String,
    pub uniforms: Vec<UniformSpec>,
}

impl ProgramSource {
    pub fn for_variant(variant: ShaderVariant, options: &ShaderOptions) -> Self {
        let fragment = match variant {
            ShaderVariant::Fractal => FRACTAL_FRAG.to_string(),
            ShaderVariant::Sphere => SPHERE_FRAG.to_string(),
            ShaderVariant::NoisySphere => NOISY_SPHERE_FRAG.replace("__NOISE_FN__", NOISE_GLSL),
            ShaderVariant::Lit => {
                let cutoff = options.miss_cutoff.filter(|c| c.is_finite() && *c > 0.0);
                LIT_FRAG
                    .replace("__NOISE_FN__", NOISE_GLSL)
                    .replace("__MISS_CUTOFF__", &glsl_float(cutoff.unwrap_or(0.0)))
                    .replace("__LIGHT_MARKER__", if options.light_marker { "1" } else { "0" })
            }
        };
        Self {
            vertex: QUAD_VERT.to_string(),
            fragment,
            uniforms: variant.uniforms().to_vec(),
        }
    }

    pub fn custom(
        vertex: impl Into<String>,
        fragment: impl Into<String>,
        uniforms: impl Into<Vec<UniformSpec>>,
    ) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
            uniforms: uniforms.into(),
        }
    }
}

// GLSL ES 1.00 float literals need a decimal point and no exponent.
fn glsl_float(value: f32) -> String {
    format!("{value:.4}")
}
