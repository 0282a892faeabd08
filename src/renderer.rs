use glam::Vec2;
use log::{debug, error, info};

use crate::error::RenderError;
use crate::gl::{GlBackend, ShaderStage};
use crate::input::Controls;
use crate::shader::{ProgramSource, POSITION_ATTRIBUTE};
use crate::uniforms::{FrameInputs, UniformSpec};

/// Two triangles covering clip space, as interleaved `(x, y)` pairs.
pub const QUAD_VERTICES: [f32; 12] = [
    -1.0, -1.0, //
    1.0, -1.0, //
    -1.0, 1.0, //
    -1.0, 1.0, //
    1.0, -1.0, //
    1.0, 1.0,
];
pub const QUAD_VERTEX_COUNT: i32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RendererState {
    /// Setup has not succeeded. Permanent for this mount.
    Uninitialized,
    Running,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Skipped,
    Drawn,
}

struct GpuResources<B: GlBackend> {
    program: B::Program,
    buffer: B::Buffer,
    uniforms: Vec<(UniformSpec, B::UniformLocation)>,
}

/// Full-viewport quad renderer: one program, one static buffer, uniforms
/// pushed every frame from the view state.
pub struct Renderer<B: GlBackend> {
    gl: Option<B>,
    gpu: Option<GpuResources<B>>,
    failure: Option<RenderError>,
    controls: Controls,
    width: u32,
    height: u32,
}

impl<B: GlBackend> Renderer<B> {
    /// Run setup against `context`. Failures are logged once and leave the
    /// renderer `Uninitialized`; they are never returned to the caller.
    pub fn mount(context: Option<B>, source: &ProgramSource, controls: Controls) -> Self {
        let mut renderer = Self {
            gl: context,
            gpu: None,
            failure: None,
            controls,
            width: 0,
            height: 0,
        };
        match renderer.setup(source) {
            Ok(gpu) => {
                info!(
                    "renderer running with {}/{} uniforms bound",
                    gpu.uniforms.len(),
                    source.uniforms.len()
                );
                renderer.gpu = Some(gpu);
            }
            Err(err) => {
                error!("{err}");
                renderer.failure = Some(err);
            }
        }
        renderer
    }

    fn setup(&self, source: &ProgramSource) -> Result<GpuResources<B>, RenderError> {
        let gl = self.gl.as_ref().ok_or(RenderError::ContextUnavailable)?;

        let vertex = compile(gl, ShaderStage::Vertex, &source.vertex)?;
        let fragment = match compile(gl, ShaderStage::Fragment, &source.fragment) {
            Ok(shader) => shader,
            Err(err) => {
                gl.delete_shader(&vertex);
                return Err(err);
            }
        };
        let linked = link(gl, &vertex, &fragment);
        // Linked or not, the shader objects are done with.
        gl.delete_shader(&vertex);
        gl.delete_shader(&fragment);
        let program = linked?;
        gl.use_program(&program);

        let Some(position) = gl.attrib_location(&program, POSITION_ATTRIBUTE) else {
            gl.delete_program(&program);
            return Err(RenderError::AttributeUnresolved {
                name: POSITION_ATTRIBUTE.to_string(),
            });
        };

        let mut uniforms = Vec::with_capacity(source.uniforms.len());
        for spec in &source.uniforms {
            match gl.uniform_location(&program, spec.name) {
                Some(location) => uniforms.push((*spec, location)),
                // Unused uniforms are stripped by the compiler.
                None => debug!("uniform {} is inactive", spec.name),
            }
        }

        let Some(buffer) = gl.create_buffer() else {
            gl.delete_program(&program);
            return Err(RenderError::ResourceCreation {
                what: "vertex buffer",
            });
        };
        gl.upload_static_f32(&buffer, &QUAD_VERTICES);
        gl.vertex_attrib_vec2(position);

        Ok(GpuResources {
            program,
            buffer,
            uniforms,
        })
    }

    pub fn state(&self) -> RendererState {
        if self.gpu.is_some() {
            RendererState::Running
        } else {
            RendererState::Uninitialized
        }
    }

    /// Why setup failed, if it did.
    pub fn failure(&self) -> Option<&RenderError> {
        self.failure.as_ref()
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut Controls {
        &mut self.controls
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Record the canvas pixel size and match the viewport to it.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        if let Some(gl) = &self.gl {
            gl.viewport(to_gl_size(width), to_gl_size(height));
        }
    }

    /// Draw one frame for an animation-frame timestamp in milliseconds.
    pub fn frame(&mut self, timestamp_ms: f64) -> FrameOutcome {
        self.controls.tick(timestamp_ms);

        let (Some(gl), Some(gpu)) = (&self.gl, &self.gpu) else {
            return FrameOutcome::Skipped;
        };

        let inputs = FrameInputs {
            resolution: Vec2::new(self.width as f32, self.height as f32),
            time: (timestamp_ms / 1000.0) as f32,
            view: *self.controls.view(),
        };
        for (spec, location) in &gpu.uniforms {
            gl.set_uniform(location, inputs.value(spec.source));
        }

        gl.clear_color(0.0, 0.0, 0.0, 1.0);
        gl.clear_color_buffer();
        gl.draw_triangles(0, QUAD_VERTEX_COUNT);
        FrameOutcome::Drawn
    }
}

impl<B: GlBackend> Drop for Renderer<B> {
    fn drop(&mut self) {
        if let (Some(gl), Some(gpu)) = (&self.gl, self.gpu.take()) {
            gl.delete_buffer(&gpu.buffer);
            gl.delete_program(&gpu.program);
            debug!("renderer resources released");
        }
    }
}

fn compile<B: GlBackend>(
    gl: &B,
    stage: ShaderStage,
    source: &str,
) -> Result<B::Shader, RenderError> {
    let shader = gl
        .create_shader(stage)
        .ok_or(RenderError::ResourceCreation { what: "shader" })?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl.shader_compiled(&shader) {
        Ok(shader)
    } else {
        let log = gl
            .shader_info_log(&shader)
            .unwrap_or_else(|| "unknown error".to_string());
        gl.delete_shader(&shader);
        Err(RenderError::Compile { stage, log })
    }
}

fn link<B: GlBackend>(
    gl: &B,
    vertex: &B::Shader,
    fragment: &B::Shader,
) -> Result<B::Program, RenderError> {
    let program = gl
        .create_program()
        .ok_or(RenderError::ResourceCreation { what: "program" })?;
    gl.attach_shader(&program, vertex);
    gl.attach_shader(&program, fragment);
    gl.link_program(&program);
    if gl.program_linked(&program) {
        Ok(program)
    } else {
        let log = gl
            .program_info_log(&program)
            .unwrap_or_else(|| "unknown error".to_string());
        gl.delete_program(&program);
        Err(RenderError::Link { log })
    }
}

fn to_gl_size(pixels: u32) -> i32 {
    pixels.clamp(1, i32::MAX as u32) as i32
}
