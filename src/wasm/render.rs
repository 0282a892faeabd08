use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation,
};

use crate::gl::{GlBackend, ShaderStage, UniformValue};

/// `GlBackend` over a canvas's WebGL2 context.
pub struct WebGlBackend {
    gl: GL,
}

impl WebGlBackend {
    /// Acquire `webgl2` from `canvas`. `None` when the browser cannot
    /// provide one (or hands back something that is not a WebGL2 context).
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Option<Self> {
        let context = canvas.get_context("webgl2").ok().flatten()?;
        let gl = context.dyn_into::<GL>().ok()?;
        Some(Self { gl })
    }
}

impl GlBackend for WebGlBackend {
    type Shader = WebGlShader;
    type Program = WebGlProgram;
    type Buffer = WebGlBuffer;
    type UniformLocation = WebGlUniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Option<WebGlShader> {
        let kind = match stage {
            ShaderStage::Vertex => GL::VERTEX_SHADER,
            ShaderStage::Fragment => GL::FRAGMENT_SHADER,
        };
        self.gl.create_shader(kind)
    }

    fn shader_source(&self, shader: &WebGlShader, source: &str) {
        self.gl.shader_source(shader, source);
    }

    fn compile_shader(&self, shader: &WebGlShader) {
        self.gl.compile_shader(shader);
    }

    fn shader_compiled(&self, shader: &WebGlShader) -> bool {
        self.gl
            .get_shader_parameter(shader, GL::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: &WebGlShader) -> Option<String> {
        self.gl.get_shader_info_log(shader)
    }

    fn delete_shader(&self, shader: &WebGlShader) {
        self.gl.delete_shader(Some(shader));
    }

    fn create_program(&self) -> Option<WebGlProgram> {
        self.gl.create_program()
    }

    fn attach_shader(&self, program: &WebGlProgram, shader: &WebGlShader) {
        self.gl.attach_shader(program, shader);
    }

    fn link_program(&self, program: &WebGlProgram) {
        self.gl.link_program(program);
    }

    fn program_linked(&self, program: &WebGlProgram) -> bool {
        self.gl
            .get_program_parameter(program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: &WebGlProgram) -> Option<String> {
        self.gl.get_program_info_log(program)
    }

    fn delete_program(&self, program: &WebGlProgram) {
        self.gl.delete_program(Some(program));
    }

    fn use_program(&self, program: &WebGlProgram) {
        self.gl.use_program(Some(program));
    }

    fn attrib_location(&self, program: &WebGlProgram, name: &str) -> Option<u32> {
        u32::try_from(self.gl.get_attrib_location(program, name)).ok()
    }

    fn uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.gl.get_uniform_location(program, name)
    }

    fn create_buffer(&self) -> Option<WebGlBuffer> {
        self.gl.create_buffer()
    }

    fn delete_buffer(&self, buffer: &WebGlBuffer) {
        self.gl.delete_buffer(Some(buffer));
    }

    fn upload_static_f32(&self, buffer: &WebGlBuffer, data: &[f32]) {
        self.gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
        let array = js_sys::Float32Array::from(data);
        self.gl
            .buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &array, GL::STATIC_DRAW);
    }

    fn vertex_attrib_vec2(&self, location: u32) {
        self.gl.enable_vertex_attrib_array(location);
        self.gl
            .vertex_attrib_pointer_with_i32(location, 2, GL::FLOAT, false, 0, 0);
    }

    fn viewport(&self, width: i32, height: i32) {
        self.gl.viewport(0, 0, width, height);
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.gl.clear_color(r, g, b, a);
    }

    fn clear_color_buffer(&self) {
        self.gl.clear(GL::COLOR_BUFFER_BIT);
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        self.gl.draw_arrays(GL::TRIANGLES, first, count);
    }

    fn set_uniform(&self, location: &WebGlUniformLocation, value: UniformValue) {
        let loc = Some(location);
        match value {
            UniformValue::Float(v) => self.gl.uniform1f(loc, v),
            UniformValue::Vec2(v) => self.gl.uniform2f(loc, v.x, v.y),
            UniformValue::Vec3(v) => self.gl.uniform3f(loc, v.x, v.y, v.z),
            UniformValue::Mat4(m) => {
                self.gl
                    .uniform_matrix4fv_with_f32_array(loc, false, &m.to_cols_array())
            }
        }
    }
}
