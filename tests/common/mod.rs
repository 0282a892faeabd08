#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata, Record};
use raymarch_viz::gl::{GlBackend, ShaderStage, UniformValue};

/// One recorded backend call.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    CreateShader(ShaderStage),
    DeleteShader(u32),
    CreateProgram,
    Link(u32),
    DeleteProgram(u32),
    UseProgram(u32),
    CreateBuffer,
    DeleteBuffer(u32),
    Upload(Vec<f32>),
    AttribPointer(u32),
    Viewport(i32, i32),
    ClearColor([f32; 4]),
    Clear,
    Draw(i32, i32),
    SetUniform(String, UniformValue),
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

/// Recording backend. Compilation fails for any source containing `@` or
/// with unbalanced braces, the way a real GLSL compiler would reject a typo.
#[derive(Default)]
pub struct MockGl {
    pub calls: CallLog,
    pub next_id: Cell<u32>,
    pub sources: RefCell<HashMap<u32, String>>,
    pub compiled: RefCell<HashMap<u32, bool>>,
    pub fail_link: bool,
    pub missing_attribute: bool,
    pub fail_buffer: bool,
    pub inactive_uniforms: Vec<&'static str>,
}

impl MockGl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> CallLog {
        self.calls.clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn id(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

pub const SYNTAX_ERROR_LOG: &str = "ERROR: 0:1: '@' : syntax error";

impl GlBackend for MockGl {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type UniformLocation = String;

    fn create_shader(&self, stage: ShaderStage) -> Option<u32> {
        self.record(Call::CreateShader(stage));
        Some(self.id())
    }

    fn shader_source(&self, shader: &u32, source: &str) {
        self.sources.borrow_mut().insert(*shader, source.to_string());
    }

    fn compile_shader(&self, shader: &u32) {
        let ok = self
            .sources
            .borrow()
            .get(shader)
            .map(|src| !src.contains('@') && src.matches('{').count() == src.matches('}').count())
            .unwrap_or(false);
        self.compiled.borrow_mut().insert(*shader, ok);
    }

    fn shader_compiled(&self, shader: &u32) -> bool {
        self.compiled.borrow().get(shader).copied().unwrap_or(false)
    }

    fn shader_info_log(&self, _shader: &u32) -> Option<String> {
        Some(SYNTAX_ERROR_LOG.to_string())
    }

    fn delete_shader(&self, shader: &u32) {
        self.record(Call::DeleteShader(*shader));
    }

    fn create_program(&self) -> Option<u32> {
        self.record(Call::CreateProgram);
        Some(self.id())
    }

    fn attach_shader(&self, _program: &u32, _shader: &u32) {}

    fn link_program(&self, program: &u32) {
        self.record(Call::Link(*program));
    }

    fn program_linked(&self, _program: &u32) -> bool {
        !self.fail_link
    }

    fn program_info_log(&self, _program: &u32) -> Option<String> {
        Some("error: varying v_uv not written by vertex shader".to_string())
    }

    fn delete_program(&self, program: &u32) {
        self.record(Call::DeleteProgram(*program));
    }

    fn use_program(&self, program: &u32) {
        self.record(Call::UseProgram(*program));
    }

    fn attrib_location(&self, _program: &u32, _name: &str) -> Option<u32> {
        (!self.missing_attribute).then_some(0)
    }

    fn uniform_location(&self, _program: &u32, name: &str) -> Option<String> {
        (!self.inactive_uniforms.iter().any(|n| *n == name)).then(|| name.to_string())
    }

    fn create_buffer(&self) -> Option<u32> {
        self.record(Call::CreateBuffer);
        (!self.fail_buffer).then(|| self.id())
    }

    fn delete_buffer(&self, buffer: &u32) {
        self.record(Call::DeleteBuffer(*buffer));
    }

    fn upload_static_f32(&self, _buffer: &u32, data: &[f32]) {
        self.record(Call::Upload(data.to_vec()));
    }

    fn vertex_attrib_vec2(&self, location: u32) {
        self.record(Call::AttribPointer(location));
    }

    fn viewport(&self, width: i32, height: i32) {
        self.record(Call::Viewport(width, height));
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(Call::ClearColor([r, g, b, a]));
    }

    fn clear_color_buffer(&self) {
        self.record(Call::Clear);
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        self.record(Call::Draw(first, count));
    }

    fn set_uniform(&self, location: &String, value: UniformValue) {
        self.record(Call::SetUniform(location.clone(), value));
    }
}

pub fn draws(log: &CallLog) -> usize {
    log.borrow()
        .iter()
        .filter(|c| matches!(c, Call::Draw(..)))
        .count()
}

pub fn uniform(log: &CallLog, name: &str) -> Option<UniformValue> {
    log.borrow().iter().rev().find_map(|c| match c {
        Call::SetUniform(n, v) if n == name => Some(*v),
        _ => None,
    })
}

// Records are kept per thread; the test harness runs each test on its own.
thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct Capture;

static CAPTURE: Capture = Capture;

impl Log for Capture {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS.with(|r| {
            r.borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

/// Install the capturing logger (once per process) and clear this thread's
/// records.
pub fn capture_logs() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(LevelFilter::Trace);
    });
    RECORDS.with(|r| r.borrow_mut().clear());
}

pub fn errors() -> Vec<String> {
    RECORDS.with(|r| {
        r.borrow()
            .iter()
            .filter(|(level, _)| *level == Level::Error)
            .map(|(_, msg)| msg.clone())
            .collect()
    })
}
