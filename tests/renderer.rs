mod common;

use common::{capture_logs, draws, errors, uniform, Call, MockGl, SYNTAX_ERROR_LOG};
use glam::{Mat4, Vec2, Vec3};
use raymarch_viz::gl::{ShaderStage, UniformValue};
use raymarch_viz::input::{Controls, KeyAction};
use raymarch_viz::renderer::QUAD_VERTICES;
use raymarch_viz::{
    FrameOutcome, ProgramSource, RenderError, Renderer, RendererState, ShaderOptions,
    ShaderVariant, ViewState,
};

fn lit() -> ProgramSource {
    ProgramSource::for_variant(ShaderVariant::Lit, &ShaderOptions::default())
}

fn controls() -> Controls {
    Controls::new(ViewState::default(), 100.0)
}

#[test]
fn missing_context_stays_uninitialized() {
    capture_logs();
    let mut renderer: Renderer<MockGl> = Renderer::mount(None, &lit(), controls());

    assert_eq!(renderer.state(), RendererState::Uninitialized);
    assert_eq!(renderer.failure(), Some(&RenderError::ContextUnavailable));
    for t in [0.0, 16.0, 33.0] {
        assert_eq!(renderer.frame(t), FrameOutcome::Skipped);
    }
    let errors = errors();
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert!(errors[0].contains("WebGL not supported"));
}

#[test]
fn fragment_syntax_error_aborts_before_link() {
    capture_logs();
    let good = lit();
    let broken = ProgramSource::custom(
        good.vertex.clone(),
        good.fragment.replace("void main() {", "void main() { @"),
        good.uniforms.clone(),
    );
    let gl = MockGl::new();
    let log = gl.log();
    let mut renderer = Renderer::mount(Some(gl), &broken, controls());

    assert_eq!(renderer.state(), RendererState::Uninitialized);
    assert_eq!(
        renderer.failure(),
        Some(&RenderError::Compile {
            stage: ShaderStage::Fragment,
            log: SYNTAX_ERROR_LOG.to_string(),
        })
    );
    assert_eq!(renderer.frame(16.0), FrameOutcome::Skipped);

    let calls = log.borrow().clone();
    assert!(!calls.contains(&Call::CreateProgram));
    assert!(!calls.iter().any(|c| matches!(c, Call::Link(_))));
    // Both shader objects are released: the failed fragment and the vertex.
    assert_eq!(
        calls.iter().filter(|c| matches!(c, Call::DeleteShader(_))).count(),
        2
    );
    assert_eq!(draws(&log), 0);

    let errors = errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains(SYNTAX_ERROR_LOG), "{}", errors[0]);
    assert!(errors[0].contains("fragment"));
}

#[test]
fn vertex_failure_never_creates_fragment() {
    capture_logs();
    let broken = ProgramSource::custom("void main() {", lit().fragment, vec![]);
    let gl = MockGl::new();
    let log = gl.log();
    let renderer = Renderer::mount(Some(gl), &broken, controls());

    assert!(matches!(
        renderer.failure(),
        Some(RenderError::Compile {
            stage: ShaderStage::Vertex,
            ..
        })
    ));
    assert!(!log
        .borrow()
        .contains(&Call::CreateShader(ShaderStage::Fragment)));
    assert_eq!(errors().len(), 1);
}

#[test]
fn link_failure_reports_linker_log() {
    capture_logs();
    let gl = MockGl {
        fail_link: true,
        ..MockGl::new()
    };
    let log = gl.log();
    let mut renderer = Renderer::mount(Some(gl), &lit(), controls());

    assert!(matches!(renderer.failure(), Some(RenderError::Link { .. })));
    assert_eq!(renderer.frame(0.0), FrameOutcome::Skipped);
    assert!(log.borrow().iter().any(|c| matches!(c, Call::DeleteProgram(_))));
    assert!(!log.borrow().iter().any(|c| matches!(c, Call::UseProgram(_))));
    let errors = errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("varying v_uv not written"));
}

#[test]
fn unresolved_position_attribute_aborts() {
    capture_logs();
    let gl = MockGl {
        missing_attribute: true,
        ..MockGl::new()
    };
    let log = gl.log();
    let mut renderer = Renderer::mount(Some(gl), &lit(), controls());

    assert_eq!(
        renderer.failure(),
        Some(&RenderError::AttributeUnresolved {
            name: "a_position".to_string()
        })
    );
    assert_eq!(renderer.frame(0.0), FrameOutcome::Skipped);
    assert!(!log.borrow().contains(&Call::CreateBuffer));
    assert_eq!(errors().len(), 1);
}

#[test]
fn buffer_creation_failure_aborts() {
    capture_logs();
    let gl = MockGl {
        fail_buffer: true,
        ..MockGl::new()
    };
    let renderer = Renderer::mount(Some(gl), &lit(), controls());
    assert!(matches!(
        renderer.failure(),
        Some(RenderError::ResourceCreation { .. })
    ));
    assert_eq!(renderer.state(), RendererState::Uninitialized);
}

#[test]
fn setup_uploads_quad_and_binds_attribute() {
    capture_logs();
    let gl = MockGl::new();
    let log = gl.log();
    let renderer = Renderer::mount(Some(gl), &lit(), controls());

    assert_eq!(renderer.state(), RendererState::Running);
    assert!(renderer.failure().is_none());
    assert!(errors().is_empty());
    let calls = log.borrow();
    assert!(calls.contains(&Call::Upload(QUAD_VERTICES.to_vec())));
    assert!(calls.contains(&Call::AttribPointer(0)));
    assert_eq!(QUAD_VERTICES.len(), 12);
}

#[test]
fn rest_frame_pushes_identity_rotation() {
    capture_logs();
    let gl = MockGl::new();
    let log = gl.log();
    let mut renderer = Renderer::mount(Some(gl), &lit(), controls());
    renderer.resize(800, 600);

    assert_eq!(renderer.frame(0.0), FrameOutcome::Drawn);
    assert_eq!(uniform(&log, "u_rotation"), Some(UniformValue::Mat4(Mat4::IDENTITY)));
    assert_eq!(
        uniform(&log, "u_lightPos"),
        Some(UniformValue::Vec3(Vec3::new(2.0, 0.0, 2.0)))
    );
    assert_eq!(
        uniform(&log, "u_resolution"),
        Some(UniformValue::Vec2(Vec2::new(800.0, 600.0)))
    );
    assert_eq!(uniform(&log, "u_zoom"), Some(UniformValue::Float(1.0)));
    assert_eq!(uniform(&log, "u_time"), Some(UniformValue::Float(0.0)));
}

#[test]
fn frame_clears_black_then_draws_six_vertices() {
    capture_logs();
    let gl = MockGl::new();
    let log = gl.log();
    let mut renderer = Renderer::mount(Some(gl), &lit(), controls());
    log.borrow_mut().clear();

    renderer.frame(1500.0);
    let calls = log.borrow();
    let tail: Vec<_> = calls.iter().rev().take(3).rev().cloned().collect();
    assert_eq!(
        tail,
        vec![
            Call::ClearColor([0.0, 0.0, 0.0, 1.0]),
            Call::Clear,
            Call::Draw(0, 6)
        ]
    );
    drop(calls);
    assert_eq!(uniform(&log, "u_time"), Some(UniformValue::Float(1.5)));
}

#[test]
fn inactive_uniform_is_tolerated() {
    capture_logs();
    let gl = MockGl {
        inactive_uniforms: vec!["u_time"],
        ..MockGl::new()
    };
    let log = gl.log();
    let mut renderer = Renderer::mount(Some(gl), &lit(), controls());

    assert_eq!(renderer.state(), RendererState::Running);
    renderer.frame(10.0);
    assert_eq!(uniform(&log, "u_time"), None);
    assert!(uniform(&log, "u_roughness").is_some());
    assert_eq!(draws(&log), 1);
}

#[test]
fn resize_matches_viewport() {
    capture_logs();
    let gl = MockGl::new();
    let log = gl.log();
    let mut renderer = Renderer::mount(Some(gl), &lit(), controls());

    renderer.resize(1920, 1080);
    assert_eq!(renderer.size(), (1920, 1080));
    assert_eq!(log.borrow().last(), Some(&Call::Viewport(1920, 1080)));

    renderer.resize(0, 0);
    assert_eq!(renderer.size(), (0, 0));
    assert_eq!(log.borrow().last(), Some(&Call::Viewport(1, 1)));
}

#[test]
fn roughness_reaches_shader_after_debounce() {
    capture_logs();
    let gl = MockGl::new();
    let log = gl.log();
    let mut renderer = Renderer::mount(Some(gl), &lit(), controls());

    for t in [0.0, 30.0, 60.0] {
        renderer.controls_mut().key(KeyAction::Roughness(0.01), t);
    }
    renderer.frame(100.0);
    assert_eq!(uniform(&log, "u_roughness"), Some(UniformValue::Float(0.1)));
    assert!(renderer.controls().pending_roughness().is_some());

    renderer.frame(170.0);
    match uniform(&log, "u_roughness") {
        Some(UniformValue::Float(r)) => assert!((r - 0.13).abs() < 1e-5, "{r}"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn rotation_keys_apply_on_next_frame() {
    capture_logs();
    let gl = MockGl::new();
    let log = gl.log();
    let mut renderer = Renderer::mount(Some(gl), &lit(), controls());

    renderer.controls_mut().key(KeyAction::RotateY(0.1), 0.0);
    renderer.frame(1.0);
    assert_eq!(
        uniform(&log, "u_rotation"),
        Some(UniformValue::Mat4(Mat4::from_rotation_y(0.1)))
    );
}

#[test]
fn drop_releases_gpu_resources() {
    capture_logs();
    let gl = MockGl::new();
    let log = gl.log();
    let renderer = Renderer::mount(Some(gl), &lit(), controls());
    drop(renderer);

    let calls = log.borrow();
    assert!(calls.iter().any(|c| matches!(c, Call::DeleteBuffer(_))));
    assert!(calls.iter().any(|c| matches!(c, Call::DeleteProgram(_))));
}

#[test]
fn every_variant_mounts() {
    for variant in ShaderVariant::ALL {
        capture_logs();
        let gl = MockGl::new();
        let log = gl.log();
        let source = ProgramSource::for_variant(variant, &ShaderOptions::default());
        let mut renderer = Renderer::mount(Some(gl), &source, controls());
        assert_eq!(renderer.state(), RendererState::Running, "{variant}");
        renderer.frame(0.0);
        let pushed = log
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::SetUniform(..)))
            .count();
        assert_eq!(pushed, variant.uniforms().len(), "{variant}");
    }
}
