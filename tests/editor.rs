use scroll_shaders::editor::{EditorSession, ExportDocument};
use scroll_shaders::gradient::{configured_transform, GradientStage};
use scroll_shaders::params::Toggle;
use scroll_shaders::{ShaderContext, ShaderParams};

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() < eps
}

#[test]
fn keyframe_session_lifecycle() {
    let (mut session, ctx) = EditorSession::new();

    session.on_scroll(0.0);
    session.set_param_raw("uSpeed", "1.0").unwrap();
    let first = session.add_keyframe(Some("top".into()));

    session.on_scroll(1.0);
    session.set_param_raw("uSpeed", "3.0").unwrap();
    session.set_param_raw("grain", "off").unwrap();
    let second = session.add_keyframe(None);
    assert_eq!(session.keyframes().len(), 2);
    assert_eq!(session.selected(), None);

    // Selecting outside preview loads the snapshot and reports where it lives.
    assert_eq!(session.select_keyframe(first).unwrap(), 0.0);
    assert_eq!(session.config().speed, 1.0);
    assert_eq!(ctx.override_config().map(|c| c.speed), Some(1.0));

    // Edit the selected keyframe in place.
    session.set_param_raw("uSpeed", "0.5").unwrap();
    session.update_selected().unwrap();

    assert!(session.toggle_preview());
    assert_eq!(session.selected(), None);
    session.on_scroll(0.5);
    let live = ctx.effective_config(1280.0);
    assert!(approx_eq(live.speed, 1.75, 1e-5), "speed={}", live.speed);
    assert_eq!(live.grain, Toggle::Off);

    // Selecting while previewing leaves the interpolated config alone.
    assert_eq!(session.select_keyframe(second).unwrap(), 1.0);
    assert!(approx_eq(session.config().speed, 1.75, 1e-5));

    session.remove_keyframe(second).unwrap();
    assert_eq!(session.selected(), None);
    assert!(session.remove_keyframe(second).is_err());

    session.reset();
    assert!(session.keyframes().is_empty());
    assert!(!session.is_preview());
    assert_eq!(ctx.override_config(), Some(ShaderParams::default()));
}

#[test]
fn preview_needs_two_keyframes() {
    let (mut session, _ctx) = EditorSession::new();
    session.set_param_raw("uDensity", "2.0").unwrap();
    session.add_keyframe(None);
    session.toggle_preview();
    session.set_param_raw("uDensity", "7.0").unwrap();
    session.on_scroll(0.8);
    assert_eq!(session.config().density, 7.0);
    assert!(approx_eq(session.scroll_progress(), 0.8, 1e-6));
}

#[test]
fn export_document_round_trips() {
    let (mut session, _ctx) = EditorSession::new();
    session.on_scroll(0.25);
    session.set_param_raw("color1", "#ff5005").unwrap();
    session.add_keyframe(Some("warm".into()));
    session.on_scroll(0.75);
    session.set_param_raw("type", "sphere").unwrap();
    session.add_keyframe(None);

    let json = session.export_json().unwrap();
    assert!(json.contains("\"shaderConfig\""));
    assert!(json.contains("\"scrollProgress\": 0.25"));
    assert!(json.contains("\"uSpeed\""));
    assert!(json.contains("\"#ff5005\""));
    assert!(json.contains("\"mobile\": 6.0"));

    let doc = ExportDocument::from_json(&json).unwrap();
    assert_eq!(doc, session.export());
    let set = doc.keyframe_set();
    assert_eq!(set.len(), 2);
    let d = ShaderParams::default();
    assert_eq!(set.sample(0.0, &d), session.keyframes().sample(0.0, &d));
    assert_eq!(set.sample(0.6, &d), session.keyframes().sample(0.6, &d));
}

#[test]
fn gradient_follows_override_only_when_editing() {
    let production = ShaderContext::new();
    let mut stage = GradientStage::default();
    assert_eq!(stage.frame(0.0, 800.0, &production), None);
    let scrolled = stage.frame(800.0, 800.0, &production).expect("even frame");

    let (mut session, editing) = EditorSession::new();
    session.set_param_raw("rotationZ", "90").unwrap();
    let mut stage = GradientStage::default();
    stage.frame(800.0, 800.0, &editing);
    let edited = stage.frame(800.0, 800.0, &editing).expect("even frame");

    assert_eq!(edited, configured_transform(session.config()));
    assert_ne!(edited, scrolled);
    assert!(approx_eq(edited.rotation.z, std::f32::consts::FRAC_PI_2, 1e-6));
}

#[test]
fn production_context_uses_device_zoom() {
    let ctx = ShaderContext::new();
    assert!(!ctx.is_overridden());
    assert_eq!(ctx.effective_config(1440.0).camera_zoom, 12.0);
    assert_eq!(ctx.effective_config(375.0).camera_zoom, 6.0);

    let props = GradientStage::scene_props(&ctx.effective_config(1440.0)).unwrap();
    assert!(props.contains_key("uSpeed"));
    assert!(!props.contains_key("rotationX"));
    assert!(!props.contains_key("positionZ"));
}
