use scroll_shaders::keyframe::KeyframeSet;
use scroll_shaders::params::{EnvPreset, Rgb, ShapeKind, Toggle};
use scroll_shaders::{interpolate, Keyframe, KeyframeId, ParamId, ParamValue, ShaderParams};

fn keyframe(id: u64, progress: f32, config: ShaderParams) -> Keyframe {
    Keyframe {
        id: KeyframeId(id),
        scroll_progress: progress,
        config,
        label: None,
    }
}

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() < eps
}

#[test]
fn empty_set_returns_fallback() {
    let fallback = ShaderParams {
        speed: 1.7,
        ..ShaderParams::default()
    };
    assert_eq!(interpolate(&[], 0.4, &fallback), fallback);
}

#[test]
fn single_keyframe_wins_everywhere() {
    let only = ShaderParams {
        brightness: 3.0,
        ..ShaderParams::default()
    };
    let frames = [keyframe(1, 0.5, only.clone())];
    for p in [0.0, 0.5, 1.0] {
        assert_eq!(interpolate(&frames, p, &ShaderParams::default()), only);
    }
}

#[test]
fn color_midpoint_rounds_down() {
    let black = ShaderParams {
        color1: Rgb::new(0, 0, 0),
        ..ShaderParams::default()
    };
    let white = ShaderParams {
        color1: Rgb::new(0xff, 0xff, 0xff),
        ..ShaderParams::default()
    };
    let frames = [keyframe(1, 0.0, black), keyframe(2, 1.0, white)];
    let mid = interpolate(&frames, 0.5, &ShaderParams::default());
    assert_eq!(mid.color1.to_hex(), "#7f7f7f");
}

#[test]
fn numbers_blend_linearly() {
    let a = ShaderParams {
        speed: 2.0,
        ..ShaderParams::default()
    };
    let b = ShaderParams {
        speed: 4.0,
        ..ShaderParams::default()
    };
    let frames = [keyframe(1, 0.0, a), keyframe(2, 1.0, b)];
    let out = interpolate(&frames, 0.25, &ShaderParams::default());
    assert!(approx_eq(out.speed, 2.5, 1e-6), "speed={}", out.speed);
}

#[test]
fn choices_switch_at_midpoint() {
    let off = ShaderParams {
        animate: Toggle::Off,
        ..ShaderParams::default()
    };
    let on = ShaderParams {
        animate: Toggle::On,
        ..ShaderParams::default()
    };
    let frames = [keyframe(1, 0.0, off), keyframe(2, 1.0, on)];
    let d = ShaderParams::default();
    assert_eq!(interpolate(&frames, 0.49, &d).animate, Toggle::Off);
    assert_eq!(interpolate(&frames, 0.51, &d).animate, Toggle::On);
}

#[test]
fn clamps_to_end_keyframes() {
    let first = ShaderParams {
        shape: ShapeKind::Sphere,
        density: 0.3,
        ..ShaderParams::default()
    };
    let last = ShaderParams {
        shape: ShapeKind::Plane,
        density: 9.0,
        ..ShaderParams::default()
    };
    let frames = [keyframe(1, 0.2, first.clone()), keyframe(2, 0.7, last.clone())];
    let d = ShaderParams::default();
    assert_eq!(interpolate(&frames, 0.0, &d), first);
    assert_eq!(interpolate(&frames, 0.2, &d), first);
    assert_eq!(interpolate(&frames, 0.7, &d), last);
    assert_eq!(interpolate(&frames, 1.0, &d), last);
}

#[test]
fn input_order_does_not_matter() {
    let a = ShaderParams {
        amplitude: 1.0,
        ..ShaderParams::default()
    };
    let b = ShaderParams {
        amplitude: 5.0,
        ..ShaderParams::default()
    };
    let c = ShaderParams {
        amplitude: 3.0,
        ..ShaderParams::default()
    };
    let ordered = [
        keyframe(1, 0.0, a.clone()),
        keyframe(2, 0.5, b.clone()),
        keyframe(3, 1.0, c.clone()),
    ];
    let shuffled = [keyframe(3, 1.0, c), keyframe(1, 0.0, a), keyframe(2, 0.5, b)];
    let d = ShaderParams::default();
    for p in [0.1, 0.25, 0.5, 0.6, 0.9] {
        assert_eq!(interpolate(&ordered, p, &d), interpolate(&shuffled, p, &d));
    }
    assert!(approx_eq(interpolate(&ordered, 0.75, &d).amplitude, 4.0, 1e-5));
}

#[test]
fn choice_fields_always_come_from_a_bracketing_keyframe() {
    let a = ShaderParams {
        env_preset: EnvPreset::Dawn,
        shape: ShapeKind::Sphere,
        ..ShaderParams::default()
    };
    let b = ShaderParams {
        env_preset: EnvPreset::Lobby,
        shape: ShapeKind::Plane,
        ..ShaderParams::default()
    };
    let frames = [keyframe(1, 0.1, a.clone()), keyframe(2, 0.9, b.clone())];
    for step in 0..=100 {
        let p = step as f32 / 100.0;
        let out = interpolate(&frames, p, &ShaderParams::default());
        assert!(out.env_preset == a.env_preset || out.env_preset == b.env_preset);
        assert!(out.shape == a.shape || out.shape == b.shape);
        // Both choices flip together.
        assert_eq!(out.env_preset == a.env_preset, out.shape == a.shape, "p={p}");
    }
}

#[test]
fn blended_numbers_stay_in_range() {
    let a = ShaderParams {
        reflection: 0.0,
        ..ShaderParams::default()
    };
    let b = ShaderParams {
        reflection: 1.0,
        ..ShaderParams::default()
    };
    let frames = [keyframe(1, 0.0, a), keyframe(2, 1.0, b)];
    for step in 0..=20 {
        let out = interpolate(&frames, step as f32 / 20.0, &ShaderParams::default());
        assert!(out.in_range(), "out of range at step {step}");
    }
}

#[test]
fn shared_progress_keeps_capture_order() {
    let mut set = KeyframeSet::new();
    let low = ShaderParams {
        strength: 1.0,
        ..ShaderParams::default()
    };
    let high = ShaderParams {
        strength: 9.0,
        ..ShaderParams::default()
    };
    let end = ShaderParams {
        strength: 5.0,
        ..ShaderParams::default()
    };
    set.capture(0.5, low.clone(), Some("first".into()));
    set.capture(0.5, high, Some("second".into()));
    set.capture(1.0, end, None);

    let labels: Vec<_> = set.iter().filter_map(|kf| kf.label.as_deref()).collect();
    assert_eq!(labels, ["first", "second"]);

    let d = ShaderParams::default();
    assert_eq!(set.sample(0.5, &d), low);
    // Past the tie the segment starts from the later capture.
    let out = set.sample(0.75, &d);
    assert!(approx_eq(out.strength, 7.0, 1e-5), "strength={}", out.strength);
}

#[test]
fn parameter_table_round_trips_through_keys() {
    for id in ParamId::ALL {
        assert_eq!(id.key().parse::<ParamId>().ok(), Some(id));
    }
    let mut cfg = ShaderParams::default();
    cfg.set_raw(ParamId::Speed, "99").unwrap();
    assert_eq!(cfg.get(ParamId::Speed), ParamValue::Number(3.0));
    assert!(cfg.set(ParamId::Speed, ParamValue::Toggle(Toggle::On)).is_err());
}
