use glam::Vec2;
use scroll_shaders::cylinder::{backing_size, CylinderGridConfig};
use scroll_shaders::scroll::container_progress;

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() < eps
}

#[test]
fn curve_and_scale_at_band_center_and_edge() {
    let cfg = CylinderGridConfig::default();

    let center = cfg.curve(0.0);
    assert!(approx_eq(center, 1.0, 1e-6));
    assert!(approx_eq(cfg.scale_y(center), 1.3, 1e-6));

    let edge = cfg.curve(1.0);
    assert!(approx_eq(edge, 0.0, 1e-6));
    assert!(approx_eq(cfg.scale_y(edge), 0.05, 1e-6));
}

#[test]
fn curve_falls_off_monotonically() {
    let cfg = CylinderGridConfig::default();
    let samples: Vec<f32> = (0..=10).map(|i| cfg.curve(i as f32 / 10.0)).collect();
    assert!(samples.windows(2).all(|w| w[0] >= w[1]), "{samples:?}");
}

#[test]
fn alpha_is_zero_outside_band() {
    let cfg = CylinderGridConfig::default();
    let res = Vec2::new(800.0, 1000.0);
    for y in (0..1000).step_by(7) {
        let v = y as f32 / 1000.0;
        if cfg.in_band(v) {
            continue;
        }
        for x in [0.0, 123.0, 400.0, 799.0] {
            for (scroll, time) in [(0.0, 0.0), (0.5, 3.0), (1.0, 100.0)] {
                let out = cfg.shade(Vec2::new(x, y as f32), res, scroll, time);
                assert_eq!(out.w, 0.0, "pixel ({x}, {y}) leaked alpha");
            }
        }
    }
}

#[test]
fn band_center_shows_grid_lines() {
    let cfg = CylinderGridConfig::default();
    let res = Vec2::new(900.0, 1000.0);
    // Scan one row at the band centre; some pixel lies on a vertical line.
    let max_alpha = (0..900)
        .map(|x| cfg.shade(Vec2::new(x as f32, 500.0), res, 0.0, 0.0).w)
        .fold(0.0f32, f32::max);
    assert!(max_alpha > 0.05 && max_alpha <= cfg.base_opacity * 1.04, "max alpha {max_alpha}");
}

#[test]
fn resize_is_idempotent() {
    let cfg = CylinderGridConfig::default();
    let first = cfg.backing_size(1280.0, 719.5, 2.0);
    let second = cfg.backing_size(1280.0, 719.5, 2.0);
    assert_eq!(first, second);
    // Device pixel ratio is capped at 1.5.
    assert_eq!(first, (1920, 1079));
}

#[test]
fn backing_size_respects_cap_and_low_ratios() {
    assert_eq!(backing_size(100.0, 50.0, 1.0, 2.0), (100, 50));
    assert_eq!(backing_size(100.0, 50.0, 3.0, 2.0), (200, 100));
    assert_eq!(backing_size(-5.0, 0.0, 1.0, 2.0), (0, 0));
}

#[test]
fn container_progress_tracks_entry_and_exit() {
    // Container just below the viewport.
    assert_eq!(container_progress(800.0, 800.0, 400.0), 0.0);
    // Half way through.
    assert!(approx_eq(container_progress(800.0, 200.0, 400.0), 0.5, 1e-6));
    // Fully scrolled past.
    assert_eq!(container_progress(800.0, -400.0, 400.0), 1.0);
    assert_eq!(container_progress(800.0, -2000.0, 400.0), 1.0);
    assert_eq!(container_progress(0.0, 0.0, 0.0), 0.0);
}
