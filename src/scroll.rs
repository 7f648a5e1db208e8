//! Scroll position to animation progress.
//!
//! Everything here is plain arithmetic on numbers the host samples
//! (scroll offset, viewport size, element rects), so it can be driven from
//! DOM listeners in the browser and from tests on the host alike.

use glam::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollConfig {
    /// Minimum spacing between applied scroll updates.
    pub throttle_ms: f64,
    /// Hero progress reaches 1 after scrolling this many viewport heights.
    pub hero_distance_factor: f64,
    /// Parallax translation per scrolled pixel, one entry per layer.
    pub layer_speeds: [f64; 2],
    /// Extra opacity multiplier per layer, so later layers fade after earlier ones.
    pub layer_opacity_bias: [f64; 2],
    pub fade_factor: f64,
    /// Pixels scrolled past a sticky section's top before it is fully shrunk.
    pub sticky_range_px: f64,
    /// Scroll offset past which the navigation bar switches to its solid style.
    pub nav_threshold_px: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            throttle_ms: 33.0,
            hero_distance_factor: 0.8,
            layer_speeds: [0.4, 0.25],
            layer_opacity_bias: [1.0, 1.1],
            fade_factor: 1.2,
            sticky_range_px: 200.0,
            nav_threshold_px: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDecision {
    /// Read the latest scroll state and apply it now.
    Apply,
    /// Too soon after the last update; ask for another frame.
    Defer,
}

/// Coalesces scroll events into at most one applied update per window.
///
/// Every scroll event either requests a frame or folds into the frame that is
/// already pending. The frame reads whatever scroll state is current when it
/// runs, so the most recent event always wins.
#[derive(Debug, Clone)]
pub struct ScrollThrottle {
    window_ms: f64,
    last_applied_ms: Option<f64>,
    pending: bool,
}

impl ScrollThrottle {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            last_applied_ms: None,
            pending: false,
        }
    }

    /// Returns true when the caller must request a frame.
    pub fn on_scroll(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    pub fn on_frame(&mut self, now_ms: f64) -> FrameDecision {
        if let Some(last) = self.last_applied_ms {
            if now_ms - last < self.window_ms {
                return FrameDecision::Defer;
            }
        }
        self.last_applied_ms = Some(now_ms);
        self.pending = false;
        FrameDecision::Apply
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Forget a pending frame, e.g. after cancelling it.
    pub fn reset(&mut self) {
        self.pending = false;
    }
}

/// Parallax state for the hero section.
#[derive(Debug, Clone, PartialEq)]
pub struct HeroParallax {
    pub progress: f64,
    /// Vertical translation in CSS pixels per layer.
    pub offsets: [f64; 2],
    pub opacities: [f64; 2],
}

pub fn hero_parallax(scroll_y: f64, viewport_h: f64, cfg: &ScrollConfig) -> HeroParallax {
    let distance = viewport_h * cfg.hero_distance_factor;
    let progress = if distance > 0.0 {
        (scroll_y / distance).min(1.0)
    } else {
        1.0
    };
    let opacity = (1.0 - progress * cfg.fade_factor).max(0.0);
    HeroParallax {
        progress,
        offsets: cfg.layer_speeds.map(|speed| scroll_y * speed),
        opacities: cfg.layer_opacity_bias.map(|bias| (opacity * bias).clamp(0.0, 1.0)),
    }
}

pub fn nav_scrolled(scroll_y: f64, cfg: &ScrollConfig) -> bool {
    scroll_y > cfg.nav_threshold_px
}

/// Shrink-on-scroll state for a sticky section header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickyShrink {
    pub progress: f64,
}

impl StickyShrink {
    /// `section_top` is the section's top edge relative to the viewport.
    pub fn from_section_top(section_top: f64, cfg: &ScrollConfig) -> Self {
        let progress = if section_top <= 0.0 {
            (section_top.abs() / cfg.sticky_range_px).min(1.0)
        } else {
            0.0
        };
        Self { progress }
    }

    pub fn title_scale(&self) -> f64 {
        1.0 - self.progress * 0.5
    }

    pub fn subtitle_opacity(&self) -> f64 {
        1.0 - self.progress
    }

    pub fn subtitle_scale(&self) -> f64 {
        1.0 - self.progress * 0.3
    }

    /// Subtitles collapse to zero height near the end of the shrink.
    pub fn subtitle_collapsed(&self) -> bool {
        self.progress >= 0.9
    }

    pub fn margin_px(&self, full: f64) -> f64 {
        full * (1.0 - self.progress)
    }
}

/// Progress of a container through the viewport: 0 when its top edge is at
/// the viewport bottom, 1 when its bottom edge leaves the viewport top.
pub fn container_progress(viewport_h: f64, container_top: f64, container_h: f64) -> f32 {
    let span = viewport_h + container_h;
    if span <= 0.0 {
        return 0.0;
    }
    ((viewport_h - container_top) / span).clamp(0.0, 1.0) as f32
}

/// Scroll-driven rotation of the gradient mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshScrollConfig {
    pub initial_rotation_x: f32,
    pub initial_rotation_z: f32,
    pub target_rotation_x: f32,
    pub target_rotation_z: f32,
    /// Fraction of the viewport height over which the rotation completes.
    pub distance_factor: f32,
    pub max_position_z: f32,
    pub max_position_y: f32,
}

impl Default for MeshScrollConfig {
    fn default() -> Self {
        Self {
            initial_rotation_x: 90.0,
            initial_rotation_z: 90.0,
            target_rotation_x: 10.0,
            target_rotation_z: 5.0,
            distance_factor: 0.4,
            max_position_z: 2.0,
            max_position_y: 10.0,
        }
    }
}

/// Mesh rotation (radians) and position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshTransform {
    pub rotation: Vec3,
    pub position: Vec3,
}

impl MeshTransform {
    pub fn from_degrees(rotation_deg: Vec3, position: Vec3) -> Self {
        Self {
            rotation: Vec3::new(
                rotation_deg.x.to_radians(),
                rotation_deg.y.to_radians(),
                rotation_deg.z.to_radians(),
            ),
            position,
        }
    }

    pub fn to_array(self) -> [f32; 6] {
        [
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
            self.position.x,
            self.position.y,
            self.position.z,
        ]
    }
}

pub fn mesh_scroll_progress(scroll_y: f32, viewport_h: f32, cfg: &MeshScrollConfig) -> f32 {
    let distance = viewport_h * cfg.distance_factor;
    if distance <= 0.0 {
        return 1.0;
    }
    (scroll_y / distance).clamp(0.0, 1.0)
}

pub fn mesh_scroll_transform(
    scroll_y: f32,
    viewport_h: f32,
    cfg: &MeshScrollConfig,
) -> MeshTransform {
    let p = mesh_scroll_progress(scroll_y, viewport_h, cfg);
    let rx = cfg.initial_rotation_x + (cfg.target_rotation_x - cfg.initial_rotation_x) * p;
    let rz = cfg.initial_rotation_z + (cfg.target_rotation_z - cfg.initial_rotation_z) * p;
    MeshTransform::from_degrees(
        Vec3::new(rx, 0.0, rz),
        Vec3::new(0.0, p * cfg.max_position_y, p * cfg.max_position_z),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_coalesces_and_defers() {
        let mut t = ScrollThrottle::new(33.0);
        assert!(t.on_scroll());
        assert!(!t.on_scroll(), "second event folds into the pending frame");
        assert_eq!(t.on_frame(100.0), FrameDecision::Apply);
        assert!(!t.is_pending());

        assert!(t.on_scroll());
        assert_eq!(t.on_frame(116.0), FrameDecision::Defer);
        assert!(t.is_pending());
        assert!(!t.on_scroll());
        assert_eq!(t.on_frame(133.0), FrameDecision::Apply);
    }

    #[test]
    fn hero_fades_out_by_scroll() {
        let cfg = ScrollConfig::default();
        let top = hero_parallax(0.0, 1000.0, &cfg);
        assert_eq!(top.progress, 0.0);
        assert_eq!(top.opacities, [1.0, 1.0]);

        let mid = hero_parallax(400.0, 1000.0, &cfg);
        assert!((mid.progress - 0.5).abs() < 1e-12);
        assert_eq!(mid.offsets, [160.0, 100.0]);
        assert!((mid.opacities[0] - 0.4).abs() < 1e-12);
        assert!((mid.opacities[1] - 0.44).abs() < 1e-12);

        let gone = hero_parallax(5000.0, 1000.0, &cfg);
        assert_eq!(gone.progress, 1.0);
        assert_eq!(gone.opacities, [0.0, 0.0]);
    }

    #[test]
    fn sticky_resets_below_viewport_top() {
        let cfg = ScrollConfig::default();
        assert_eq!(StickyShrink::from_section_top(120.0, &cfg).progress, 0.0);
        let half = StickyShrink::from_section_top(-100.0, &cfg);
        assert_eq!(half.progress, 0.5);
        assert_eq!(half.title_scale(), 0.75);
        assert!(!half.subtitle_collapsed());
        let done = StickyShrink::from_section_top(-900.0, &cfg);
        assert_eq!(done.progress, 1.0);
        assert!(done.subtitle_collapsed());
    }

    #[test]
    fn container_progress_tracks_entry_and_exit() {
        assert_eq!(container_progress(800.0, 800.0, 400.0), 0.0);
        assert_eq!(container_progress(800.0, -400.0, 400.0), 1.0);
        assert_eq!(container_progress(800.0, 200.0, 400.0), 0.5);
        assert_eq!(container_progress(800.0, 2000.0, 400.0), 0.0);
        assert_eq!(container_progress(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn mesh_rotation_follows_scroll() {
        let cfg = MeshScrollConfig::default();
        let start = mesh_scroll_transform(0.0, 1000.0, &cfg);
        assert!((start.rotation.x - 90f32.to_radians()).abs() < 1e-6);
        assert_eq!(start.position, Vec3::ZERO);

        let end = mesh_scroll_transform(400.0, 1000.0, &cfg);
        assert!((end.rotation.x - 10f32.to_radians()).abs() < 1e-6);
        assert!((end.rotation.z - 5f32.to_radians()).abs() < 1e-6);
        assert_eq!(end.position, Vec3::new(0.0, 10.0, 2.0));

        let beyond = mesh_scroll_transform(4000.0, 1000.0, &cfg);
        assert_eq!(beyond, end);
    }
}
