//! Cylindrical grid overlay.
//!
//! A full-screen quad whose fragment stage draws a grid that looks wrapped
//! around a horizontal cylinder, confined to a vertical band of the
//! viewport. [`CylinderGridConfig::shade`] evaluates the same formula on the
//! CPU for one pixel; the shader and that function must stay in step.

use glam::{Vec2, Vec3, Vec4};

/// Tuned visual constants. They are uploaded as uniforms once after the
/// program links.
#[derive(Debug, Clone, PartialEq)]
pub struct CylinderGridConfig {
    /// Visible band, as fractions of the viewport height from the bottom.
    pub band_bottom: f32,
    pub band_top: f32,
    pub curve_exponent: f32,
    /// Vertical cell scale at the band edge and at its centre.
    pub scale_edge: f32,
    pub scale_center: f32,
    /// Grid-space units scrolled per unit of scroll progress.
    pub scroll_factor: f32,
    pub cell_size_px: f32,
    pub line_width: f32,
    /// Line width multiplier at the band edge (1.0 at the centre).
    pub line_width_edge: f32,
    pub edge_fade_exponent: f32,
    /// Depth shading at the band edge (1.0 at the centre).
    pub depth_edge: f32,
    /// Height of the smooth fade inside each band boundary.
    pub boundary_fade: f32,
    pub base_opacity: f32,
    pub breathe_rate: f32,
    pub breathe_depth: f32,
    pub color: Vec3,
    pub frame_interval_ms: f64,
    pub max_pixel_ratio: f64,
}

impl Default for CylinderGridConfig {
    fn default() -> Self {
        Self {
            band_bottom: 0.2,
            band_top: 0.8,
            curve_exponent: 0.7,
            scale_edge: 0.05,
            scale_center: 1.3,
            scroll_factor: 2.5,
            cell_size_px: 45.0,
            line_width: 0.02,
            line_width_edge: 0.3,
            edge_fade_exponent: 1.5,
            depth_edge: 0.1,
            boundary_fade: 0.08,
            base_opacity: 0.18,
            breathe_rate: 0.3,
            breathe_depth: 0.03,
            color: Vec3::new(0.024, 0.714, 0.831),
            frame_interval_ms: 33.0,
            max_pixel_ratio: 1.5,
        }
    }
}

pub const VERTEX_SHADER: &str = r#"#version 300 es
in vec2 a_position;
void main() {
    gl_Position = vec4(a_position, 0.0, 1.0);
}
"#;

pub const FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

uniform vec2 u_resolution;
uniform float u_scroll;
uniform float u_time;

uniform vec2 u_band;          // bottom, top
uniform float u_curve_exp;
uniform vec2 u_scale;         // edge, centre
uniform float u_scroll_factor;
uniform float u_cell;
uniform vec2 u_line;          // width, edge multiplier
uniform float u_edge_fade_exp;
uniform float u_depth_edge;
uniform float u_boundary_fade;
uniform float u_opacity;
uniform vec2 u_breathe;       // rate, depth
uniform vec3 u_color;

out vec4 frag_color;

void main() {
    vec2 uv = gl_FragCoord.xy / u_resolution;
    float bottom = u_band.x;
    float top = u_band.y;
    float height = top - bottom;

    if (uv.y < bottom || uv.y > top) {
        frag_color = vec4(0.0);
        return;
    }

    float normalized_y = (uv.y - bottom) / height;
    float center_dist = abs(normalized_y - 0.5) * 2.0;

    float curve = pow(max(0.0, cos(center_dist * 1.5707963)), u_curve_exp);
    float scale_y = mix(u_scale.x, u_scale.y, curve);

    float scroll_offset = u_scroll * u_scroll_factor;
    float warped_y = (normalized_y - 0.5) / scale_y + 0.5 + scroll_offset;

    vec2 grid = vec2(uv.x * u_resolution.x, warped_y * u_resolution.y * height);
    vec2 dist = abs(fract(grid / u_cell) - 0.5);

    float width = u_line.x * mix(u_line.y, 1.0, curve);
    float h_line = smoothstep(width, width * 0.15, dist.y);
    float v_line = smoothstep(width, width * 0.15, dist.x);
    float line = max(h_line, v_line);

    float depth = mix(u_depth_edge, 1.0, curve);
    float edge_fade = pow(curve, u_edge_fade_exp);
    float fade = smoothstep(top, top - u_boundary_fade, uv.y)
               * smoothstep(bottom, bottom + u_boundary_fade, uv.y);
    float breathe = sin(u_time * u_breathe.x) * u_breathe.y + 1.0;

    float alpha = line * edge_fade * depth * fade * u_opacity * breathe;
    vec3 color = u_color * (0.5 + curve * 0.6);
    frag_color = vec4(color, alpha);
}
"#;

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// GLSL `smoothstep`, including the reversed-edge form the shader relies on.
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

impl CylinderGridConfig {
    /// Cylinder curvature: 1 at the band centre, 0 at its edges.
    pub fn curve(&self, center_dist: f32) -> f32 {
        (center_dist * std::f32::consts::FRAC_PI_2)
            .cos()
            .max(0.0)
            .powf(self.curve_exponent)
    }

    /// Vertical cell scale for a given curvature.
    pub fn scale_y(&self, curve: f32) -> f32 {
        mix(self.scale_edge, self.scale_center, curve)
    }

    pub fn in_band(&self, v: f32) -> bool {
        v >= self.band_bottom && v <= self.band_top
    }

    /// CPU evaluation of the fragment stage for a pixel at `frag_coord`.
    /// Returns straight (non-premultiplied) RGBA.
    pub fn shade(&self, frag_coord: Vec2, resolution: Vec2, scroll: f32, time: f32) -> Vec4 {
        let uv = frag_coord / resolution;
        if !self.in_band(uv.y) {
            return Vec4::ZERO;
        }
        let height = self.band_top - self.band_bottom;
        let normalized_y = (uv.y - self.band_bottom) / height;
        let center_dist = (normalized_y - 0.5).abs() * 2.0;
        let curve = self.curve(center_dist);
        let scale_y = self.scale_y(curve);

        let warped_y = (normalized_y - 0.5) / scale_y + 0.5 + scroll * self.scroll_factor;
        let grid = Vec2::new(uv.x * resolution.x, warped_y * resolution.y * height);
        let cell = grid / self.cell_size_px;
        let dist = (cell - cell.floor() - Vec2::splat(0.5)).abs();

        let width = self.line_width * mix(self.line_width_edge, 1.0, curve);
        let h_line = smoothstep(width, width * 0.15, dist.y);
        let v_line = smoothstep(width, width * 0.15, dist.x);
        let line = h_line.max(v_line);

        let depth = mix(self.depth_edge, 1.0, curve);
        let edge_fade = curve.powf(self.edge_fade_exponent);
        let fade = smoothstep(self.band_top, self.band_top - self.boundary_fade, uv.y)
            * smoothstep(self.band_bottom, self.band_bottom + self.boundary_fade, uv.y);
        let breathe = (time * self.breathe_rate).sin() * self.breathe_depth + 1.0;

        let alpha = line * edge_fade * depth * fade * self.base_opacity * breathe;
        let color = self.color * (0.5 + curve * 0.6);
        color.extend(alpha)
    }

    /// Canvas backing size for a CSS size and device pixel ratio.
    pub fn backing_size(
        &self,
        css_width: f64,
        css_height: f64,
        device_pixel_ratio: f64,
    ) -> (u32, u32) {
        backing_size(css_width, css_height, device_pixel_ratio, self.max_pixel_ratio)
    }
}

/// CSS size scaled by the device pixel ratio, capped at `max_ratio`, truncated
/// to whole pixels.
pub fn backing_size(
    css_width: f64,
    css_height: f64,
    device_pixel_ratio: f64,
    max_ratio: f64,
) -> (u32, u32) {
    let ratio = device_pixel_ratio.min(max_ratio).max(0.0);
    let scale = |css: f64| (css.max(0.0) * ratio).floor() as u32;
    (scale(css_width), scale(css_height))
}
