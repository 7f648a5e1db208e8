//! Ambient background scene: a tilted grid plane and a drifting particle
//! field, viewed by a camera that eases towards the pointer.

use glam::{Mat4, Vec2, Vec3};

use crate::params::Rgb;

#[derive(Debug, Clone, PartialEq)]
pub struct AmbientSceneConfig {
    pub particle_count: usize,
    /// Edge length of the cube particles are scattered in.
    pub particle_spread: f32,
    pub particle_colors: [Rgb; 2],
    pub plane_size: f32,
    pub plane_segments: u32,
    /// Rotation about X, radians.
    pub plane_tilt: f32,
    pub plane_offset: Vec3,
    /// Vertical field of view, degrees.
    pub camera_fov: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    pub camera_z: f32,
    pub look_at: Vec3,
    /// Fraction of the remaining distance the smoothed pointer moves per frame.
    pub pointer_easing: f32,
    /// Fraction of the remaining distance the camera moves per frame.
    pub camera_easing: f32,
    /// Camera offset per unit of centred pointer position.
    pub pointer_range: Vec2,
    /// Time added per frame, seconds.
    pub time_step: f32,
    pub max_pixel_ratio: f64,
}

impl Default for AmbientSceneConfig {
    fn default() -> Self {
        Self {
            particle_count: 500,
            particle_spread: 100.0,
            particle_colors: [Rgb::from_u32(0x06b6d4), Rgb::from_u32(0xa855f7)],
            plane_size: 100.0,
            plane_segments: 100,
            plane_tilt: -std::f32::consts::PI * 0.4,
            plane_offset: Vec3::new(0.0, -15.0, -20.0),
            camera_fov: 60.0,
            camera_near: 0.1,
            camera_far: 1000.0,
            camera_z: 30.0,
            look_at: Vec3::new(0.0, 0.0, -10.0),
            pointer_easing: 0.05,
            camera_easing: 0.02,
            pointer_range: Vec2::new(10.0, 5.0),
            time_step: 0.016,
            max_pixel_ratio: 2.0,
        }
    }
}

pub const GRID_VERTEX_SHADER: &str = r#"#version 300 es
in vec3 a_position;
in vec2 a_uv;
uniform mat4 u_model_view;
uniform mat4 u_projection;
out vec2 v_uv;
void main() {
    v_uv = a_uv;
    gl_Position = u_projection * u_model_view * vec4(a_position, 1.0);
}
"#;

pub const GRID_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
uniform float u_time;
out vec4 frag_color;
void main() {
    vec2 coord = v_uv * 30.0;
    vec2 grid = abs(fract(coord - 0.5) - 0.5) / fwidth(coord);
    float line = min(grid.x, grid.y);
    float pattern = 1.0 - min(line, 1.0);

    float pulse = sin(u_time * 0.5) * 0.5 + 0.5;

    vec3 color1 = vec3(0.024, 0.714, 0.831);
    vec3 color2 = vec3(0.659, 0.333, 0.969);
    vec3 base = mix(color1, color2, v_uv.x + sin(u_time * 0.3) * 0.2);

    frag_color = vec4(base * pattern * (0.15 + pulse * 0.1), pattern * 0.25);
}
"#;

pub const PARTICLE_VERTEX_SHADER: &str = r#"#version 300 es
in vec3 a_position;
in vec3 a_color;
uniform mat4 u_model_view;
uniform mat4 u_projection;
uniform float u_time;
out vec3 v_color;
void main() {
    v_color = a_color;
    vec3 pos = a_position;
    pos.y += sin(u_time * 0.5 + a_position.x * 0.1) * 2.0;
    pos.x += cos(u_time * 0.3 + a_position.z * 0.1) * 1.5;

    vec4 mv = u_model_view * vec4(pos, 1.0);
    gl_PointSize = 3.0 * (30.0 / -mv.z);
    gl_Position = u_projection * mv;
}
"#;

pub const PARTICLE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;
in vec3 v_color;
out vec4 frag_color;
void main() {
    float dist = length(gl_PointCoord - vec2(0.5));
    if (dist > 0.5) discard;
    float alpha = 1.0 - smoothstep(0.3, 0.5, dist);
    frag_color = vec4(v_color, alpha * 0.6);
}
"#;

/// Interleaved-free particle buffers: xyz positions and rgb colours.
#[derive(Debug, Clone)]
pub struct ParticleField {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

impl ParticleField {
    pub fn generate(cfg: &AmbientSceneConfig, rng: &mut fastrand::Rng) -> Self {
        let mut positions = Vec::with_capacity(cfg.particle_count * 3);
        let mut colors = Vec::with_capacity(cfg.particle_count * 3);
        for _ in 0..cfg.particle_count {
            for _ in 0..3 {
                positions.push((rng.f32() - 0.5) * cfg.particle_spread);
            }
            let color = if rng.bool() {
                cfg.particle_colors[0]
            } else {
                cfg.particle_colors[1]
            };
            colors.extend_from_slice(&color.to_unit());
        }
        Self { positions, colors }
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Subdivided plane in the XY plane, centred on the origin.
#[derive(Debug, Clone)]
pub struct PlaneMesh {
    pub positions: Vec<f32>,
    pub uvs: Vec<f32>,
    pub indices: Vec<u32>,
}

impl PlaneMesh {
    pub fn new(size: f32, segments: u32) -> Self {
        let segments = segments.max(1);
        let row = segments + 1;
        let step = size / segments as f32;
        let half = size / 2.0;

        let count = (row * row) as usize;
        let mut positions = Vec::with_capacity(count * 3);
        let mut uvs = Vec::with_capacity(count * 2);
        for iy in 0..row {
            for ix in 0..row {
                positions.extend_from_slice(&[
                    ix as f32 * step - half,
                    half - iy as f32 * step,
                    0.0,
                ]);
                uvs.extend_from_slice(&[
                    ix as f32 / segments as f32,
                    1.0 - iy as f32 / segments as f32,
                ]);
            }
        }

        let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
        for iy in 0..segments {
            for ix in 0..segments {
                let a = iy * row + ix;
                let b = iy * row + ix + 1;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                indices.extend_from_slice(&[a, c, b, c, d, b]);
            }
        }

        Self {
            positions,
            uvs,
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Camera that drifts towards the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxCamera {
    /// Smoothed pointer position, 0..1 on both axes with y up.
    pointer: Vec2,
    target: Vec2,
    pub position: Vec3,
}

impl ParallaxCamera {
    pub fn new(cfg: &AmbientSceneConfig) -> Self {
        Self {
            pointer: Vec2::splat(0.5),
            target: Vec2::splat(0.5),
            position: Vec3::new(0.0, 0.0, cfg.camera_z),
        }
    }

    pub fn pointer_moved(
        &mut self,
        client_x: f64,
        client_y: f64,
        viewport_w: f64,
        viewport_h: f64,
    ) {
        if viewport_w <= 0.0 || viewport_h <= 0.0 {
            return;
        }
        self.target = Vec2::new(
            (client_x / viewport_w) as f32,
            (1.0 - client_y / viewport_h) as f32,
        );
    }

    pub fn step(&mut self, cfg: &AmbientSceneConfig) {
        self.pointer += (self.target - self.pointer) * cfg.pointer_easing;
        let goal = (self.pointer - Vec2::splat(0.5)) * cfg.pointer_range;
        self.position.x += (goal.x - self.position.x) * cfg.camera_easing;
        self.position.y += (goal.y - self.position.y) * cfg.camera_easing;
    }

    pub fn view(&self, cfg: &AmbientSceneConfig) -> Mat4 {
        Mat4::look_at_rh(self.position, cfg.look_at, Vec3::Y)
    }
}

pub fn projection(cfg: &AmbientSceneConfig, aspect: f32) -> Mat4 {
    Mat4::perspective_rh_gl(
        cfg.camera_fov.to_radians(),
        aspect.max(1e-6),
        cfg.camera_near,
        cfg.camera_far,
    )
}

pub fn plane_model(cfg: &AmbientSceneConfig) -> Mat4 {
    Mat4::from_translation(cfg.plane_offset) * Mat4::from_rotation_x(cfg.plane_tilt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn particles_fill_the_cube_with_two_colours() {
        let cfg = AmbientSceneConfig::default();
        let field = ParticleField::generate(&cfg, &mut fastrand::Rng::with_seed(7));
        assert_eq!(field.len(), 500);
        assert_eq!(field.colors.len(), 1500);
        assert!(field.positions.iter().all(|p| p.abs() <= 50.0));
        let palette: Vec<[f32; 3]> = cfg.particle_colors.iter().map(|c| c.to_unit()).collect();
        for rgb in field.colors.chunks(3) {
            assert!(palette.iter().any(|c| c[..] == rgb[..]));
        }
    }

    #[test]
    fn plane_mesh_layout() {
        let mesh = PlaneMesh::new(100.0, 100);
        assert_eq!(mesh.vertex_count(), 101 * 101);
        assert_eq!(mesh.indices.len(), 100 * 100 * 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
        assert_eq!(&mesh.positions[..3], &[-50.0, 50.0, 0.0]);
    }

    #[test]
    fn dense_plane_indices_do_not_wrap() {
        // 301 * 301 vertices is past what 16-bit indices can address.
        let mesh = PlaneMesh::new(100.0, 300);
        assert_eq!(mesh.vertex_count(), 301 * 301);
        assert_eq!(mesh.indices.last().copied(), Some(299 * 301 + 300));
        assert_eq!(mesh.indices.iter().max().copied(), Some(301 * 301 - 1));
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn camera_eases_towards_pointer() {
        let cfg = AmbientSceneConfig::default();
        let mut cam = ParallaxCamera::new(&cfg);
        cam.step(&cfg);
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 30.0));

        cam.pointer_moved(1000.0, 0.0, 1000.0, 800.0);
        let mut last = cam.position;
        for _ in 0..200 {
            cam.step(&cfg);
            assert!(cam.position.x >= last.x && cam.position.y >= last.y);
            last = cam.position;
        }
        assert!(cam.position.x > 0.0 && cam.position.x < 5.0);
        assert!(cam.position.y > 0.0 && cam.position.y < 2.5);
        assert_eq!(cam.position.z, 30.0);
    }
}
