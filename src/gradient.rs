//! Gradient background driver.
//!
//! Rendering the gradient itself is left to the host's gradient component.
//! This module splits the work in two: [`GradientStage::scene_props`] builds
//! the declarative configuration once per change, and
//! [`GradientStage::frame`] produces the mesh transform to apply
//! imperatively on each frame, after the scene exists.

use glam::Vec3;
use serde_json::{Map, Value};

use crate::context::ShaderContext;
use crate::error::VizError;
use crate::params::{ParamId, ShaderParams};
use crate::scroll::{mesh_scroll_transform, MeshScrollConfig, MeshTransform};

#[derive(Debug, Clone)]
pub struct GradientStage {
    scroll: MeshScrollConfig,
    frame_count: u64,
}

impl Default for GradientStage {
    fn default() -> Self {
        Self::new(MeshScrollConfig::default())
    }
}

impl GradientStage {
    pub fn new(scroll: MeshScrollConfig) -> Self {
        Self {
            scroll,
            frame_count: 0,
        }
    }

    /// Declarative props for the gradient component: the full configuration
    /// minus the fields that [`GradientStage::frame`] owns.
    pub fn scene_props(config: &ShaderParams) -> Result<Map<String, Value>, VizError> {
        let mut props = match serde_json::to_value(config)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for id in ParamId::MESH_TRANSFORM {
            props.remove(id.key());
        }
        Ok(props)
    }

    /// Per-frame transform update. Runs on every other frame; the skipped
    /// frames return `None` and the previous transform stays in place.
    pub fn frame(
        &mut self,
        scroll_y: f32,
        viewport_h: f32,
        ctx: &ShaderContext,
    ) -> Option<MeshTransform> {
        self.frame_count += 1;
        if self.frame_count % 2 != 0 {
            return None;
        }
        Some(match ctx.override_config() {
            Some(cfg) => configured_transform(&cfg),
            None => mesh_scroll_transform(scroll_y, viewport_h, &self.scroll),
        })
    }
}

/// Transform taken straight from a configuration (editor mode).
pub fn configured_transform(cfg: &ShaderParams) -> MeshTransform {
    MeshTransform::from_degrees(
        Vec3::new(cfg.rotation_x, cfg.rotation_y, cfg.rotation_z),
        Vec3::new(cfg.position_x, cfg.position_y, cfg.position_z),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn props_leave_out_mesh_transform() {
        let props = GradientStage::scene_props(&ShaderParams::default()).unwrap();
        for id in ParamId::MESH_TRANSFORM {
            assert!(!props.contains_key(id.key()));
        }
        assert_eq!(props["type"], "waterPlane");
        assert_eq!(props.len(), ParamId::ALL.len() - 6);
    }

    #[test]
    fn frames_alternate_and_follow_scroll() {
        let ctx = ShaderContext::new();
        let mut stage = GradientStage::default();
        assert!(stage.frame(0.0, 1000.0, &ctx).is_none());
        let t = stage.frame(0.0, 1000.0, &ctx).unwrap();
        assert!((t.rotation.x - 90f32.to_radians()).abs() < 1e-6);
        assert!(stage.frame(400.0, 1000.0, &ctx).is_none());
        let t = stage.frame(400.0, 1000.0, &ctx).unwrap();
        assert_eq!(t.position, Vec3::new(0.0, 10.0, 2.0));
    }

    #[test]
    fn override_bypasses_scroll() {
        let (ctx, writer) = ShaderContext::with_editor();
        writer.set(ShaderParams {
            rotation_y: 180.0,
            position_x: -3.0,
            ..ShaderParams::default()
        });
        let mut stage = GradientStage::default();
        stage.frame(900.0, 1000.0, &ctx);
        let t = stage.frame(900.0, 1000.0, &ctx).unwrap();
        assert_eq!(t.rotation.x, 0.0);
        assert!((t.rotation.y - std::f32::consts::PI).abs() < 1e-6);
        assert_eq!(t.position, Vec3::new(-3.0, 0.0, 0.0));
    }
}
