//! JS-facing wrappers over the editor session and the gradient driver.

use wasm_bindgen::prelude::*;

use super::dom;
use crate::context::ShaderContext;
use crate::editor::{document_scroll_progress, EditorSession};
use crate::error::VizError;
use crate::gradient::GradientStage;
use crate::keyframe::{interpolate, Keyframe, KeyframeId};
use crate::params::ShaderParams;

fn viewport_width() -> f64 {
    dom::window().map(|w| dom::viewport_size(&w).0).unwrap_or(0.0)
}

/// Feeds the host's gradient component: declarative props plus a mesh
/// transform to apply on each animation frame.
#[wasm_bindgen]
pub struct GradientDriver {
    ctx: ShaderContext,
    stage: GradientStage,
}

#[wasm_bindgen]
impl GradientDriver {
    /// Production driver with the built-in configuration and no editor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> GradientDriver {
        Self::with_context(ShaderContext::new())
    }

    /// Props for the gradient component as a JSON object, without the mesh
    /// transform fields.
    pub fn props_json(&self) -> Result<String, JsValue> {
        let config = self.ctx.effective_config(viewport_width());
        let props = GradientStage::scene_props(&config)?;
        Ok(serde_json::to_string(&props).map_err(VizError::from)?)
    }

    /// Mesh transform for this frame as
    /// `[rotX, rotY, rotZ, posX, posY, posZ]` (radians, world units), or
    /// nothing when this frame should leave the mesh alone.
    pub fn frame(&mut self, scroll_y: f32, viewport_h: f32) -> Option<Vec<f32>> {
        self.stage
            .frame(scroll_y, viewport_h, &self.ctx)
            .map(|t| t.to_array().to_vec())
    }

    #[wasm_bindgen(getter)]
    pub fn overridden(&self) -> bool {
        self.ctx.is_overridden()
    }
}

impl GradientDriver {
    pub fn with_context(ctx: ShaderContext) -> Self {
        Self {
            ctx,
            stage: GradientStage::default(),
        }
    }
}

impl Default for GradientDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Keyframe editor. Its working configuration overrides the one seen by
/// drivers created through [`ShaderEditor::gradient_driver`].
#[wasm_bindgen]
pub struct ShaderEditor {
    session: EditorSession,
    ctx: ShaderContext,
}

#[wasm_bindgen]
impl ShaderEditor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ShaderEditor {
        let (session, ctx) = EditorSession::new();
        log::info!("shader editor active");
        Self { session, ctx }
    }

    pub fn gradient_driver(&self) -> GradientDriver {
        GradientDriver::with_context(self.ctx.clone())
    }

    /// Set one parameter from its form value (`"2.5"`, `"#ff5005"`, `"on"`).
    pub fn set_param(&mut self, key: &str, raw: &str) -> Result<(), JsValue> {
        Ok(self.session.set_param_raw(key, raw)?)
    }

    pub fn add_keyframe(&mut self, label: Option<String>) -> u32 {
        self.session.add_keyframe(label).0 as u32
    }

    pub fn remove_keyframe(&mut self, id: u32) -> Result<(), JsValue> {
        Ok(self.session.remove_keyframe(KeyframeId(id.into()))?)
    }

    /// Select a keyframe; returns its scroll progress.
    pub fn select_keyframe(&mut self, id: u32) -> Result<f32, JsValue> {
        Ok(self.session.select_keyframe(KeyframeId(id.into()))?)
    }

    pub fn update_selected(&mut self) -> Result<(), JsValue> {
        Ok(self.session.update_selected()?)
    }

    pub fn toggle_preview(&mut self) -> bool {
        self.session.toggle_preview()
    }

    pub fn on_scroll(&mut self, scroll_y: f64, scroll_height: f64, viewport_h: f64) -> f32 {
        self.session
            .on_scroll(document_scroll_progress(scroll_y, scroll_height, viewport_h));
        self.session.scroll_progress()
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn config_json(&self) -> Result<String, JsValue> {
        Ok(serde_json::to_string(self.session.config()).map_err(VizError::from)?)
    }

    pub fn keyframes_json(&self) -> Result<String, JsValue> {
        Ok(serde_json::to_string(self.session.keyframes().as_slice()).map_err(VizError::from)?)
    }

    pub fn export_json(&self) -> Result<String, JsValue> {
        Ok(self.session.export_json()?)
    }

    #[wasm_bindgen(getter)]
    pub fn preview(&self) -> bool {
        self.session.is_preview()
    }

    #[wasm_bindgen(getter)]
    pub fn selected(&self) -> Option<u32> {
        self.session.selected().map(|id| id.0 as u32)
    }
}

impl Default for ShaderEditor {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpolate a JSON keyframe list at `progress`. `fallback_json` is the
/// configuration returned when the list is empty; omitted means defaults.
#[wasm_bindgen]
pub fn interpolate_json(
    keyframes_json: &str,
    progress: f32,
    fallback_json: Option<String>,
) -> Result<String, JsValue> {
    let keyframes: Vec<Keyframe> = serde_json::from_str(keyframes_json).map_err(VizError::from)?;
    let fallback = match fallback_json {
        Some(json) => serde_json::from_str(&json).map_err(VizError::from)?,
        None => ShaderParams::default(),
    };
    let config = interpolate(&keyframes, progress, &fallback);
    Ok(serde_json::to_string(&config).map_err(VizError::from)?)
}
