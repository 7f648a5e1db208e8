//! Live shader editing session.
//!
//! Holds the working configuration and the keyframe set behind the editing
//! panel, and publishes every change to the shared [`ShaderContext`] so the
//! background follows along.

use serde::{Deserialize, Serialize};

use crate::context::{OverrideWriter, ShaderContext};
use crate::error::VizError;
use crate::keyframe::{KeyframeId, KeyframeSet};
use crate::params::{CameraZoomDefaults, ParamId, ParamValue, ShaderParams, CAMERA_ZOOM};

/// Scroll progress of the whole document, 0 at the top and 1 at the bottom.
pub fn document_scroll_progress(scroll_y: f64, scroll_height: f64, viewport_h: f64) -> f32 {
    let max_scroll = scroll_height - viewport_h;
    if max_scroll <= 0.0 {
        return 0.0;
    }
    (scroll_y / max_scroll).clamp(0.0, 1.0) as f32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedKeyframe {
    pub scroll_progress: f32,
    pub config: ShaderParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Hand-off document for the site configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub shader_config: ShaderParams,
    pub keyframes: Vec<ExportedKeyframe>,
    pub camera_zoom: CameraZoomDefaults,
}

impl ExportDocument {
    pub fn from_json(json: &str) -> Result<Self, VizError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rebuild a keyframe set in document order.
    pub fn keyframe_set(&self) -> KeyframeSet {
        let mut set = KeyframeSet::new();
        for kf in &self.keyframes {
            set.capture(kf.scroll_progress, kf.config.clone(), kf.label.clone());
        }
        set
    }
}

pub struct EditorSession {
    config: ShaderParams,
    keyframes: KeyframeSet,
    scroll_progress: f32,
    preview: bool,
    selected: Option<KeyframeId>,
    writer: OverrideWriter,
}

impl EditorSession {
    /// Start a session; the returned context is what renderers should read.
    pub fn new() -> (Self, ShaderContext) {
        let (ctx, writer) = ShaderContext::with_editor();
        let session = Self {
            config: ShaderParams::default(),
            keyframes: KeyframeSet::new(),
            scroll_progress: 0.0,
            preview: false,
            selected: None,
            writer,
        };
        session.publish();
        (session, ctx)
    }

    fn publish(&self) {
        self.writer.set(self.config.clone());
    }

    pub fn config(&self) -> &ShaderParams {
        &self.config
    }

    pub fn keyframes(&self) -> &KeyframeSet {
        &self.keyframes
    }

    pub fn scroll_progress(&self) -> f32 {
        self.scroll_progress
    }

    pub fn is_preview(&self) -> bool {
        self.preview
    }

    pub fn selected(&self) -> Option<KeyframeId> {
        self.selected
    }

    pub fn set_param(&mut self, id: ParamId, value: ParamValue) -> Result<(), VizError> {
        self.config.set(id, value)?;
        self.publish();
        Ok(())
    }

    pub fn set_param_raw(&mut self, key: &str, raw: &str) -> Result<(), VizError> {
        let id: ParamId = key.parse()?;
        self.config.set_raw(id, raw)?;
        self.publish();
        Ok(())
    }

    /// Capture the working configuration at the current scroll progress.
    pub fn add_keyframe(&mut self, label: Option<String>) -> KeyframeId {
        let id = self
            .keyframes
            .capture(self.scroll_progress, self.config.clone(), label);
        self.selected = None;
        log::debug!("captured {id} at {:.3}", self.scroll_progress);
        id
    }

    pub fn remove_keyframe(&mut self, id: KeyframeId) -> Result<(), VizError> {
        self.keyframes
            .remove(id)
            .ok_or(VizError::UnknownKeyframe(id.0))?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(())
    }

    /// Select a keyframe. Outside preview its configuration becomes the
    /// working one. Returns the keyframe's progress so the host can scroll
    /// there.
    pub fn select_keyframe(&mut self, id: KeyframeId) -> Result<f32, VizError> {
        let kf = self
            .keyframes
            .get(id)
            .ok_or(VizError::UnknownKeyframe(id.0))?;
        let progress = kf.scroll_progress;
        if !self.preview {
            self.config = kf.config.clone();
            self.publish();
        }
        self.selected = Some(id);
        Ok(progress)
    }

    /// Overwrite the selected keyframe with the working configuration.
    pub fn update_selected(&mut self) -> Result<(), VizError> {
        match self.selected {
            Some(id) => self.keyframes.update(id, self.config.clone()),
            None => Ok(()),
        }
    }

    pub fn toggle_preview(&mut self) -> bool {
        self.preview = !self.preview;
        self.selected = None;
        self.preview
    }

    /// Record the document scroll progress. While previewing with at least
    /// two keyframes the working configuration follows the keyframes.
    pub fn on_scroll(&mut self, progress: f32) {
        self.scroll_progress = progress.clamp(0.0, 1.0);
        if self.preview && self.keyframes.len() >= 2 {
            self.config = self.keyframes.sample(self.scroll_progress, &self.config);
            self.publish();
        }
    }

    pub fn reset(&mut self) {
        self.config = ShaderParams::default();
        self.keyframes.clear();
        self.preview = false;
        self.selected = None;
        self.publish();
    }

    pub fn export(&self) -> ExportDocument {
        ExportDocument {
            shader_config: self.config.clone(),
            keyframes: self
                .keyframes
                .iter()
                .map(|kf| ExportedKeyframe {
                    scroll_progress: kf.scroll_progress,
                    config: kf.config.clone(),
                    label: kf.label.clone(),
                })
                .collect(),
            camera_zoom: CAMERA_ZOOM,
        }
    }

    pub fn export_json(&self) -> Result<String, VizError> {
        serde_json::to_string_pretty(&self.export()).map_err(|err| {
            log::error!("export failed: {err}");
            VizError::from(err)
        })
    }
}
