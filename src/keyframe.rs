//! Scroll keyframes and the interpolation engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::VizError;
use crate::params::{ParamId, ShaderParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyframeId(pub u64);

impl fmt::Display for KeyframeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kf-{}", self.0)
    }
}

/// A captured parameter snapshot pinned to a scroll position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyframe {
    pub id: KeyframeId,
    /// 0.0 ..= 1.0
    pub scroll_progress: f32,
    pub config: ShaderParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Keyframes ordered by scroll progress. Keyframes sharing a progress value
/// keep the order they were captured in.
#[derive(Debug, Clone, Default)]
pub struct KeyframeSet {
    frames: Vec<Keyframe>,
    next_id: u64,
}

impl KeyframeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture `config` at `progress` and return the new keyframe's id.
    pub fn capture(
        &mut self,
        progress: f32,
        config: ShaderParams,
        label: Option<String>,
    ) -> KeyframeId {
        self.next_id += 1;
        let id = KeyframeId(self.next_id);
        let at = self.frames.partition_point(|kf| kf.scroll_progress <= progress);
        self.frames.insert(
            at,
            Keyframe {
                id,
                scroll_progress: progress,
                config,
                label,
            },
        );
        id
    }

    /// Replace the snapshot of an existing keyframe, keeping its id and position.
    pub fn update(&mut self, id: KeyframeId, config: ShaderParams) -> Result<(), VizError> {
        let kf = self
            .frames
            .iter_mut()
            .find(|kf| kf.id == id)
            .ok_or(VizError::UnknownKeyframe(id.0))?;
        kf.config = config;
        Ok(())
    }

    pub fn remove(&mut self, id: KeyframeId) -> Option<Keyframe> {
        let idx = self.frames.iter().position(|kf| kf.id == id)?;
        Some(self.frames.remove(idx))
    }

    pub fn get(&self, id: KeyframeId) -> Option<&Keyframe> {
        self.frames.iter().find(|kf| kf.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyframe> {
        self.frames.iter()
    }

    pub fn as_slice(&self) -> &[Keyframe] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn sample(&self, progress: f32, fallback: &ShaderParams) -> ShaderParams {
        interpolate(&self.frames, progress, fallback)
    }
}

/// Parameter snapshot at `progress` along `keyframes`.
///
/// Keyframes may be given in any order; they are stably sorted by progress.
/// Outside the keyframed span the nearest end keyframe is returned as is.
/// Between two keyframes numbers and colours are blended and choice fields
/// switch over at the midpoint. With no keyframes `fallback` is returned.
pub fn interpolate(keyframes: &[Keyframe], progress: f32, fallback: &ShaderParams) -> ShaderParams {
    let mut sorted: Vec<&Keyframe> = keyframes.iter().collect();
    sorted.sort_by(|a, b| a.scroll_progress.total_cmp(&b.scroll_progress));

    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return fallback.clone();
    };
    if progress <= first.scroll_progress {
        return first.config.clone();
    }
    if progress >= last.scroll_progress {
        return last.config.clone();
    }

    let (prev, next) = sorted
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .find(|(a, b)| progress >= a.scroll_progress && progress <= b.scroll_progress)
        .unwrap_or((first, last));

    let span = next.scroll_progress - prev.scroll_progress;
    let t = if span > 0.0 {
        (progress - prev.scroll_progress) / span
    } else {
        0.0
    };

    blend(&prev.config, &next.config, t)
}

/// Field-by-field blend of two snapshots.
pub fn blend(prev: &ShaderParams, next: &ShaderParams, t: f32) -> ShaderParams {
    let mut out = prev.clone();
    for id in ParamId::ALL {
        let value = prev.get(id).blend(next.get(id), t, id.range());
        // Both sides come from the same field, so the type always matches.
        if let Err(err) = out.set(id, value) {
            log::debug!("skipping {id} while blending: {err}");
        }
    }
    out
}
