//! Configuration-override context shared between the editing session and
//! the gradient background.
//!
//! One context is created per page (or editor session) and handed to every
//! consumer at construction. Consumers read through [`ShaderContext`]; only
//! the [`OverrideWriter`] returned by [`ShaderContext::with_editor`] can
//! change the override.

use std::cell::RefCell;
use std::rc::Rc;

use crate::params::{ShaderParams, CAMERA_ZOOM};

#[derive(Debug, Default)]
struct Shared {
    base: ShaderParams,
    config_override: RefCell<Option<ShaderParams>>,
}

#[derive(Debug, Clone, Default)]
pub struct ShaderContext {
    shared: Rc<Shared>,
}

/// Write handle held by the editing panel.
#[derive(Debug)]
pub struct OverrideWriter {
    shared: Rc<Shared>,
}

impl ShaderContext {
    /// Read-only context over the built-in defaults.
    pub fn new() -> Self {
        Self::with_base(ShaderParams::default())
    }

    pub fn with_base(base: ShaderParams) -> Self {
        Self {
            shared: Rc::new(Shared {
                base,
                config_override: RefCell::new(None),
            }),
        }
    }

    /// Context plus the single writer allowed to override it.
    pub fn with_editor() -> (Self, OverrideWriter) {
        let ctx = Self::new();
        let writer = OverrideWriter {
            shared: Rc::clone(&ctx.shared),
        };
        (ctx, writer)
    }

    pub fn is_overridden(&self) -> bool {
        self.shared.config_override.borrow().is_some()
    }

    pub fn override_config(&self) -> Option<ShaderParams> {
        self.shared.config_override.borrow().clone()
    }

    /// The configuration a renderer should use this frame: the override if
    /// one is set, else the base with the device-appropriate camera zoom.
    pub fn effective_config(&self, viewport_width: f64) -> ShaderParams {
        if let Some(cfg) = self.shared.config_override.borrow().as_ref() {
            return cfg.clone();
        }
        ShaderParams {
            camera_zoom: CAMERA_ZOOM.for_viewport(viewport_width),
            ..self.shared.base.clone()
        }
    }
}

impl OverrideWriter {
    pub fn set(&self, config: ShaderParams) {
        *self.shared.config_override.borrow_mut() = Some(config);
    }

    pub fn clear(&self) {
        *self.shared.config_override.borrow_mut() = None;
    }
}
