#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Scroll-driven shader layers for the marketing site: the cylindrical grid
//! overlay, the ambient particle scene, and the keyframe engine that animates
//! the gradient background's parameters by scroll position.

pub mod ambient;
pub mod context;
pub mod cylinder;
pub mod editor;
pub mod error;
pub mod frame;
pub mod gradient;
pub mod keyframe;
pub mod params;
pub mod scroll;

pub use context::{OverrideWriter, ShaderContext};
pub use error::VizError;
pub use keyframe::{interpolate, Keyframe, KeyframeId, KeyframeSet};
pub use params::{ParamId, ParamValue, ShaderParams};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    mod ambient;
    mod bindings;
    mod cylinder;
    mod dom;
    mod gl;
    mod render;
    mod scroll;

    pub use ambient::AmbientSceneLayer;
    pub use bindings::{interpolate_json, GradientDriver, ShaderEditor};
    pub use cylinder::CylinderGridLayer;
    pub use scroll::ScrollEffects;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        log::info!("scroll shaders ready");
        Ok(())
    }
}
