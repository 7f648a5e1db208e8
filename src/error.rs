use thiserror::Error;

/// Which stage of a shader program failed to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum VizError {
    #[error("no window")]
    NoWindow,

    #[error("no document")]
    NoDocument,

    #[error("WebGL2 not supported")]
    NoContext,

    #[error("failed to allocate {0}")]
    Allocation(&'static str),

    #[error("{stage} shader compile error: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("program link error: {0}")]
    ProgramLink(String),

    #[error("attribute not found: {0}")]
    MissingAttribute(&'static str),

    #[error("unknown parameter: {0}")]
    UnknownParam(String),

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("type mismatch for {0}")]
    TypeMismatch(&'static str),

    #[error("invalid colour: {0:?}")]
    InvalidColor(String),

    #[error("unknown keyframe: {0}")]
    UnknownKeyframe(u64),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("js: {0}")]
    Js(String),
}

impl From<wasm_bindgen::JsValue> for VizError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        VizError::Js(format!("{:?}", value))
    }
}

impl From<VizError> for wasm_bindgen::JsValue {
    fn from(err: VizError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
