use mandelscope_core::{ConfigError, RenderError};
use mandelscope_gpu::GpuError;
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Gpu(#[from] GpuError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    #[error("Canvas unavailable: {0}")]
    Canvas(String),
}

impl ViewError {
    /// Wrap a JS exception from a DOM call.
    pub fn canvas(value: JsValue) -> Self {
        ViewError::Canvas(
            value
                .as_string()
                .unwrap_or_else(|| format!("{value:?}")),
        )
    }
}

impl From<RenderError<ViewError>> for ViewError {
    fn from(err: RenderError<ViewError>) -> Self {
        match err {
            RenderError::Config(e) => ViewError::Config(e),
            RenderError::Backend(e) => e,
        }
    }
}

impl From<ViewError> for JsValue {
    fn from(err: ViewError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
