//! Configuration and viewport validation errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Unknown color scheme: {0:?} (expected rainbow, grayscale or fire)")]
    UnknownColorScheme(String),

    #[error("Unknown interaction mode: {0:?} (expected pan or select)")]
    UnknownInteractionMode(String),

    #[error(
        "Invalid viewport: center ({center_x}, {center_y}) must be finite and zoom {zoom} must be positive"
    )]
    InvalidViewport {
        center_x: f64,
        center_y: f64,
        zoom: f64,
    },
}
