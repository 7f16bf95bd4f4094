pub mod colorizers;
pub mod config;
pub mod controller;
pub mod cpu;
pub mod error;
pub mod escape_time;
pub mod renderer;
pub mod selection;
pub mod transforms;
pub mod viewport;

pub use colorizers::{colorize, hsl_to_rgb, ColorScheme, Colorizer, PixelColor};
pub use config::{
    RenderConfig, RenderConfigUpdate, ResolutionPolicy, ViewDefaults, ViewOptions,
    MANDELBROT_DEFAULTS,
};
pub use controller::{InteractionMode, ViewTarget, ViewportController};
pub use cpu::{CpuRasterizer, PixelBufferSurface};
pub use error::ConfigError;
pub use escape_time::{evaluate, smooth_iteration};
pub use renderer::{Frame, FrameStats, RasterSize, RenderBackend, RenderError, RenderPipeline};
pub use selection::{ScreenRect, SelectionRect};
pub use transforms::{
    calculate_aspect_ratio, complex_to_screen, pan_viewport, screen_to_complex,
    zoom_viewport_at_point,
};
pub use viewport::Viewport;
