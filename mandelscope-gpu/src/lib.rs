//! GPU-accelerated Mandelbrot rendering using wgpu.
//!
//! A WGSL fragment shader evaluates the escape-time recurrence for every
//! pixel of a full-screen triangle. [`GpuSurface`] presents to a canvas,
//! [`OffscreenTarget`] renders headless with RGBA readback.

mod buffers;
mod device;
mod error;
mod offscreen;
mod pipeline;
mod renderer;
mod surface;
#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests;

pub use buffers::Uniforms;
pub use device::{create_instance, GpuAvailability, GpuContext};
pub use error::GpuError;
pub use offscreen::OffscreenTarget;
pub use pipeline::MandelbrotPipeline;
pub use renderer::GpuRenderer;
pub use surface::GpuSurface;
