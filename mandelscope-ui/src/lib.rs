//! Browser entry point for the Mandelbrot explorer.
//!
//! Exposes [`MandelbrotView`] to the host page. DOM event wiring, controls and
//! layout stay in the page; it forwards canvas-local coordinates here.

mod backends;
mod canvas;
mod error;
mod view;

pub use backends::{CpuCanvasBackend, GpuCanvasBackend};
pub use error::ViewError;
pub use view::MandelbrotView;

use wasm_bindgen::prelude::*;

/// Install the panic hook and console logger. Safe to call more than once.
#[wasm_bindgen]
pub fn init() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);
}
