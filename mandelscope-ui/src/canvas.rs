//! Canvas element helpers shared by the CPU and GPU backends.

use crate::error::ViewError;
use wasm_bindgen::prelude::*;
use wasm_bindgen::Clamped;
use web_sys::{CanvasRenderingContext2d, ContextAttributes2d, HtmlCanvasElement, ImageData};

/// Get the current time in milliseconds (for elapsed time tracking).
pub fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

pub fn device_pixel_ratio() -> f64 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
}

/// Display size in CSS pixels.
///
/// The canvas is expected to fill its parent, whose client size is used.
/// A detached canvas falls back to its own client size.
pub fn display_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
    let (width, height) = match canvas.parent_element() {
        Some(parent) => (parent.client_width(), parent.client_height()),
        None => (canvas.client_width(), canvas.client_height()),
    };
    (width.max(0) as u32, height.max(0) as u32)
}

/// Size the backing store to `raster` and the CSS box to `display`.
///
/// A raster larger than the display is downscaled by the browser.
pub fn apply_size(
    canvas: &HtmlCanvasElement,
    display: (u32, u32),
    raster: (u32, u32),
) -> Result<(), ViewError> {
    canvas.set_width(raster.0);
    canvas.set_height(raster.1);

    let style = canvas.style();
    style
        .set_property("width", &format!("{}px", display.0))
        .map_err(ViewError::canvas)?;
    style
        .set_property("height", &format!("{}px", display.1))
        .map_err(ViewError::canvas)?;
    Ok(())
}

/// Get 2D rendering context from canvas.
pub fn get_2d_context(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, ViewError> {
    let attrs = ContextAttributes2d::new();
    attrs.set_alpha(false);

    canvas
        .get_context_with_context_options("2d", &attrs)
        .map_err(ViewError::canvas)?
        .ok_or_else(|| ViewError::Canvas("No 2d context".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| ViewError::Canvas("Context is not a CanvasRenderingContext2d".into()))
}

/// Draw RGBA pixel data to the canvas origin.
pub fn draw_pixels(
    ctx: &CanvasRenderingContext2d,
    pixels: &[u8],
    width: u32,
    height: u32,
) -> Result<(), ViewError> {
    let image_data = ImageData::new_with_u8_clamped_array_and_sh(Clamped(pixels), width, height)
        .map_err(ViewError::canvas)?;
    ctx.put_image_data(&image_data, 0.0, 0.0)
        .map_err(ViewError::canvas)
}
