//! Mapping between surface pixels and the complex plane.
//!
//! Pixel space has its origin at the top-left corner with Y growing downwards.
//! The complex plane has the imaginary axis growing upwards, so every mapping
//! here inverts Y. All functions are pure; callers guarantee a non-zero canvas size.

use crate::selection::ScreenRect;
use crate::viewport::Viewport;

pub fn calculate_aspect_ratio(canvas_width: u32, canvas_height: u32) -> f64 {
    canvas_width as f64 / canvas_height as f64
}

/// Width and height of the visible region in complex units.
///
/// Height is `2.0 / zoom`, width is height scaled by the aspect ratio.
pub fn visible_range(viewport: &Viewport, canvas_size: (u32, u32)) -> (f64, f64) {
    let range_y = 2.0 / viewport.zoom;
    let range_x = range_y * calculate_aspect_ratio(canvas_size.0, canvas_size.1);
    (range_x, range_y)
}

/// Convert a surface pixel to its complex coordinate `(real, imag)`.
pub fn screen_to_complex(
    px: f64,
    py: f64,
    viewport: &Viewport,
    canvas_size: (u32, u32),
) -> (f64, f64) {
    let (width, height) = (canvas_size.0 as f64, canvas_size.1 as f64);
    let (range_x, range_y) = visible_range(viewport, canvas_size);

    let real = viewport.center_x + (px / width - 0.5) * range_x;
    let imag = viewport.center_y + (0.5 - py / height) * range_y;
    (real, imag)
}

/// Convert a complex coordinate back to surface pixels. Inverse of [`screen_to_complex`].
pub fn complex_to_screen(
    real: f64,
    imag: f64,
    viewport: &Viewport,
    canvas_size: (u32, u32),
) -> (f64, f64) {
    let (width, height) = (canvas_size.0 as f64, canvas_size.1 as f64);
    let (range_x, range_y) = visible_range(viewport, canvas_size);

    let px = ((real - viewport.center_x) / range_x + 0.5) * width;
    let py = (0.5 - (imag - viewport.center_y) / range_y) * height;
    (px, py)
}

/// Convert a pixel delta into a complex-plane delta `(d_real, d_imag)`.
///
/// The result is in screen orientation: a positive `dy` (downwards) yields a
/// positive `d_imag`, the caller applies the Y inversion.
pub fn pixel_delta_to_complex(
    dx: f64,
    dy: f64,
    viewport: &Viewport,
    canvas_size: (u32, u32),
) -> (f64, f64) {
    let (range_x, range_y) = visible_range(viewport, canvas_size);
    (
        dx / canvas_size.0 as f64 * range_x,
        dy / canvas_size.1 as f64 * range_y,
    )
}

/// Move the viewport so the image follows a pointer drag of `(dx, dy)` pixels.
pub fn pan_viewport(viewport: &Viewport, dx: f64, dy: f64, canvas_size: (u32, u32)) -> Viewport {
    let (d_real, d_imag) = pixel_delta_to_complex(dx, dy, viewport, canvas_size);
    Viewport {
        center_x: viewport.center_x - d_real,
        center_y: viewport.center_y + d_imag,
        zoom: viewport.zoom,
    }
}

/// Multiply zoom by `factor` while keeping the complex point under `(px, py)` fixed.
///
/// The new center is solved from `screen_to_complex(px, py, new) == screen_to_complex(px, py, old)`.
pub fn zoom_viewport_at_point(
    viewport: &Viewport,
    px: f64,
    py: f64,
    factor: f64,
    canvas_size: (u32, u32),
) -> Viewport {
    let (anchor_real, anchor_imag) = screen_to_complex(px, py, viewport, canvas_size);

    let zoomed = Viewport {
        zoom: viewport.zoom * factor,
        ..*viewport
    };
    let (range_x, range_y) = visible_range(&zoomed, canvas_size);
    let (width, height) = (canvas_size.0 as f64, canvas_size.1 as f64);

    Viewport {
        center_x: anchor_real - (px / width - 0.5) * range_x,
        center_y: anchor_imag - (0.5 - py / height) * range_y,
        zoom: zoomed.zoom,
    }
}

/// Complex center and zoom multiplier that make `rect` fill the surface.
///
/// The multiplier is the smaller of the two axis ratios so the whole selection
/// stays visible.
pub fn selection_target(
    viewport: &Viewport,
    rect: &ScreenRect,
    canvas_size: (u32, u32),
) -> ((f64, f64), f64) {
    let (cx, cy) = rect.center();
    let center = screen_to_complex(cx, cy, viewport, canvas_size);
    let zoom_factor = (canvas_size.0 as f64 / rect.width).min(canvas_size.1 as f64 / rect.height);
    (center, zoom_factor)
}
