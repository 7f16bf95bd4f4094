//! Render pipeline shared by every drawing backend.
//!
//! [`RenderPipeline`] owns the [`Viewport`] and [`RenderConfig`] of one view and
//! turns every state change into a full-frame render on its [`RenderBackend`].
//! Backends only know how to size a surface and draw a [`Frame`]; canvas sizing,
//! dynamic resolution and frame statistics live here once.

use crate::config::{RenderConfig, RenderConfigUpdate, ViewOptions};
use crate::error::ConfigError;
use crate::transforms::{pan_viewport, screen_to_complex, zoom_viewport_at_point};
use crate::viewport::Viewport;
use serde::Serialize;
use thiserror::Error;

/// Pixel dimensions of the internal raster a frame is evaluated on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RasterSize {
    pub width: u32,
    pub height: u32,
}

impl RasterSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Scale a display size, keeping each side at least one pixel.
    ///
    /// The longer side is rounded first and the shorter one derived from it, so
    /// the raster keeps the display aspect ratio as closely as whole pixels allow.
    pub fn scaled(display: (u32, u32), scale: f64) -> Self {
        let (width, height) = (display.0.max(1) as f64, display.1.max(1) as f64);
        let side = |v: f64| (v.round() as u32).max(1);
        if width >= height {
            let w = side(width * scale);
            Self::new(w, side(w as f64 * height / width))
        } else {
            let h = side(height * scale);
            Self::new(side(h as f64 * width / height), h)
        }
    }

    pub fn as_tuple(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Everything a backend needs to draw one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub viewport: Viewport,
    pub config: RenderConfig,
    pub raster: RasterSize,
    /// Dynamic resolution multiplier applied on top of the device pixel ratio,
    /// after any reduction to fit the backend's maximum raster dimension.
    pub resolution_factor: f64,
}

/// Statistics of the last completed frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameStats {
    pub raster_width: u32,
    pub raster_height: u32,
    pub resolution_factor: f64,
    pub elapsed_ms: f64,
}

/// A drawable surface of known display size.
///
/// `resize` is called before `draw` whenever the display size or the raster
/// size changes. `draw` evaluates every raster pixel and presents the result.
pub trait RenderBackend {
    type Error;

    /// Display size in surface-local (CSS) pixels. Pointer coordinates use this space.
    fn display_size(&self) -> (u32, u32);

    fn device_pixel_ratio(&self) -> f64 {
        1.0
    }

    /// Largest raster side the backend can allocate.
    fn max_raster_dimension(&self) -> u32 {
        u32::MAX
    }

    fn resize(&mut self, display: (u32, u32), raster: RasterSize) -> Result<(), Self::Error>;

    fn draw(&mut self, frame: &Frame) -> Result<(), Self::Error>;

    /// Monotonic-ish clock in milliseconds, used for frame timing only.
    fn now_ms(&self) -> f64 {
        now()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn now() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

// Browser backends override `now_ms` with `performance.now()`.
#[cfg(target_arch = "wasm32")]
fn now() -> f64 {
    0.0
}

#[derive(Debug, Error)]
pub enum RenderError<E> {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Render backend failed: {0}")]
    Backend(E),
}

/// Owns view state and re-renders after every mutation.
pub struct RenderPipeline<B: RenderBackend> {
    backend: B,
    options: ViewOptions,
    viewport: Viewport,
    config: RenderConfig,
    sized: Option<((u32, u32), RasterSize)>,
    last_frame: Option<FrameStats>,
}

impl<B: RenderBackend> RenderPipeline<B> {
    /// Create a pipeline at the home viewport. Nothing is drawn until the first render.
    pub fn new(backend: B, options: ViewOptions) -> Self {
        Self {
            backend,
            config: options.config.clamped(),
            options,
            viewport: Viewport::home(),
            sized: None,
            last_frame: None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> RenderConfig {
        self.config
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn last_frame(&self) -> Option<FrameStats> {
        self.last_frame
    }

    /// Display size of the backend surface.
    pub fn canvas_size(&self) -> (u32, u32) {
        self.backend.display_size()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Raster size for the current display size and zoom, with its resolution factor.
    ///
    /// The combined scale is reduced uniformly when the longer raster side would
    /// exceed [`RenderBackend::max_raster_dimension`]; the returned factor is the
    /// one actually applied.
    pub fn raster_for(&self, display: (u32, u32)) -> (RasterSize, f64) {
        let dpr = if self.options.device_pixel_ratio_aware {
            let ratio = self.backend.device_pixel_ratio();
            if ratio.is_finite() && ratio > 0.0 {
                ratio
            } else {
                1.0
            }
        } else {
            1.0
        };
        let factor = self.options.resolution.factor(self.viewport.zoom);

        let limit = self.backend.max_raster_dimension().max(1) as f64;
        let longest = display.0.max(display.1).max(1) as f64;
        let fit = limit / longest;
        if dpr * factor <= fit {
            return (RasterSize::scaled(display, dpr * factor), factor);
        }

        log::debug!(
            "Raster {:.0}px exceeds backend limit {limit}, scaling down",
            longest * dpr * factor
        );
        (RasterSize::scaled(display, fit), fit / dpr)
    }

    /// Render one full frame. A surface with zero display size is skipped.
    pub fn render(&mut self) -> Result<(), RenderError<B::Error>> {
        let display = self.backend.display_size();
        if display.0 == 0 || display.1 == 0 {
            log::debug!("Skipping render: surface is {}x{}", display.0, display.1);
            return Ok(());
        }

        let (raster, resolution_factor) = self.raster_for(display);
        if self.sized != Some((display, raster)) {
            self.backend
                .resize(display, raster)
                .map_err(RenderError::Backend)?;
            self.sized = Some((display, raster));
        }

        let frame = Frame {
            viewport: self.viewport,
            config: self.config,
            raster,
            resolution_factor,
        };

        let start = self.backend.now_ms();
        self.backend.draw(&frame).map_err(RenderError::Backend)?;
        let elapsed_ms = self.backend.now_ms() - start;

        log::debug!(
            "Frame {}x{} (factor {:.2}) in {:.1}ms",
            raster.width,
            raster.height,
            resolution_factor,
            elapsed_ms
        );

        self.last_frame = Some(FrameStats {
            raster_width: raster.width,
            raster_height: raster.height,
            resolution_factor,
            elapsed_ms,
        });
        Ok(())
    }

    /// Merge a partial config update, then render.
    pub fn update_config(
        &mut self,
        update: &RenderConfigUpdate,
    ) -> Result<(), RenderError<B::Error>> {
        self.config = self.config.merged(update);
        self.render()
    }

    /// Replace the config wholesale, then render.
    pub fn set_config(&mut self, config: RenderConfig) -> Result<(), RenderError<B::Error>> {
        self.config = config.clamped();
        self.render()
    }

    /// Move the center, then render. Invalid coordinates leave the view untouched.
    pub fn update_viewport(&mut self, x: f64, y: f64) -> Result<(), RenderError<B::Error>> {
        self.viewport = self.viewport.with_center(x, y)?;
        self.render()
    }

    /// Replace the zoom, then render. Non-positive or non-finite zoom is rejected.
    pub fn update_zoom(&mut self, zoom: f64) -> Result<(), RenderError<B::Error>> {
        self.viewport = self.viewport.with_zoom(zoom)?;
        self.render()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<(), RenderError<B::Error>> {
        viewport.validate()?;
        self.viewport = viewport;
        self.render()
    }

    /// Return to the home view, then render.
    pub fn reset_view(&mut self) -> Result<(), RenderError<B::Error>> {
        self.viewport = Viewport::home();
        self.render()
    }

    /// Drag the image by a pixel delta, then render.
    pub fn pan(&mut self, dx: f64, dy: f64) -> Result<(), RenderError<B::Error>> {
        let size = self.canvas_size();
        if size.0 == 0 || size.1 == 0 {
            return Ok(());
        }
        let panned = pan_viewport(&self.viewport, dx, dy, size);
        self.set_viewport(panned)
    }

    /// Multiply zoom by `factor` keeping the point under `(px, py)` fixed, then render.
    pub fn zoom_at(&mut self, px: f64, py: f64, factor: f64) -> Result<(), RenderError<B::Error>> {
        let size = self.canvas_size();
        if size.0 == 0 || size.1 == 0 {
            return Ok(());
        }
        let zoomed = zoom_viewport_at_point(&self.viewport, px, py, factor, size);
        self.set_viewport(zoomed)
    }

    /// Entry point for display-size change notifications.
    pub fn handle_resize(&mut self) -> Result<(), RenderError<B::Error>> {
        self.render()
    }

    /// Complex coordinate under a surface pixel, `None` while the surface has no size.
    pub fn complex_at(&self, px: f64, py: f64) -> Option<(f64, f64)> {
        let size = self.canvas_size();
        if size.0 == 0 || size.1 == 0 {
            return None;
        }
        Some(screen_to_complex(px, py, &self.viewport, size))
    }
}
