//! Canvas-backed render backends.

use crate::canvas::{
    apply_size, device_pixel_ratio, display_size, draw_pixels, get_2d_context, performance_now,
};
use crate::error::ViewError;
use mandelscope_core::{CpuRasterizer, Frame, RasterSize, RenderBackend};
use mandelscope_gpu::GpuSurface;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Software rasterizer blitted with `putImageData`.
pub struct CpuCanvasBackend {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    rasterizer: CpuRasterizer,
}

impl CpuCanvasBackend {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, ViewError> {
        let context = get_2d_context(&canvas)?;
        Ok(Self {
            canvas,
            context,
            rasterizer: CpuRasterizer::default(),
        })
    }
}

impl RenderBackend for CpuCanvasBackend {
    type Error = ViewError;

    fn display_size(&self) -> (u32, u32) {
        display_size(&self.canvas)
    }

    fn device_pixel_ratio(&self) -> f64 {
        device_pixel_ratio()
    }

    fn resize(&mut self, display: (u32, u32), raster: RasterSize) -> Result<(), ViewError> {
        apply_size(&self.canvas, display, raster.as_tuple())?;
        self.rasterizer.resize(raster.width, raster.height);
        Ok(())
    }

    fn draw(&mut self, frame: &Frame) -> Result<(), ViewError> {
        self.rasterizer.rasterize(&frame.viewport, &frame.config);
        draw_pixels(
            &self.context,
            self.rasterizer.pixels(),
            self.rasterizer.width(),
            self.rasterizer.height(),
        )
    }

    fn now_ms(&self) -> f64 {
        performance_now()
    }
}

/// Fragment shader presenting straight to the canvas.
pub struct GpuCanvasBackend {
    canvas: HtmlCanvasElement,
    surface: GpuSurface,
}

impl GpuCanvasBackend {
    #[cfg(target_arch = "wasm32")]
    pub async fn new(canvas: HtmlCanvasElement) -> Result<Self, ViewError> {
        let surface = GpuSurface::for_canvas(canvas.clone()).await?;
        Ok(Self { canvas, surface })
    }
}

impl RenderBackend for GpuCanvasBackend {
    type Error = ViewError;

    fn display_size(&self) -> (u32, u32) {
        display_size(&self.canvas)
    }

    fn device_pixel_ratio(&self) -> f64 {
        device_pixel_ratio()
    }

    fn max_raster_dimension(&self) -> u32 {
        self.surface.max_dimension()
    }

    fn resize(&mut self, display: (u32, u32), raster: RasterSize) -> Result<(), ViewError> {
        apply_size(&self.canvas, display, raster.as_tuple())?;
        self.surface.resize(raster.width, raster.height);
        Ok(())
    }

    fn draw(&mut self, frame: &Frame) -> Result<(), ViewError> {
        self.surface.present(frame)?;
        Ok(())
    }

    fn now_ms(&self) -> f64 {
        performance_now()
    }
}
