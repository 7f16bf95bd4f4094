//! Software rasterizer.
//!
//! Evaluates every raster pixel serially into an RGBA buffer. Browser backends
//! blit the buffer onto a canvas; [`PixelBufferSurface`] keeps it in memory.

use crate::colorizers::{normalized_escape, PixelColor};
use crate::config::RenderConfig;
use crate::escape_time::evaluate;
use crate::renderer::{Frame, RasterSize, RenderBackend};
use crate::transforms::screen_to_complex;
use crate::viewport::Viewport;
use std::convert::Infallible;

/// RGBA pixel buffer filled by the escape-time evaluator.
#[derive(Clone, Debug, Default)]
pub struct CpuRasterizer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl CpuRasterizer {
    pub fn new(width: u32, height: u32) -> Self {
        let mut rasterizer = Self::default();
        rasterizer.resize(width, height);
        rasterizer
    }

    /// Reallocate the buffer when the dimensions change.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.width == width && self.height == height && !self.pixels.is_empty() {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width as usize * height as usize * 4];
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA bytes, row-major from the top-left pixel.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[i..i + 4]);
        Some(rgba)
    }

    /// Evaluate every pixel of the buffer for `viewport` and `config`.
    pub fn rasterize(&mut self, viewport: &Viewport, config: &RenderConfig) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        let size = (self.width, self.height);
        let max_iterations = config.max_iterations;
        // Resolved once per frame, not per pixel
        let colorizer = config.color_scheme.colorizer();
        let width = self.width as usize;

        for (i, rgba) in self.pixels.chunks_exact_mut(4).enumerate() {
            let px = (i % width) as f64;
            let py = (i / width) as f64;
            let c = screen_to_complex(px, py, viewport, size);
            let escape = evaluate(c, max_iterations);
            let color = match normalized_escape(escape, max_iterations) {
                Some(t) => colorizer(t),
                None => PixelColor::BLACK,
            };
            rgba.copy_from_slice(&color.to_rgba());
        }
    }
}

/// Headless backend that renders into memory.
#[derive(Clone, Debug)]
pub struct PixelBufferSurface {
    display: (u32, u32),
    device_pixel_ratio: f64,
    rasterizer: CpuRasterizer,
    frames_drawn: u64,
}

impl PixelBufferSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            display: (width, height),
            device_pixel_ratio: 1.0,
            rasterizer: CpuRasterizer::default(),
            frames_drawn: 0,
        }
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    /// Change the display size. Takes effect on the next render.
    pub fn set_display_size(&mut self, width: u32, height: u32) {
        self.display = (width, height);
    }

    pub fn raster_size(&self) -> RasterSize {
        RasterSize::new(self.rasterizer.width(), self.rasterizer.height())
    }

    pub fn pixels(&self) -> &[u8] {
        self.rasterizer.pixels()
    }

    pub fn rasterizer(&self) -> &CpuRasterizer {
        &self.rasterizer
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }
}

impl RenderBackend for PixelBufferSurface {
    type Error = Infallible;

    fn display_size(&self) -> (u32, u32) {
        self.display
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    fn resize(&mut self, _display: (u32, u32), raster: RasterSize) -> Result<(), Infallible> {
        self.rasterizer.resize(raster.width, raster.height);
        Ok(())
    }

    fn draw(&mut self, frame: &Frame) -> Result<(), Infallible> {
        self.rasterizer.rasterize(&frame.viewport, &frame.config);
        self.frames_drawn += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colorizers::{colorize, ColorScheme};
    use crate::config::ViewOptions;
    use crate::renderer::RenderPipeline;

    #[test]
    fn new_allocates_rgba_buffer() {
        let r = CpuRasterizer::new(8, 4);
        assert_eq!(r.pixels().len(), 8 * 4 * 4);
        assert_eq!(r.pixel(8, 0), None);
    }

    #[test]
    fn canvas_center_of_home_view_is_black() {
        // (-0.5, 0) is inside the main cardioid
        let mut r = CpuRasterizer::new(80, 60);
        r.rasterize(&Viewport::home(), &RenderConfig::default());
        assert_eq!(r.pixel(40, 30), Some([0, 0, 0, 255]));
    }

    #[test]
    fn every_pixel_matches_colorize() {
        let vp = Viewport::new(-0.75, 0.1, 3.0).unwrap();
        let config = RenderConfig::new(64, ColorScheme::Fire);
        let mut r = CpuRasterizer::new(16, 12);
        r.rasterize(&vp, &config);

        for y in 0..12 {
            for x in 0..16 {
                let c = screen_to_complex(x as f64, y as f64, &vp, (16, 12));
                let expected = colorize(evaluate(c, 64), 64, ColorScheme::Fire).to_rgba();
                assert_eq!(r.pixel(x, y), Some(expected), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn alpha_is_always_opaque() {
        let mut r = CpuRasterizer::new(20, 20);
        r.rasterize(&Viewport::home(), &RenderConfig::default());
        assert!(r.pixels().chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn resize_reallocates_only_on_change() {
        let mut r = CpuRasterizer::new(4, 4);
        r.rasterize(&Viewport::home(), &RenderConfig::default());
        let before = r.pixels().to_vec();
        r.resize(4, 4);
        assert_eq!(r.pixels(), &before[..]);
        r.resize(2, 3);
        assert_eq!(r.pixels().len(), 2 * 3 * 4);
    }

    #[test]
    fn zero_sized_rasterizer_is_noop() {
        let mut r = CpuRasterizer::new(0, 10);
        r.rasterize(&Viewport::home(), &RenderConfig::default());
        assert!(r.pixels().is_empty());
    }

    #[test]
    fn surface_counts_frames() {
        let mut surface = PixelBufferSurface::new(10, 10);
        surface
            .resize((10, 10), RasterSize::new(10, 10))
            .unwrap();
        let frame = Frame {
            viewport: Viewport::home(),
            config: RenderConfig::default(),
            raster: RasterSize::new(10, 10),
            resolution_factor: 1.0,
        };
        surface.draw(&frame).unwrap();
        assert_eq!(surface.frames_drawn(), 1);
        assert_eq!(surface.raster_size(), RasterSize::new(10, 10));
    }

    #[test]
    fn surface_raster_follows_display_size_and_pixel_ratio() {
        let surface = PixelBufferSurface::new(10, 5).with_device_pixel_ratio(2.0);
        let mut view = RenderPipeline::new(surface, ViewOptions::default());
        view.render().unwrap();
        assert_eq!(view.backend().raster_size(), RasterSize::new(20, 10));

        view.backend_mut().set_display_size(30, 5);
        view.handle_resize().unwrap();
        let raster = view.backend().rasterizer();
        assert_eq!((raster.width(), raster.height()), (60, 10));
        assert_eq!(raster.pixel(30, 5), Some([0, 0, 0, 255]));
        assert_eq!(raster.pixel(60, 0), None);
        assert_eq!(view.backend().frames_drawn(), 2);
    }
}
