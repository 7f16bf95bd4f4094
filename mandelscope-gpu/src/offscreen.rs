//! Headless render target with RGBA readback.

use crate::buffers::padded_bytes_per_row;
use crate::device::GpuContext;
use crate::error::GpuError;
use crate::renderer::GpuRenderer;
use mandelscope_core::{Frame, RasterSize, RenderBackend};

struct OffscreenTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    readback: wgpu::Buffer,
    size: RasterSize,
    padded_row: u32,
}

/// Renders into a texture and copies each frame to a mappable buffer.
pub struct OffscreenTarget {
    renderer: GpuRenderer,
    display: (u32, u32),
    target: Option<OffscreenTexture>,
}

impl OffscreenTarget {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    pub async fn new(context: GpuContext, width: u32, height: u32) -> Result<Self, GpuError> {
        let renderer = GpuRenderer::new(context, Self::FORMAT).await?;
        Ok(Self {
            renderer,
            display: (width, height),
            target: None,
        })
    }

    pub fn set_display_size(&mut self, width: u32, height: u32) {
        self.display = (width, height);
    }

    pub fn raster_size(&self) -> Option<RasterSize> {
        self.target.as_ref().map(|t| t.size)
    }

    /// Tightly packed RGBA bytes of the last drawn frame.
    pub async fn read_pixels(&self) -> Result<Vec<u8>, GpuError> {
        let target = self
            .target
            .as_ref()
            .ok_or_else(|| GpuError::Unavailable("No frame rendered".into()))?;

        let padded = self.read_buffer(&target.readback).await?;

        let row_bytes = (target.size.width * 4) as usize;
        let mut pixels = Vec::with_capacity(row_bytes * target.size.height as usize);
        for row in padded.chunks_exact(target.padded_row as usize) {
            pixels.extend_from_slice(&row[..row_bytes]);
        }
        Ok(pixels)
    }

    async fn read_buffer(&self, buffer: &wgpu::Buffer) -> Result<Vec<u8>, GpuError> {
        let slice = buffer.slice(..);

        let (tx, rx) = futures_channel::oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        #[cfg(not(target_arch = "wasm32"))]
        self.renderer.device().poll(wgpu::Maintain::Wait);

        rx.await
            .map_err(|_| GpuError::Unavailable("Channel closed".into()))?
            .map_err(GpuError::BufferMap)?;

        let data = slice.get_mapped_range().to_vec();
        buffer.unmap();

        Ok(data)
    }

    fn create_texture(&self, size: RasterSize) -> OffscreenTexture {
        let device = self.renderer.device();
        let extent = wgpu::Extent3d {
            width: size.width,
            height: size.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen_target"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let padded_row = padded_bytes_per_row(size.width);
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("offscreen_readback"),
            size: padded_row as u64 * size.height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        OffscreenTexture {
            texture,
            view,
            readback,
            size,
            padded_row,
        }
    }
}

impl RenderBackend for OffscreenTarget {
    type Error = GpuError;

    fn display_size(&self) -> (u32, u32) {
        self.display
    }

    fn max_raster_dimension(&self) -> u32 {
        self.renderer.max_texture_dimension()
    }

    fn resize(&mut self, _display: (u32, u32), raster: RasterSize) -> Result<(), GpuError> {
        if self.raster_size() != Some(raster) {
            self.target = Some(self.create_texture(raster));
        }
        Ok(())
    }

    fn draw(&mut self, frame: &Frame) -> Result<(), GpuError> {
        let target = self
            .target
            .as_ref()
            .ok_or_else(|| GpuError::Unavailable("Offscreen target not sized".into()))?;

        let mut encoder = self.renderer.encode(frame, &target.view);
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &target.readback,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(target.padded_row),
                    rows_per_image: Some(target.size.height),
                },
            },
            wgpu::Extent3d {
                width: target.size.width,
                height: target.size.height,
                depth_or_array_layers: 1,
            },
        );

        self.renderer
            .queue()
            .submit(std::iter::once(encoder.finish()));
        Ok(())
    }
}
