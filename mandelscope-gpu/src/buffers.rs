//! Uniform data shared with the fragment shader.

use bytemuck::{Pod, Zeroable};
use mandelscope_core::Frame;

/// Per-frame parameters. Layout matches `Uniforms` in `mandelbrot.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    pub center: [f32; 2],
    pub raster: [f32; 2],
    pub zoom: f32,
    pub max_iterations: u32,
    pub color_scheme: u32,
    pub _pad: u32,
}

impl Uniforms {
    pub fn from_frame(frame: &Frame) -> Self {
        Self {
            center: [
                frame.viewport.center_x as f32,
                frame.viewport.center_y as f32,
            ],
            raster: [frame.raster.width as f32, frame.raster.height as f32],
            zoom: frame.viewport.zoom as f32,
            max_iterations: frame.config.max_iterations,
            color_scheme: frame.config.color_scheme.shader_index(),
            _pad: 0,
        }
    }
}

pub fn create_uniform_buffer(device: &wgpu::Device) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("mandelbrot_uniforms"),
        size: std::mem::size_of::<Uniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Bytes per row of a readback buffer, padded to wgpu's copy alignment.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandelscope_core::{ColorScheme, RasterSize, RenderConfig, Viewport};

    #[test]
    fn uniforms_are_uniform_buffer_sized() {
        // Uniform buffers need a 16-byte multiple
        assert_eq!(std::mem::size_of::<Uniforms>(), 32);
    }

    #[test]
    fn from_frame_narrows_to_f32() {
        let frame = Frame {
            viewport: Viewport::new(-0.75, 0.1, 40.0).unwrap(),
            config: RenderConfig::new(321, ColorScheme::Fire),
            raster: RasterSize::new(640, 480),
            resolution_factor: 1.0,
        };
        let u = Uniforms::from_frame(&frame);
        assert_eq!(u.center, [-0.75, 0.1_f32]);
        assert_eq!(u.raster, [640.0, 480.0]);
        assert_eq!(u.zoom, 40.0);
        assert_eq!(u.max_iterations, 321);
        assert_eq!(u.color_scheme, 2);
    }

    #[test]
    fn rows_are_padded_to_copy_alignment() {
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
        assert_eq!(padded_bytes_per_row(1), 256);
    }
}
