//! Shader renderer shared by the surface and offscreen targets.

use crate::buffers::{create_uniform_buffer, Uniforms};
use crate::device::GpuContext;
use crate::error::GpuError;
use crate::pipeline::MandelbrotPipeline;
use mandelscope_core::Frame;

/// Evaluates one frame per fragment into a texture view.
pub struct GpuRenderer {
    context: GpuContext,
    pipeline: MandelbrotPipeline,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl GpuRenderer {
    /// Compile the shader for `format`. Fails fast on pipeline errors.
    pub async fn new(context: GpuContext, format: wgpu::TextureFormat) -> Result<Self, GpuError> {
        let pipeline = MandelbrotPipeline::new(&context.device, format).await?;
        let uniforms = create_uniform_buffer(&context.device);

        let bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("mandelbrot_bind_group"),
                layout: &pipeline.bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.as_entire_binding(),
                }],
            });

        Ok(Self {
            context,
            pipeline,
            uniforms,
            bind_group,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.context.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.context.queue
    }

    /// Largest texture side the device accepts.
    pub fn max_texture_dimension(&self) -> u32 {
        self.context.device.limits().max_texture_dimension_2d
    }

    /// Upload the frame parameters and record the draw into a new encoder.
    ///
    /// The caller appends any copies and submits.
    pub fn encode(&self, frame: &Frame, target: &wgpu::TextureView) -> wgpu::CommandEncoder {
        let uniforms = Uniforms::from_frame(frame);
        self.context
            .queue
            .write_buffer(&self.uniforms, 0, bytemuck::bytes_of(&uniforms));

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("mandelbrot_encoder"),
                });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("mandelbrot_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.pipeline.render_pipeline);
            pass.set_bind_group(0, &self.bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        encoder
    }
}
