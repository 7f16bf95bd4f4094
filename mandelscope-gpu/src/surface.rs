//! Presentable surface, a browser canvas on wasm32.

use crate::device::GpuContext;
#[cfg(target_arch = "wasm32")]
use crate::device::create_instance;
use crate::error::GpuError;
use crate::renderer::GpuRenderer;
use mandelscope_core::Frame;

pub struct GpuSurface {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    renderer: GpuRenderer,
}

impl GpuSurface {
    /// Create a surface on `canvas` and compile the shader for it.
    #[cfg(target_arch = "wasm32")]
    pub async fn for_canvas(canvas: web_sys::HtmlCanvasElement) -> Result<Self, GpuError> {
        let instance = create_instance();
        let size = (canvas.width(), canvas.height());
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;
        Self::from_surface(&instance, surface, size).await
    }

    /// Request a device compatible with `surface` and configure it at `size`.
    pub async fn from_surface(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        size: (u32, u32),
    ) -> Result<Self, GpuError> {
        let (context, adapter) = GpuContext::init(instance, Some(&surface)).await?;

        let caps = surface.get_capabilities(&adapter);
        // Shader output is already display-encoded, so prefer a linear format
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(GpuError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.0.max(1),
            height: size.1.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&context.device, &config);

        let renderer = GpuRenderer::new(context, format).await?;
        log::debug!("GPU surface configured: {format:?} {}x{}", config.width, config.height);

        Ok(Self {
            surface,
            config,
            renderer,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Largest width or height [`GpuSurface::resize`] can configure.
    pub fn max_dimension(&self) -> u32 {
        self.renderer.max_texture_dimension()
    }

    /// Reconfigure the swap chain. A no-op when the size is unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        let limit = self.max_dimension().max(1);
        let (width, height) = (width.clamp(1, limit), height.clamp(1, limit));
        if self.size() == (width, height) {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(self.renderer.device(), &self.config);
    }

    /// Render `frame` into the next swap chain texture and present it.
    pub fn present(&mut self, frame: &Frame) -> Result<(), GpuError> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                self.surface.configure(self.renderer.device(), &self.config);
                self.surface.get_current_texture()?
            }
            Err(e) => return Err(e.into()),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self.renderer.encode(frame, &view);
        self.renderer
            .queue()
            .submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
