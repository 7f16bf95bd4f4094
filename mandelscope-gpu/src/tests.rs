//! Tests for the GPU renderer - verifies shader output matches the CPU rasterizer.

use crate::{GpuAvailability, GpuContext, GpuError, MandelbrotPipeline, OffscreenTarget};
use mandelscope_core::{
    ColorScheme, CpuRasterizer, RasterSize, RenderBackend, RenderConfig, RenderPipeline,
    ResolutionPolicy, ViewOptions, Viewport,
};

/// Options without device-pixel-ratio or dynamic-resolution scaling.
fn native_options(config: RenderConfig) -> ViewOptions {
    ViewOptions {
        config,
        resolution: ResolutionPolicy::native(),
        device_pixel_ratio_aware: false,
    }
}

/// Share of pixels whose channels all lie within `tolerance` of the CPU result.
fn matching_fraction(gpu: &[u8], cpu: &[u8], tolerance: u8) -> f64 {
    assert_eq!(gpu.len(), cpu.len());
    let matching = gpu
        .chunks_exact(4)
        .zip(cpu.chunks_exact(4))
        .filter(|(g, c)| g.iter().zip(c.iter()).all(|(a, b)| a.abs_diff(*b) <= tolerance))
        .count();
    matching as f64 / (gpu.len() / 4) as f64
}

/// Test that GPU initialization doesn't panic.
#[test]
fn gpu_init_does_not_panic() {
    pollster::block_on(async {
        let result = GpuContext::try_init().await;
        match result {
            GpuAvailability::Available(_) => {
                println!("GPU available");
            }
            GpuAvailability::Unavailable(reason) => {
                println!("GPU unavailable: {reason}");
            }
        }
    });
}

#[test]
fn shader_compiles_for_offscreen_format() {
    pollster::block_on(async {
        let GpuAvailability::Available(ctx) = GpuContext::try_init().await else {
            println!("Skipping test: no GPU available");
            return;
        };

        let pipeline = MandelbrotPipeline::new(&ctx.device, OffscreenTarget::FORMAT).await;
        assert!(pipeline.is_ok(), "{:?}", pipeline.err());
    });
}

#[test]
fn broken_shader_fails_with_pipeline_error() {
    pollster::block_on(async {
        let GpuAvailability::Available(ctx) = GpuContext::try_init().await else {
            println!("Skipping test: no GPU available");
            return;
        };

        let source = "@fragment fn fs_main() -> @location(0) vec4<f32> { return undefined_fn(); }";
        let result =
            MandelbrotPipeline::with_source(&ctx.device, OffscreenTarget::FORMAT, source).await;
        assert!(
            matches!(result, Err(GpuError::PipelineCreation(_))),
            "expected a pipeline error"
        );
    });
}

/// Verify shader colors match the CPU rasterizer for every scheme.
#[test]
fn gpu_matches_cpu_rasterizer() {
    pollster::block_on(async {
        let GpuAvailability::Available(ctx) = GpuContext::try_init().await else {
            println!("Skipping test: no GPU available");
            return;
        };

        let (width, height) = (96, 64);
        let target = OffscreenTarget::new(ctx, width, height)
            .await
            .expect("offscreen target");
        let mut view = RenderPipeline::new(target, native_options(RenderConfig::default()));

        for scheme in ColorScheme::ALL {
            let config = RenderConfig::new(100, scheme);
            view.set_config(config).expect("render");
            let gpu = view.backend().read_pixels().await.expect("readback");

            let mut cpu = CpuRasterizer::new(width, height);
            cpu.rasterize(&Viewport::home(), &config);

            // f32 on the GPU shifts a few boundary pixels
            let fraction = matching_fraction(&gpu, cpu.pixels(), 3);
            println!("{scheme}: {:.1}% of pixels match", fraction * 100.0);
            assert!(fraction > 0.9, "{scheme}: only {fraction:.3} matched");
        }
    });
}

#[test]
fn gpu_renders_set_interior_black() {
    pollster::block_on(async {
        let GpuAvailability::Available(ctx) = GpuContext::try_init().await else {
            println!("Skipping test: no GPU available");
            return;
        };

        let target = OffscreenTarget::new(ctx, 40, 30)
            .await
            .expect("offscreen target");
        let mut view = RenderPipeline::new(target, native_options(RenderConfig::default()));
        view.render().expect("render");

        let pixels = view.backend().read_pixels().await.expect("readback");
        assert_eq!(pixels.len(), 40 * 30 * 4);
        // Canvas center maps to (-0.5, 0), inside the main cardioid
        let center = (15 * 40 + 20) * 4;
        assert_eq!(&pixels[center..center + 4], &[0, 0, 0, 255]);
    });
}

#[test]
fn offscreen_raster_follows_dynamic_resolution() {
    pollster::block_on(async {
        let GpuAvailability::Available(ctx) = GpuContext::try_init().await else {
            println!("Skipping test: no GPU available");
            return;
        };

        let target = OffscreenTarget::new(ctx, 50, 40)
            .await
            .expect("offscreen target");
        let options = ViewOptions {
            device_pixel_ratio_aware: false,
            ..ViewOptions::default()
        };
        let mut view = RenderPipeline::new(target, options);

        view.render().expect("render");
        assert_eq!(view.backend().raster_size(), Some(RasterSize::new(50, 40)));

        view.update_zoom(1_000.0).expect("render");
        assert_eq!(view.backend().raster_size(), Some(RasterSize::new(100, 80)));

        let pixels = view.backend().read_pixels().await.expect("readback");
        assert_eq!(pixels.len(), 100 * 80 * 4);
    });
}

#[test]
fn offscreen_raster_is_capped_at_texture_limit() {
    pollster::block_on(async {
        let GpuAvailability::Available(ctx) = GpuContext::try_init().await else {
            println!("Skipping test: no GPU available");
            return;
        };

        let limit = ctx.device.limits().max_texture_dimension_2d;
        let target = OffscreenTarget::new(ctx, limit, 8)
            .await
            .expect("offscreen target");
        assert_eq!(target.max_raster_dimension(), limit);

        let options = ViewOptions {
            device_pixel_ratio_aware: false,
            ..ViewOptions::default()
        };
        let mut view = RenderPipeline::new(target, options);
        view.update_zoom(1_000.0).expect("render");

        assert_eq!(view.backend().raster_size(), Some(RasterSize::new(limit, 8)));
        assert_eq!(view.last_frame().map(|f| f.resolution_factor), Some(1.0));
    });
}
