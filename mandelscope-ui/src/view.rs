//! `MandelbrotView`, the interface the host page drives.
//!
//! The host forwards canvas-local pointer and wheel coordinates, resize
//! notifications and control changes. Every mutating call re-renders before
//! returning; errors surface as JS `Error` objects.

use crate::backends::{CpuCanvasBackend, GpuCanvasBackend};
use crate::error::ViewError;
use gloo_utils::format::JsValueSerdeExt;
use mandelscope_core::{
    ColorScheme, InteractionMode, RenderConfig, RenderConfigUpdate, RenderError, RenderPipeline,
    ViewOptions, ViewportController,
};
use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

enum Pipeline {
    Cpu(RenderPipeline<CpuCanvasBackend>),
    Gpu(RenderPipeline<GpuCanvasBackend>),
}

macro_rules! with_pipeline {
    ($pipeline:expr, $p:ident => $body:expr) => {
        match $pipeline {
            Pipeline::Cpu($p) => $body,
            Pipeline::Gpu($p) => $body,
        }
    };
}

#[derive(Serialize)]
struct ComplexPoint {
    real: f64,
    imag: f64,
}

fn finish(result: Result<(), RenderError<ViewError>>) -> Result<(), JsValue> {
    result.map_err(|e| ViewError::from(e).into())
}

/// Deserialize an optional JS object. `undefined` and `null` give the default.
fn from_js<T: DeserializeOwned + Default>(value: &JsValue) -> Result<T, ViewError> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    Ok(value.into_serde()?)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    JsValue::from_serde(value).map_err(|e| ViewError::from(e).into())
}

#[wasm_bindgen]
pub struct MandelbrotView {
    pipeline: Pipeline,
    controller: ViewportController,
}

#[wasm_bindgen]
impl MandelbrotView {
    /// Create a view rendered by the software rasterizer and draw the first frame.
    #[wasm_bindgen(js_name = newCpu)]
    pub fn new_cpu(canvas: HtmlCanvasElement, options: JsValue) -> Result<MandelbrotView, JsValue> {
        let options: ViewOptions = from_js(&options)?;
        let backend = CpuCanvasBackend::new(canvas).inspect_err(|e| {
            log::warn!("CPU view initialization failed: {e}");
        })?;
        log::info!("Mandelbrot view using CPU rasterizer");
        Self::start(Pipeline::Cpu(RenderPipeline::new(backend, options)))
    }

    pub fn render(&mut self) -> Result<(), JsValue> {
        finish(with_pipeline!(&mut self.pipeline, p => p.render()))
    }

    /// Merge `{maxIterations?, colorScheme?}` into the config.
    #[wasm_bindgen(js_name = updateConfig)]
    pub fn update_config(&mut self, partial: JsValue) -> Result<(), JsValue> {
        let update: RenderConfigUpdate = from_js(&partial)?;
        finish(with_pipeline!(&mut self.pipeline, p => p.update_config(&update)))
    }

    #[wasm_bindgen(js_name = setMaxIterations)]
    pub fn set_max_iterations(&mut self, max_iterations: u32) -> Result<(), JsValue> {
        let update = RenderConfigUpdate::iterations(max_iterations);
        finish(with_pipeline!(&mut self.pipeline, p => p.update_config(&update)))
    }

    #[wasm_bindgen(js_name = setColorScheme)]
    pub fn set_color_scheme(&mut self, name: &str) -> Result<(), JsValue> {
        let scheme: ColorScheme = name.parse().map_err(ViewError::from)?;
        let update = RenderConfigUpdate::scheme(scheme);
        finish(with_pipeline!(&mut self.pipeline, p => p.update_config(&update)))
    }

    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> Result<JsValue, JsValue> {
        let config: RenderConfig = with_pipeline!(&self.pipeline, p => p.config());
        to_js(&config)
    }

    #[wasm_bindgen(js_name = updateViewport)]
    pub fn update_viewport(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        finish(with_pipeline!(&mut self.pipeline, p => p.update_viewport(x, y)))
    }

    #[wasm_bindgen(js_name = updateZoom)]
    pub fn update_zoom(&mut self, zoom: f64) -> Result<(), JsValue> {
        finish(with_pipeline!(&mut self.pipeline, p => p.update_zoom(zoom)))
    }

    pub fn pan(&mut self, dx: f64, dy: f64) -> Result<(), JsValue> {
        finish(with_pipeline!(&mut self.pipeline, p => p.pan(dx, dy)))
    }

    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&mut self) -> Result<(), JsValue> {
        finish(with_pipeline!(&mut self.pipeline, p => p.reset_view()))
    }

    /// Snapshot `{x, y, zoom}`.
    #[wasm_bindgen(js_name = getViewport)]
    pub fn get_viewport(&self) -> Result<JsValue, JsValue> {
        to_js(&with_pipeline!(&self.pipeline, p => p.viewport()))
    }

    /// Multiply zoom by `factor`, keeping the point under the pointer fixed.
    #[wasm_bindgen(js_name = zoomAt)]
    pub fn zoom_at(&mut self, px: f64, py: f64, factor: f64) -> Result<(), JsValue> {
        finish(with_pipeline!(&mut self.pipeline, p => p.zoom_at(px, py, factor)))
    }

    /// Complex coordinate `{real, imag}` under a canvas-local pixel.
    #[wasm_bindgen(js_name = complexAt)]
    pub fn complex_at(&self, px: f64, py: f64) -> Result<JsValue, JsValue> {
        match with_pipeline!(&self.pipeline, p => p.complex_at(px, py)) {
            Some((real, imag)) => to_js(&ComplexPoint { real, imag }),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Re-render after the canvas container changed size.
    #[wasm_bindgen(js_name = handleResize)]
    pub fn handle_resize(&mut self) -> Result<(), JsValue> {
        finish(with_pipeline!(&mut self.pipeline, p => p.handle_resize()))
    }

    /// `{rasterWidth, rasterHeight, resolutionFactor, elapsedMs}` of the last frame.
    #[wasm_bindgen(js_name = lastFrame)]
    pub fn last_frame(&self) -> Result<JsValue, JsValue> {
        match with_pipeline!(&self.pipeline, p => p.last_frame()) {
            Some(stats) => to_js(&stats),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// `"cpu"` or `"gpu"`.
    pub fn backend(&self) -> String {
        match self.pipeline {
            Pipeline::Cpu(_) => "cpu".into(),
            Pipeline::Gpu(_) => "gpu".into(),
        }
    }

    // ============================================================================
    // Pointer interaction
    // ============================================================================

    pub fn mode(&self) -> String {
        match self.controller.mode() {
            InteractionMode::Pan => "pan".into(),
            InteractionMode::Select => "select".into(),
        }
    }

    /// Switch between `"pan"` and `"select"`. Cancels any drag in progress.
    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode: InteractionMode = mode.parse().map_err(ViewError::from)?;
        self.controller.set_mode(mode);
        Ok(())
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.controller.pointer_down(x, y);
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        let controller = &mut self.controller;
        finish(with_pipeline!(&mut self.pipeline, p => controller.pointer_move(p, x, y)))
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        let controller = &mut self.controller;
        finish(with_pipeline!(&mut self.pipeline, p => controller.pointer_up(p, x, y)))
    }

    /// Drop a drag in progress, e.g. when the pointer leaves the canvas.
    #[wasm_bindgen(js_name = cancelDrag)]
    pub fn cancel_drag(&mut self) {
        self.controller.cancel();
    }

    /// Zoom towards the pointer. Positive `deltaY` zooms out.
    pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) -> Result<(), JsValue> {
        let controller = &mut self.controller;
        finish(with_pipeline!(&mut self.pipeline, p => controller.wheel(p, x, y, delta_y)))
    }

    /// Normalized `{x, y, width, height}` of the selection being dragged.
    #[wasm_bindgen(js_name = selectionRect)]
    pub fn selection_rect(&self) -> Result<JsValue, JsValue> {
        match self.controller.selection() {
            Some(rect) => to_js(&rect),
            None => Ok(JsValue::UNDEFINED),
        }
    }
}

impl MandelbrotView {
    fn start(pipeline: Pipeline) -> Result<MandelbrotView, JsValue> {
        let mut view = MandelbrotView {
            pipeline,
            controller: ViewportController::new(),
        };
        view.render()?;
        Ok(view)
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl MandelbrotView {
    /// Create a view rendered by the fragment shader and draw the first frame.
    ///
    /// Fails when no adapter, device or compatible surface is available, or
    /// when the shader does not compile. There is no automatic CPU fallback.
    #[wasm_bindgen(js_name = newGpu)]
    pub async fn new_gpu(
        canvas: HtmlCanvasElement,
        options: JsValue,
    ) -> Result<MandelbrotView, JsValue> {
        let options: ViewOptions = from_js(&options)?;
        let backend = GpuCanvasBackend::new(canvas).await.inspect_err(|e| {
            log::warn!("GPU view initialization failed: {e}");
        })?;
        log::info!("Mandelbrot view using GPU shader");
        Self::start(Pipeline::Gpu(RenderPipeline::new(backend, options)))
    }
}
