//! Pointer and wheel interaction translated into viewport changes.
//!
//! [`ViewportController`] is a small state machine with two exclusive modes.
//! In pan mode a drag moves the image; in select mode a drag outlines a
//! rectangle that becomes the new view on release. Pointer coordinates are
//! surface-local display pixels.

use crate::config::MANDELBROT_DEFAULTS;
use crate::error::ConfigError;
use crate::renderer::{RenderBackend, RenderError, RenderPipeline};
use crate::selection::{ScreenRect, SelectionRect};
use crate::transforms::selection_target;
use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    #[default]
    Pan,
    Select,
}

impl FromStr for InteractionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pan" => Ok(InteractionMode::Pan),
            "select" => Ok(InteractionMode::Select),
            _ => Err(ConfigError::UnknownInteractionMode(s.to_string())),
        }
    }
}

/// The view operations the controller drives.
pub trait ViewTarget {
    type Error;

    fn viewport(&self) -> Viewport;
    fn canvas_size(&self) -> (u32, u32);
    fn pan(&mut self, dx: f64, dy: f64) -> Result<(), Self::Error>;
    fn update_viewport(&mut self, x: f64, y: f64) -> Result<(), Self::Error>;
    fn update_zoom(&mut self, zoom: f64) -> Result<(), Self::Error>;
    fn zoom_at(&mut self, px: f64, py: f64, factor: f64) -> Result<(), Self::Error>;
}

impl<B: RenderBackend> ViewTarget for RenderPipeline<B> {
    type Error = RenderError<B::Error>;

    fn viewport(&self) -> Viewport {
        RenderPipeline::viewport(self)
    }

    fn canvas_size(&self) -> (u32, u32) {
        RenderPipeline::canvas_size(self)
    }

    fn pan(&mut self, dx: f64, dy: f64) -> Result<(), Self::Error> {
        RenderPipeline::pan(self, dx, dy)
    }

    fn update_viewport(&mut self, x: f64, y: f64) -> Result<(), Self::Error> {
        RenderPipeline::update_viewport(self, x, y)
    }

    fn update_zoom(&mut self, zoom: f64) -> Result<(), Self::Error> {
        RenderPipeline::update_zoom(self, zoom)
    }

    fn zoom_at(&mut self, px: f64, py: f64, factor: f64) -> Result<(), Self::Error> {
        RenderPipeline::zoom_at(self, px, py, factor)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum DragState {
    Idle,
    Panning { last: (f64, f64) },
    Selecting(SelectionRect),
}

#[derive(Clone, Debug)]
pub struct ViewportController {
    mode: InteractionMode,
    drag: DragState,
    dead_zone: f64,
    wheel_zoom_in: f64,
    wheel_zoom_out: f64,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportController {
    pub fn new() -> Self {
        Self {
            mode: InteractionMode::Pan,
            drag: DragState::Idle,
            dead_zone: MANDELBROT_DEFAULTS.selection_dead_zone,
            wheel_zoom_in: MANDELBROT_DEFAULTS.wheel_zoom_in,
            wheel_zoom_out: MANDELBROT_DEFAULTS.wheel_zoom_out,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Switch mode. Any drag in progress is dropped.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
        self.drag = DragState::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag != DragState::Idle
    }

    /// Normalized rectangle of the selection in progress.
    pub fn selection(&self) -> Option<ScreenRect> {
        match self.drag {
            DragState::Selecting(sel) => Some(sel.normalized()),
            _ => None,
        }
    }

    /// Drop any drag in progress without touching the view.
    pub fn cancel(&mut self) {
        self.drag = DragState::Idle;
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.drag = match self.mode {
            InteractionMode::Pan => DragState::Panning { last: (x, y) },
            InteractionMode::Select => DragState::Selecting(SelectionRect::begin(x, y)),
        };
    }

    pub fn pointer_move<T: ViewTarget>(
        &mut self,
        target: &mut T,
        x: f64,
        y: f64,
    ) -> Result<(), T::Error> {
        match &mut self.drag {
            DragState::Idle => Ok(()),
            DragState::Panning { last } => {
                let (dx, dy) = (x - last.0, y - last.1);
                *last = (x, y);
                target.pan(dx, dy)
            }
            DragState::Selecting(sel) => {
                sel.update(x, y);
                Ok(())
            }
        }
    }

    /// End the drag. A selection larger than the dead-zone becomes the new view.
    pub fn pointer_up<T: ViewTarget>(
        &mut self,
        target: &mut T,
        x: f64,
        y: f64,
    ) -> Result<(), T::Error> {
        let drag = std::mem::replace(&mut self.drag, DragState::Idle);
        let DragState::Selecting(mut sel) = drag else {
            return Ok(());
        };

        sel.update(x, y);
        let rect = sel.normalized();
        if !rect.exceeds(self.dead_zone) {
            log::debug!(
                "Selection {:.0}x{:.0} within dead-zone, discarded",
                rect.width,
                rect.height
            );
            return Ok(());
        }

        let size = target.canvas_size();
        if size.0 == 0 || size.1 == 0 {
            return Ok(());
        }

        let viewport = target.viewport();
        let ((re, im), zoom_factor) = selection_target(&viewport, &rect, size);
        target.update_viewport(re, im)?;
        target.update_zoom(viewport.zoom * zoom_factor)
    }

    /// Zoom towards the pointer. Positive `delta_y` zooms out.
    pub fn wheel<T: ViewTarget>(
        &mut self,
        target: &mut T,
        x: f64,
        y: f64,
        delta_y: f64,
    ) -> Result<(), T::Error> {
        let factor = if delta_y > 0.0 {
            self.wheel_zoom_out
        } else {
            self.wheel_zoom_in
        };
        target.zoom_at(x, y, factor)
    }
}
