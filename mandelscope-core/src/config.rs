//! Render configuration and view defaults.
//!
//! This module contains the per-frame render parameters, the dynamic resolution
//! policy and the static table of defaults shared by every renderer backend.

use crate::colorizers::ColorScheme;
use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};

/// Defaults for a Mandelbrot view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewDefaults {
    /// Center shown by a fresh or reset view
    pub center: (f64, f64),
    /// Zoom of a fresh or reset view
    pub zoom: f64,
    pub max_iterations: u32,
    pub color_scheme: ColorScheme,
    /// Zoom multiplier for a wheel step towards the user (zoom in).
    pub wheel_zoom_in: f64,
    /// Zoom multiplier for a wheel step away from the user (zoom out).
    pub wheel_zoom_out: f64,
    /// Selections whose width or height is at most this many pixels are discarded.
    pub selection_dead_zone: f64,
    /// Zoom above which the raster resolution starts growing.
    pub zoom_threshold: f64,
    /// Upper bound for the raster resolution multiplier.
    pub max_resolution_factor: f64,
}

impl ViewDefaults {
    pub fn viewport(&self) -> Viewport {
        Viewport {
            center_x: self.center.0,
            center_y: self.center.1,
            zoom: self.zoom,
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            max_iterations: self.max_iterations,
            color_scheme: self.color_scheme,
        }
    }

    pub fn resolution_policy(&self) -> ResolutionPolicy {
        ResolutionPolicy {
            zoom_threshold: self.zoom_threshold,
            max_resolution_factor: self.max_resolution_factor,
        }
    }
}

/// Mandelbrot view defaults.
/// This is the canonical source of truth for the starting view and interaction constants.
pub static MANDELBROT_DEFAULTS: ViewDefaults = ViewDefaults {
    center: (-0.5, 0.0),
    zoom: 1.0,
    max_iterations: 200,
    color_scheme: ColorScheme::Rainbow,
    wheel_zoom_in: 1.2,
    wheel_zoom_out: 0.8,
    selection_dead_zone: 10.0,
    zoom_threshold: 100.0,
    max_resolution_factor: 2.0,
};

/// Parameters applied to every pixel of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    pub max_iterations: u32,
    pub color_scheme: ColorScheme,
}

impl RenderConfig {
    /// Create a config, raising `max_iterations` to at least 1.
    pub fn new(max_iterations: u32, color_scheme: ColorScheme) -> Self {
        Self {
            max_iterations,
            color_scheme,
        }
        .clamped()
    }

    /// Copy with `max_iterations` raised to at least 1.
    pub fn clamped(self) -> Self {
        if self.max_iterations == 0 {
            log::warn!("max_iterations = 0 clamped to 1");
        }
        Self {
            max_iterations: self.max_iterations.max(1),
            ..self
        }
    }

    /// Merge a partial update into a new config. Absent fields keep their value.
    pub fn merged(&self, update: &RenderConfigUpdate) -> Self {
        Self {
            max_iterations: update.max_iterations.unwrap_or(self.max_iterations),
            color_scheme: update.color_scheme.unwrap_or(self.color_scheme),
        }
        .clamped()
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        MANDELBROT_DEFAULTS.render_config()
    }
}

/// Partial [`RenderConfig`] update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfigUpdate {
    pub max_iterations: Option<u32>,
    pub color_scheme: Option<ColorScheme>,
}

impl RenderConfigUpdate {
    pub fn iterations(max_iterations: u32) -> Self {
        Self {
            max_iterations: Some(max_iterations),
            color_scheme: None,
        }
    }

    pub fn scheme(color_scheme: ColorScheme) -> Self {
        Self {
            max_iterations: None,
            color_scheme: Some(color_scheme),
        }
    }
}

/// Raster resolution growth at high magnification.
///
/// Below `zoom_threshold` the raster matches the surface. Above it the raster
/// is scaled by `zoom / zoom_threshold`, capped at `max_resolution_factor`, and
/// the surface is downscaled for display.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolutionPolicy {
    pub zoom_threshold: f64,
    pub max_resolution_factor: f64,
}

impl ResolutionPolicy {
    /// A policy that always renders at native resolution.
    pub fn native() -> Self {
        Self {
            zoom_threshold: f64::INFINITY,
            max_resolution_factor: 1.0,
        }
    }

    pub fn factor(&self, zoom: f64) -> f64 {
        if zoom.is_nan() || zoom <= self.zoom_threshold {
            return 1.0;
        }
        (zoom / self.zoom_threshold).clamp(1.0, self.max_resolution_factor.max(1.0))
    }
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        MANDELBROT_DEFAULTS.resolution_policy()
    }
}

/// Options a host passes when constructing a view. Every field is optional.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewOptions {
    pub config: RenderConfig,
    pub resolution: ResolutionPolicy,
    /// Multiply the raster size by the device pixel ratio.
    pub device_pixel_ratio_aware: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            config: RenderConfig::default(),
            resolution: ResolutionPolicy::default(),
            device_pixel_ratio_aware: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_canonical_view() {
        let vp = MANDELBROT_DEFAULTS.viewport();
        assert_eq!((vp.center_x, vp.center_y, vp.zoom), (-0.5, 0.0, 1.0));
        assert_eq!(MANDELBROT_DEFAULTS.wheel_zoom_in, 1.2);
        assert_eq!(MANDELBROT_DEFAULTS.wheel_zoom_out, 0.8);
        assert_eq!(MANDELBROT_DEFAULTS.selection_dead_zone, 10.0);
    }

    #[test]
    fn new_clamps_zero_iterations() {
        let config = RenderConfig::new(0, ColorScheme::Fire);
        assert_eq!(config.max_iterations, 1);
        assert_eq!(config.color_scheme, ColorScheme::Fire);
    }

    #[test]
    fn merged_replaces_only_present_fields() {
        let base = RenderConfig::new(500, ColorScheme::Rainbow);

        let scheme_only = base.merged(&RenderConfigUpdate::scheme(ColorScheme::Grayscale));
        assert_eq!(scheme_only, RenderConfig::new(500, ColorScheme::Grayscale));

        let iterations_only = base.merged(&RenderConfigUpdate::iterations(64));
        assert_eq!(iterations_only, RenderConfig::new(64, ColorScheme::Rainbow));

        assert_eq!(base.merged(&RenderConfigUpdate::default()), base);
    }

    #[test]
    fn merged_clamps_iterations() {
        let merged = RenderConfig::default().merged(&RenderConfigUpdate::iterations(0));
        assert_eq!(merged.max_iterations, 1);
    }

    #[test]
    fn update_deserializes_from_partial_json() {
        let update: RenderConfigUpdate =
            serde_json::from_str(r#"{"colorScheme": "fire"}"#).unwrap();
        assert_eq!(update, RenderConfigUpdate::scheme(ColorScheme::Fire));

        let empty: RenderConfigUpdate = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, RenderConfigUpdate::default());
    }

    #[test]
    fn update_rejects_unknown_scheme() {
        let result = serde_json::from_str::<RenderConfigUpdate>(r#"{"colorScheme": "neon"}"#);
        assert!(result.is_err());
    }

    // ============================================================================
    // ResolutionPolicy tests
    // ============================================================================

    #[test]
    fn resolution_is_native_below_threshold() {
        let policy = ResolutionPolicy::default();
        assert_eq!(policy.factor(1.0), 1.0);
        assert_eq!(policy.factor(100.0), 1.0);
    }

    #[test]
    fn resolution_grows_linearly_above_threshold() {
        let policy = ResolutionPolicy::default();
        assert!((policy.factor(150.0) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn resolution_is_capped() {
        let policy = ResolutionPolicy::default();
        assert_eq!(policy.factor(1e9), 2.0);
    }

    #[test]
    fn native_policy_never_scales() {
        assert_eq!(ResolutionPolicy::native().factor(1e12), 1.0);
    }

    #[test]
    fn view_options_fill_missing_fields() {
        let options: ViewOptions =
            serde_json::from_str(r#"{"config": {"maxIterations": 1000}}"#).unwrap();
        assert_eq!(options.config.max_iterations, 1000);
        assert_eq!(options.config.color_scheme, ColorScheme::Rainbow);
        assert_eq!(options.resolution, ResolutionPolicy::default());
        assert!(options.device_pixel_ratio_aware);
    }
}
