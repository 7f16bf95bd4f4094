use crate::config::MANDELBROT_DEFAULTS;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Viewport in the complex plane
///
/// Defines the visible region:
/// - `center_x`, `center_y`: complex coordinate shown at the middle of the surface
/// - `zoom`: magnification, the visible height is `2.0 / zoom`
///
/// The visible width follows from the surface aspect ratio, see
/// [`crate::transforms::visible_range`]. Serialises as `{x, y, zoom}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    #[serde(rename = "x")]
    pub center_x: f64,
    #[serde(rename = "y")]
    pub center_y: f64,
    pub zoom: f64,
}

impl Viewport {
    /// Create a validated viewport.
    ///
    /// Returns an error if either center coordinate is not finite or if zoom is
    /// not a finite positive number.
    pub fn new(center_x: f64, center_y: f64, zoom: f64) -> Result<Self, ConfigError> {
        let viewport = Self {
            center_x,
            center_y,
            zoom,
        };
        viewport.validate()?;
        Ok(viewport)
    }

    /// The canonical starting view.
    pub fn home() -> Self {
        MANDELBROT_DEFAULTS.viewport()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = self.center_x.is_finite()
            && self.center_y.is_finite()
            && self.zoom.is_finite()
            && self.zoom > 0.0;

        if valid {
            Ok(())
        } else {
            Err(ConfigError::InvalidViewport {
                center_x: self.center_x,
                center_y: self.center_y,
                zoom: self.zoom,
            })
        }
    }

    /// Copy of this viewport centered on a new point.
    pub fn with_center(&self, center_x: f64, center_y: f64) -> Result<Self, ConfigError> {
        Self::new(center_x, center_y, self.zoom)
    }

    /// Copy of this viewport at a new zoom level.
    pub fn with_zoom(&self, zoom: f64) -> Result<Self, ConfigError> {
        Self::new(self.center_x, self.center_y, zoom)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::home()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_is_canonical_default() {
        let vp = Viewport::home();
        assert_eq!(vp.center_x, -0.5);
        assert_eq!(vp.center_y, 0.0);
        assert_eq!(vp.zoom, 1.0);
        assert_eq!(Viewport::default(), vp);
    }

    #[test]
    fn new_accepts_finite_center_and_positive_zoom() {
        let vp = Viewport::new(0.25, -0.1, 1e6).unwrap();
        assert_eq!(vp.center_x, 0.25);
        assert_eq!(vp.center_y, -0.1);
        assert_eq!(vp.zoom, 1e6);
    }

    #[test]
    fn new_rejects_zero_and_negative_zoom() {
        assert!(Viewport::new(0.0, 0.0, 0.0).is_err());
        assert!(Viewport::new(0.0, 0.0, -2.0).is_err());
    }

    #[test]
    fn new_rejects_non_finite_values() {
        assert!(Viewport::new(f64::NAN, 0.0, 1.0).is_err());
        assert!(Viewport::new(0.0, f64::INFINITY, 1.0).is_err());
        assert!(Viewport::new(0.0, 0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn with_zoom_keeps_center() {
        let vp = Viewport::home().with_zoom(8.0).unwrap();
        assert_eq!(vp.center_x, -0.5);
        assert_eq!(vp.zoom, 8.0);
    }

    #[test]
    fn with_center_keeps_zoom() {
        let vp = Viewport::new(0.0, 0.0, 3.0)
            .unwrap()
            .with_center(0.1, 0.2)
            .unwrap();
        assert_eq!((vp.center_x, vp.center_y, vp.zoom), (0.1, 0.2, 3.0));
    }

    #[test]
    fn serializes_as_x_y_zoom() {
        let vp = Viewport::new(-0.75, 0.1, 4.0).unwrap();
        let json = serde_json::to_value(vp).unwrap();
        assert_eq!(json, serde_json::json!({"x": -0.75, "y": 0.1, "zoom": 4.0}));

        let restored: Viewport = serde_json::from_value(json).unwrap();
        assert_eq!(restored, vp);
    }
}
