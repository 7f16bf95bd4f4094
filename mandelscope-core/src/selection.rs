use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in surface pixels (f64, pointer events are fractional)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True when both sides are strictly larger than `dead_zone` pixels.
    pub fn exceeds(&self, dead_zone: f64) -> bool {
        self.width > dead_zone && self.height > dead_zone
    }
}

/// In-progress area selection, live only while the pointer is held down
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionRect {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

impl SelectionRect {
    /// Start a selection at a single point.
    pub fn begin(x: f64, y: f64) -> Self {
        Self {
            start_x: x,
            start_y: y,
            end_x: x,
            end_y: y,
        }
    }

    pub fn update(&mut self, x: f64, y: f64) {
        self.end_x = x;
        self.end_y = y;
    }

    /// Rectangle spanning `min(start, end)` to `max(start, end)`.
    pub fn normalized(&self) -> ScreenRect {
        let x = self.start_x.min(self.end_x);
        let y = self.start_y.min(self.end_y);
        ScreenRect {
            x,
            y,
            width: self.start_x.max(self.end_x) - x,
            height: self.start_y.max(self.end_y) - y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_creates_empty_selection() {
        let sel = SelectionRect::begin(12.0, 34.0);
        let rect = sel.normalized();
        assert_eq!(rect, ScreenRect::new(12.0, 34.0, 0.0, 0.0));
    }

    #[test]
    fn normalized_handles_drag_up_and_left() {
        let mut sel = SelectionRect::begin(200.0, 150.0);
        sel.update(120.0, 90.0);
        assert_eq!(sel.normalized(), ScreenRect::new(120.0, 90.0, 80.0, 60.0));
    }

    #[test]
    fn center_is_midpoint() {
        let rect = ScreenRect::new(100.0, 50.0, 40.0, 20.0);
        assert_eq!(rect.center(), (120.0, 60.0));
    }

    #[test]
    fn exceeds_requires_both_sides() {
        assert!(ScreenRect::new(0.0, 0.0, 11.0, 11.0).exceeds(10.0));
        assert!(!ScreenRect::new(0.0, 0.0, 10.0, 50.0).exceeds(10.0));
        assert!(!ScreenRect::new(0.0, 0.0, 50.0, 5.0).exceeds(10.0));
    }

    #[test]
    fn screen_rect_serialization_roundtrip() {
        let original = ScreenRect::new(1.5, 2.5, 30.0, 40.0);
        let json = serde_json::to_string(&original).unwrap();
        let restored: ScreenRect = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, original);
    }
}
