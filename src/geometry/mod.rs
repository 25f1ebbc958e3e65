//! Pure geometry used by the drawing tools: pointer samples, stamp
//! placement along strokes and the modifier-aware shape outlines.

mod shapes;
mod stamp;

pub use shapes::{
    ShapeKind, ShapeModifiers, ShapeOutline, ellipse_outline, rectangle_outline, shape_outline,
    triangle_outline,
};
pub use stamp::{
    BEZIER_THRESHOLD, StampGeometry, StampShape, bezier_stamps, linear_stamps, quadratic_length,
    quadratic_point, stamp_geometry, triangle_vertices,
};

use egui::Pos2;
use serde::{Deserialize, Serialize};

/// A single pointer sample in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    /// Pen pressure in `[0, 1]`; `1.0` for devices that don't report it
    pub pressure: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, pressure: 1.0 }
    }

    pub fn with_pressure(x: f32, y: f32, pressure: f32) -> Self {
        Self {
            x,
            y,
            pressure: pressure.clamp(0.0, 1.0),
        }
    }

    pub fn pos(&self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }

    pub fn distance(&self, other: &Point) -> f32 {
        self.pos().distance(other.pos())
    }

    /// Linear interpolation of position and pressure.
    pub fn lerp(&self, other: &Point, t: f32) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            pressure: self.pressure + (other.pressure - self.pressure) * t,
        }
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        self.lerp(other, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressure_is_clamped() {
        assert_eq!(Point::with_pressure(0.0, 0.0, 1.7).pressure, 1.0);
        assert_eq!(Point::with_pressure(0.0, 0.0, -0.2).pressure, 0.0);
    }

    #[test]
    fn test_midpoint_blends_pressure() {
        let a = Point::with_pressure(0.0, 0.0, 0.2);
        let b = Point::with_pressure(10.0, 20.0, 0.6);
        let m = a.midpoint(&b);
        assert_eq!(m.pos(), Pos2::new(5.0, 10.0));
        assert!((m.pressure - 0.4).abs() < 1e-6);
    }
}
