use egui::Pos2;
use serde::{Deserialize, Serialize};

use super::Point;

/// Segments at least this long (in px) are smoothed with a quadratic
/// bezier instead of a straight run of stamps.
pub const BEZIER_THRESHOLD: f32 = 20.0;

/// Chords used to approximate the arc length of a quadratic curve.
const ARC_LENGTH_SAMPLES: usize = 16;

/// Shape of a single brush/eraser stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StampShape {
    #[default]
    Circle,
    Square,
    Triangle,
}

impl StampShape {
    pub const ALL: [StampShape; 3] = [StampShape::Circle, StampShape::Square, StampShape::Triangle];

    /// Look up a stamp shape by its settings name. Unknown names are no match.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "circle" => Some(Self::Circle),
            "square" => Some(Self::Square),
            "triangle" => Some(Self::Triangle),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Triangle => "triangle",
        }
    }
}

/// Outline of one stamp, ready to be filled on a layer.
#[derive(Debug, Clone, PartialEq)]
pub enum StampGeometry {
    Disk { center: Pos2, radius: f32 },
    Polygon(Vec<Pos2>),
}

/// Computes the stamp outline centered at `point`, scaled by its pressure.
pub fn stamp_geometry(shape: StampShape, point: &Point, size: f32) -> StampGeometry {
    let d = point.pressure * size;
    let center = point.pos();
    match shape {
        StampShape::Circle => StampGeometry::Disk {
            center,
            radius: d / 2.0,
        },
        StampShape::Square => {
            let half = d / 2.0;
            StampGeometry::Polygon(vec![
                Pos2::new(center.x - half, center.y - half),
                Pos2::new(center.x + half, center.y - half),
                Pos2::new(center.x + half, center.y + half),
                Pos2::new(center.x - half, center.y + half),
            ])
        }
        StampShape::Triangle => StampGeometry::Polygon(triangle_vertices(center, d / 2.0).to_vec()),
    }
}

/// Vertices of an upward-pointing equilateral triangle with circumradius `r`.
pub fn triangle_vertices(center: Pos2, r: f32) -> [Pos2; 3] {
    let s = 3f32.sqrt() * r;
    let h = 3f32.sqrt() / 2.0 * s;
    // The centroid sits a third of the height above the base.
    [
        Pos2::new(center.x, center.y - h * 2.0 / 3.0),
        Pos2::new(center.x + s / 2.0, center.y + h / 3.0),
        Pos2::new(center.x - s / 2.0, center.y + h / 3.0),
    ]
}

fn stamp_count(length: f32, density: f32) -> usize {
    let n = (length * density.max(0.0)).ceil();
    if n.is_finite() && n >= 1.0 {
        n as usize
    } else {
        1
    }
}

/// Stamps evenly spaced on the straight segment `from..=to`, excluding `from`
/// (which the previous segment already stamped).
pub fn linear_stamps(from: &Point, to: &Point, density: f32) -> Vec<Point> {
    let n = stamp_count(from.distance(to), density);
    (1..=n)
        .map(|i| from.lerp(to, i as f32 / n as f32))
        .collect()
}

/// Point on the quadratic bezier `p0 -> control -> p2` at parameter `t`.
/// Pressure is blended linearly between the end points.
pub fn quadratic_point(p0: &Point, control: &Point, p2: &Point, t: f32) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt;
    let b = 2.0 * mt * t;
    let c = t * t;
    Point {
        x: a * p0.x + b * control.x + c * p2.x,
        y: a * p0.y + b * control.y + c * p2.y,
        pressure: p0.pressure + (p2.pressure - p0.pressure) * t,
    }
}

/// Arc length of a quadratic bezier, approximated by chords.
pub fn quadratic_length(p0: &Point, control: &Point, p2: &Point) -> f32 {
    let mut length = 0.0;
    let mut prev = *p0;
    for i in 1..=ARC_LENGTH_SAMPLES {
        let next = quadratic_point(p0, control, p2, i as f32 / ARC_LENGTH_SAMPLES as f32);
        length += prev.distance(&next);
        prev = next;
    }
    length
}

/// Stamps along a quadratic bezier, spaced by its arc length.
pub fn bezier_stamps(p0: &Point, control: &Point, p2: &Point, density: f32) -> Vec<Point> {
    let n = stamp_count(quadratic_length(p0, control, p2), density);
    (1..=n)
        .map(|i| quadratic_point(p0, control, p2, i as f32 / n as f32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_stamps_follow_density() {
        let stamps = linear_stamps(&Point::new(0.0, 0.0), &Point::new(100.0, 0.0), 2.0);
        assert!(stamps.len() >= 200);
        for stamp in &stamps {
            assert_eq!(stamp.y, 0.0);
            assert!(stamp.x > 0.0 && stamp.x <= 100.0);
        }
        assert_eq!(stamps.last().map(|p| p.x), Some(100.0));
    }

    #[test]
    fn test_linear_stamps_minimum_one() {
        let p = Point::new(5.0, 5.0);
        assert_eq!(linear_stamps(&p, &p, 2.0).len(), 1);
        assert_eq!(linear_stamps(&p, &Point::new(50.0, 5.0), 0.0).len(), 1);
    }

    #[test]
    fn test_quadratic_endpoints_and_length() {
        let p0 = Point::new(0.0, 0.0);
        let c = Point::new(50.0, 0.0);
        let p2 = Point::new(100.0, 0.0);
        assert_eq!(quadratic_point(&p0, &c, &p2, 0.0).pos(), p0.pos());
        assert_eq!(quadratic_point(&p0, &c, &p2, 1.0).pos(), p2.pos());
        assert!((quadratic_length(&p0, &c, &p2) - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_bezier_stamps_end_on_curve_end() {
        let stamps = bezier_stamps(
            &Point::new(0.0, 0.0),
            &Point::new(30.0, 40.0),
            &Point::new(60.0, 0.0),
            1.0,
        );
        assert!(stamps.len() >= 60);
        let last = stamps.last().map(|p| p.pos());
        assert_eq!(last, Some(Pos2::new(60.0, 0.0)));
    }

    #[test]
    fn test_stamp_geometry_scales_with_pressure() {
        let p = Point::with_pressure(10.0, 10.0, 0.5);
        match stamp_geometry(StampShape::Circle, &p, 20.0) {
            StampGeometry::Disk { center, radius } => {
                assert_eq!(center, Pos2::new(10.0, 10.0));
                assert_eq!(radius, 5.0);
            }
            other => panic!("expected disk, got {other:?}"),
        }
        match stamp_geometry(StampShape::Square, &Point::new(0.0, 0.0), 10.0) {
            StampGeometry::Polygon(pts) => {
                assert_eq!(pts[0], Pos2::new(-5.0, -5.0));
                assert_eq!(pts[2], Pos2::new(5.0, 5.0));
            }
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_triangle_is_equilateral_with_circumradius() {
        let center = Pos2::new(0.0, 0.0);
        let v = triangle_vertices(center, 10.0);
        for vertex in &v {
            assert!((vertex.distance(center) - 10.0).abs() < 1e-3);
        }
        let ab = v[0].distance(v[1]);
        let bc = v[1].distance(v[2]);
        assert!((ab - bc).abs() < 1e-3);
        assert!(v[0].y < v[1].y, "apex points up");
    }

    #[test]
    fn test_unknown_shape_name_is_no_match() {
        assert_eq!(StampShape::from_name("triangle"), Some(StampShape::Triangle));
        assert_eq!(StampShape::from_name("hexagon"), None);
    }
}
