use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Kind of shape drawn by the shape tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    #[default]
    Rectangle,
    Triangle,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Circle, ShapeKind::Rectangle, ShapeKind::Triangle];

    /// Look up a shape kind by its settings name. Unknown names are no match.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "circle" => Some(Self::Circle),
            "rectangle" => Some(Self::Rectangle),
            "triangle" => Some(Self::Triangle),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Rectangle => "rectangle",
            Self::Triangle => "triangle",
        }
    }
}

/// Live modifier keys while dragging a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShapeModifiers {
    /// Shift: equal sides / circle
    pub equilateral: bool,
    /// Alt: the anchor is the center of the shape
    pub centered: bool,
}

impl ShapeModifiers {
    pub fn new(equilateral: bool, centered: bool) -> Self {
        Self {
            equilateral,
            centered,
        }
    }
}

/// Outline computed from the drag anchor and the current pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeOutline {
    Rect(Rect),
    Ellipse {
        center: Pos2,
        radius_x: f32,
        radius_y: f32,
    },
    Polygon(Vec<Pos2>),
}

impl ShapeOutline {
    /// True when the outline encloses no area and nothing would be filled.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Rect(rect) => rect.width() <= 0.0 || rect.height() <= 0.0,
            Self::Ellipse {
                radius_x, radius_y, ..
            } => *radius_x <= 0.0 || *radius_y <= 0.0,
            Self::Polygon(points) => polygon_area(points).abs() <= f32::EPSILON,
        }
    }
}

fn polygon_area(points: &[Pos2]) -> f32 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        twice += a.x * b.y - b.x * a.y;
    }
    twice / 2.0
}

fn signs(delta: Vec2) -> Vec2 {
    Vec2::new(delta.x.signum(), delta.y.signum())
}

/// Rectangle between anchor and pointer.
///
/// Equilateral sizing takes the *smaller* axis.
pub fn rectangle_outline(anchor: Pos2, point: Pos2, modifiers: ShapeModifiers) -> Rect {
    let delta = point - anchor;
    let extent = delta.abs();
    match (modifiers.equilateral, modifiers.centered) {
        (false, false) => Rect::from_two_pos(anchor, point),
        (true, false) => {
            let side = extent.x.min(extent.y);
            Rect::from_two_pos(anchor, anchor + signs(delta) * side)
        }
        (false, true) => Rect::from_min_max(anchor - extent, anchor + extent),
        (true, true) => {
            let side = extent.x.min(extent.y);
            Rect::from_center_size(anchor, Vec2::splat(side * 2.0))
        }
    }
}

/// Ellipse between anchor and pointer, sized the same way as rectangles.
pub fn ellipse_outline(anchor: Pos2, point: Pos2, modifiers: ShapeModifiers) -> ShapeOutline {
    let delta = point - anchor;
    let extent = delta.abs();
    let (center, radius_x, radius_y) = match (modifiers.equilateral, modifiers.centered) {
        (false, false) => (anchor + delta / 2.0, extent.x / 2.0, extent.y / 2.0),
        (true, false) => {
            let r = extent.x.min(extent.y) / 2.0;
            (anchor + signs(delta) * r, r, r)
        }
        (false, true) => (anchor, extent.x, extent.y),
        (true, true) => {
            let r = extent.x.min(extent.y);
            (anchor, r, r)
        }
    };
    ShapeOutline::Ellipse {
        center,
        radius_x,
        radius_y,
    }
}

/// Triangle between anchor and pointer.
///
/// Equilateral sizing takes the *larger* axis, unlike rectangles and circles.
pub fn triangle_outline(anchor: Pos2, point: Pos2, modifiers: ShapeModifiers) -> ShapeOutline {
    let delta = point - anchor;
    let extent = delta.abs();
    let height_of = |side: f32| side * 3f32.sqrt() / 2.0;
    let vertices = match (modifiers.equilateral, modifiers.centered) {
        (false, false) => vec![
            Pos2::new((anchor.x + point.x) / 2.0, anchor.y),
            Pos2::new(point.x, point.y),
            Pos2::new(anchor.x, point.y),
        ],
        (true, false) => {
            let side = extent.x.max(extent.y);
            let sign = signs(delta);
            let base_y = anchor.y + sign.y * height_of(side);
            vec![
                Pos2::new(anchor.x + sign.x * side / 2.0, anchor.y),
                Pos2::new(anchor.x + sign.x * side, base_y),
                Pos2::new(anchor.x, base_y),
            ]
        }
        (false, true) => vec![
            Pos2::new(anchor.x, anchor.y - extent.y),
            Pos2::new(anchor.x + extent.x, anchor.y + extent.y),
            Pos2::new(anchor.x - extent.x, anchor.y + extent.y),
        ],
        (true, true) => {
            let side = extent.x.max(extent.y) * 2.0;
            let half_height = height_of(side) / 2.0;
            vec![
                Pos2::new(anchor.x, anchor.y - half_height),
                Pos2::new(anchor.x + side / 2.0, anchor.y + half_height),
                Pos2::new(anchor.x - side / 2.0, anchor.y + half_height),
            ]
        }
    };
    ShapeOutline::Polygon(vertices)
}

/// Outline for `kind` between anchor and pointer.
pub fn shape_outline(
    kind: ShapeKind,
    anchor: Pos2,
    point: Pos2,
    modifiers: ShapeModifiers,
) -> ShapeOutline {
    match kind {
        ShapeKind::Rectangle => ShapeOutline::Rect(rectangle_outline(anchor, point, modifiers)),
        ShapeKind::Circle => ellipse_outline(anchor, point, modifiers),
        ShapeKind::Triangle => triangle_outline(anchor, point, modifiers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANCHOR: Pos2 = Pos2::new(10.0, 10.0);
    const POINT: Pos2 = Pos2::new(50.0, 30.0);

    #[test]
    fn test_rectangle_corner_to_corner() {
        let rect = rectangle_outline(ANCHOR, POINT, ShapeModifiers::default());
        assert_eq!(rect.min, Pos2::new(10.0, 10.0));
        assert_eq!(rect.size(), Vec2::new(40.0, 20.0));
    }

    #[test]
    fn test_rectangle_equilateral_uses_smaller_axis() {
        let rect = rectangle_outline(ANCHOR, POINT, ShapeModifiers::new(true, false));
        assert_eq!(rect.min, Pos2::new(10.0, 10.0));
        assert_eq!(rect.size(), Vec2::new(20.0, 20.0));

        // Dragging up-left keeps the square on the anchor's corner.
        let rect = rectangle_outline(ANCHOR, Pos2::new(0.0, -20.0), ShapeModifiers::new(true, false));
        assert_eq!(rect.max, ANCHOR);
        assert_eq!(rect.size(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_rectangle_centered_doubles_extents() {
        let rect = rectangle_outline(ANCHOR, POINT, ShapeModifiers::new(false, true));
        assert_eq!(rect.min, Pos2::new(-30.0, -10.0));
        assert_eq!(rect.max, Pos2::new(50.0, 30.0));
    }

    #[test]
    fn test_rectangle_centered_square() {
        let rect = rectangle_outline(ANCHOR, POINT, ShapeModifiers::new(true, true));
        assert_eq!(rect.center(), ANCHOR);
        assert_eq!(rect.size(), Vec2::new(40.0, 40.0));
    }

    #[test]
    fn test_circle_equilateral_uses_smaller_axis() {
        match ellipse_outline(ANCHOR, POINT, ShapeModifiers::new(true, false)) {
            ShapeOutline::Ellipse {
                center,
                radius_x,
                radius_y,
            } => {
                assert_eq!(radius_x, 10.0);
                assert_eq!(radius_y, 10.0);
                assert_eq!(center, Pos2::new(20.0, 20.0));
            }
            other => panic!("expected ellipse, got {other:?}"),
        }
    }

    #[test]
    fn test_ellipse_default_and_centered() {
        assert_eq!(
            ellipse_outline(ANCHOR, POINT, ShapeModifiers::default()),
            ShapeOutline::Ellipse {
                center: Pos2::new(30.0, 20.0),
                radius_x: 20.0,
                radius_y: 10.0,
            }
        );
        assert_eq!(
            ellipse_outline(ANCHOR, POINT, ShapeModifiers::new(false, true)),
            ShapeOutline::Ellipse {
                center: ANCHOR,
                radius_x: 40.0,
                radius_y: 20.0,
            }
        );
    }

    #[test]
    fn test_circle_centered_on_anchor() {
        assert_eq!(
            ellipse_outline(ANCHOR, POINT, ShapeModifiers::new(true, true)),
            ShapeOutline::Ellipse {
                center: ANCHOR,
                radius_x: 20.0,
                radius_y: 20.0,
            }
        );
    }

    #[test]
    fn test_triangle_equilateral_uses_larger_axis() {
        match triangle_outline(ANCHOR, POINT, ShapeModifiers::new(true, false)) {
            ShapeOutline::Polygon(v) => {
                let side = v[1].distance(v[2]);
                assert!((side - 40.0).abs() < 1e-3);
                assert!((v[0].distance(v[1]) - 40.0).abs() < 1e-3);
                assert!((v[0].distance(v[2]) - 40.0).abs() < 1e-3);
            }
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_triangle_apex_above_base_midpoint() {
        match triangle_outline(ANCHOR, POINT, ShapeModifiers::default()) {
            ShapeOutline::Polygon(v) => {
                assert_eq!(v[0], Pos2::new(30.0, 10.0));
                assert_eq!((v[1].x + v[2].x) / 2.0, v[0].x);
                assert_eq!(v[1].y, 30.0);
                assert_eq!(v[2].y, 30.0);
            }
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_triangle_centered_on_anchor() {
        match triangle_outline(ANCHOR, POINT, ShapeModifiers::new(false, true)) {
            ShapeOutline::Polygon(v) => {
                assert_eq!(v[0], Pos2::new(10.0, -10.0));
                assert_eq!(v[1], Pos2::new(50.0, 30.0));
                assert_eq!(v[2], Pos2::new(-30.0, 30.0));
            }
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_equilateral_triangle_centered_on_anchor() {
        match triangle_outline(ANCHOR, POINT, ShapeModifiers::new(true, true)) {
            ShapeOutline::Polygon(v) => {
                for (i, j) in [(0, 1), (1, 2), (0, 2)] {
                    assert!((v[i].distance(v[j]) - 80.0).abs() < 1e-3);
                }
                assert_eq!(v[0].x, ANCHOR.x);
                assert_eq!(v[1].y, v[2].y);
                assert_eq!((v[1].x + v[2].x) / 2.0, ANCHOR.x);
                assert!(((v[0].y + v[1].y) / 2.0 - ANCHOR.y).abs() < 1e-3);
            }
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_degenerate_outline_is_empty() {
        let flat = shape_outline(ShapeKind::Rectangle, ANCHOR, Pos2::new(50.0, 10.0), ShapeModifiers::default());
        assert!(flat.is_empty());
        let flat = shape_outline(ShapeKind::Triangle, ANCHOR, ANCHOR, ShapeModifiers::default());
        assert!(flat.is_empty());
        assert!(!shape_outline(ShapeKind::Circle, ANCHOR, POINT, ShapeModifiers::default()).is_empty());
    }
}
