use egui::{Pos2, Vec2};

/// Segments used to flatten curves, per pixel of approximate length.
const FLATTEN_SEGMENTS_PER_PX: f32 = 0.5;
const MIN_CURVE_SEGMENTS: usize = 8;
const MAX_CURVE_SEGMENTS: usize = 256;

/// Affine transform `[a c e; b d f]` applied to user-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn apply(&self, p: Pos2) -> Pos2 {
        Pos2::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Post-multiplies a translation, as a 2D context's `translate` does.
    pub fn translated(&self, tx: f32, ty: f32) -> Self {
        Self {
            e: self.a * tx + self.c * ty + self.e,
            f: self.b * tx + self.d * ty + self.f,
            ..*self
        }
    }

    /// Post-multiplies a scale, as a 2D context's `scale` does.
    pub fn scaled(&self, sx: f32, sy: f32) -> Self {
        Self {
            a: self.a * sx,
            b: self.b * sx,
            c: self.c * sy,
            d: self.d * sy,
            ..*self
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subpath {
    pub points: Vec<Pos2>,
    pub closed: bool,
}

/// A flattened path in device coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    subpaths: Vec<Subpath>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subpaths(&self) -> &[Subpath] {
        &self.subpaths
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.iter().all(|s| s.points.is_empty())
    }

    pub fn current_point(&self) -> Option<Pos2> {
        self.subpaths.last().and_then(|s| s.points.last().copied())
    }

    pub fn move_to(&mut self, p: Pos2) {
        self.subpaths.push(Subpath {
            points: vec![p],
            closed: false,
        });
    }

    pub fn line_to(&mut self, p: Pos2) {
        match self.subpaths.last_mut() {
            Some(subpath) if !subpath.closed => subpath.points.push(p),
            _ => self.move_to(p),
        }
    }

    /// Quadratic curve from the current point; starts a subpath at `control`
    /// when the path is empty, as canvas contexts do.
    pub fn quadratic_to(&mut self, control: Pos2, end: Pos2) {
        let Some(start) = self.current_point() else {
            self.move_to(control);
            self.line_to(end);
            return;
        };
        let approx_len = start.distance(control) + control.distance(end);
        let segments = curve_segments(approx_len);
        for i in 1..=segments {
            let t = i as f32 / segments as f32;
            let mt = 1.0 - t;
            let p = Pos2::new(
                mt * mt * start.x + 2.0 * mt * t * control.x + t * t * end.x,
                mt * mt * start.y + 2.0 * mt * t * control.y + t * t * end.y,
            );
            self.line_to(p);
        }
    }

    /// Appends an already-transformed polyline, connecting it to the
    /// current subpath when there is one.
    pub fn extend_connected(&mut self, points: impl IntoIterator<Item = Pos2>) {
        for p in points {
            self.line_to(p);
        }
    }

    pub fn polygon(&mut self, points: &[Pos2]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.move_to(*first);
        for p in rest {
            self.line_to(*p);
        }
        self.close();
    }

    pub fn close(&mut self) {
        if let Some(subpath) = self.subpaths.last_mut() {
            if !subpath.points.is_empty() {
                subpath.closed = true;
            }
        }
    }

    pub fn clear(&mut self) {
        self.subpaths.clear();
    }

    /// Edges of every subpath, each implicitly closed for filling.
    pub fn fill_edges(&self) -> Vec<(Pos2, Pos2)> {
        let mut edges = Vec::new();
        for subpath in &self.subpaths {
            let n = subpath.points.len();
            if n < 2 {
                continue;
            }
            for i in 0..n {
                edges.push((subpath.points[i], subpath.points[(i + 1) % n]));
            }
        }
        edges
    }
}

/// Number of line segments used to approximate a curve of the given length.
pub fn curve_segments(approx_len: f32) -> usize {
    let n = (approx_len * FLATTEN_SEGMENTS_PER_PX).ceil();
    if n.is_finite() {
        (n as usize).clamp(MIN_CURVE_SEGMENTS, MAX_CURVE_SEGMENTS)
    } else {
        MIN_CURVE_SEGMENTS
    }
}

/// Points on a circular arc in user space, from `start` to `end` radians.
pub fn arc_points(center: Pos2, radius: f32, start: f32, end: f32) -> Vec<Pos2> {
    let sweep = end - start;
    let segments = curve_segments(radius.abs() * sweep.abs());
    (0..=segments)
        .map(|i| {
            let angle = start + sweep * i as f32 / segments as f32;
            center + Vec2::angled(angle) * radius
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_translate_then_scale() {
        let t = Transform::IDENTITY.translated(10.0, 20.0).scaled(2.0, 0.5);
        assert_eq!(t.apply(Pos2::new(1.0, 4.0)), Pos2::new(12.0, 22.0));
    }

    #[test]
    fn test_fill_edges_close_each_subpath() {
        let mut path = Path::new();
        path.polygon(&[Pos2::new(0.0, 0.0), Pos2::new(4.0, 0.0), Pos2::new(0.0, 4.0)]);
        let edges = path.fill_edges();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[2], (Pos2::new(0.0, 4.0), Pos2::new(0.0, 0.0)));
    }

    #[test]
    fn test_quadratic_ends_on_end_point() {
        let mut path = Path::new();
        path.move_to(Pos2::new(0.0, 0.0));
        path.quadratic_to(Pos2::new(10.0, 10.0), Pos2::new(20.0, 0.0));
        assert_eq!(path.current_point(), Some(Pos2::new(20.0, 0.0)));
    }

    #[test]
    fn test_arc_points_full_circle() {
        let pts = arc_points(Pos2::ZERO, 5.0, 0.0, std::f32::consts::TAU);
        let first = pts[0];
        let last = pts[pts.len() - 1];
        assert!(first.distance(last) < 1e-3);
        for p in &pts {
            assert!((p.distance(Pos2::ZERO) - 5.0).abs() < 1e-3);
        }
    }
}
