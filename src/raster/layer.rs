use egui::{Pos2, Rect, Vec2};
use image::{Rgba, RgbaImage};

use super::path::{Path, Transform, arc_points};
use super::{CompositeMode, LineCap, LineJoin};

/// Miter joins longer than this many half-widths fall back to bevels.
const MITER_LIMIT: f32 = 10.0;

/// Paint state that `save`/`restore` push and pop.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawState {
    pub fill: Rgba<u8>,
    pub stroke: Rgba<u8>,
    pub line_width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub composite: CompositeMode,
    pub transform: Transform,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            fill: Rgba([0, 0, 0, 255]),
            stroke: Rgba([0, 0, 0, 255]),
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            composite: CompositeMode::SourceOver,
            transform: Transform::IDENTITY,
        }
    }
}

/// Pixels covered by one fill or stroke, limited to its bounding box.
struct Mask {
    x0: i64,
    y0: i64,
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl Mask {
    /// Allocates a mask for `bounds` clipped to a `width`×`height` layer.
    fn for_bounds(bounds: Rect, width: u32, height: u32) -> Option<Self> {
        if !bounds.is_finite() || bounds.is_negative() {
            return None;
        }
        let x0 = (bounds.min.x.floor() as i64).max(0);
        let y0 = (bounds.min.y.floor() as i64).max(0);
        let x1 = (bounds.max.x.ceil() as i64).min(width as i64);
        let y1 = (bounds.max.y.ceil() as i64).min(height as i64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        let (w, h) = ((x1 - x0) as usize, (y1 - y0) as usize);
        Some(Self {
            x0,
            y0,
            width: w,
            height: h,
            bits: vec![false; w * h],
        })
    }

    fn set(&mut self, x: i64, y: i64) {
        let (lx, ly) = (x - self.x0, y - self.y0);
        if lx >= 0 && ly >= 0 && (lx as usize) < self.width && (ly as usize) < self.height {
            self.bits[ly as usize * self.width + lx as usize] = true;
        }
    }

    /// Scanline fill of `edges` with the nonzero winding rule, sampling pixel centers.
    fn fill_polygon(&mut self, edges: &[(Pos2, Pos2)]) {
        let mut crossings: Vec<(f32, i32)> = Vec::new();
        for row in 0..self.height {
            let y = self.y0 + row as i64;
            let yc = y as f32 + 0.5;
            crossings.clear();
            for (p0, p1) in edges {
                if p0.y == p1.y {
                    continue;
                }
                let (lo, hi, dir) = if p0.y < p1.y { (p0, p1, 1) } else { (p1, p0, -1) };
                if yc < lo.y || yc >= hi.y {
                    continue;
                }
                let t = (yc - lo.y) / (hi.y - lo.y);
                crossings.push((lo.x + (hi.x - lo.x) * t, dir));
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));
            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding == 0 {
                    continue;
                }
                let start = (pair[0].0 - 0.5).ceil() as i64;
                let end = (pair[1].0 - 0.5).ceil() as i64;
                for x in start..end {
                    self.set(x, y);
                }
            }
        }
    }

    fn fill_disk(&mut self, center: Pos2, radius: f32) {
        let r2 = radius * radius;
        for row in 0..self.height {
            let y = self.y0 + row as i64;
            let dy = y as f32 + 0.5 - center.y;
            for col in 0..self.width {
                let x = self.x0 + col as i64;
                let dx = x as f32 + 0.5 - center.x;
                if dx * dx + dy * dy <= r2 {
                    self.bits[row * self.width + col] = true;
                }
            }
        }
    }

    fn covered(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.bits.iter().enumerate().filter(|(_, b)| **b).map(|(i, _)| {
            (
                (self.x0 + (i % self.width) as i64) as u32,
                (self.y0 + (i / self.width) as i64) as u32,
            )
        })
    }
}

fn bounds_of(points: impl IntoIterator<Item = Pos2>) -> Rect {
    let mut rect = Rect::NOTHING;
    for p in points {
        rect.extend_with(p);
    }
    rect
}

/// Blends `src` scaled by `coverage` onto `dst`. Colors are unpremultiplied.
pub fn blend(dst: Rgba<u8>, src: Rgba<u8>, coverage: f32, mode: CompositeMode) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    let da = dst[3] as f32 / 255.0;
    match mode {
        CompositeMode::SourceOver => {
            let oa = sa + da * (1.0 - sa);
            if oa <= 0.0 {
                return Rgba([0, 0, 0, 0]);
            }
            let channel = |i: usize| {
                let c = (src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / oa;
                c.round().clamp(0.0, 255.0) as u8
            };
            Rgba([channel(0), channel(1), channel(2), (oa * 255.0).round() as u8])
        }
        CompositeMode::DestinationOut => {
            let oa = da * (1.0 - sa);
            if oa <= 0.0 {
                return Rgba([0, 0, 0, 0]);
            }
            Rgba([dst[0], dst[1], dst[2], (oa * 255.0).round() as u8])
        }
    }
}

/// One raster buffer with a 2D-context style drawing API.
///
/// Coordinates passed to path methods are in user space and go through
/// the current transform; line widths are in device pixels.
#[derive(Debug, Clone)]
pub struct Layer {
    image: RgbaImage,
    state: DrawState,
    saved: Vec<DrawState>,
    path: Path,
}

impl Layer {
    /// A fully transparent layer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            state: DrawState::default(),
            saved: Vec::new(),
            path: Path::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    /// Replaces the pixel buffer with a transparent one of a new size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
        self.path.clear();
    }

    // --- state ---

    pub fn save(&mut self) {
        self.saved.push(self.state.clone());
    }

    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    pub fn translate(&mut self, tx: f32, ty: f32) {
        self.state.transform = self.state.transform.translated(tx, ty);
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.state.transform = self.state.transform.scaled(sx, sy);
    }

    pub fn composite(&self) -> CompositeMode {
        self.state.composite
    }

    pub fn set_composite(&mut self, mode: CompositeMode) {
        self.state.composite = mode;
    }

    pub fn set_fill_color(&mut self, color: Rgba<u8>) {
        self.state.fill = color;
    }

    pub fn set_stroke_color(&mut self, color: Rgba<u8>) {
        self.state.stroke = color;
    }

    pub fn fill_color(&self) -> Rgba<u8> {
        self.state.fill
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.state.line_width = width.max(0.0);
    }

    pub fn line_width(&self) -> f32 {
        self.state.line_width
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    // --- path construction ---

    pub fn begin_path(&mut self) {
        self.path.clear();
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        let p = self.state.transform.apply(Pos2::new(x, y));
        self.path.move_to(p);
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        let p = self.state.transform.apply(Pos2::new(x, y));
        self.path.line_to(p);
    }

    pub fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        let t = self.state.transform;
        self.path
            .quadratic_to(t.apply(Pos2::new(cx, cy)), t.apply(Pos2::new(x, y)));
    }

    pub fn arc(&mut self, cx: f32, cy: f32, radius: f32, start: f32, end: f32) {
        let t = self.state.transform;
        let points = arc_points(Pos2::new(cx, cy), radius, start, end)
            .into_iter()
            .map(|p| t.apply(p));
        self.path.extend_connected(points);
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let t = self.state.transform;
        let corners = [
            Pos2::new(x, y),
            Pos2::new(x + w, y),
            Pos2::new(x + w, y + h),
            Pos2::new(x, y + h),
        ]
        .map(|p| t.apply(p));
        self.path.polygon(&corners);
    }

    /// Adds a closed polygon given in user space.
    pub fn polygon(&mut self, points: &[Pos2]) {
        let t = self.state.transform;
        let device: Vec<Pos2> = points.iter().map(|p| t.apply(*p)).collect();
        self.path.polygon(&device);
    }

    pub fn close_path(&mut self) {
        self.path.close();
    }

    // --- painting ---

    /// Fills the current path with the fill color. Returns true if any pixel was touched.
    pub fn fill(&mut self) -> bool {
        let edges = self.path.fill_edges();
        let bounds = bounds_of(edges.iter().map(|(a, _)| *a));
        let Some(mut mask) = Mask::for_bounds(bounds, self.width(), self.height()) else {
            return false;
        };
        mask.fill_polygon(&edges);
        self.paint_mask(&mask, self.state.fill)
    }

    /// Strokes the current path with the stroke color and line settings.
    pub fn stroke(&mut self) -> bool {
        let half = self.state.line_width / 2.0;
        if half <= 0.0 {
            return false;
        }
        let points = self.path.subpaths().iter().flat_map(|s| s.points.iter().copied());
        let bounds = bounds_of(points).expand(half * MITER_LIMIT);
        let Some(mut mask) = Mask::for_bounds(bounds, self.width(), self.height()) else {
            return false;
        };
        let (cap, join) = (self.state.line_cap, self.state.line_join);
        for subpath in self.path.subpaths() {
            let mut pts = subpath.points.clone();
            pts.dedup();
            if pts.len() < 2 {
                if let (Some(&p), LineCap::Round) = (pts.first(), cap) {
                    mask.fill_disk(p, half);
                }
                continue;
            }
            let closed = subpath.closed && pts.len() > 2;
            if closed {
                pts.push(pts[0]);
            }
            let last_segment = pts.len() - 2;
            for (i, seg) in pts.windows(2).enumerate() {
                let dir = (seg[1] - seg[0]).normalized();
                let n = dir.rot90() * half;
                let (mut a, mut b) = (seg[0], seg[1]);
                if cap == LineCap::Square && !closed {
                    if i == 0 {
                        a -= dir * half;
                    }
                    if i == last_segment {
                        b += dir * half;
                    }
                }
                mask.fill_polygon(&quad_edges([a + n, b + n, b - n, a - n]));
            }
            let interior = if closed { 0..pts.len() - 1 } else { 1..pts.len() - 1 };
            for i in interior {
                let prev = if i == 0 { pts[pts.len() - 2] } else { pts[i - 1] };
                stroke_join(&mut mask, prev, pts[i], pts[i + 1], half, join);
            }
            if !closed && cap == LineCap::Round {
                mask.fill_disk(pts[0], half);
                mask.fill_disk(pts[pts.len() - 1], half);
            }
        }
        self.paint_mask(&mask, self.state.stroke)
    }

    /// Fills a disk directly, without touching the current path.
    pub fn fill_disk(&mut self, center: Pos2, radius: f32) -> bool {
        let center = self.state.transform.apply(center);
        let bounds = Rect::from_center_size(center, Vec2::splat(radius * 2.0));
        let Some(mut mask) = Mask::for_bounds(bounds, self.width(), self.height()) else {
            return false;
        };
        mask.fill_disk(center, radius);
        self.paint_mask(&mask, self.state.fill)
    }

    /// Fills a closed polygon directly, without touching the current path.
    pub fn fill_polygon(&mut self, points: &[Pos2]) -> bool {
        let mut path = Path::new();
        let t = self.state.transform;
        let device: Vec<Pos2> = points.iter().map(|p| t.apply(*p)).collect();
        path.polygon(&device);
        let edges = path.fill_edges();
        let Some(mut mask) = Mask::for_bounds(bounds_of(device), self.width(), self.height()) else {
            return false;
        };
        mask.fill_polygon(&edges);
        self.paint_mask(&mask, self.state.fill)
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> bool {
        self.fill_polygon(&[
            Pos2::new(x, y),
            Pos2::new(x + w, y),
            Pos2::new(x + w, y + h),
            Pos2::new(x, y + h),
        ])
    }

    /// Sets pixels in the rectangle to transparent black, ignoring the composite mode.
    pub fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let rect = Rect::from_min_size(Pos2::new(x, y), Vec2::new(w, h));
        let Some(mask) = Mask::for_bounds(rect, self.width(), self.height()) else {
            return;
        };
        for row in 0..mask.height {
            for col in 0..mask.width {
                let (px, py) = ((mask.x0 + col as i64) as u32, (mask.y0 + row as i64) as u32);
                self.image.put_pixel(px, py, Rgba([0, 0, 0, 0]));
            }
        }
    }

    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    /// Composites `src` at `(dx, dy)` with the current composite mode.
    pub fn draw_image(&mut self, src: &RgbaImage, dx: i64, dy: i64) {
        let mode = self.state.composite;
        for (sx, sy, pixel) in src.enumerate_pixels() {
            let (x, y) = (dx + sx as i64, dy + sy as i64);
            if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
                continue;
            }
            let (x, y) = (x as u32, y as u32);
            let out = blend(*self.image.get_pixel(x, y), *pixel, 1.0, mode);
            self.image.put_pixel(x, y, out);
        }
    }

    /// Blends the fill color at one device pixel with fractional coverage.
    pub fn blend_coverage(&mut self, x: i64, y: i64, coverage: f32) {
        if coverage <= 0.0 || x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        let out = blend(*self.image.get_pixel(x, y), self.state.fill, coverage, self.state.composite);
        self.image.put_pixel(x, y, out);
    }

    fn paint_mask(&mut self, mask: &Mask, color: Rgba<u8>) -> bool {
        let mode = self.state.composite;
        let mut touched = false;
        for (x, y) in mask.covered() {
            let out = blend(*self.image.get_pixel(x, y), color, 1.0, mode);
            self.image.put_pixel(x, y, out);
            touched = true;
        }
        touched
    }
}

fn quad_edges(corners: [Pos2; 4]) -> Vec<(Pos2, Pos2)> {
    (0..4).map(|i| (corners[i], corners[(i + 1) % 4])).collect()
}

fn stroke_join(mask: &mut Mask, prev: Pos2, at: Pos2, next: Pos2, half: f32, join: LineJoin) {
    if prev == at || next == at {
        return;
    }
    if join == LineJoin::Round {
        mask.fill_disk(at, half);
        return;
    }
    let d1 = (at - prev).normalized();
    let d2 = (next - at).normalized();
    let cross = d1.x * d2.y - d1.y * d2.x;
    if cross.abs() < 1e-6 {
        return;
    }
    // The outer side of the turn is opposite to the direction it bends.
    let side = if cross > 0.0 { -1.0 } else { 1.0 };
    let n1 = d1.rot90() * half * side;
    let n2 = d2.rot90() * half * side;
    let bevel = [at, at + n1, at + n2];
    let miter_dir = (n1 + n2).normalized();
    let cos_half = miter_dir.dot(n1) / half;
    if join == LineJoin::Miter && cos_half > 1.0 / MITER_LIMIT {
        let tip = at + miter_dir * (half / cos_half);
        mask.fill_polygon(&quad_edges([at, at + n1, tip, at + n2]));
    } else {
        mask.fill_polygon(&(0..3).map(|i| (bevel[i], bevel[(i + 1) % 3])).collect::<Vec<_>>());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    #[test]
    fn test_fill_rect_covers_exact_pixels() {
        let mut layer = Layer::new(10, 10);
        layer.set_fill_color(RED);
        assert!(layer.fill_rect(2.0, 3.0, 4.0, 2.0));
        let painted = layer.image().pixels().filter(|p| **p == RED).count();
        assert_eq!(painted, 8);
        assert_eq!(layer.pixel(2, 3), Some(RED));
        assert_eq!(layer.pixel(6, 3), Some(Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn test_fill_disk_is_symmetric() {
        let mut layer = Layer::new(20, 20);
        layer.fill_disk(Pos2::new(10.0, 10.0), 5.0);
        assert_eq!(layer.pixel(10, 10).map(|p| p[3]), Some(255));
        assert_eq!(layer.pixel(5, 10), layer.pixel(14, 10));
        assert_eq!(layer.pixel(0, 0).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_destination_out_clears_alpha() {
        let mut layer = Layer::new(4, 4);
        layer.set_fill_color(RED);
        layer.fill_rect(0.0, 0.0, 4.0, 4.0);
        layer.set_composite(CompositeMode::DestinationOut);
        layer.fill_rect(0.0, 0.0, 2.0, 4.0);
        assert_eq!(layer.pixel(0, 0).map(|p| p[3]), Some(0));
        assert_eq!(layer.pixel(3, 0), Some(RED));
    }

    #[test]
    fn test_source_over_half_alpha() {
        let out = blend(Rgba([255, 255, 255, 255]), Rgba([0, 0, 0, 128]), 1.0, CompositeMode::SourceOver);
        assert_eq!(out[3], 255);
        assert!((out[0] as i32 - 127).abs() <= 1);
    }

    #[test]
    fn test_scaled_arc_fills_an_ellipse() {
        let mut layer = Layer::new(40, 20);
        layer.save();
        layer.translate(20.0, 10.0);
        layer.scale(2.0, 1.0);
        layer.begin_path();
        layer.arc(0.0, 0.0, 8.0, 0.0, std::f32::consts::TAU);
        layer.restore();
        assert!(layer.fill());
        assert_eq!(layer.pixel(35, 10).map(|p| p[3]), Some(255));
        assert_eq!(layer.pixel(20, 1).map(|p| p[3]), Some(0));
        assert_eq!(layer.state().transform, Transform::IDENTITY);
    }

    #[test]
    fn test_stroke_draws_outline_only() {
        let mut layer = Layer::new(30, 30);
        layer.set_stroke_color(RED);
        layer.set_line_width(2.0);
        layer.begin_path();
        layer.rect(5.0, 5.0, 20.0, 20.0);
        assert!(layer.stroke());
        assert_eq!(layer.pixel(5, 15), Some(RED));
        assert_eq!(layer.pixel(15, 15).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_draw_image_offsets_and_clips() {
        let mut src = RgbaImage::new(2, 2);
        for p in src.pixels_mut() {
            *p = RED;
        }
        let mut layer = Layer::new(3, 3);
        layer.draw_image(&src, 2, 2);
        assert_eq!(layer.pixel(2, 2), Some(RED));
        assert_eq!(layer.pixel(1, 1).map(|p| p[3]), Some(0));
    }
}
