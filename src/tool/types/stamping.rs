use serde::{Deserialize, Serialize};

use crate::canvas::CanvasCursor;
use crate::geometry::{
    BEZIER_THRESHOLD, Point, StampGeometry, StampShape, bezier_stamps, linear_stamps,
    stamp_geometry,
};
use crate::input::{GestureTracker, PointerEvent};
use crate::raster::{CompositeMode, LineCap, LineJoin};
use crate::tool::descriptor::{BRUSH, ERASER};
use crate::tool::listeners::release;
use crate::tool::{ListenerHandle, ListenerKind, Tool, ToolContext, ToolDescriptor};

/// How pointer samples become pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeMode {
    /// Discrete shapes stamped along the path
    #[default]
    Stamped,
    /// A stroked quadratic through segment midpoints
    Smoothed,
}

/// Settings shared by brush and eraser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StampSettings {
    pub shape: StampShape,
    /// Stamp diameter at full pressure, in px
    pub size: f32,
    /// Stamps per pixel of travel
    pub stamp_density: f32,
    /// Minimum per-axis movement before a smoothed segment is drawn
    pub tolerance: f32,
    pub mode: StrokeMode,
}

impl Default for StampSettings {
    fn default() -> Self {
        Self {
            shape: StampShape::Circle,
            size: 10.0,
            stamp_density: 0.5,
            tolerance: 5.0,
            mode: StrokeMode::Stamped,
        }
    }
}

/// Line cap and join that match a stamp shape's silhouette.
pub fn line_style(shape: StampShape) -> (LineCap, LineJoin) {
    match shape {
        StampShape::Circle => (LineCap::Round, LineJoin::Round),
        StampShape::Square | StampShape::Triangle => (LineCap::Butt, LineJoin::Miter),
    }
}

/// Stroke width for a pen pressure sample.
pub fn pressure_width(pressure: f32, size: f32) -> f32 {
    (pressure + 1.0).ln() * size / std::f32::consts::LN_2
}

/// Freehand drawing shared by the brush and the eraser; they differ only in
/// descriptor and composite mode.
#[derive(Debug)]
pub struct StampingDrawTool {
    descriptor: &'static ToolDescriptor,
    composite: CompositeMode,
    pub settings: StampSettings,
    gesture: GestureTracker,
    pointer: Option<ListenerHandle>,
    /// The last three samples at most
    window: Vec<Point>,
    /// Where the previous segment ended
    last_end: Option<Point>,
    line_width: f32,
    drawn: bool,
    stamps: usize,
}

impl StampingDrawTool {
    fn new(
        descriptor: &'static ToolDescriptor,
        composite: CompositeMode,
        settings: StampSettings,
    ) -> Self {
        Self {
            descriptor,
            composite,
            settings,
            gesture: GestureTracker::default(),
            pointer: None,
            window: Vec::with_capacity(3),
            last_end: None,
            line_width: 0.0,
            drawn: false,
            stamps: 0,
        }
    }

    pub fn brush(settings: StampSettings) -> Self {
        Self::new(&BRUSH, CompositeMode::SourceOver, settings)
    }

    pub fn eraser(settings: StampSettings) -> Self {
        Self::new(&ERASER, CompositeMode::DestinationOut, settings)
    }

    pub fn composite(&self) -> CompositeMode {
        self.composite
    }

    pub fn is_drawing(&self) -> bool {
        self.gesture.is_active()
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Stamps placed during the current or most recent gesture.
    pub fn stamp_count(&self) -> usize {
        self.stamps
    }

    fn paint_stamps(&mut self, ctx: &mut ToolContext<'_>, points: &[Point]) {
        let color = ctx.surface.stroke_color();
        let (shape, size) = (self.settings.shape, self.settings.size);
        let layer = ctx.surface.main_mut();
        layer.save();
        layer.set_fill_color(color);
        for point in points {
            let painted = match stamp_geometry(shape, point, size) {
                StampGeometry::Disk { center, radius } => layer.fill_disk(center, radius),
                StampGeometry::Polygon(vertices) => layer.fill_polygon(&vertices),
            };
            self.drawn |= painted;
        }
        layer.restore();
        self.stamps += points.len();
    }

    fn stamp_latest(&mut self, ctx: &mut ToolContext<'_>) {
        let n = self.window.len();
        let Some(from) = self.last_end else { return };
        if n < 2 {
            return;
        }
        let (a, b) = (self.window[n - 2], self.window[n - 1]);
        let density = self.settings.stamp_density;
        let mut points = if n >= 3 && a.distance(&b) >= BEZIER_THRESHOLD {
            let end = a.midpoint(&b);
            self.last_end = Some(end);
            bezier_stamps(&from, &a, &end, density)
        } else {
            self.last_end = Some(b);
            linear_stamps(&from, &b, density)
        };
        if self.stamps == 0 {
            // The press point gets the stroke's first stamp.
            points.insert(0, from);
        }
        self.paint_stamps(ctx, &points);
    }

    fn stroke_curve(&mut self, ctx: &mut ToolContext<'_>, control: Point, end: Point) {
        let Some(start) = self.last_end else { return };
        let color = ctx.surface.stroke_color();
        let (cap, join) = line_style(self.settings.shape);
        let width = self.line_width;
        let layer = ctx.surface.main_mut();
        layer.save();
        layer.set_stroke_color(color);
        layer.set_line_width(width);
        layer.set_line_cap(cap);
        layer.set_line_join(join);
        layer.begin_path();
        layer.move_to(start.x, start.y);
        layer.quadratic_curve_to(control.x, control.y, end.x, end.y);
        self.drawn |= layer.stroke();
        layer.begin_path();
        layer.restore();
        self.last_end = Some(end);
    }

    fn smooth_latest(&mut self, ctx: &mut ToolContext<'_>) {
        let n = self.window.len();
        if n < 3 {
            return;
        }
        let (a, b) = (self.window[n - 2], self.window[n - 1]);
        self.stroke_curve(ctx, a, a.midpoint(&b));
    }

    /// Draws from the last segment end to the final sample.
    fn flush(&mut self, ctx: &mut ToolContext<'_>) {
        let (Some(from), Some(&to)) = (self.last_end, self.window.last()) else {
            return;
        };
        if from.distance(&to) <= 0.0 {
            return;
        }
        match self.settings.mode {
            StrokeMode::Stamped => {
                let points = linear_stamps(&from, &to, self.settings.stamp_density);
                self.paint_stamps(ctx, &points);
                self.last_end = Some(to);
            }
            StrokeMode::Smoothed => self.stroke_curve(ctx, from.midpoint(&to), to),
        }
    }

    fn set_width(&mut self, ctx: &mut ToolContext<'_>, width: f32) {
        self.line_width = width;
        ctx.surface.main_mut().set_line_width(width);
    }

    /// Ends the gesture, recording it if anything was drawn.
    fn finish(&mut self, ctx: &mut ToolContext<'_>) {
        self.flush(ctx);
        self.set_width(ctx, 0.0);
        self.window.clear();
        self.last_end = None;
        if self.drawn {
            ctx.commit();
        }
        self.drawn = false;
    }
}

impl Tool for StampingDrawTool {
    fn descriptor(&self) -> &'static ToolDescriptor {
        self.descriptor
    }

    fn activate(&mut self, ctx: &mut ToolContext<'_>) {
        self.pointer = Some(ctx.listeners.subscribe(ListenerKind::Pointer));
        ctx.surface.set_composite(self.composite);
        ctx.set_cursor(CanvasCursor::Crosshair);
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        if self.gesture.is_active() {
            self.gesture.cancel();
            self.finish(ctx);
        }
        release(ctx.listeners, &mut self.pointer);
        ctx.surface.set_composite(CompositeMode::SourceOver);
        ctx.set_cursor(CanvasCursor::Default);
    }

    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) {
        if !self.gesture.begin(event) {
            return;
        }
        let point = event.point();
        self.window.clear();
        self.window.push(point);
        self.last_end = Some(point);
        self.drawn = false;
        self.stamps = 0;
        let width = if event.has_pressure() {
            pressure_width(point.pressure, self.settings.size)
        } else {
            self.settings.size
        };
        self.set_width(ctx, width);
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) {
        if !self.gesture.matches(event) {
            return;
        }
        let point = event.point();
        if event.has_pressure() {
            let target = pressure_width(point.pressure, self.settings.size);
            self.set_width(ctx, target * 0.2 + self.line_width * 0.8);
        }
        match self.settings.mode {
            StrokeMode::Stamped => {
                self.window.push(point);
                if self.window.len() > 3 {
                    self.window.remove(0);
                }
                self.stamp_latest(ctx);
            }
            StrokeMode::Smoothed => {
                if let Some(last) = self.window.last() {
                    let tolerance = self.settings.tolerance;
                    if (point.x - last.x).abs() < tolerance && (point.y - last.y).abs() < tolerance {
                        return;
                    }
                }
                self.window.push(point);
                if self.window.len() > 3 {
                    self.window.remove(0);
                }
                self.smooth_latest(ctx);
            }
        }
    }

    fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>, event: &PointerEvent) {
        if !self.gesture.end(event) {
            return;
        }
        self.finish(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_style_per_shape() {
        assert_eq!(line_style(StampShape::Circle), (LineCap::Round, LineJoin::Round));
        assert_eq!(line_style(StampShape::Square), (LineCap::Butt, LineJoin::Miter));
        assert_eq!(line_style(StampShape::Triangle), (LineCap::Butt, LineJoin::Miter));
    }

    #[test]
    fn test_pressure_width_is_logarithmic() {
        assert!((pressure_width(1.0, 10.0) - 10.0).abs() < 1e-4);
        assert_eq!(pressure_width(0.0, 10.0), 0.0);
        // Half pressure gives more than half the width.
        assert!(pressure_width(0.5, 10.0) > 5.0);
    }

    #[test]
    fn test_brush_and_eraser_composites() {
        let brush = StampingDrawTool::brush(StampSettings::default());
        let eraser = StampingDrawTool::eraser(StampSettings::default());
        assert_eq!(brush.composite(), CompositeMode::SourceOver);
        assert_eq!(eraser.composite(), CompositeMode::DestinationOut);
        assert_eq!(brush.descriptor().id, "brush-tool");
        assert_eq!(eraser.descriptor().shortcut, "e");
    }
}
