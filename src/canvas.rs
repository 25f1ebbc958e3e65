use std::io::Cursor;

use egui::Pos2;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use crate::error::{CanvasError, CanvasResult};
use crate::raster::{CompositeMode, FontSpec, Layer, TextRasterizer};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Pointer cursor the active tool wants over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasCursor {
    #[default]
    Default,
    Crosshair,
    Pick,
    Text,
    ZoomIn,
}

/// Supported export encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Jpeg,
    Png,
}

impl ExportFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// An encoded image ready to be saved or downloaded.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub format: ExportFormat,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The drawing surface: a committed main layer plus a scratch preview
/// layer of the same size.
#[derive(Debug)]
pub struct CanvasSurface {
    main: Layer,
    preview: Layer,
    text: TextRasterizer,
    font: FontSpec,
    cursor: CanvasCursor,
    /// Bumped whenever pixels may have changed, so views know to re-upload.
    revision: u64,
}

impl CanvasSurface {
    /// A white canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        let mut surface = Self {
            main: Layer::new(width, height),
            preview: Layer::new(width, height),
            text: TextRasterizer::new(),
            font: FontSpec::default(),
            cursor: CanvasCursor::Default,
            revision: 0,
        };
        surface.reset();
        surface
    }

    pub fn width(&self) -> u32 {
        self.main.width()
    }

    pub fn height(&self) -> u32 {
        self.main.height()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn main(&self) -> &Layer {
        &self.main
    }

    pub fn main_mut(&mut self) -> &mut Layer {
        self.revision += 1;
        &mut self.main
    }

    pub fn preview(&self) -> &Layer {
        &self.preview
    }

    pub fn preview_mut(&mut self) -> &mut Layer {
        self.revision += 1;
        &mut self.preview
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.main.pixel(x, y)
    }

    // --- shared paint state ---

    pub fn set_fill_color(&mut self, color: Rgba<u8>) {
        self.main.set_fill_color(color);
        self.preview.set_fill_color(color);
    }

    pub fn set_stroke_color(&mut self, color: Rgba<u8>) {
        self.main.set_stroke_color(color);
        self.preview.set_stroke_color(color);
    }

    pub fn fill_color(&self) -> Rgba<u8> {
        self.main.state().fill
    }

    pub fn stroke_color(&self) -> Rgba<u8> {
        self.main.state().stroke
    }

    /// Composite mode of the main layer.
    pub fn composite(&self) -> CompositeMode {
        self.main.composite()
    }

    pub fn set_composite(&mut self, mode: CompositeMode) {
        self.main.set_composite(mode);
    }

    pub fn cursor(&self) -> CanvasCursor {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: CanvasCursor) {
        self.cursor = cursor;
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn set_font(&mut self, font: FontSpec) {
        self.font = font;
    }

    // --- whole-canvas operations ---

    /// Runs `draw` on the main layer with normal compositing, then restores the mode.
    fn with_normal_composite(&mut self, draw: impl FnOnce(&mut Layer)) {
        let mode = self.main.composite();
        self.main.set_composite(CompositeMode::SourceOver);
        draw(&mut self.main);
        self.main.set_composite(mode);
        self.revision += 1;
    }

    /// Clears both layers and paints the main layer white.
    pub fn reset(&mut self) {
        self.preview.clear();
        self.with_normal_composite(|main| {
            main.clear();
            main.save();
            main.set_fill_color(WHITE);
            main.fill_rect(0.0, 0.0, main.width() as f32, main.height() as f32);
            main.restore();
        });
        log::info!("Canvas reset");
    }

    /// Paints the whole main layer with the fill color, using the current composite mode.
    pub fn fill_all(&mut self) -> bool {
        let (w, h) = (self.width() as f32, self.height() as f32);
        self.main_mut().fill_rect(0.0, 0.0, w, h)
    }

    pub fn clear_preview(&mut self) {
        self.preview_mut().clear();
    }

    /// Composites the preview onto the main layer and clears the preview.
    pub fn commit_preview(&mut self) {
        let preview = self.preview.image().clone();
        self.with_normal_composite(|main| main.draw_image(&preview, 0, 0));
        self.preview.clear();
    }

    /// Rasterizes `lines` onto the main layer, one line per `line_height_px`
    /// starting with its top-left at `origin`.
    pub fn draw_text_lines(&mut self, lines: &[&str], origin: Pos2) -> bool {
        let font = self.font.clone();
        let step = font.line_height_px();
        // Center each glyph run inside its line box.
        let leading = (step - font.size) / 2.0;
        let mut drawn = false;
        for (i, line) in lines.iter().enumerate() {
            let at = Pos2::new(origin.x, origin.y + i as f32 * step + leading);
            drawn |= self.text.draw_line(&mut self.main, line, at, &font);
        }
        self.revision += 1;
        drawn
    }

    /// Replaces the canvas with `image`, resizing both layers to its size.
    pub fn import(&mut self, image: &RgbaImage) {
        self.main.resize(image.width(), image.height());
        self.preview.resize(image.width(), image.height());
        self.with_normal_composite(|main| main.draw_image(image, 0, 0));
        log::info!("Imported image {}x{}", image.width(), image.height());
    }

    /// Clears the main layer and draws a decoded snapshot at the origin,
    /// keeping the current composite mode.
    pub fn restore_snapshot(&mut self, image: &RgbaImage) {
        self.with_normal_composite(|main| {
            main.clear();
            main.draw_image(image, 0, 0);
        });
    }

    /// PNG-encodes the main layer for the history.
    pub fn encode_snapshot(&self) -> CanvasResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.main
            .image()
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    fn flattened_on_white(&self) -> RgbaImage {
        let mut flat = Layer::new(self.width(), self.height());
        flat.set_fill_color(WHITE);
        flat.fill_rect(0.0, 0.0, self.width() as f32, self.height() as f32);
        flat.draw_image(self.main.image(), 0, 0);
        flat.image().clone()
    }

    /// Encodes the main layer as `image.<ext>`.
    ///
    /// JPEG is always flattened onto white; PNG keeps its alpha only when
    /// `transparent` is set.
    pub fn export(&self, format: &str, transparent: bool) -> CanvasResult<ExportedImage> {
        let format = ExportFormat::from_name(format)
            .ok_or_else(|| CanvasError::UnsupportedFormat(format.to_owned()))?;
        let mut bytes = Vec::new();
        let mut out = Cursor::new(&mut bytes);
        match format {
            ExportFormat::Jpeg => {
                let rgb = DynamicImage::ImageRgba8(self.flattened_on_white()).to_rgb8();
                rgb.write_to(&mut out, ImageFormat::Jpeg)?;
            }
            ExportFormat::Png if transparent => {
                self.main.image().write_to(&mut out, ImageFormat::Png)?;
            }
            ExportFormat::Png => {
                self.flattened_on_white().write_to(&mut out, ImageFormat::Png)?;
            }
        }
        let file_name = format!("image.{}", format.extension());
        log::info!("Exported {} ({} bytes)", file_name, bytes.len());
        Ok(ExportedImage {
            format,
            file_name,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_surface_is_white() {
        let surface = CanvasSurface::new(8, 6);
        assert!(surface.main().image().pixels().all(|p| *p == WHITE));
        assert!(surface.preview().image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_commit_preview_clears_scratch() {
        let mut surface = CanvasSurface::new(10, 10);
        surface.set_fill_color(Rgba([0, 0, 255, 255]));
        surface.preview_mut().fill_rect(0.0, 0.0, 5.0, 5.0);
        surface.commit_preview();
        assert_eq!(surface.pixel(1, 1), Some(Rgba([0, 0, 255, 255])));
        assert_eq!(surface.pixel(8, 8), Some(WHITE));
        assert!(surface.preview().image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_restore_snapshot_keeps_composite_mode() {
        let mut surface = CanvasSurface::new(4, 4);
        surface.set_composite(CompositeMode::DestinationOut);
        let snapshot = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        surface.restore_snapshot(&snapshot);
        assert_eq!(surface.pixel(2, 2), Some(Rgba([10, 20, 30, 255])));
        assert_eq!(surface.composite(), CompositeMode::DestinationOut);
    }

    #[test]
    fn test_export_rejects_unknown_format() {
        let surface = CanvasSurface::new(4, 4);
        let err = surface.export("gif", false).unwrap_err();
        assert!(matches!(err, CanvasError::UnsupportedFormat(f) if f == "gif"));
    }

    #[test]
    fn test_export_names() {
        let surface = CanvasSurface::new(4, 4);
        assert_eq!(surface.export("jpeg", false).unwrap().file_name, "image.jpg");
        assert_eq!(surface.export("png", true).unwrap().file_name, "image.png");
    }

    #[test]
    fn test_import_resizes_both_layers() {
        let mut surface = CanvasSurface::new(4, 4);
        let img = RgbaImage::from_pixel(7, 3, Rgba([1, 2, 3, 255]));
        surface.import(&img);
        assert_eq!((surface.width(), surface.height()), (7, 3));
        assert_eq!((surface.preview().width(), surface.preview().height()), (7, 3));
        assert_eq!(surface.pixel(6, 2), Some(Rgba([1, 2, 3, 255])));
    }
}
