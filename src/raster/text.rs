use egui::epaint::text::Fonts;
use egui::{Color32, FontDefinitions, FontId, Pos2};
use serde::{Deserialize, Serialize};

use super::Layer;

/// Side of the glyph atlas; more than enough for one text overlay.
const ATLAS_SIDE: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Proportional,
    Monospace,
}

/// Font used by the text tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    /// Font size in px
    pub size: f32,
    /// Line height as a multiple of the font size
    pub line_height: f32,
    pub family: FontFamily,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            size: 24.0,
            line_height: 1.2,
            family: FontFamily::Proportional,
        }
    }
}

impl FontSpec {
    pub fn line_height_px(&self) -> f32 {
        self.size * self.line_height
    }

    /// CSS-style font shorthand, e.g. `24px/1.2 sans-serif`.
    pub fn shorthand(&self) -> String {
        let family = match self.family {
            FontFamily::Proportional => "sans-serif",
            FontFamily::Monospace => "monospace",
        };
        format!("{}px/{} {}", self.size, self.line_height, family)
    }

    fn font_id(&self) -> FontId {
        match self.family {
            FontFamily::Proportional => FontId::proportional(self.size),
            FontFamily::Monospace => FontId::monospace(self.size),
        }
    }
}

/// Rasterizes text into a layer using egui's built-in fonts.
pub struct TextRasterizer {
    fonts: Fonts,
}

impl std::fmt::Debug for TextRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRasterizer").finish_non_exhaustive()
    }
}

impl Default for TextRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRasterizer {
    pub fn new() -> Self {
        Self {
            fonts: Fonts::new(1.0, ATLAS_SIDE, FontDefinitions::default()),
        }
    }

    /// Draws one line of text with its top-left corner at `origin`, using the
    /// layer's fill color and composite mode. Returns true if any glyph was drawn.
    pub fn draw_line(&self, layer: &mut Layer, text: &str, origin: Pos2, font: &FontSpec) -> bool {
        if text.is_empty() {
            return false;
        }
        let galley = self
            .fonts
            .layout_no_wrap(text.to_owned(), font.font_id(), Color32::WHITE);
        // The atlas only holds glyphs once they have been laid out.
        let atlas = self.fonts.image();
        let atlas_width = atlas.size[0];
        let mut drawn = false;
        for row in &galley.rows {
            for glyph in &row.glyphs {
                let uv = glyph.uv_rect;
                if uv.is_nothing() {
                    continue;
                }
                let left_top = origin + glyph.pos.to_vec2() + uv.offset;
                let (x0, y0) = (left_top.x.round() as i64, left_top.y.round() as i64);
                let (u0, v0) = (uv.min[0] as usize, uv.min[1] as usize);
                let w = uv.max[0].saturating_sub(uv.min[0]) as usize;
                let h = uv.max[1].saturating_sub(uv.min[1]) as usize;
                for ty in 0..h {
                    for tx in 0..w {
                        let coverage = atlas.pixels[(v0 + ty) * atlas_width + u0 + tx];
                        if coverage > 0.0 {
                            layer.blend_coverage(x0 + tx as i64, y0 + ty as i64, coverage);
                            drawn = true;
                        }
                    }
                }
            }
        }
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_shorthand() {
        let font = FontSpec::default();
        assert_eq!(font.shorthand(), "24px/1.2 sans-serif");
        assert!((font.line_height_px() - 28.8).abs() < 1e-4);
    }

    #[test]
    fn test_draw_line_paints_fill_color() {
        let rasterizer = TextRasterizer::new();
        let mut layer = Layer::new(120, 40);
        layer.set_fill_color(Rgba([255, 0, 0, 255]));
        assert!(rasterizer.draw_line(&mut layer, "Hi", Pos2::new(4.0, 4.0), &FontSpec::default()));
        assert!(layer.image().pixels().any(|p| p[0] == 255 && p[3] > 0));
        assert!(!rasterizer.draw_line(&mut layer, "", Pos2::ZERO, &FontSpec::default()));
    }
}
