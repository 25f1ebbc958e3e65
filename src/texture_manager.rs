use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};

use crate::canvas::CanvasSurface;
use crate::raster::Layer;

fn color_image(layer: &Layer) -> ColorImage {
    let size = [layer.width() as usize, layer.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, layer.image().as_raw())
}

fn upload(ctx: &Context, slot: &mut Option<TextureHandle>, name: &str, layer: &Layer) -> TextureId {
    let image = color_image(layer);
    match slot {
        Some(handle) => {
            handle.set(image, TextureOptions::NEAREST);
            handle.id()
        }
        None => slot.insert(ctx.load_texture(name, image, TextureOptions::NEAREST)).id(),
    }
}

/// GPU copies of the main and preview layers, re-uploaded only when the
/// surface revision changes.
#[derive(Default)]
pub struct TextureManager {
    main: Option<TextureHandle>,
    preview: Option<TextureHandle>,
    revision: Option<u64>,
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the (main, preview) texture ids for the current frame.
    pub fn update(&mut self, ctx: &Context, surface: &CanvasSurface) -> (TextureId, TextureId) {
        let stale = self.revision != Some(surface.revision());
        if stale || self.main.is_none() || self.preview.is_none() {
            upload(ctx, &mut self.main, "canvas-main", surface.main());
            upload(ctx, &mut self.preview, "canvas-preview", surface.preview());
            self.revision = Some(surface.revision());
        }
        match (&self.main, &self.preview) {
            (Some(main), Some(preview)) => (main.id(), preview.id()),
            _ => (TextureId::default(), TextureId::default()),
        }
    }
}
