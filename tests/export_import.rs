use std::io::Cursor;

use eframe_canvas::event::EventLog;
use eframe_canvas::{CanvasError, Editor, EditorConfig, EditorEvent, PointerEvent};
use image::{ImageFormat, Rgba, RgbaImage};

fn editor() -> Editor {
    let config = EditorConfig {
        canvas_width: 96,
        canvas_height: 64,
        ..EditorConfig::default()
    };
    Editor::new(config).unwrap()
}

/// Erases a horizontal band through the middle of the canvas.
fn erase_band(editor: &mut Editor) {
    editor.set_active_tool("eraser-tool");
    editor.pointer_down(&PointerEvent::new(8.0, 32.0));
    for x in (16..=88).step_by(8) {
        editor.pointer_move(&PointerEvent::new(x as f32, 32.0));
    }
    editor.pointer_up(&PointerEvent::new(88.0, 32.0));
}

fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn test_jpeg_is_always_opaque() {
    let mut editor = editor();
    erase_band(&mut editor);
    assert_eq!(editor.surface().pixel(48, 32).map(|p| p[3]), Some(0));

    for transparent in [false, true] {
        let exported = editor.export("jpeg", transparent).unwrap();
        assert_eq!(exported.file_name, "image.jpg");
        let decoded = image::load_from_memory(&exported.bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (96, 64));
        assert!(decoded.pixels().all(|p| p[3] == 255));
        // Erased pixels come out white, give or take compression.
        let erased = decoded.get_pixel(48, 32);
        assert!(erased.0[..3].iter().all(|&c| c > 200), "{:?}", erased);
    }
}

#[test]
fn test_png_transparency() {
    let mut editor = editor();
    erase_band(&mut editor);

    let exported = editor.export("png", true).unwrap();
    assert_eq!(exported.file_name, "image.png");
    let decoded = image::load_from_memory(&exported.bytes).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(48, 32)[3], 0);

    let exported = editor.export("png", false).unwrap();
    let decoded = image::load_from_memory(&exported.bytes).unwrap().to_rgba8();
    assert_eq!(*decoded.get_pixel(48, 32), Rgba([255, 255, 255, 255]));
}

#[test]
fn test_unsupported_format() {
    let editor = editor();
    let log = EventLog::new();
    editor.subscribe(Box::new(log.clone()));
    let result = editor.export("gif", false);
    assert!(matches!(result, Err(CanvasError::UnsupportedFormat(ref name)) if name == "gif"));
    assert!(log.is_empty());

    editor.export("png", false).unwrap();
    assert_eq!(
        log.drain(),
        vec![EditorEvent::Exported {
            file_name: "image.png".to_owned()
        }]
    );
}

#[test]
fn test_import_resizes_and_records() {
    let mut editor = editor();
    let color = Rgba([12, 34, 56, 255]);
    let image = RgbaImage::from_pixel(30, 20, color);
    editor.import_image(&png_bytes(&image)).unwrap();

    let surface = editor.surface();
    assert_eq!((surface.width(), surface.height()), (30, 20));
    assert_eq!(surface.preview().image().dimensions(), (30, 20));
    assert_eq!(surface.pixel(29, 19), Some(color));
    assert_eq!(editor.history().len(), 2);
    assert_eq!(editor.history().cursor(), 1);

    // Undo draws the blank snapshot back into the current buffer.
    editor.undo().unwrap();
    assert_eq!(editor.surface().pixel(0, 0), Some(Rgba([255, 255, 255, 255])));
    assert_eq!(editor.surface().width(), 30);
}

#[test]
fn test_import_rejects_garbage() {
    let mut editor = editor();
    let result = editor.import_image(b"definitely not an image");
    assert!(matches!(result, Err(CanvasError::Image(_))));
    assert_eq!(editor.history().len(), 1);
    assert_eq!(editor.surface().width(), 96);
}

#[test]
fn test_current_config_tracks_edits() {
    let mut editor = editor();
    editor.set_brush_size(24.0);
    assert!(editor.set_brush_shape("square"));
    assert!(!editor.set_brush_shape("hexagon"));
    assert!(editor.set_shape_kind("triangle"));
    editor.set_active_tool("fill-tool");

    let config = editor.current_config();
    assert_eq!(config.brush.size, 24.0);
    assert_eq!(config.brush.shape.name(), "square");
    assert_eq!(config.shape.kind.name(), "triangle");
    assert_eq!(config.initial_tool, "fill-tool");

    let restored = Editor::new(EditorConfig::from_json(&config.to_json().unwrap()).unwrap()).unwrap();
    assert_eq!(restored.active_tool_id(), Some("fill-tool"));
    assert_eq!(restored.current_config(), config);
}
