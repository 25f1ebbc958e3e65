use eframe_canvas::event::EventLog;
use eframe_canvas::{
    CanvasError, ColorProperty, Editor, EditorConfig, EditorEvent, Hsl, KeyEvent, PointerEvent,
};
use image::Rgba;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn small_editor() -> Editor {
    let config = EditorConfig {
        canvas_width: 64,
        canvas_height: 48,
        ..EditorConfig::default()
    };
    Editor::new(config).unwrap()
}

/// Floods the canvas with a gray of the given lightness using the fill tool.
fn fill_with(editor: &mut Editor, lightness: f32) {
    editor.set_color(ColorProperty::Fill, Hsl::new(0.0, 0.0, lightness));
    editor.set_active_tool("fill-tool");
    let click = PointerEvent::new(5.0, 5.0);
    editor.pointer_down(&click);
    editor.pointer_up(&click);
}

#[test]
fn test_push_count_matches_cursor() {
    let mut editor = small_editor();
    for n in 1..=5 {
        fill_with(&mut editor, 10.0 * n as f32);
        assert_eq!(editor.history().len(), n + 1);
        assert_eq!(editor.history().cursor(), n);
    }
}

#[test]
fn test_undo_redo_round_trip() {
    let mut editor = small_editor();
    fill_with(&mut editor, 20.0);
    fill_with(&mut editor, 40.0);
    fill_with(&mut editor, 60.0);
    editor.undo().unwrap();
    let before = editor.surface().main().image().clone();

    editor.undo().unwrap();
    assert_ne!(editor.surface().main().image(), &before);
    editor.redo().unwrap();
    assert_eq!(editor.surface().main().image(), &before);
    assert_eq!(editor.history().cursor(), 2);
}

#[test]
fn test_push_after_undo_discards_redo_branch() {
    let mut editor = small_editor();
    fill_with(&mut editor, 20.0);
    fill_with(&mut editor, 40.0);
    let a = editor.history().snapshots()[0].id();
    let b = editor.history().snapshots()[1].id();
    let c = editor.history().snapshots()[2].id();

    editor.undo().unwrap();
    assert_eq!(editor.history().cursor(), 1);
    fill_with(&mut editor, 80.0);

    let ids: Vec<_> = editor.history().snapshots().iter().map(|s| s.id()).collect();
    assert_eq!(ids.len(), 3);
    assert_eq!(&ids[..2], &[a, b]);
    assert_ne!(ids[2], c);
    assert_eq!(editor.history().cursor(), 2);
    assert!(editor.redo().is_err());
}

#[test]
fn test_fill_then_undo_restores_blank() {
    let mut editor = small_editor();
    fill_with(&mut editor, 50.0);
    let gray = Rgba([128, 128, 128, 255]);
    assert!(editor.surface().main().image().pixels().all(|p| *p == gray));

    editor.undo().unwrap();
    assert!(editor.surface().main().image().pixels().all(|p| *p == WHITE));
}

#[test]
fn test_boundaries_are_reported_and_harmless() {
    let mut editor = small_editor();
    assert!(matches!(editor.undo(), Err(CanvasError::NothingToUndo)));
    assert!(matches!(editor.redo(), Err(CanvasError::NothingToRedo)));
    assert_eq!(editor.history().len(), 1);
    assert_eq!(editor.history().cursor(), 0);
}

#[test]
fn test_threaded_decode_applies_on_wait() {
    let config = EditorConfig {
        canvas_width: 32,
        canvas_height: 32,
        threaded_decode: true,
        ..EditorConfig::default()
    };
    let mut editor = Editor::new(config).unwrap();
    fill_with(&mut editor, 0.0);
    editor.undo().unwrap();
    editor.wait_for_history().unwrap();
    assert_eq!(editor.surface().pixel(16, 16), Some(WHITE));
    assert!(!editor.history().is_reloading());
}

#[test]
fn test_history_shortcuts() {
    let mut editor = small_editor();
    fill_with(&mut editor, 0.0);

    assert!(editor.key_down(&KeyEvent::new("z").ctrl()));
    assert_eq!(editor.history().cursor(), 0);
    assert!(editor.key_down(&KeyEvent::new("y").ctrl()));
    assert_eq!(editor.history().cursor(), 1);
    editor.undo().unwrap();
    assert!(editor.key_down(&KeyEvent::new("z").ctrl().shift()));
    assert_eq!(editor.history().cursor(), 1);
    // At the end of history there is nothing to redo.
    assert!(!editor.key_down(&KeyEvent::new("y").ctrl()));
}

#[test]
fn test_reset_is_undoable() {
    let mut editor = small_editor();
    fill_with(&mut editor, 0.0);
    editor.reset().unwrap();
    assert_eq!(editor.surface().pixel(1, 1), Some(WHITE));
    assert_eq!(editor.history().len(), 3);
    editor.undo().unwrap();
    assert_eq!(editor.surface().pixel(1, 1), Some(Rgba([0, 0, 0, 255])));
}

#[test]
fn test_history_events() {
    let mut editor = small_editor();
    let log = EventLog::new();
    editor.subscribe(Box::new(log.clone()));
    fill_with(&mut editor, 30.0);
    editor.undo().unwrap();
    let history: Vec<_> = log
        .drain()
        .into_iter()
        .filter(|e| matches!(e, EditorEvent::HistoryChanged { .. }))
        .collect();
    assert_eq!(
        history,
        vec![
            EditorEvent::HistoryChanged { cursor: 1, len: 2 },
            EditorEvent::HistoryChanged { cursor: 0, len: 2 },
        ]
    );
}
