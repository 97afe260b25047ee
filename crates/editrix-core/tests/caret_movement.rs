//! Caret movement against the headless surface.

use editrix_core::{
    Cursor, EditorOptions, EventOutcome, HeadlessEngine, InputEvent, KeyEvent, NodeId,
    headless_engine,
};
use pretty_assertions::assert_eq;

fn attached_with(text: &str) -> (HeadlessEngine, Vec<NodeId>) {
    let mut engine = headless_engine(&EditorOptions::default()).unwrap();
    let _subscription = engine.attach().unwrap();
    engine.editor_mut().insert_text(text);
    let ids = engine.document().root().children().to_vec();
    (engine, ids)
}

fn arrow(engine: &mut HeadlessEngine, key: &str) -> Cursor {
    assert_eq!(
        engine.handle_event(&InputEvent::Key(KeyEvent::new(key))),
        EventOutcome::Consumed
    );
    engine.cursor()
}

#[test]
fn test_left_at_document_start_stays() {
    let (mut engine, ids) = attached_with("ab");
    engine.editor_mut().set_cursor(ids[0], 0);
    assert_eq!(arrow(&mut engine, "ArrowLeft"), Cursor::new(ids[0], 0));
}

#[test]
fn test_right_at_document_end_stays() {
    let (mut engine, ids) = attached_with("ab\ncd");
    assert_eq!(engine.cursor(), Cursor::new(ids[1], 2));
    assert_eq!(arrow(&mut engine, "ArrowRight"), Cursor::new(ids[1], 2));
}

#[test]
fn test_horizontal_moves_within_block() {
    let (mut engine, ids) = attached_with("abc");
    assert_eq!(arrow(&mut engine, "ArrowLeft"), Cursor::new(ids[0], 2));
    assert_eq!(arrow(&mut engine, "ArrowLeft"), Cursor::new(ids[0], 1));
    assert_eq!(arrow(&mut engine, "ArrowRight"), Cursor::new(ids[0], 2));

    engine.handle_event(&InputEvent::Key(KeyEvent::char('X')));
    assert_eq!(engine.document().texts(), vec!["abXc"]);
}

#[test]
fn test_horizontal_moves_cross_blocks() {
    let (mut engine, ids) = attached_with("abc\nde");
    engine.editor_mut().set_cursor(ids[1], 0);
    assert_eq!(arrow(&mut engine, "ArrowLeft"), Cursor::new(ids[0], 3));
    assert_eq!(arrow(&mut engine, "ArrowRight"), Cursor::new(ids[1], 0));
    assert_eq!(arrow(&mut engine, "ArrowRight"), Cursor::new(ids[1], 1));
}

#[test]
fn test_moving_through_bold_wrapper() {
    let (mut engine, ids) = attached_with("ab");
    engine.handle_event(&InputEvent::Key(KeyEvent::new("b").with_ctrl()));
    engine.editor_mut().insert_text("cd");
    assert_eq!(engine.cursor(), Cursor::new(ids[0], 4));

    let offsets: Vec<usize> = (0..4)
        .map(|_| arrow(&mut engine, "ArrowLeft").offset)
        .collect();
    // Stepping out of the bold leaf lands on the end of the plain leaf: same logical offset.
    assert_eq!(offsets, vec![3, 2, 2, 1]);

    let offsets: Vec<usize> = (0..4)
        .map(|_| arrow(&mut engine, "ArrowRight").offset)
        .collect();
    assert_eq!(offsets, vec![2, 2, 3, 4]);
}

#[test]
fn test_vertical_moves_keep_column() {
    let (mut engine, ids) = attached_with("hello\nhi");
    assert_eq!(arrow(&mut engine, "ArrowUp"), Cursor::new(ids[0], 2));

    engine.editor_mut().set_cursor(ids[0], 4);
    assert_eq!(arrow(&mut engine, "ArrowDown"), Cursor::new(ids[1], 2));
}

#[test]
fn test_vertical_moves_off_the_surface_keep_cursor() {
    let (mut engine, ids) = attached_with("one\ntwo");
    assert_eq!(arrow(&mut engine, "ArrowDown"), Cursor::new(ids[1], 3));
    engine.editor_mut().set_cursor(ids[0], 1);
    assert_eq!(arrow(&mut engine, "ArrowUp"), Cursor::new(ids[0], 1));
}

#[test]
fn test_pointer_places_cursor() {
    let (mut engine, ids) = attached_with("abc\n中文");
    assert_eq!(
        engine.handle_event(&InputEvent::Pointer { x: 1.0, y: 0.5 }),
        EventOutcome::Consumed
    );
    assert_eq!(engine.cursor(), Cursor::new(ids[0], 1));

    engine.handle_event(&InputEvent::Pointer { x: 2.2, y: 1.1 });
    assert_eq!(engine.cursor(), Cursor::new(ids[1], 1));

    assert_eq!(
        engine.handle_event(&InputEvent::Pointer { x: 0.0, y: 9.0 }),
        EventOutcome::Ignored
    );
    assert_eq!(engine.cursor(), Cursor::new(ids[1], 1));

    engine.handle_event(&InputEvent::Key(KeyEvent::char('x')));
    assert_eq!(engine.document().texts(), vec!["abc", "中x文"]);
}

#[test]
fn test_caret_column_follows_moves() {
    let (mut engine, _) = attached_with("abc");
    arrow(&mut engine, "ArrowLeft");
    assert_eq!(engine.editor().renderer().lines()[0].caret, Some(2));
}

#[test]
fn test_horizontal_moves_enter_whitespace_only_block() {
    let (mut engine, ids) = attached_with("ab\n  \ncd");
    assert_eq!(engine.document().texts(), vec!["ab", "  ", "cd"]);
    engine.editor_mut().set_cursor(ids[0], 2);

    assert_eq!(arrow(&mut engine, "ArrowRight"), Cursor::new(ids[1], 0));
    assert_eq!(arrow(&mut engine, "ArrowRight"), Cursor::new(ids[1], 1));
    assert_eq!(arrow(&mut engine, "ArrowRight"), Cursor::new(ids[1], 2));
    assert_eq!(arrow(&mut engine, "ArrowRight"), Cursor::new(ids[2], 0));

    assert_eq!(arrow(&mut engine, "ArrowLeft"), Cursor::new(ids[1], 2));
    engine.handle_event(&InputEvent::Key(KeyEvent::char('x')));
    assert_eq!(engine.document().texts(), vec!["ab", "  x", "cd"]);
}
