//! Headless session example
//!
//! Drives the engine with key events and prints the rendered surface after each step.

use editrix_core::{
    BlockTag, EditorCommand, EditorOptions, HeadlessEngine, InputEvent, KeyCombo, KeyEvent,
    headless_engine,
};

fn main() {
    let options = EditorOptions::from_json(
        r#"{ "initial_block": "h1", "overrides": { "key_bindings": { "bold": "Ctrl+Shift+b" } } }"#,
    )
    .expect("valid options");
    let mut engine = headless_engine(&options).expect("mount");
    let subscription = engine.attach().expect("attach");

    let paragraph = EditorCommand::Custom("paragraph".to_string());
    engine.register_command(paragraph.clone(), |editor, _| {
        editor.set_block_tag(BlockTag::Paragraph);
    });
    engine
        .key_bindings_mut()
        .bind(KeyCombo::new("0").ctrl(), paragraph);

    println!("1. Title:");
    type_text(&mut engine, "Editrix");
    print_surface(&engine);

    println!("\n2. New block, retagged as a paragraph:");
    press(&mut engine, KeyEvent::new("Enter"));
    press(&mut engine, KeyEvent::char('0').with_ctrl());
    type_text(&mut engine, "plain ");
    print_surface(&engine);

    println!("\n3. Bold through the overridden chord:");
    press(&mut engine, KeyEvent::new("B").with_ctrl().with_shift());
    type_text(&mut engine, "strong");
    print_surface(&engine);

    println!("\n4. Caret movement:");
    for _ in 0..3 {
        press(&mut engine, KeyEvent::new("ArrowLeft"));
    }
    press(&mut engine, KeyEvent::new("ArrowUp"));
    print_surface(&engine);

    println!("\n5. Click at the start of the second row, then Backspace:");
    engine.handle_event(&InputEvent::Pointer { x: 0.0, y: 1.5 });
    press(&mut engine, KeyEvent::new("Backspace"));
    print_surface(&engine);

    engine.detach(subscription);
}

fn press(engine: &mut HeadlessEngine, event: KeyEvent) {
    let outcome = engine.handle_event(&InputEvent::Key(event.clone()));
    println!("  {:<16} -> {:?}", KeyCombo::from_event(&event).to_string(), outcome);
}

fn type_text(engine: &mut HeadlessEngine, text: &str) {
    for c in text.chars() {
        engine.handle_event(&InputEvent::Key(KeyEvent::char(c)));
    }
}

fn print_surface(engine: &HeadlessEngine) {
    for line in engine.editor().renderer().lines() {
        let rendered: String = line
            .spans
            .iter()
            .map(|span| {
                if span.bold {
                    format!("**{}**", span.text)
                } else {
                    span.text.clone()
                }
            })
            .collect();
        let caret = line
            .caret
            .map(|column| format!("  (caret at {})", column))
            .unwrap_or_default();
        println!("  <{}> {}{}", line.tag, rendered, caret);
    }
    let cursor = engine.cursor();
    println!("  cursor offset: {}", cursor.offset);
}
