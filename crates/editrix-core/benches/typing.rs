use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use editrix_core::{EditorOptions, HeadlessEngine, InputEvent, KeyEvent, headless_engine};

fn paragraphs(count: usize) -> String {
    let mut out = String::with_capacity(count * 48);
    for i in 0..count {
        out.push_str(&format!("{i:05} the quick brown fox jumps over the lazy dog\n"));
    }
    out.pop();
    out
}

fn engine_with(text: &str) -> HeadlessEngine {
    let mut engine = headless_engine(&EditorOptions::default()).unwrap();
    let _subscription = engine.attach().unwrap();
    engine.editor_mut().insert_text(text);
    engine
}

fn key(engine: &mut HeadlessEngine, event: KeyEvent) {
    black_box(engine.handle_event(&InputEvent::Key(event)));
}

fn bench_typing_into_block(c: &mut Criterion) {
    c.bench_function("typing/200_chars", |b| {
        b.iter_batched(
            || engine_with(""),
            |mut engine| {
                for i in 0..200 {
                    key(&mut engine, KeyEvent::char(if i % 7 == 0 { ' ' } else { 'x' }));
                }
                black_box(engine.cursor());
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_bold_toggling(c: &mut Criterion) {
    c.bench_function("typing/bold_every_word", |b| {
        b.iter_batched(
            || engine_with(""),
            |mut engine| {
                for word in 0..40 {
                    if word % 2 == 0 {
                        key(&mut engine, KeyEvent::new("b").with_ctrl());
                    }
                    for c in "word ".chars() {
                        key(&mut engine, KeyEvent::char(c));
                    }
                }
                black_box(engine.editor().current_block().map(|b| b.runs().len()));
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_split_and_merge(c: &mut Criterion) {
    let text = paragraphs(200);
    c.bench_function("blocks/enter_backspace_200_blocks", |b| {
        b.iter_batched(
            || {
                let mut engine = engine_with(&text);
                let middle = engine.document().root().children()[100];
                engine.editor_mut().set_cursor(middle, 10);
                engine
            },
            |mut engine| {
                for _ in 0..50 {
                    key(&mut engine, KeyEvent::new("Enter"));
                    key(&mut engine, KeyEvent::new("Backspace"));
                }
                black_box(engine.document().len());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_caret_walk(c: &mut Criterion) {
    let text = paragraphs(50);
    let mut engine = engine_with(&text);
    c.bench_function("caret/arrow_walk_50_blocks", |b| {
        b.iter(|| {
            for _ in 0..100 {
                key(&mut engine, KeyEvent::new("ArrowUp"));
            }
            for _ in 0..100 {
                key(&mut engine, KeyEvent::new("ArrowDown"));
            }
            for _ in 0..20 {
                key(&mut engine, KeyEvent::new("ArrowLeft"));
            }
            for _ in 0..20 {
                key(&mut engine, KeyEvent::new("ArrowRight"));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_typing_into_block,
    bench_bold_toggling,
    bench_split_and_merge,
    bench_caret_walk
);
criterion_main!(benches);
