//! Seeded randomized checks of the editing invariants.

use editrix_core::{
    BlockNode, BlockTag, EditorOptions, HeadlessEngine, InputEvent, KeyEvent, NodeId, TextRun,
    headless_engine,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ALPHABET: &[char] = &['a', 'b', 'c', ' ', 'x', 'é', '中'];

fn random_text(rng: &mut StdRng, max: usize) -> String {
    let len = rng.gen_range(1..=max);
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
        .collect()
}

/// Offset counted over visible characters only.
fn logical_offset(block: &BlockNode, raw: usize) -> usize {
    let mut remaining = raw;
    let mut logical = 0;
    for run in block.runs() {
        if remaining == 0 {
            break;
        }
        let step = remaining.min(run.len());
        if !run.is_empty() {
            logical += step;
        }
        remaining -= step;
    }
    logical
}

/// Visible characters with their bold flag.
fn styled_chars(block: &BlockNode) -> Vec<(char, bool)> {
    block
        .runs()
        .iter()
        .filter(|run| !run.is_empty())
        .flat_map(|run| run.text().chars().map(move |c| (c, run.is_bold())))
        .collect()
}

fn attached() -> HeadlessEngine {
    let mut engine = headless_engine(&EditorOptions::default()).unwrap();
    let _subscription = engine.attach().unwrap();
    engine
}

fn press(engine: &mut HeadlessEngine, key: &str) {
    engine.handle_event(&InputEvent::Key(KeyEvent::new(key)));
}

fn current(engine: &HeadlessEngine) -> (NodeId, usize) {
    let cursor = engine.cursor();
    (cursor.block.unwrap(), cursor.offset)
}

/// Type, bold and jump around inside a single block.
fn build_block(engine: &mut HeadlessEngine, rng: &mut StdRng, steps: usize) {
    for _ in 0..steps {
        let roll = rng.gen_range(0..10);
        if roll < 6 {
            let c = ALPHABET[rng.gen_range(0..ALPHABET.len())];
            engine.handle_event(&InputEvent::Key(KeyEvent::char(c)));
        } else if roll < 8 {
            engine.handle_event(&InputEvent::Key(KeyEvent::new("b").with_ctrl()));
        } else {
            let (block, _) = current(engine);
            let len = engine.document().block(block).unwrap().raw_len();
            let offset = rng.gen_range(0..=len);
            engine.editor_mut().set_cursor(block, offset);
        }
    }
}

#[test]
fn test_split_then_merge_restores_runs() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..200 {
        let parent = NodeId::next();
        let mut block = BlockNode::new(BlockTag::Paragraph, parent);
        let count = rng.gen_range(1..=4);
        let runs: Vec<TextRun> = (0..count)
            .map(|_| TextRun::new(&random_text(&mut rng, 6)).with_bold(rng.gen_bool(0.5)))
            .collect();
        block.insert_runs_at(runs, 0);
        let before: Vec<(String, bool)> = block
            .runs()
            .iter()
            .map(|run| (run.text().to_string(), run.is_bold()))
            .collect();

        let index = rng.gen_range(0..count);
        let offset = rng.gen_range(0..=block.runs()[index].len());
        if let Some(tail) = block.split_run_at_offset(index, offset) {
            assert_eq!(tail.is_bold(), before[index].1);
            block.insert_run(tail, index + 1);
            assert_eq!(block.runs().len(), count + 1);
            assert!(block.merge_runs(index, index + 1));
        }

        let after: Vec<(String, bool)> = block
            .runs()
            .iter()
            .map(|run| (run.text().to_string(), run.is_bold()))
            .collect();
        assert_eq!(after, before, "split run {} at {}", index, offset);
    }
}

#[test]
fn test_enter_then_backspace_is_identity() {
    let mut rng = StdRng::seed_from_u64(42);
    for round in 0..40 {
        let mut engine = attached();
        build_block(&mut engine, &mut rng, 24);
        let (block_id, _) = current(&engine);
        let len = engine.document().block(block_id).unwrap().raw_len();

        for raw in 0..=len {
            engine.editor_mut().set_cursor(block_id, raw);
            let block = engine.document().block(block_id).unwrap();
            let chars = styled_chars(block);
            let logical = logical_offset(block, raw);

            press(&mut engine, "Enter");
            assert_eq!(engine.document().len(), 2);
            press(&mut engine, "Backspace");

            assert_eq!(engine.document().len(), 1, "round {} offset {}", round, raw);
            let (after_id, after_raw) = current(&engine);
            assert_eq!(after_id, block_id);
            let block = engine.document().block(block_id).unwrap();
            assert_eq!(styled_chars(block), chars, "round {} offset {}", round, raw);
            assert_eq!(
                logical_offset(block, after_raw),
                logical,
                "round {} offset {}",
                round,
                raw
            );
        }
    }
}

#[test]
fn test_surface_tracks_document_under_random_input() {
    let mut rng = StdRng::seed_from_u64(7);
    let keys = [
        "Enter",
        "Backspace",
        "ArrowLeft",
        "ArrowRight",
        "ArrowUp",
        "ArrowDown",
    ];
    let mut engine = attached();
    for step in 0..600 {
        let roll = rng.gen_range(0..10);
        if roll < 5 {
            let c = ALPHABET[rng.gen_range(0..ALPHABET.len())];
            engine.handle_event(&InputEvent::Key(KeyEvent::char(c)));
        } else if roll < 6 {
            engine.handle_event(&InputEvent::Key(KeyEvent::new("b").with_ctrl()));
        } else if roll < 9 {
            press(&mut engine, keys[rng.gen_range(0..keys.len())]);
        } else {
            let x = rng.gen_range(0.0..20.0);
            let y = rng.gen_range(0.0..6.0);
            engine.handle_event(&InputEvent::Pointer { x, y });
        }

        let surface = engine.editor().renderer();
        let rendered: Vec<String> = surface.lines().iter().map(|line| line.text()).collect();
        assert_eq!(rendered, engine.document().texts(), "step {}", step);
        assert_eq!(surface.row_count(), engine.document().len());

        let (block, offset) = current(&engine);
        let block = engine.document().block(block).unwrap();
        assert!(offset <= block.raw_len(), "step {}", step);
        assert!(!block.runs().is_empty());
    }
}
