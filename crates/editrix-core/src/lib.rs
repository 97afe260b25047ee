#![warn(missing_docs)]
//! Editrix Core - Headless Rich-Text Editing Engine
//!
//! # Overview
//!
//! `editrix-core` maintains a structured document (container → block → text run) behind an
//! editable surface, turns key and pointer input into document mutations, and keeps a logical
//! caret consistent with those mutations.
//!
//! It does not paint anything itself. The surface is reached through two traits: a
//! [`Renderer`] that receives tree changes and a [`Surface`] that answers navigation, selection
//! and hit-testing queries. [`HeadlessSurface`] implements both in memory.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Engine (attach / handle_event)             │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Key Bindings  →  Command Registry          │  ← Dispatch
//! ├─────────────────────────────────────────────┤
//! │  EditorCore (insert / enter / backspace /   │  ← Editing Operations
//! │  bold) + logical Cursor                     │
//! ├─────────────────────────────────────────────┤
//! │  Caret Manager  ⇄  Surface  ⇐  Renderer     │  ← Surface Adapters
//! ├─────────────────────────────────────────────┤
//! │  Document: Container → Block → TextRun      │  ← Node Model
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use editrix_core::{EditorOptions, InputEvent, KeyEvent, headless_engine};
//!
//! let mut engine = headless_engine(&EditorOptions::default()).unwrap();
//! let subscription = engine.attach().unwrap();
//!
//! for c in "Hi".chars() {
//!     engine.handle_event(&InputEvent::Key(KeyEvent::char(c)));
//! }
//! engine.handle_event(&InputEvent::Key(KeyEvent::new("ArrowLeft")));
//! engine.handle_event(&InputEvent::Key(KeyEvent::new("Enter")));
//!
//! assert_eq!(engine.document().texts(), vec!["H", "i"]);
//! assert_eq!(engine.cursor().offset, 0);
//!
//! engine.handle_event(&InputEvent::Key(KeyEvent::new("Backspace")));
//! assert_eq!(engine.document().texts(), vec!["Hi"]);
//! assert_eq!(engine.cursor().offset, 1);
//!
//! assert!(engine.detach(subscription));
//! ```
//!
//! # Module Description
//!
//! - [`run`] - Text runs and the empty marker
//! - [`block`] - Block nodes (paragraphs and headings)
//! - [`container`] - The root container node
//! - [`document`] - Document arena
//! - [`keymap`] - Key chords and the key-binding registry
//! - [`commands`] - Command registry
//! - [`caret`] - Caret manager and the surface query interface
//! - [`render`] - Renderer contract
//! - [`headless`] - In-memory surface
//! - [`editor`] - Editing operations
//! - [`engine`] - Input dispatch
//! - [`options`] - Engine configuration
//!
//! # Offsets
//!
//! Cursor offsets count characters of the raw run text, so a logically empty run still
//! occupies one position (its zero-width empty marker). An offset on the boundary between two
//! runs belongs to the earlier run.

pub mod block;
pub mod caret;
pub mod commands;
pub mod container;
pub mod document;
pub mod editor;
pub mod engine;
pub mod headless;
pub mod id;
pub mod keymap;
pub mod options;
pub mod render;
pub mod run;

pub use block::{BlockNode, BlockTag, NodeError, RunLocation};
pub use caret::{
    CaretDirection, CaretManager, CaretPosition, CaretRect, Surface, SurfaceCaretManager,
    TextPosition,
};
pub use commands::{CommandHandler, CommandRegistry};
pub use container::{ContainerNode, ROOT_CONTAINER_TAG};
pub use document::Document;
pub use editor::{Cursor, EditorCore};
pub use engine::{Engine, EngineError, EventOutcome, InputEvent, Subscription};
pub use headless::{
    HeadlessEngine, HeadlessSurface, LINE_HEIGHT, SurfaceLine, SurfaceNode, SurfaceSpan,
    headless_engine,
};
pub use id::NodeId;
pub use keymap::{
    EditorCommand, KeyBindingOverrides, KeyBindingRegistry, KeyCombo, KeyComboError, KeyEvent,
    OverridableCommand,
};
pub use options::{EditorOptions, Overrides};
pub use render::{
    Attributes, BOLD_TAG, CONTENT_EDITABLE_ATTRIBUTE, Locator, NODE_ID_ATTRIBUTE, RenderError,
    Renderer,
};
pub use run::{EMPTY_MARKER, TextRun};
