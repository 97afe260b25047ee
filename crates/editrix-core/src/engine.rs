//! Input dispatch.
//!
//! The [`Engine`] routes host input to editing operations: a key event is first looked up in
//! the [`KeyBindingRegistry`]; a bound command runs its handler from the [`CommandRegistry`]
//! and the event is consumed. Unbound single characters are typed. Everything else is ignored
//! and left to the host.
//!
//! Input is only processed while the engine is attached (see [`Engine::attach`]).

use crate::caret::{CaretDirection, CaretManager};
use crate::commands::CommandRegistry;
use crate::document::Document;
use crate::editor::{Cursor, EditorCore};
use crate::keymap::{EditorCommand, KeyBindingRegistry, KeyEvent};
use crate::options::EditorOptions;
use crate::render::{RenderError, Renderer};

/// Host input.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key press.
    Key(KeyEvent),
    /// A pointer click at surface coordinates.
    Pointer {
        /// Horizontal coordinate.
        x: f32,
        /// Vertical coordinate.
        y: f32,
    },
}

/// What happened to an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The engine handled the event; the host must not apply its default behavior.
    Consumed,
    /// The engine did not use the event.
    Ignored,
}

impl EventOutcome {
    /// Whether the event was consumed.
    pub fn is_consumed(self) -> bool {
        matches!(self, EventOutcome::Consumed)
    }
}

/// Engine errors.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The initial render failed.
    #[error("failed to mount document: {0}")]
    Mount(#[from] RenderError),
    /// [`Engine::attach`] was called while already attached.
    #[error("engine is already attached")]
    AlreadyAttached,
}

/// Token returned by [`Engine::attach`]; hand it back to [`Engine::detach`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping the subscription leaves the engine attached with no way to detach"]
pub struct Subscription {
    id: u64,
}

impl Subscription {
    /// Subscription id.
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Editing engine: editor state plus the command and key-binding registries.
#[derive(Debug)]
pub struct Engine<R, C> {
    editor: EditorCore<R, C>,
    commands: CommandRegistry<EditorCore<R, C>>,
    key_bindings: KeyBindingRegistry,
    subscription: Option<u64>,
    next_subscription: u64,
}

impl<R, C> Engine<R, C>
where
    R: Renderer + 'static,
    C: CaretManager + 'static,
{
    /// Build a document from `options`, mount it, and register the built-in commands.
    pub fn new(options: &EditorOptions, renderer: R, caret: C) -> Result<Self, EngineError> {
        let document = Document::new(options.initial_block);
        let mut editor = EditorCore::new(document, renderer, caret);
        editor.mount()?;

        let mut engine = Self {
            editor,
            commands: CommandRegistry::new(),
            key_bindings: KeyBindingRegistry::build(&options.overrides.key_bindings),
            subscription: None,
            next_subscription: 1,
        };
        engine.register_builtin_commands();
        Ok(engine)
    }

    fn register_builtin_commands(&mut self) {
        self.commands.register(
            EditorCommand::Bold,
            |editor: &mut EditorCore<R, C>, _: &KeyEvent| editor.apply_bold(),
        );
        self.commands.register(
            EditorCommand::Enter,
            |editor: &mut EditorCore<R, C>, _: &KeyEvent| editor.enter(),
        );
        self.commands.register(
            EditorCommand::Backspace,
            |editor: &mut EditorCore<R, C>, _: &KeyEvent| editor.backspace(),
        );
        self.commands.register(
            EditorCommand::MoveCursor,
            |editor: &mut EditorCore<R, C>, event: &KeyEvent| {
                if let Some(direction) = CaretDirection::from_key(&event.key) {
                    editor.move_cursor(direction);
                }
            },
        );
    }

    /// Start accepting input.
    pub fn attach(&mut self) -> Result<Subscription, EngineError> {
        if self.subscription.is_some() {
            return Err(EngineError::AlreadyAttached);
        }
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscription = Some(id);
        log::debug!("engine attached (subscription {})", id);
        Ok(Subscription { id })
    }

    /// Stop accepting input. Returns `false` for a subscription that is not the current one.
    pub fn detach(&mut self, subscription: Subscription) -> bool {
        if self.subscription != Some(subscription.id) {
            return false;
        }
        self.subscription = None;
        log::debug!("engine detached (subscription {})", subscription.id);
        true
    }

    /// Whether input is being processed.
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Process one input event.
    pub fn handle_event(&mut self, event: &InputEvent) -> EventOutcome {
        if !self.is_attached() {
            log::trace!("engine detached, ignoring {:?}", event);
            return EventOutcome::Ignored;
        }
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Pointer { x, y } => {
                if self.editor.place_at_point(*x, *y) {
                    EventOutcome::Consumed
                } else {
                    EventOutcome::Ignored
                }
            }
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) -> EventOutcome {
        if let Some(command) = self.key_bindings.command_for(event).cloned() {
            if !self.commands.run(&command, &mut self.editor, event) {
                log::debug!("no handler registered for {}", command);
            }
            return EventOutcome::Consumed;
        }
        if let Some(c) = event.typed_char() {
            self.editor.insert_char(c);
            return EventOutcome::Consumed;
        }
        log::trace!("unbound key ignored: {:?}", event);
        EventOutcome::Ignored
    }

    /// Register (or replace) the handler of `command`.
    pub fn register_command<F>(&mut self, command: EditorCommand, handler: F)
    where
        F: FnMut(&mut EditorCore<R, C>, &KeyEvent) + 'static,
    {
        self.commands.register(command, handler);
    }

    /// Command registry.
    pub fn commands_mut(&mut self) -> &mut CommandRegistry<EditorCore<R, C>> {
        &mut self.commands
    }

    /// Key-binding registry.
    pub fn key_bindings(&self) -> &KeyBindingRegistry {
        &self.key_bindings
    }

    /// Mutable key-binding registry, for binding host commands.
    pub fn key_bindings_mut(&mut self) -> &mut KeyBindingRegistry {
        &mut self.key_bindings
    }

    /// Editor state.
    pub fn editor(&self) -> &EditorCore<R, C> {
        &self.editor
    }

    /// Mutable editor state, for programmatic edits.
    pub fn editor_mut(&mut self) -> &mut EditorCore<R, C> {
        &mut self.editor
    }

    /// The document.
    pub fn document(&self) -> &Document {
        self.editor.document()
    }

    /// The logical cursor.
    pub fn cursor(&self) -> Cursor {
        self.editor.cursor()
    }
}
