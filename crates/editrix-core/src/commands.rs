//! Command registry.
//!
//! Maps an [`EditorCommand`] to the handler that runs it. Handlers receive the editing target
//! and the key event that triggered them, so one handler can serve several chords (the arrow
//! keys all map to [`EditorCommand::MoveCursor`]).
//!
//! # Example
//!
//! ```rust
//! use editrix_core::{CommandRegistry, EditorCommand, KeyEvent};
//!
//! let mut registry: CommandRegistry<Vec<String>> = CommandRegistry::new();
//! registry.register(EditorCommand::Enter, |log: &mut Vec<String>, event: &KeyEvent| {
//!     log.push(event.key.clone());
//! });
//!
//! let mut log = Vec::new();
//! let handler = registry.get_mut(&EditorCommand::Enter).unwrap();
//! handler(&mut log, &KeyEvent::new("Enter"));
//! assert_eq!(log, vec!["Enter".to_string()]);
//! assert!(registry.get_mut(&EditorCommand::Bold).is_none());
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::keymap::{EditorCommand, KeyEvent};

/// A command handler.
pub type CommandHandler<C> = Box<dyn FnMut(&mut C, &KeyEvent)>;

/// Exact-match map from command identifiers to handlers.
pub struct CommandRegistry<C> {
    handlers: HashMap<EditorCommand, CommandHandler<C>>,
}

impl<C> CommandRegistry<C> {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register `handler` for `command`, replacing any previous handler.
    pub fn register<F>(&mut self, command: EditorCommand, handler: F)
    where
        F: FnMut(&mut C, &KeyEvent) + 'static,
    {
        if self.handlers.insert(command.clone(), Box::new(handler)).is_some() {
            log::debug!("command handler replaced: {}", command);
        }
    }

    /// Remove the handler of `command`.
    pub fn unregister(&mut self, command: &EditorCommand) -> bool {
        self.handlers.remove(command).is_some()
    }

    /// Handler registered for `command`.
    pub fn get_mut(&mut self, command: &EditorCommand) -> Option<&mut CommandHandler<C>> {
        self.handlers.get_mut(command)
    }

    /// Whether `command` has a handler.
    pub fn contains(&self, command: &EditorCommand) -> bool {
        self.handlers.contains_key(command)
    }

    /// Run the handler of `command` on `target`. Returns `false` when none is registered.
    pub fn run(&mut self, command: &EditorCommand, target: &mut C, event: &KeyEvent) -> bool {
        match self.handlers.get_mut(command) {
            Some(handler) => {
                handler(target, event);
                true
            }
            None => false,
        }
    }

    /// Registered commands, sorted.
    pub fn commands(&self) -> Vec<&EditorCommand> {
        let mut commands: Vec<&EditorCommand> = self.handlers.keys().collect();
        commands.sort();
        commands
    }

    /// Number of handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<C> Default for CommandRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for CommandRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.commands())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_overwrites() {
        let mut registry: CommandRegistry<Vec<&'static str>> = CommandRegistry::new();
        registry.register(EditorCommand::Bold, |out: &mut Vec<&'static str>, _: &KeyEvent| {
            out.push("first")
        });
        registry.register(EditorCommand::Bold, |out: &mut Vec<&'static str>, _: &KeyEvent| {
            out.push("second")
        });
        assert_eq!(registry.len(), 1);

        let mut out = Vec::new();
        assert!(registry.run(&EditorCommand::Bold, &mut out, &KeyEvent::new("b")));
        assert_eq!(out, vec!["second"]);
    }

    #[test]
    fn test_unknown_command() {
        let mut registry: CommandRegistry<u32> = CommandRegistry::default();
        let mut target = 0;
        assert!(registry.get_mut(&EditorCommand::Custom("nope".into())).is_none());
        assert!(!registry.run(&EditorCommand::Enter, &mut target, &KeyEvent::new("Enter")));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_handlers_see_the_event() {
        let mut registry: CommandRegistry<Vec<String>> = CommandRegistry::new();
        registry.register(EditorCommand::MoveCursor, |out: &mut Vec<String>, event: &KeyEvent| {
            out.push(event.key.clone())
        });
        let mut out = Vec::new();
        registry.run(&EditorCommand::MoveCursor, &mut out, &KeyEvent::new("ArrowUp"));
        registry.run(&EditorCommand::MoveCursor, &mut out, &KeyEvent::new("ArrowLeft"));
        assert_eq!(out, vec!["ArrowUp", "ArrowLeft"]);
        assert!(registry.unregister(&EditorCommand::MoveCursor));
        assert!(!registry.contains(&EditorCommand::MoveCursor));
    }
}
