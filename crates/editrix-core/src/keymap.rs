//! Key chords and the key-binding registry.
//!
//! Bindings are keyed by a normalized [`KeyCombo`]. Its canonical string form lists the
//! modifiers in a fixed order (`Ctrl`, `Meta`, `Alt`, `Shift`) followed by the key, joined by
//! `+`, so two chords that only differ in modifier order are the same binding.
//!
//! ```rust
//! use editrix_core::{EditorCommand, KeyBindingOverrides, KeyBindingRegistry, KeyEvent};
//!
//! let registry = KeyBindingRegistry::build(&KeyBindingOverrides::new());
//! let event = KeyEvent::new("b").with_ctrl();
//! assert_eq!(registry.command_for(&event), Some(&EditorCommand::Bold));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const KEY_BINDING_DELIMITER: char = '+';

/// Identifier of a command handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorCommand {
    /// Start an empty bold run at the caret.
    Bold,
    /// Split the current block.
    Enter,
    /// Delete backwards, merging blocks at offset 0.
    Backspace,
    /// Move the caret; the direction comes from the key.
    MoveCursor,
    /// Host-defined command.
    Custom(String),
}

impl EditorCommand {
    /// Command name.
    pub fn name(&self) -> &str {
        match self {
            EditorCommand::Bold => "bold",
            EditorCommand::Enter => "enter",
            EditorCommand::Backspace => "backspace",
            EditorCommand::MoveCursor => "move_cursor",
            EditorCommand::Custom(name) => name,
        }
    }
}

impl fmt::Display for EditorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Commands whose default chord a host may replace at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverridableCommand {
    /// [`EditorCommand::Bold`]
    Bold,
}

impl From<OverridableCommand> for EditorCommand {
    fn from(command: OverridableCommand) -> Self {
        match command {
            OverridableCommand::Bold => EditorCommand::Bold,
        }
    }
}

/// Chord overrides handed to [`KeyBindingRegistry::build`].
pub type KeyBindingOverrides = BTreeMap<OverridableCommand, KeyCombo>;

/// Errors raised while parsing a chord string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyComboError {
    /// Nothing to parse.
    #[error("empty key chord")]
    Empty,
    /// The chord names modifiers but no key.
    #[error("key chord has no key: {0}")]
    MissingKey(String),
    /// A modifier name was not recognized.
    #[error("unknown modifier: {0}")]
    UnknownModifier(String),
}

/// A key event as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key name (`"a"`, `"Enter"`, `"ArrowLeft"`, ...).
    pub key: String,
    /// Control held.
    pub ctrl: bool,
    /// Meta/command held.
    pub meta: bool,
    /// Alt/option held.
    pub alt: bool,
    /// Shift held.
    pub shift: bool,
}

impl KeyEvent {
    /// Event for `key` with no modifiers.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            meta: false,
            alt: false,
            shift: false,
        }
    }

    /// Event for a single character.
    pub fn char(c: char) -> Self {
        Self::new(c.to_string())
    }

    /// With control held.
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// With meta held.
    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// With alt held.
    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// With shift held.
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// The character this event types: a single printable character without ctrl, meta or
    /// alt. Shift does not count as a modifier here.
    pub fn typed_char(&self) -> Option<char> {
        if self.ctrl || self.meta || self.alt {
            return None;
        }
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => Some(c),
            _ => None,
        }
    }
}

/// Normalized key chord.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    key: String,
    ctrl: bool,
    meta: bool,
    alt: bool,
    shift: bool,
}

impl KeyCombo {
    /// Chord for `key` with no modifiers. A single alphabetic key is lower-cased.
    pub fn new(key: &str) -> Self {
        Self {
            key: normalize_key(key),
            ctrl: false,
            meta: false,
            alt: false,
            shift: false,
        }
    }

    /// Chord matching `event`.
    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            key: normalize_key(&event.key),
            ctrl: event.ctrl,
            meta: event.meta,
            alt: event.alt,
            shift: event.shift,
        }
    }

    /// With control.
    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// With meta.
    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// With alt.
    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// With shift.
    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Normalized key name.
    pub fn key(&self) -> &str {
        &self.key
    }
}

fn normalize_key(key: &str) -> String {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_alphabetic() => c.to_lowercase().collect(),
        _ => key.to_string(),
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = [
            (self.ctrl, "Ctrl"),
            (self.meta, "Meta"),
            (self.alt, "Alt"),
            (self.shift, "Shift"),
        ];
        for (_, name) in modifiers.iter().filter(|(held, _)| *held) {
            write!(f, "{}{}", name, KEY_BINDING_DELIMITER)?;
        }
        f.write_str(&self.key)
    }
}

impl FromStr for KeyCombo {
    type Err = KeyComboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyComboError::Empty);
        }

        // The delimiter doubles as a key name: "+" and "Ctrl++".
        let (modifiers, key) = if s == "+" {
            ("", "+")
        } else if let Some(prefix) = s.strip_suffix("++") {
            (prefix, "+")
        } else {
            s.rsplit_once(KEY_BINDING_DELIMITER).unwrap_or(("", s))
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(KeyComboError::MissingKey(s.to_string()));
        }

        let mut combo = KeyCombo::new(key);
        if modifiers.is_empty() {
            return Ok(combo);
        }
        for part in modifiers.split(KEY_BINDING_DELIMITER) {
            match part.trim().to_ascii_lowercase().as_str() {
                "ctrl" | "control" => combo.ctrl = true,
                "meta" | "cmd" | "super" => combo.meta = true,
                "alt" | "option" => combo.alt = true,
                "shift" => combo.shift = true,
                _ => return Err(KeyComboError::UnknownModifier(part.to_string())),
            }
        }
        Ok(combo)
    }
}

impl Serialize for KeyCombo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KeyCombo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let chord = String::deserialize(deserializer)?;
        chord.parse().map_err(serde::de::Error::custom)
    }
}

/// Exact-match map from chords to commands.
#[derive(Debug, Clone, Default)]
pub struct KeyBindingRegistry {
    bindings: HashMap<KeyCombo, EditorCommand>,
}

impl KeyBindingRegistry {
    /// Registry with no bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in bindings.
    pub fn default_bindings() -> Vec<(KeyCombo, EditorCommand)> {
        vec![
            (KeyCombo::new("b").ctrl(), EditorCommand::Bold),
            (KeyCombo::new("Enter"), EditorCommand::Enter),
            (KeyCombo::new("Backspace"), EditorCommand::Backspace),
            (KeyCombo::new("ArrowLeft"), EditorCommand::MoveCursor),
            (KeyCombo::new("ArrowRight"), EditorCommand::MoveCursor),
            (KeyCombo::new("ArrowUp"), EditorCommand::MoveCursor),
            (KeyCombo::new("ArrowDown"), EditorCommand::MoveCursor),
        ]
    }

    /// Default bindings with `overrides` applied. An override replaces every default chord of
    /// its command.
    pub fn build(overrides: &KeyBindingOverrides) -> Self {
        let mut registry = Self::new();
        for (combo, command) in Self::default_bindings() {
            registry.bind(combo, command);
        }
        for (command, combo) in overrides {
            let command = EditorCommand::from(*command);
            registry.unbind_command(&command);
            log::debug!("key binding override: {} -> {}", combo, command);
            registry.bind(combo.clone(), command);
        }
        registry
    }

    /// Bind `combo`, replacing any command it was bound to.
    pub fn bind(&mut self, combo: KeyCombo, command: EditorCommand) -> Option<EditorCommand> {
        self.bindings.insert(combo, command)
    }

    /// Remove the binding of `combo`.
    pub fn unbind(&mut self, combo: &KeyCombo) -> Option<EditorCommand> {
        self.bindings.remove(combo)
    }

    /// Remove every chord bound to `command`. Returns how many were removed.
    pub fn unbind_command(&mut self, command: &EditorCommand) -> usize {
        let before = self.bindings.len();
        self.bindings.retain(|_, bound| bound != command);
        before - self.bindings.len()
    }

    /// Command bound to the exact chord of `event`.
    pub fn command_for(&self, event: &KeyEvent) -> Option<&EditorCommand> {
        self.bindings.get(&KeyCombo::from_event(event))
    }

    /// Chords bound to `command`, sorted by their canonical string.
    pub fn combos_for(&self, command: &EditorCommand) -> Vec<&KeyCombo> {
        let mut combos: Vec<&KeyCombo> = self
            .bindings
            .iter()
            .filter(|(_, bound)| *bound == command)
            .map(|(combo, _)| combo)
            .collect();
        combos.sort_by_key(|combo| combo.to_string());
        combos
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_modifier_order() {
        let combo = KeyCombo::new("x").shift().alt().meta().ctrl();
        assert_eq!(combo.to_string(), "Ctrl+Meta+Alt+Shift+x");
    }

    #[test]
    fn test_parse_accepts_any_modifier_order() {
        let a: KeyCombo = "shift+ctrl+B".parse().unwrap();
        let b: KeyCombo = "Ctrl+Shift+b".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "Ctrl+Shift+b");
    }

    #[test]
    fn test_parse_plus_key() {
        let combo: KeyCombo = "Ctrl++".parse().unwrap();
        assert_eq!(combo.key(), "+");
        assert_eq!(combo.to_string(), "Ctrl++");
        assert_eq!("+".parse::<KeyCombo>().unwrap().key(), "+");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<KeyCombo>(), Err(KeyComboError::Empty));
        assert_eq!(
            "Hyper+a".parse::<KeyCombo>(),
            Err(KeyComboError::UnknownModifier("Hyper".to_string()))
        );
        assert!(matches!(
            "Ctrl+ ".parse::<KeyCombo>(),
            Err(KeyComboError::MissingKey(_))
        ));
    }

    #[test]
    fn test_event_lookup_lowercases_letters() {
        let registry = KeyBindingRegistry::build(&KeyBindingOverrides::new());
        let event = KeyEvent::new("B").with_ctrl();
        assert_eq!(registry.command_for(&event), Some(&EditorCommand::Bold));
        assert_eq!(registry.command_for(&KeyEvent::new("b")), None);
        assert_eq!(
            registry.command_for(&KeyEvent::new("b").with_ctrl().with_shift()),
            None
        );
    }

    #[test]
    fn test_defaults() {
        let registry = KeyBindingRegistry::build(&KeyBindingOverrides::new());
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.combos_for(&EditorCommand::MoveCursor).len(), 4);
        assert_eq!(
            registry.command_for(&KeyEvent::new("Enter")),
            Some(&EditorCommand::Enter)
        );
    }

    #[test]
    fn test_override_replaces_default_chord() {
        let mut overrides = KeyBindingOverrides::new();
        overrides.insert(
            OverridableCommand::Bold,
            "Ctrl+Shift+b".parse().unwrap(),
        );
        let registry = KeyBindingRegistry::build(&overrides);
        assert_eq!(registry.command_for(&KeyEvent::new("b").with_ctrl()), None);
        assert_eq!(
            registry.command_for(&KeyEvent::new("B").with_ctrl().with_shift()),
            Some(&EditorCommand::Bold)
        );
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn test_typed_char() {
        assert_eq!(KeyEvent::char('a').typed_char(), Some('a'));
        assert_eq!(KeyEvent::new("A").with_shift().typed_char(), Some('A'));
        assert_eq!(KeyEvent::char('a').with_ctrl().typed_char(), None);
        assert_eq!(KeyEvent::char('a').with_alt().typed_char(), None);
        assert_eq!(KeyEvent::new("Enter").typed_char(), None);
        assert_eq!(KeyEvent::char('é').typed_char(), Some('é'));
        assert_eq!(KeyEvent::char('\t').typed_char(), None);
        assert_eq!(KeyEvent::char('\u{1b}').typed_char(), None);
    }

    #[test]
    fn test_unbind() {
        let mut registry = KeyBindingRegistry::build(&KeyBindingOverrides::new());
        assert_eq!(registry.unbind_command(&EditorCommand::MoveCursor), 4);
        assert_eq!(
            registry.unbind(&KeyCombo::new("Enter")),
            Some(EditorCommand::Enter)
        );
        assert_eq!(registry.len(), 2);
    }
}
