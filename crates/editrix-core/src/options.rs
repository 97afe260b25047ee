//! Engine configuration.
//!
//! ```rust
//! use editrix_core::{BlockTag, EditorOptions, OverridableCommand};
//!
//! let options = EditorOptions::from_json(
//!     r#"{ "initial_block": "h1", "overrides": { "key_bindings": { "bold": "Ctrl+Shift+b" } } }"#,
//! )
//! .unwrap();
//! assert_eq!(options.initial_block, BlockTag::Heading1);
//! assert_eq!(
//!     options.overrides.key_bindings[&OverridableCommand::Bold].to_string(),
//!     "Ctrl+Shift+b"
//! );
//! ```

use serde::{Deserialize, Serialize};

use crate::block::BlockTag;
use crate::keymap::KeyBindingOverrides;

/// Host-supplied overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overrides {
    /// Replacement chords for overridable commands.
    pub key_bindings: KeyBindingOverrides,
}

/// Options used when building an [`crate::Engine`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    /// Tag of the block a new document starts with.
    pub initial_block: BlockTag,
    /// Key-binding overrides.
    pub overrides: Overrides,
}

impl EditorOptions {
    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize options to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
