//! Authenticator configuration.
//!
//! Administrators attach an [`AuthenticatorConfigModel`] (a string map) to
//! a flow execution. The group form resolves it once per attempt into a
//! typed [`GroupFormConfig`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Option holding the user session note name.
pub const NOTE_NAME: &str = "noteName";
/// Option selecting full group path (`true`) or bare group name (`false`).
pub const FULL_PATH: &str = "fullPath";
/// Note name used when none is configured.
pub const DEFAULT_NOTE_NAME: &str = "group";

/// Raw authenticator configuration as stored for a flow execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatorConfigModel {
    /// Unique identifier.
    pub id: Uuid,
    /// Display alias.
    pub alias: String,
    /// Option values.
    pub config: HashMap<String, String>,
}

impl AuthenticatorConfigModel {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            alias: alias.into(),
            config: HashMap::new(),
        }
    }

    /// Sets an option, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Gets a string option.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    /// Gets a boolean option, falling back to `default` when the option is
    /// absent or not a boolean.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .and_then(|v| v.trim().to_ascii_lowercase().parse().ok())
            .unwrap_or(default)
    }
}

/// Resolved configuration of the group username/password form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupFormConfig {
    note_name: Option<String>,
    full_path: bool,
}

impl Default for GroupFormConfig {
    fn default() -> Self {
        Self {
            note_name: Some(DEFAULT_NOTE_NAME.to_string()),
            full_path: true,
        }
    }
}

impl GroupFormConfig {
    /// Resolves the options of `model`, applying defaults.
    ///
    /// An absent `noteName` means the default note name; an empty one
    /// disables the note.
    #[must_use]
    pub fn from_model(model: Option<&AuthenticatorConfigModel>) -> Self {
        let Some(model) = model else {
            return Self::default();
        };

        let note_name = match model.get(NOTE_NAME) {
            None => Some(DEFAULT_NOTE_NAME.to_string()),
            Some("") => None,
            Some(name) => Some(name.to_string()),
        };

        Self {
            note_name,
            full_path: model.get_bool(FULL_PATH, true),
        }
    }

    /// Overrides the note name; an empty name disables the note.
    #[must_use]
    pub fn with_note_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.note_name = (!name.is_empty()).then_some(name);
        self
    }

    /// Overrides full-path mode.
    #[must_use]
    pub const fn with_full_path(mut self, full_path: bool) -> Self {
        self.full_path = full_path;
        self
    }

    /// User session note receiving the group, `None` when disabled.
    #[must_use]
    pub fn note_name(&self) -> Option<&str> {
        self.note_name.as_deref()
    }

    /// Whether the note holds the full group path instead of the bare name.
    #[must_use]
    pub const fn full_path(&self) -> bool {
        self.full_path
    }
}
