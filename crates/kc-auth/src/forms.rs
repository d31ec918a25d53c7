//! Login form data and challenge responses.
//!
//! Rendering is done elsewhere. Authenticators only describe what the
//! login page must show: which template, the values to re-populate, the
//! login view model and an optional error message.

use serde::{Deserialize, Serialize};

/// Login form field names.
pub mod fields {
    /// Username (or email) field.
    pub const USERNAME: &str = "username";
    /// Password field.
    pub const PASSWORD: &str = "password";
    /// Group name field.
    pub const GROUP: &str = "group";
    /// Present when the user pressed "cancel". Only presence matters.
    pub const CANCEL: &str = "cancel";
    /// Remember-me checkbox, `on` when ticked.
    pub const REMEMBER_ME: &str = "rememberMe";
}

/// Message keys resolved by the theme.
pub mod messages {
    /// Generic "invalid username or password" message.
    pub const INVALID_USER: &str = "invalidUserMessage";
    /// Account disabled message.
    pub const ACCOUNT_DISABLED: &str = "accountDisabledMessage";
}

/// Decoded form parameters.
///
/// Keys keep submission order and may carry several values. Single-valued
/// reads use the first value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    entries: Vec<(String, Vec<String>)>,
}

impl FormData {
    /// Creates empty form data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value for `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Appends a value, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(key, value);
        self
    }

    /// Gets the first value for `key`.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    /// Gets all values for `key`.
    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// Returns a copy without `key`.
    #[must_use]
    pub fn without(&self, key: &str) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(k, _)| k != key)
                .cloned()
                .collect(),
        }
    }

    /// Checks whether `key` was submitted, with or without a value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether no key was submitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over keys and their values in submission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }
}

impl<K, V> FromIterator<(K, V)> for FormData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = Self::new();
        for (key, value) in iter {
            form.add(key, value);
        }
        form
    }
}

/// Login view model for the group login page.
///
/// The password is never carried back to the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLoginBean {
    /// Username to pre-fill.
    pub username: Option<String>,
    /// Whether the remember-me box is ticked.
    pub remember_me: bool,
    /// Group to pre-fill.
    pub group: Option<String>,
}

impl GroupLoginBean {
    /// Builds the view model from submitted (or pre-filled) form data.
    #[must_use]
    pub fn from_form(form: &FormData) -> Self {
        Self {
            username: form.first(fields::USERNAME).map(String::from),
            remember_me: form
                .first(fields::REMEMBER_ME)
                .is_some_and(|v| v.eq_ignore_ascii_case("on")),
            group: form.first(fields::GROUP).map(String::from),
        }
    }
}

/// An error message shown on the login page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormMessage {
    /// Field the message is attached to, `None` for a page-level message.
    pub field: Option<String>,
    /// Message key.
    pub message: String,
}

impl FormMessage {
    /// Creates a message attached to a field.
    #[must_use]
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a page-level message.
    #[must_use]
    pub fn global(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

/// A request to (re-)present the login page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Template to render.
    pub template: String,
    /// Values to re-populate the form with, password excluded; absent when
    /// nothing else was submitted.
    pub form_data: Option<FormData>,
    /// Login view model.
    pub login: GroupLoginBean,
    /// Error to display.
    pub error: Option<FormMessage>,
}

impl Challenge {
    /// Creates a challenge for `template` populated from `form`.
    #[must_use]
    pub fn new(template: impl Into<String>, form: &FormData) -> Self {
        let form_data = form.without(fields::PASSWORD);
        Self {
            template: template.into(),
            form_data: (!form_data.is_empty()).then_some(form_data),
            login: GroupLoginBean::from_form(form),
            error: None,
        }
    }

    /// Attaches an error message.
    #[must_use]
    pub fn with_error(mut self, error: Option<FormMessage>) -> Self {
        self.error = error;
        self
    }
}

/// Builds login challenges on behalf of an authenticator.
///
/// Credential validators use this to re-issue the calling form's challenge
/// without knowing which template it renders.
pub trait LoginForms: Send + Sync {
    /// Message used when a submission is rejected.
    fn default_challenge_message(&self) -> &'static str;

    /// Builds a challenge re-populated from `form`.
    fn challenge(&self, form: &FormData, error: Option<FormMessage>) -> Challenge;
}
