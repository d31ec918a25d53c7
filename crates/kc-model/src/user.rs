//! User domain model.
//!
//! Users are the principals that log in. Group memberships are held by the
//! store (see `kc-storage`), not on the record itself.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user of a realm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    // === Identity ===
    /// Unique identifier.
    pub id: Uuid,
    /// Realm this user belongs to.
    pub realm_id: Uuid,
    /// Unique username within the realm.
    pub username: String,
    /// Whether the user account is enabled.
    pub enabled: bool,

    // === Profile ===
    /// User's first name.
    pub first_name: Option<String>,
    /// User's last name.
    pub last_name: Option<String>,
    /// User's email address.
    pub email: Option<String>,

    // === Timestamps ===
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,

    // === Custom Attributes ===
    /// Custom user attributes.
    pub attributes: HashMap<String, Vec<String>>,
}

impl User {
    /// Creates a new enabled user with the given username.
    #[must_use]
    pub fn new(realm_id: Uuid, username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            realm_id,
            username: username.into(),
            enabled: true,
            first_name: None,
            last_name: None,
            email: None,
            created_at: now,
            updated_at: now,
            attributes: HashMap::new(),
        }
    }

    /// Sets the user's email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the user's first name.
    #[must_use]
    pub fn with_first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    /// Sets the user's last name.
    #[must_use]
    pub fn with_last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = Some(name.into());
        self
    }

    /// Sets whether the user is enabled.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Gets the user's full name.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }

    /// Gets the first value of an attribute.
    #[must_use]
    pub fn get_first_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// Sets an attribute value.
    pub fn set_attribute(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.attributes.insert(name.into(), values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_has_defaults() {
        let realm_id = Uuid::now_v7();
        let user = User::new(realm_id, "alice");

        assert_eq!(user.username, "alice");
        assert_eq!(user.realm_id, realm_id);
        assert!(user.enabled);
        assert!(user.email.is_none());
    }

    #[test]
    fn builder_pattern_works() {
        let user = User::new(Uuid::now_v7(), "bob")
            .with_email("bob@example.com")
            .with_first_name("Bob")
            .with_last_name("Builder")
            .with_enabled(false);

        assert_eq!(user.email.as_deref(), Some("bob@example.com"));
        assert_eq!(user.full_name(), Some("Bob Builder".to_string()));
        assert!(!user.enabled);
    }

    #[test]
    fn attributes_work() {
        let mut user = User::new(Uuid::now_v7(), "carol");
        user.set_attribute("department", vec!["Engineering".to_string()]);

        assert_eq!(user.get_first_attribute("department"), Some("Engineering"));
        assert_eq!(user.get_first_attribute("missing"), None);
    }
}
