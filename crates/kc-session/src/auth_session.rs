//! Authentication session model.
//!
//! Temporary sessions used during the authentication flow, before
//! a full user session is established.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authentication session.
///
/// Represents the state of an ongoing authentication flow. The session is
/// owned by the flow engine; authenticators read and write its notes.
///
/// ## Notes
///
/// - auth notes: scratch space shared between authenticators of one flow
/// - client notes: protocol parameters sent by the client (`login_hint`, ...)
/// - user session notes: copied onto the user session when the flow
///   succeeds, where token mappers can read them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticationSession {
    // === Identity ===
    /// Unique session identifier (also used as tab ID in browser).
    pub id: Uuid,
    /// Root authentication session ID (for multi-tab scenarios).
    pub root_session_id: Uuid,
    /// Realm ID.
    pub realm_id: Uuid,

    // === Client Info ===
    /// Client that initiated the authentication.
    pub client_id: Uuid,
    /// Protocol (openid-connect, saml).
    pub protocol: String,

    // === Authentication State ===
    /// User being authenticated (set after identification).
    pub authenticated_user_id: Option<Uuid>,

    // === Timestamps ===
    /// When the session was created.
    pub created_at: DateTime<Utc>,

    // === Notes ===
    /// Session notes (key-value pairs for passing data between authenticators).
    pub notes: HashMap<String, String>,
    /// Client notes (protocol request parameters).
    pub client_notes: HashMap<String, String>,
    /// User session notes (will be copied to the user session on success).
    pub user_session_notes: HashMap<String, String>,
}

impl AuthenticationSession {
    /// Creates a new authentication session.
    #[must_use]
    pub fn new(realm_id: Uuid, client_id: Uuid, protocol: impl Into<String>) -> Self {
        let id = Uuid::now_v7();
        Self {
            id,
            root_session_id: id, // Initially same as id
            realm_id,
            client_id,
            protocol: protocol.into(),
            authenticated_user_id: None,
            created_at: Utc::now(),
            notes: HashMap::new(),
            client_notes: HashMap::new(),
            user_session_notes: HashMap::new(),
        }
    }

    /// Sets a client note, builder style.
    #[must_use]
    pub fn with_client_note(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_client_note(key, value);
        self
    }

    /// Sets the authenticated user.
    pub fn set_authenticated_user(&mut self, user_id: Uuid) {
        self.authenticated_user_id = Some(user_id);
    }

    /// Clears the authenticated user.
    pub fn clear_authenticated_user(&mut self) {
        self.authenticated_user_id = None;
    }

    /// Checks if a user has been authenticated.
    #[must_use]
    pub const fn is_user_authenticated(&self) -> bool {
        self.authenticated_user_id.is_some()
    }

    /// Sets a session note.
    pub fn set_note(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.notes.insert(key.into(), value.into());
    }

    /// Gets a session note.
    #[must_use]
    pub fn get_note(&self, key: &str) -> Option<&str> {
        self.notes.get(key).map(String::as_str)
    }

    /// Removes a session note.
    pub fn remove_note(&mut self, key: &str) -> Option<String> {
        self.notes.remove(key)
    }

    /// Sets a client note.
    pub fn set_client_note(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.client_notes.insert(key.into(), value.into());
    }

    /// Gets a client note.
    #[must_use]
    pub fn get_client_note(&self, key: &str) -> Option<&str> {
        self.client_notes.get(key).map(String::as_str)
    }

    /// Sets a user session note, overwriting any previous value.
    pub fn set_user_session_note(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.user_session_notes.insert(key.into(), value.into());
    }

    /// Gets a user session note.
    #[must_use]
    pub fn get_user_session_note(&self, key: &str) -> Option<&str> {
        self.user_session_notes.get(key).map(String::as_str)
    }

    /// Returns the session age in seconds.
    #[must_use]
    pub fn age_seconds(&self) -> i64 {
        (Utc::now() - self.created_at).num_seconds()
    }

    /// Checks if the session has expired.
    #[must_use]
    pub fn is_expired(&self, timeout_seconds: i64) -> bool {
        self.age_seconds() > timeout_seconds
    }
}

/// Well-known authentication session note keys.
pub mod notes {
    /// Login hint (pre-filled username), stored as a client note.
    pub const LOGIN_HINT: &str = "login_hint";
    /// Auth note set when the user was identified before the
    /// username/password form ran.
    pub const USER_SET_BEFORE_USERNAME_PASSWORD_AUTH: &str =
        "USER_SET_BEFORE_USERNAME_PASSWORD_AUTH";
    /// Auth note recording that the user asked to be remembered.
    pub const REMEMBER_ME: &str = "remember_me";
    /// Auth note holding the username typed into the last login form.
    pub const ATTEMPTED_USERNAME: &str = "ATTEMPTED_USERNAME";
}
