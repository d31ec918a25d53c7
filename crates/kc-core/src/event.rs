//! Security events for login flows.
//!
//! ## NIST 800-53 Rev5: AU-2 (Event Logging)
//!
//! Every login attempt that reaches an authenticator produces at most one
//! classified outcome. Failure events carry an error code from [`errors`]
//! rather than free text so that downstream consumers can aggregate them.
//!
//! ## NIST 800-53 Rev5: AU-3 (Content of Audit Records)
//!
//! All events include:
//! - Timestamp (ISO 8601)
//! - Event type
//! - User identity (when available)
//! - Source IP (when available)
//! - Outcome (success/failure)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// User login attempt.
    Login,
    /// User login failed.
    LoginError,
}

/// Outcome of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOutcome {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Failure,
}

/// Well-known error codes attached to failure events.
///
/// ## NIST 800-53 Rev5: IA-6 (Authentication Feedback)
///
/// Codes are recorded for auditing only. They are never shown to the
/// person logging in.
pub mod errors {
    /// No user matched the submitted identity (also used for group mismatch).
    pub const USER_NOT_FOUND: &str = "user_not_found";
    /// The submitted password did not match.
    pub const INVALID_USER_CREDENTIALS: &str = "invalid_user_credentials";
    /// The user account is disabled.
    pub const USER_DISABLED: &str = "user_disabled";
}

/// Well-known detail keys.
pub mod details {
    /// Username as submitted in the login form.
    pub const USERNAME: &str = "username";
    /// Authentication method that produced the event.
    pub const AUTH_METHOD: &str = "auth_method";
}

/// A security event for audit logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub id: Uuid,

    /// Timestamp of the event (ISO 8601).
    pub timestamp: DateTime<Utc>,

    /// Type of event.
    pub event_type: EventType,

    /// Outcome of the event.
    pub outcome: EventOutcome,

    /// Realm ID where the event occurred.
    pub realm_id: Option<Uuid>,

    /// User ID associated with the event.
    pub user_id: Option<Uuid>,

    /// Client ID associated with the event.
    pub client_id: Option<String>,

    /// Source IP address.
    pub ip_address: Option<String>,

    /// Session ID.
    pub session_id: Option<String>,

    /// Error code (for failure events).
    pub error: Option<String>,

    /// Additional details as key-value pairs.
    pub details: Vec<(String, String)>,
}

impl Event {
    /// Creates a new event builder.
    #[must_use]
    pub const fn builder(event_type: EventType) -> EventBuilder {
        EventBuilder::new(event_type)
    }

    /// Gets the value of a detail, if present.
    #[must_use]
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Builder for creating events.
///
/// Authenticators keep one builder per attempt and fill in context
/// (realm, client, user, details) as it becomes known.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    event_type: EventType,
    outcome: EventOutcome,
    realm_id: Option<Uuid>,
    user_id: Option<Uuid>,
    client_id: Option<String>,
    ip_address: Option<String>,
    session_id: Option<String>,
    error: Option<String>,
    details: Vec<(String, String)>,
}

impl EventBuilder {
    /// Creates a new event builder.
    #[must_use]
    pub const fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            outcome: EventOutcome::Success,
            realm_id: None,
            user_id: None,
            client_id: None,
            ip_address: None,
            session_id: None,
            error: None,
            details: Vec::new(),
        }
    }

    /// Changes the event type.
    #[must_use]
    pub const fn with_type(mut self, event_type: EventType) -> Self {
        self.event_type = event_type;
        self
    }

    /// Sets the outcome to success.
    #[must_use]
    pub const fn success(mut self) -> Self {
        self.outcome = EventOutcome::Success;
        self
    }

    /// Sets the outcome to failure with an error code.
    #[must_use]
    pub fn failure(mut self, error: impl Into<String>) -> Self {
        self.outcome = EventOutcome::Failure;
        self.error = Some(error.into());
        self
    }

    /// Sets the realm ID.
    #[must_use]
    pub const fn realm(mut self, realm_id: Uuid) -> Self {
        self.realm_id = Some(realm_id);
        self
    }

    /// Sets the user ID.
    #[must_use]
    pub const fn user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Clears the user ID.
    #[must_use]
    pub const fn without_user(mut self) -> Self {
        self.user_id = None;
        self
    }

    /// Sets the client ID.
    #[must_use]
    pub fn client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the IP address.
    #[must_use]
    pub fn ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    /// Sets the session ID.
    #[must_use]
    pub fn session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Adds a detail key-value pair, replacing an earlier value for the key.
    #[must_use]
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.details.retain(|(k, _)| *k != key);
        self.details.push((key, value.into()));
        self
    }

    /// Builds the event.
    #[must_use]
    pub fn build(self) -> Event {
        Event {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            event_type: self.event_type,
            outcome: self.outcome,
            realm_id: self.realm_id,
            user_id: self.user_id,
            client_id: self.client_id,
            ip_address: self.ip_address,
            session_id: self.session_id,
            error: self.error,
            details: self.details,
        }
    }
}
