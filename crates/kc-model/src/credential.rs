//! Credential domain model.
//!
//! Only password credentials take part in the group login form. The
//! `secret_data` field holds an Argon2id PHC string, never plaintext.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Credential type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialType {
    /// Password credential.
    Password,
}

impl CredentialType {
    /// Returns the string representation used in storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
        }
    }
}

/// A user credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    // === Identity ===
    /// Unique identifier.
    pub id: Uuid,
    /// User this credential belongs to.
    pub user_id: Uuid,
    /// Realm this credential belongs to.
    pub realm_id: Uuid,

    // === Type ===
    /// Credential type.
    pub credential_type: CredentialType,

    // === Timestamps ===
    /// When the credential was created.
    pub created_at: DateTime<Utc>,

    // === Credential Data ===
    /// Secret data (the password hash).
    pub secret_data: String,
}

impl Credential {
    /// Creates a password credential from an already computed hash.
    #[must_use]
    pub fn new_password(user_id: Uuid, realm_id: Uuid, hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            realm_id,
            credential_type: CredentialType::Password,
            created_at: Utc::now(),
            secret_data: hash.into(),
        }
    }

    /// Checks if this is a password credential.
    #[must_use]
    pub const fn is_password(&self) -> bool {
        matches!(self.credential_type, CredentialType::Password)
    }
}
