//! Credential storage provider trait.

use async_trait::async_trait;
use kc_model::{Credential, CredentialType};
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for credential storage operations.
///
/// Implementations must be thread-safe and support concurrent access.
///
/// ## Security Note
///
/// Implementations must ensure credential secrets are never logged.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Creates a new credential.
    async fn create(&self, credential: &Credential) -> StorageResult<()>;

    /// Lists credentials of a specific type for a user.
    async fn list_by_type(
        &self,
        realm_id: Uuid,
        user_id: Uuid,
        credential_type: CredentialType,
    ) -> StorageResult<Vec<Credential>>;

    /// Gets the password credential for a user (if any).
    async fn get_password(
        &self,
        realm_id: Uuid,
        user_id: Uuid,
    ) -> StorageResult<Option<Credential>> {
        let credentials = self
            .list_by_type(realm_id, user_id, CredentialType::Password)
            .await?;
        Ok(credentials.into_iter().next())
    }
}
