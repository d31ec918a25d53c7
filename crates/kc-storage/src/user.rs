//! User storage provider trait.

use async_trait::async_trait;
use kc_model::User;
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for user storage operations.
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait UserProvider: Send + Sync {
    /// Creates a new user.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if a user with the same username exists.
    async fn create(&self, user: &User) -> StorageResult<()>;

    /// Gets a user by ID.
    async fn get_by_id(&self, realm_id: Uuid, id: Uuid) -> StorageResult<Option<User>>;

    /// Gets a user by username (case-insensitive).
    async fn get_by_username(&self, realm_id: Uuid, username: &str) -> StorageResult<Option<User>>;

    /// Gets a user by email (case-insensitive).
    async fn get_by_email(&self, realm_id: Uuid, email: &str) -> StorageResult<Option<User>>;

    /// Adds a user to a group.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the user or group doesn't exist.
    async fn add_to_group(
        &self,
        realm_id: Uuid,
        user_id: Uuid,
        group_id: Uuid,
    ) -> StorageResult<()>;

    /// Gets the groups a user belongs to, in the store's enumeration order.
    async fn get_groups(&self, realm_id: Uuid, user_id: Uuid) -> StorageResult<Vec<Uuid>>;
}
