//! Group storage provider trait.

use async_trait::async_trait;
use kc_model::Group;
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for group storage operations.
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait GroupProvider: Send + Sync {
    /// Creates a new group.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if a group with the same name
    /// exists at the same level (same parent or top-level), and
    /// `StorageError::NotFound` if the parent doesn't exist.
    async fn create(&self, group: &Group) -> StorageResult<()>;

    /// Gets a group by ID.
    async fn get_by_id(&self, realm_id: Uuid, id: Uuid) -> StorageResult<Option<Group>>;

    /// Gets the full path of a group (e.g., "/parent/child/grandchild").
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the group or one of its
    /// ancestors doesn't exist.
    async fn get_path(&self, realm_id: Uuid, group_id: Uuid) -> StorageResult<String>;
}
