//! In-memory storage provider.
//!
//! Backs tests and embedded deployments. Group memberships keep insertion
//! order, so membership enumeration is stable for a given store.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use kc_model::{Credential, CredentialType, Group, GroupPath, User};
use uuid::Uuid;

use crate::credential::CredentialProvider;
use crate::error::{StorageError, StorageResult};
use crate::group::GroupProvider;
use crate::user::UserProvider;

/// Thread-safe in-memory store for users, groups and credentials.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: DashMap<Uuid, User>,
    /// (realm ID, lowercased username) -> user ID.
    usernames: DashMap<(Uuid, String), Uuid>,
    groups: DashMap<Uuid, Group>,
    /// User ID -> group IDs, in the order memberships were added.
    memberships: DashMap<Uuid, Vec<Uuid>>,
    /// User ID -> credentials.
    credentials: DashMap<Uuid, Vec<Credential>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn find_user(&self, realm_id: Uuid, matches: impl Fn(&User) -> bool) -> Option<User> {
        self.users
            .iter()
            .find(|entry| entry.realm_id == realm_id && matches(entry.value()))
            .map(|entry| entry.value().clone())
    }

    fn group_in_realm(&self, realm_id: Uuid, id: Uuid) -> Option<Group> {
        self.groups
            .get(&id)
            .filter(|g| g.realm_id == realm_id)
            .map(|g| g.value().clone())
    }

    /// Walks parent links up to the top-level group.
    fn group_path(&self, realm_id: Uuid, group_id: Uuid) -> StorageResult<GroupPath> {
        let mut segments = Vec::new();
        let mut current = Some(group_id);

        while let Some(id) = current {
            if segments.len() > self.groups.len() {
                return Err(StorageError::InvalidData(format!(
                    "group hierarchy above {group_id} contains a cycle"
                )));
            }
            let group = self
                .group_in_realm(realm_id, id)
                .ok_or_else(|| StorageError::not_found("Group", id))?;
            segments.push(group.name);
            current = group.parent_id;
        }

        segments.reverse();
        Ok(GroupPath::from_segments(segments))
    }
}

fn username_key(realm_id: Uuid, username: &str) -> (Uuid, String) {
    (realm_id, username.to_lowercase())
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

#[async_trait]
impl UserProvider for InMemoryStore {
    async fn create(&self, user: &User) -> StorageResult<()> {
        match self.usernames.entry(username_key(user.realm_id, &user.username)) {
            Entry::Occupied(_) => {
                return Err(StorageError::duplicate("User", "username", &user.username));
            }
            Entry::Vacant(slot) => {
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
            }
        }
        tracing::debug!(user_id = %user.id, username = %user.username, "user created");
        Ok(())
    }

    async fn get_by_id(&self, realm_id: Uuid, id: Uuid) -> StorageResult<Option<User>> {
        Ok(self
            .users
            .get(&id)
            .filter(|u| u.realm_id == realm_id)
            .map(|u| u.value().clone()))
    }

    async fn get_by_username(&self, realm_id: Uuid, username: &str) -> StorageResult<Option<User>> {
        let Some(user_id) = self
            .usernames
            .get(&username_key(realm_id, username))
            .map(|id| *id)
        else {
            return Ok(None);
        };
        UserProvider::get_by_id(self, realm_id, user_id).await
    }

    async fn get_by_email(&self, realm_id: Uuid, email: &str) -> StorageResult<Option<User>> {
        Ok(self.find_user(realm_id, |u| {
            u.email.as_deref().is_some_and(|e| eq_ignore_case(e, email))
        }))
    }

    async fn add_to_group(
        &self,
        realm_id: Uuid,
        user_id: Uuid,
        group_id: Uuid,
    ) -> StorageResult<()> {
        if UserProvider::get_by_id(self, realm_id, user_id).await?.is_none() {
            return Err(StorageError::not_found("User", user_id));
        }
        if self.group_in_realm(realm_id, group_id).is_none() {
            return Err(StorageError::not_found("Group", group_id));
        }

        let mut groups = self.memberships.entry(user_id).or_default();
        if !groups.contains(&group_id) {
            groups.push(group_id);
        }
        Ok(())
    }

    async fn get_groups(&self, realm_id: Uuid, user_id: Uuid) -> StorageResult<Vec<Uuid>> {
        Ok(self
            .memberships
            .get(&user_id)
            .map(|ids| {
                ids.iter()
                    .copied()
                    .filter(|id| self.group_in_realm(realm_id, *id).is_some())
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl GroupProvider for InMemoryStore {
    async fn create(&self, group: &Group) -> StorageResult<()> {
        if let Some(parent_id) = group.parent_id {
            if self.group_in_realm(group.realm_id, parent_id).is_none() {
                return Err(StorageError::not_found("Group", parent_id));
            }
        }

        let sibling_exists = self.groups.iter().any(|g| {
            g.realm_id == group.realm_id && g.parent_id == group.parent_id && g.name == group.name
        });
        if sibling_exists {
            return Err(StorageError::duplicate("Group", "name", &group.name));
        }

        self.groups.insert(group.id, group.clone());
        Ok(())
    }

    async fn get_by_id(&self, realm_id: Uuid, id: Uuid) -> StorageResult<Option<Group>> {
        Ok(self.group_in_realm(realm_id, id))
    }

    async fn get_path(&self, realm_id: Uuid, group_id: Uuid) -> StorageResult<String> {
        self.group_path(realm_id, group_id)
            .map(|path| path.to_path_string())
    }
}

#[async_trait]
impl CredentialProvider for InMemoryStore {
    async fn create(&self, credential: &Credential) -> StorageResult<()> {
        self.credentials
            .entry(credential.user_id)
            .or_default()
            .push(credential.clone());
        Ok(())
    }

    async fn list_by_type(
        &self,
        realm_id: Uuid,
        user_id: Uuid,
        credential_type: CredentialType,
    ) -> StorageResult<Vec<Credential>> {
        Ok(self
            .credentials
            .get(&user_id)
            .map(|creds| {
                creds
                    .iter()
                    .filter(|c| c.realm_id == realm_id && c.credential_type == credential_type)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
