//! Group domain model.
//!
//! Groups are hierarchical. A group knows only its parent; the full path
//! (`/top/level1/level2`) is assembled by walking parents in the store.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A group of users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    // === Identity ===
    /// Unique identifier.
    pub id: Uuid,
    /// Group name (not unique across branches of the hierarchy).
    pub name: String,
    /// Group description.
    pub description: Option<String>,

    // === Hierarchy ===
    /// Realm this group belongs to.
    pub realm_id: Uuid,
    /// Parent group ID (None for top-level groups).
    pub parent_id: Option<Uuid>,

    // === Timestamps ===
    /// When the group was created.
    pub created_at: DateTime<Utc>,
    /// When the group was last updated.
    pub updated_at: DateTime<Utc>,

    // === Custom Attributes ===
    /// Custom group attributes.
    pub attributes: HashMap<String, Vec<String>>,
}

impl Group {
    /// Creates a new top-level group.
    #[must_use]
    pub fn new(realm_id: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            description: None,
            realm_id,
            parent_id: None,
            created_at: now,
            updated_at: now,
            attributes: HashMap::new(),
        }
    }

    /// Creates a new child group.
    #[must_use]
    pub fn new_child(realm_id: Uuid, parent_id: Uuid, name: impl Into<String>) -> Self {
        let mut group = Self::new(realm_id, name);
        group.parent_id = Some(parent_id);
        group
    }

    /// Compares the group name with `name`, ignoring case.
    ///
    /// Uses Unicode lowercase folding, so `Admins` matches `admins` and
    /// `ÄRZTE` matches `ärzte`.
    #[must_use]
    pub fn name_matches(&self, name: &str) -> bool {
        self.name
            .chars()
            .flat_map(char::to_lowercase)
            .eq(name.chars().flat_map(char::to_lowercase))
    }
}

/// A group path, segments ordered from the top-level group to the leaf.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupPath {
    /// Path segments from root to leaf.
    pub segments: Vec<String>,
}

impl GroupPath {
    /// Path separator.
    pub const SEPARATOR: char = '/';

    /// Builds a path from segments ordered root first.
    #[must_use]
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the path as a string.
    #[must_use]
    pub fn to_path_string(&self) -> String {
        let mut path = String::new();
        for segment in &self.segments {
            path.push(Self::SEPARATOR);
            path.push_str(segment);
        }
        if path.is_empty() {
            path.push(Self::SEPARATOR);
        }
        path
    }
}

impl fmt::Display for GroupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path_string())
    }
}
