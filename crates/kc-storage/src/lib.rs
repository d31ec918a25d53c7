//! # kc-storage
//!
//! Storage abstraction traits for Keycloak Rust.
//!
//! The login flow only reads from storage. The traits here cover what it
//! needs plus the writes used to seed a store.
//!
//! ## Provider Traits
//!
//! - [`UserProvider`] - user lookup and group membership
//! - [`GroupProvider`] - group lookup and hierarchy paths
//! - [`CredentialProvider`] - password credentials
//!
//! [`InMemoryStore`] implements all three.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod credential;
pub mod error;
pub mod group;
pub mod memory;
pub mod user;

pub use credential::CredentialProvider;
pub use error::{StorageError, StorageResult};
pub use group::GroupProvider;
pub use memory::InMemoryStore;
pub use user::UserProvider;
