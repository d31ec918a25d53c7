//! # kc-model
//!
//! Domain records read by the login flow: users, their group
//! memberships and their password credentials.
//!
//! Records are plain data. Lookups and hierarchy traversal live in
//! `kc-storage`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod credential;
pub mod group;
pub mod user;

pub use credential::{Credential, CredentialType};
pub use group::{Group, GroupPath};
pub use user::User;
