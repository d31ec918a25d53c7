//! # kc-session
//!
//! Authentication sessions for Keycloak Rust.
//!
//! An [`AuthenticationSession`] lives for the duration of a login flow and
//! carries notes between authenticators and on to the user session.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod auth_session;

pub use auth_session::{notes, AuthenticationSession};
