//! # kc-auth
//!
//! Login-flow authenticators for Keycloak Rust.
//!
//! The centrepiece is the group username/password form: a login page that
//! asks for a group next to the usual credentials, accepts the login only
//! when the user belongs to that group, and records the group in a user
//! session note.
//!
//! ## Features
//!
//! - Request-scoped flow context with a single terminal transition
//! - Argon2id password verification (NIST SP 800-63B compliant)
//! - Case-insensitive group membership resolution
//! - Admin-facing factory metadata and configuration properties
//!
//! ## NIST 800-53 Rev5 Controls
//!
//! - IA-2: Identification and Authentication
//! - AC-3: Access Enforcement (group membership gate)
//! - AU-2: Event Logging (failed logins)
//!
//! ## Example
//!
//! ```ignore
//! use kc_auth::{AuthenticationFlowContext, AuthenticatorFactory, FormData};
//!
//! let authenticator = factory.create();
//! let mut ctx = AuthenticationFlowContext::new(session, listener)
//!     .with_form(FormData::new()
//!         .with("username", "alice")
//!         .with("password", "secret")
//!         .with("group", "eng"));
//! authenticator.action(&mut ctx).await?;
//! assert_eq!(ctx.session().get_user_session_note("group"), Some("/org/Eng"));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod authenticator;
pub mod config;
pub mod error;
pub mod factory;
pub mod flow;
pub mod forms;
pub mod group_form;
pub mod password;
pub mod username_password;

pub use authenticator::{
    Authenticator, AuthenticatorFactory, ConfigProperty, ConfigPropertyType, Requirement,
};
pub use config::{AuthenticatorConfigModel, GroupFormConfig};
pub use error::{AuthError, AuthResult};
pub use factory::GroupUsernamePasswordFormFactory;
pub use flow::{AuthenticationFlowContext, FlowError, FlowStatus};
pub use forms::{Challenge, FormData, FormMessage, GroupLoginBean, LoginForms};
pub use group_form::{write_group_note, GroupMembershipResolver, GroupUsernamePasswordForm};
pub use password::{PasswordHasherService, PasswordPolicy};
pub use username_password::{CredentialValidator, UsernamePasswordValidator};
