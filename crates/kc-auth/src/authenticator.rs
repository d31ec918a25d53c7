//! Authenticator and factory traits.
//!
//! An [`Authenticator`] is one step of a login flow. The flow engine calls
//! [`Authenticator::authenticate`] when the step is first reached and
//! [`Authenticator::action`] for each submission of the page it presented.
//! Outcomes are reported through the [`AuthenticationFlowContext`], never
//! through the return value: `Err` means the attempt could not be processed.

use std::sync::Arc;

use async_trait::async_trait;
use kc_model::User;
use serde::{Deserialize, Serialize};

use crate::error::AuthResult;
use crate::flow::AuthenticationFlowContext;

/// Requirement level of a flow execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Requirement {
    /// Must succeed.
    Required,
    /// Runs only if the user has it configured.
    Conditional,
    /// One of several alternatives.
    Alternative,
    /// Never runs.
    Disabled,
}

/// Type of an administrator-facing configuration property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigPropertyType {
    /// Free text.
    String,
    /// `true` or `false`.
    Boolean,
}

/// Describes one option of an authenticator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigProperty {
    /// Option key.
    pub name: &'static str,
    /// Label shown in the admin console.
    pub label: &'static str,
    /// Help text shown in the admin console.
    pub help_text: &'static str,
    /// Value type.
    pub property_type: ConfigPropertyType,
    /// Default value, as stored.
    pub default_value: &'static str,
}

/// A step of a login flow.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns the authenticator ID.
    fn id(&self) -> &'static str;

    /// Returns the display name.
    fn display_name(&self) -> &'static str;

    /// Checks if a user must already be identified before this step runs.
    fn requires_user(&self) -> bool {
        true
    }

    /// Checks if this authenticator accepts a configuration.
    fn is_configurable(&self) -> bool {
        false
    }

    /// Checks if `user` has whatever this step needs set up.
    fn configured_for(&self, _user: &User) -> bool {
        true
    }

    /// Runs the step for the first time, typically by presenting a page.
    async fn authenticate(&self, context: &mut AuthenticationFlowContext) -> AuthResult<()>;

    /// Processes a submission of the page this step presented.
    async fn action(&self, context: &mut AuthenticationFlowContext) -> AuthResult<()> {
        self.authenticate(context).await
    }
}

/// Registers an authenticator and describes it to administrators.
pub trait AuthenticatorFactory: Send + Sync {
    /// Returns the provider ID.
    fn id(&self) -> &'static str;

    /// Name shown in the admin console.
    fn display_type(&self) -> &'static str;

    /// Description shown in the admin console.
    fn help_text(&self) -> &'static str;

    /// Credential category this authenticator belongs to.
    fn reference_category(&self) -> &'static str;

    /// Checks if executions of this authenticator accept a configuration.
    fn is_configurable(&self) -> bool;

    /// Checks if users may set up this authenticator themselves.
    fn is_user_setup_allowed(&self) -> bool;

    /// Requirement levels an administrator may choose from.
    fn requirement_choices(&self) -> &'static [Requirement];

    /// Configuration options.
    fn config_properties(&self) -> &'static [ConfigProperty];

    /// Returns the authenticator instance.
    fn create(&self) -> Arc<dyn Authenticator>;
}
