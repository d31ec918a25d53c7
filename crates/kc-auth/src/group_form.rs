//! Username/password form with group membership enforcement.
//!
//! [`GroupUsernamePasswordForm`] validates credentials, then checks the
//! submitted group against the user's memberships. On success the group's
//! path (or bare name) is written as a user session note so that protocol
//! mappers can put it into tokens.

use std::sync::Arc;

use async_trait::async_trait;
use kc_core::errors;
use kc_model::User;
use kc_session::notes;
use kc_storage::{GroupProvider, UserProvider};

use crate::authenticator::Authenticator;
use crate::config::GroupFormConfig;
use crate::error::{AuthError, AuthResult};
use crate::flow::{AuthenticationFlowContext, FlowError};
use crate::forms::{fields, messages, Challenge, FormData, FormMessage, LoginForms};
use crate::username_password::CredentialValidator;

/// Provider ID of the group form authenticator.
pub const PROVIDER_ID: &str = "auth-group-username-password-form";

/// Template rendered for the group login page.
pub const LOGIN_GROUP_TEMPLATE: &str = "login-group.ftl";

/// Finds which of a user's groups a submitted group name refers to.
#[derive(Clone)]
pub struct GroupMembershipResolver {
    users: Arc<dyn UserProvider>,
    groups: Arc<dyn GroupProvider>,
}

impl std::fmt::Debug for GroupMembershipResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupMembershipResolver").finish_non_exhaustive()
    }
}

impl GroupMembershipResolver {
    /// Creates a resolver over the given stores.
    #[must_use]
    pub fn new(users: Arc<dyn UserProvider>, groups: Arc<dyn GroupProvider>) -> Self {
        Self { users, groups }
    }

    /// Resolves `group_name` against the memberships of `user`.
    ///
    /// The first membership whose name equals `group_name` ignoring case
    /// wins. Returns its full path or bare name depending on `config`, or
    /// `None` when `group_name` is absent, empty or matches nothing.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if a store lookup fails.
    pub async fn resolve(
        &self,
        user: &User,
        group_name: Option<&str>,
        config: &GroupFormConfig,
    ) -> AuthResult<Option<String>> {
        let Some(group_name) = group_name.filter(|name| !name.is_empty()) else {
            return Ok(None);
        };

        let memberships = self.users.get_groups(user.realm_id, user.id).await?;
        for group_id in memberships {
            let Some(group) = self.groups.get_by_id(user.realm_id, group_id).await? else {
                tracing::warn!(%group_id, user_id = %user.id, "membership refers to a missing group");
                continue;
            };
            if !group.name_matches(group_name) {
                continue;
            }

            let identity = if config.full_path() {
                self.groups.get_path(user.realm_id, group.id).await?
            } else {
                group.name
            };
            return Ok(Some(identity));
        }

        Ok(None)
    }
}

/// Writes the resolved group identity as a user session note.
///
/// Returns `false` without touching the session when the note is disabled.
///
/// # Errors
///
/// Returns `AuthError::InvalidState` if the flow has already completed.
pub fn write_group_note(
    context: &mut AuthenticationFlowContext,
    config: &GroupFormConfig,
    identity: &str,
) -> AuthResult<bool> {
    let Some(note_name) = config.note_name() else {
        return Ok(false);
    };
    context.set_user_session_note(note_name, identity)?;
    Ok(true)
}

/// Login form asking for username, password and group.
///
/// Stateless; one instance is shared by every login attempt.
#[derive(Clone)]
pub struct GroupUsernamePasswordForm {
    validator: Arc<dyn CredentialValidator>,
    resolver: GroupMembershipResolver,
}

impl std::fmt::Debug for GroupUsernamePasswordForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupUsernamePasswordForm")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl GroupUsernamePasswordForm {
    /// Creates the form from its two validation stages.
    #[must_use]
    pub fn new(validator: Arc<dyn CredentialValidator>, resolver: GroupMembershipResolver) -> Self {
        Self {
            validator,
            resolver,
        }
    }

    /// Runs credential validation, then group validation.
    ///
    /// Returns `false` once a failure challenge has been issued.
    async fn validate_form(&self, context: &mut AuthenticationFlowContext) -> AuthResult<bool> {
        let form = context.form().clone();
        let config = GroupFormConfig::from_model(context.config());

        if !self
            .validator
            .validate_user_and_password(context, &form, self)
            .await?
        {
            return Ok(false);
        }

        let user = context.user().cloned().ok_or(AuthError::MissingUser)?;
        let identity = self
            .resolver
            .resolve(&user, form.first(fields::GROUP), &config)
            .await?;

        let Some(identity) = identity else {
            tracing::debug!(user_id = %user.id, "submitted group does not match any membership");
            context.record_error(errors::USER_NOT_FOUND)?;
            let challenge = self.challenge(
                &form,
                Some(FormMessage::field(fields::GROUP, self.default_challenge_message())),
            );
            context.failure_challenge(FlowError::InvalidUser, challenge)?;
            context.clear_user()?;
            return Ok(false);
        };

        write_group_note(context, &config, &identity)?;
        Ok(true)
    }
}

impl LoginForms for GroupUsernamePasswordForm {
    fn default_challenge_message(&self) -> &'static str {
        messages::INVALID_USER
    }

    fn challenge(&self, form: &FormData, error: Option<FormMessage>) -> Challenge {
        Challenge::new(LOGIN_GROUP_TEMPLATE, form).with_error(error)
    }
}

#[async_trait]
impl Authenticator for GroupUsernamePasswordForm {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn display_name(&self) -> &'static str {
        "Group Username Password Form"
    }

    fn requires_user(&self) -> bool {
        false
    }

    fn is_configurable(&self) -> bool {
        true
    }

    async fn authenticate(&self, context: &mut AuthenticationFlowContext) -> AuthResult<()> {
        let mut form = FormData::new();
        if let Some(hint) = context.session().get_client_note(notes::LOGIN_HINT) {
            form.add(fields::USERNAME, hint);
        } else if let Some(username) = context.remember_me_username() {
            form.add(fields::USERNAME, username);
            form.add(fields::REMEMBER_ME, "on");
        }

        context.remove_auth_note(notes::USER_SET_BEFORE_USERNAME_PASSWORD_AUTH)?;
        context.challenge(self.challenge(&form, None))
    }

    async fn action(&self, context: &mut AuthenticationFlowContext) -> AuthResult<()> {
        if context.form().contains_key(fields::CANCEL) {
            return context.cancel_login();
        }

        if !self.validate_form(context).await? {
            return Ok(());
        }

        context.success()
    }
}
