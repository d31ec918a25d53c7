//! Username and password validation.
//!
//! [`CredentialValidator`] is the credential stage shared by login forms.
//! On rejection it records the event, presents the calling form's
//! challenge and returns `false`; on success the user is bound to the
//! flow context.

use std::sync::Arc;

use async_trait::async_trait;
use kc_core::{details, errors};
use kc_model::User;
use kc_session::notes;
use kc_storage::{CredentialProvider, UserProvider};

use crate::error::AuthResult;
use crate::flow::{AuthenticationFlowContext, FlowError};
use crate::forms::{fields, messages, FormData, FormMessage, LoginForms};
use crate::password::PasswordHasherService;

/// Validates the username and password of a login submission.
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    /// Resolves the submitted username to a user and binds it.
    ///
    /// Returns the bound user, or `None` after issuing a failure challenge.
    async fn validate_user(
        &self,
        context: &mut AuthenticationFlowContext,
        form: &FormData,
        forms: &dyn LoginForms,
    ) -> AuthResult<Option<User>>;

    /// Checks the submitted password of `user`, then that the account is
    /// enabled.
    ///
    /// On mismatch issues a failure challenge, unbinds the user when
    /// `clear_user` is set and returns `false`. A disabled account is
    /// reported only after a matching password and is always unbound.
    async fn validate_password(
        &self,
        context: &mut AuthenticationFlowContext,
        user: &User,
        form: &FormData,
        clear_user: bool,
        forms: &dyn LoginForms,
    ) -> AuthResult<bool>;

    /// Validates both stages, leaving the user bound only on success.
    async fn validate_user_and_password(
        &self,
        context: &mut AuthenticationFlowContext,
        form: &FormData,
        forms: &dyn LoginForms,
    ) -> AuthResult<bool> {
        context.clear_user()?;
        let Some(user) = self.validate_user(context, form, forms).await? else {
            return Ok(false);
        };
        self.validate_password(context, &user, form, true, forms)
            .await
    }
}

/// Argon2id hash of no real password, verified on rejection paths that
/// never reach a stored credential.
const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$Rf9LgG4ic8T0HTz9ChR2EsKSe04mOJkFll0yQCiW08k";

/// Validates credentials against the user and credential stores.
///
/// Every submission costs one password verification, whether or not the
/// user exists, and the account state is revealed only after the password
/// matched.
#[derive(Clone)]
pub struct UsernamePasswordValidator {
    users: Arc<dyn UserProvider>,
    credentials: Arc<dyn CredentialProvider>,
    hasher: PasswordHasherService,
    login_with_email: bool,
    remember_me_allowed: bool,
}

impl std::fmt::Debug for UsernamePasswordValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsernamePasswordValidator")
            .field("login_with_email", &self.login_with_email)
            .field("remember_me_allowed", &self.remember_me_allowed)
            .finish_non_exhaustive()
    }
}

impl UsernamePasswordValidator {
    /// Creates a validator that accepts usernames and email addresses.
    #[must_use]
    pub fn new(users: Arc<dyn UserProvider>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            users,
            credentials,
            hasher: PasswordHasherService::with_defaults(),
            login_with_email: true,
            remember_me_allowed: true,
        }
    }

    /// Sets the password hasher.
    #[must_use]
    pub fn with_hasher(mut self, hasher: PasswordHasherService) -> Self {
        self.hasher = hasher;
        self
    }

    /// Enables or disables login by email address.
    #[must_use]
    pub const fn with_login_with_email(mut self, allowed: bool) -> Self {
        self.login_with_email = allowed;
        self
    }

    /// Enables or disables the remember-me checkbox.
    #[must_use]
    pub const fn with_remember_me(mut self, allowed: bool) -> Self {
        self.remember_me_allowed = allowed;
        self
    }

    async fn find_user(&self, realm_id: uuid::Uuid, username: &str) -> AuthResult<Option<User>> {
        if let Some(user) = self.users.get_by_username(realm_id, username).await? {
            return Ok(Some(user));
        }
        if self.login_with_email && username.contains('@') {
            return Ok(self.users.get_by_email(realm_id, username).await?);
        }
        Ok(None)
    }

    fn verify_dummy(&self, password: &str) {
        if let Err(e) = self.hasher.matches(password, DUMMY_PASSWORD_HASH) {
            tracing::error!(error = %e, "dummy password hash is unreadable");
        }
    }

    async fn password_matches(&self, user: &User, password: &str) -> AuthResult<bool> {
        let Some(credential) = self
            .credentials
            .get_password(user.realm_id, user.id)
            .await?
        else {
            self.verify_dummy(password);
            return Ok(false);
        };

        match self.hasher.matches(password, &credential.secret_data) {
            Ok(matches) => Ok(matches),
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "stored password hash is unreadable");
                Ok(false)
            }
        }
    }

    fn reject(
        context: &mut AuthenticationFlowContext,
        form: &FormData,
        forms: &dyn LoginForms,
        event_error: &str,
        error: FlowError,
        message: FormMessage,
    ) -> AuthResult<()> {
        context.record_error(event_error)?;
        context.failure_challenge(error, forms.challenge(form, Some(message)))
    }
}

#[async_trait]
impl CredentialValidator for UsernamePasswordValidator {
    async fn validate_user(
        &self,
        context: &mut AuthenticationFlowContext,
        form: &FormData,
        forms: &dyn LoginForms,
    ) -> AuthResult<Option<User>> {
        let username = form
            .first(fields::USERNAME)
            .map(str::trim)
            .filter(|u| !u.is_empty());

        let Some(username) = username else {
            self.verify_dummy(form.first(fields::PASSWORD).unwrap_or_default());
            Self::reject(
                context,
                form,
                forms,
                errors::USER_NOT_FOUND,
                FlowError::InvalidUser,
                FormMessage::field(fields::USERNAME, forms.default_challenge_message()),
            )?;
            return Ok(None);
        };

        context.event_detail(details::USERNAME, username)?;
        context.set_auth_note(notes::ATTEMPTED_USERNAME, username)?;

        let realm_id = context.session().realm_id;
        let Some(user) = self.find_user(realm_id, username).await? else {
            tracing::debug!(%realm_id, username, "no user for submitted username");
            self.verify_dummy(form.first(fields::PASSWORD).unwrap_or_default());
            Self::reject(
                context,
                form,
                forms,
                errors::USER_NOT_FOUND,
                FlowError::InvalidUser,
                FormMessage::field(fields::USERNAME, forms.default_challenge_message()),
            )?;
            return Ok(None);
        };

        if self.remember_me_allowed
            && form
                .first(fields::REMEMBER_ME)
                .is_some_and(|v| v.eq_ignore_ascii_case("on"))
        {
            context.set_auth_note(notes::REMEMBER_ME, "true")?;
            context.event_detail(notes::REMEMBER_ME, "true")?;
        } else {
            context.remove_auth_note(notes::REMEMBER_ME)?;
        }

        context.set_user(user.clone())?;
        Ok(Some(user))
    }

    async fn validate_password(
        &self,
        context: &mut AuthenticationFlowContext,
        user: &User,
        form: &FormData,
        clear_user: bool,
        forms: &dyn LoginForms,
    ) -> AuthResult<bool> {
        let valid = match form.first(fields::PASSWORD) {
            Some(password) if !password.is_empty() => self.password_matches(user, password).await?,
            _ => {
                self.verify_dummy("");
                false
            }
        };

        if valid && user.enabled {
            return Ok(true);
        }

        if valid {
            tracing::debug!(user_id = %user.id, "login by disabled user");
            Self::reject(
                context,
                form,
                forms,
                errors::USER_DISABLED,
                FlowError::UserDisabled,
                FormMessage::global(messages::ACCOUNT_DISABLED),
            )?;
            context.clear_user()?;
            return Ok(false);
        }

        Self::reject(
            context,
            form,
            forms,
            errors::INVALID_USER_CREDENTIALS,
            FlowError::InvalidCredentials,
            FormMessage::field(fields::PASSWORD, forms.default_challenge_message()),
        )?;
        if clear_user {
            context.clear_user()?;
        }
        Ok(false)
    }
}
