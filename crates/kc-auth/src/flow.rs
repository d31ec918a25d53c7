//! Authentication flow context.
//!
//! One [`AuthenticationFlowContext`] exists per login attempt. It carries
//! the submitted form, the authenticator configuration, the user bound so
//! far and the attempt's [`FlowStatus`].
//!
//! Challenges may replace each other while the attempt is open. Success,
//! failure and cancel are terminal: exactly one of them may happen, and
//! every mutation after it fails with [`AuthError::InvalidState`].

use std::sync::Arc;

use kc_core::{details, Event, EventBuilder, EventListener, EventType};
use kc_model::User;
use kc_session::AuthenticationSession;

use crate::config::AuthenticatorConfigModel;
use crate::error::{AuthError, AuthResult};
use crate::forms::{Challenge, FormData};

/// Why an attempt failed or was re-challenged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowError {
    /// Unknown user, or a user that does not satisfy the form's checks.
    InvalidUser,
    /// Wrong or missing password.
    InvalidCredentials,
    /// The user account is disabled.
    UserDisabled,
}

/// State of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStatus {
    /// Nothing decided yet.
    Pending,
    /// Waiting for the user to submit the login page.
    Challenge(Challenge),
    /// The last submission was rejected; the login page is shown again.
    FailureChallenge {
        /// Reason for the rejection.
        error: FlowError,
        /// Page to show.
        challenge: Challenge,
    },
    /// The attempt succeeded.
    Success,
    /// The attempt failed without a retry.
    Failed {
        /// Reason for the failure.
        error: FlowError,
    },
    /// The user cancelled the login.
    Cancelled,
}

impl FlowStatus {
    /// Checks whether the attempt has ended.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed { .. } | Self::Cancelled)
    }

    /// Returns the pending challenge, if any.
    #[must_use]
    pub const fn challenge(&self) -> Option<&Challenge> {
        match self {
            Self::Challenge(challenge) | Self::FailureChallenge { challenge, .. } => {
                Some(challenge)
            }
            _ => None,
        }
    }
}

/// Request-scoped state of one login attempt.
#[derive(Debug)]
pub struct AuthenticationFlowContext {
    session: AuthenticationSession,
    form: FormData,
    config: Option<AuthenticatorConfigModel>,
    user: Option<User>,
    remember_me_username: Option<String>,
    event: EventBuilder,
    listener: Arc<dyn EventListener>,
    status: FlowStatus,
}

impl AuthenticationFlowContext {
    /// Creates a context for an attempt within `session`.
    #[must_use]
    pub fn new(session: AuthenticationSession, listener: Arc<dyn EventListener>) -> Self {
        let event = Event::builder(EventType::Login)
            .realm(session.realm_id)
            .client(session.client_id.to_string())
            .session(session.id.to_string())
            .detail(details::AUTH_METHOD, session.protocol.clone());

        Self {
            session,
            form: FormData::new(),
            config: None,
            user: None,
            remember_me_username: None,
            event,
            listener,
            status: FlowStatus::Pending,
        }
    }

    /// Sets the decoded form submission.
    #[must_use]
    pub fn with_form(mut self, form: FormData) -> Self {
        self.form = form;
        self
    }

    /// Sets the authenticator configuration of the current execution.
    #[must_use]
    pub fn with_config(mut self, config: AuthenticatorConfigModel) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the username remembered from an earlier login (remember-me cookie).
    #[must_use]
    pub fn with_remember_me_username(mut self, username: impl Into<String>) -> Self {
        self.remember_me_username = Some(username.into());
        self
    }

    /// Sets the client IP address recorded on events.
    #[must_use]
    pub fn with_ip_address(mut self, ip: impl Into<String>) -> Self {
        self.event = self.event.ip_address(ip);
        self
    }

    /// The authentication session.
    #[must_use]
    pub const fn session(&self) -> &AuthenticationSession {
        &self.session
    }

    /// Consumes the context, returning the authentication session.
    #[must_use]
    pub fn into_session(self) -> AuthenticationSession {
        self.session
    }

    /// The submitted form.
    #[must_use]
    pub const fn form(&self) -> &FormData {
        &self.form
    }

    /// The authenticator configuration, if one is attached.
    #[must_use]
    pub const fn config(&self) -> Option<&AuthenticatorConfigModel> {
        self.config.as_ref()
    }

    /// The user bound to this attempt.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The remembered username, if any.
    #[must_use]
    pub fn remember_me_username(&self) -> Option<&str> {
        self.remember_me_username.as_deref()
    }

    /// The current status.
    #[must_use]
    pub const fn status(&self) -> &FlowStatus {
        &self.status
    }

    /// Checks whether the attempt has ended.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    fn ensure_open(&self) -> AuthResult<()> {
        if self.status.is_terminal() {
            return Err(AuthError::InvalidState("authentication flow already completed"));
        }
        Ok(())
    }

    /// Binds `user` to the attempt.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidState` after a terminal transition.
    pub fn set_user(&mut self, user: User) -> AuthResult<()> {
        self.ensure_open()?;
        self.session.set_authenticated_user(user.id);
        self.event = self.event.clone().user(user.id);
        self.user = Some(user);
        Ok(())
    }

    /// Unbinds the current user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidState` after a terminal transition.
    pub fn clear_user(&mut self) -> AuthResult<()> {
        self.ensure_open()?;
        self.session.clear_authenticated_user();
        self.event = self.event.clone().without_user();
        self.user = None;
        Ok(())
    }

    /// Adds a detail to the attempt's event.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidState` after a terminal transition.
    pub fn event_detail(&mut self, key: &str, value: impl Into<String>) -> AuthResult<()> {
        self.ensure_open()?;
        self.event = self.event.clone().detail(key, value);
        Ok(())
    }

    /// Emits a login error event with the given error code.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidState` after a terminal transition.
    pub fn record_error(&mut self, error: &str) -> AuthResult<()> {
        self.ensure_open()?;
        let event = self
            .event
            .clone()
            .with_type(EventType::LoginError)
            .failure(error)
            .build();

        tracing::warn!(
            error,
            session_id = %self.session.id,
            user_id = ?event.user_id,
            "login attempt rejected"
        );
        self.listener.on_event(event);
        Ok(())
    }

    /// Sets an auth note.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidState` after a terminal transition.
    pub fn set_auth_note(&mut self, key: &str, value: impl Into<String>) -> AuthResult<()> {
        self.ensure_open()?;
        self.session.set_note(key, value);
        Ok(())
    }

    /// Removes an auth note.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidState` after a terminal transition.
    pub fn remove_auth_note(&mut self, key: &str) -> AuthResult<()> {
        self.ensure_open()?;
        self.session.remove_note(key);
        Ok(())
    }

    /// Sets a user session note, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidState` after a terminal transition.
    pub fn set_user_session_note(&mut self, key: &str, value: impl Into<String>) -> AuthResult<()> {
        self.ensure_open()?;
        self.session.set_user_session_note(key, value);
        Ok(())
    }

    /// Presents a challenge.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidState` after a terminal transition.
    pub fn challenge(&mut self, challenge: Challenge) -> AuthResult<()> {
        self.ensure_open()?;
        self.status = FlowStatus::Challenge(challenge);
        Ok(())
    }

    /// Rejects the submission and presents the challenge again.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidState` after a terminal transition.
    pub fn failure_challenge(&mut self, error: FlowError, challenge: Challenge) -> AuthResult<()> {
        self.ensure_open()?;
        self.status = FlowStatus::FailureChallenge { error, challenge };
        Ok(())
    }

    /// Ends the attempt successfully.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidState` after a terminal transition.
    pub fn success(&mut self) -> AuthResult<()> {
        self.ensure_open()?;
        tracing::debug!(
            session_id = %self.session.id,
            user_id = ?self.session.authenticated_user_id,
            "authenticator succeeded"
        );
        self.status = FlowStatus::Success;
        Ok(())
    }

    /// Ends the attempt with a failure.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidState` after a terminal transition.
    pub fn failure(&mut self, error: FlowError) -> AuthResult<()> {
        self.ensure_open()?;
        self.status = FlowStatus::Failed { error };
        Ok(())
    }

    /// Ends the attempt because the user cancelled.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidState` after a terminal transition.
    pub fn cancel_login(&mut self) -> AuthResult<()> {
        self.ensure_open()?;
        tracing::debug!(session_id = %self.session.id, "login cancelled");
        self.status = FlowStatus::Cancelled;
        Ok(())
    }
}
