//! Group username/password login integration tests.

use kc_auth::{
    AuthError, AuthenticationFlowContext, AuthenticatorConfigModel, FlowError, FlowStatus, FormData,
    FormMessage,
};
use kc_core::{details, errors, EventOutcome};
use kc_session::notes;

use crate::common::{TestEnv, PASSWORD};

fn config(note_name: Option<&str>, full_path: Option<&str>) -> AuthenticatorConfigModel {
    let mut config = AuthenticatorConfigModel::new("group-form");
    if let Some(name) = note_name {
        config = config.with("noteName", name);
    }
    if let Some(full_path) = full_path {
        config = config.with("fullPath", full_path);
    }
    config
}

fn failure_error(status: &FlowStatus) -> Option<FlowError> {
    match status {
        FlowStatus::FailureChallenge { error, .. } => Some(*error),
        _ => None,
    }
}

/// A member of `/org/Eng` logging in with group `eng` gets the full path.
#[tokio::test]
async fn test_login_records_full_group_path() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let mut ctx = env.login("alice", PASSWORD, "eng", None);

    env.authenticator().action(&mut ctx).await?;

    assert_eq!(ctx.status(), &FlowStatus::Success);
    assert_eq!(ctx.session().get_user_session_note("group"), Some("/org/Eng"));
    assert_eq!(ctx.session().user_session_notes.len(), 1);
    assert!(ctx.session().is_user_authenticated());
    assert!(env.listener.events().is_empty());
    Ok(())
}

/// With `fullPath=false` the bare group name is recorded.
#[tokio::test]
async fn test_login_records_bare_group_name() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let mut ctx = env.login("alice", PASSWORD, "eng", Some(config(None, Some("false"))));

    env.authenticator().action(&mut ctx).await?;

    assert_eq!(ctx.status(), &FlowStatus::Success);
    assert_eq!(ctx.session().get_user_session_note("group"), Some("Eng"));
    Ok(())
}

/// A custom note name receives the group.
#[tokio::test]
async fn test_login_uses_configured_note_name() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let mut ctx = env.login(
        "alice",
        PASSWORD,
        "Admins",
        Some(config(Some("department"), Some("true"))),
    );

    env.authenticator().action(&mut ctx).await?;

    assert_eq!(ctx.status(), &FlowStatus::Success);
    assert_eq!(ctx.session().get_user_session_note("department"), Some("/Admins"));
    assert_eq!(ctx.session().get_user_session_note("group"), None);
    Ok(())
}

/// A group the user is not a member of is rejected after valid credentials.
#[tokio::test]
async fn test_login_rejects_foreign_group() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let mut ctx = env.login("bob", PASSWORD, "eng", None);

    env.authenticator().action(&mut ctx).await?;

    assert_eq!(failure_error(ctx.status()), Some(FlowError::InvalidUser));
    let challenge = ctx.status().challenge().expect("failure challenge");
    assert_eq!(challenge.template, "login-group.ftl");
    assert_eq!(
        challenge.error,
        Some(FormMessage::field("group", "invalidUserMessage"))
    );
    assert_eq!(challenge.login.username.as_deref(), Some("bob"));
    assert_eq!(challenge.login.group.as_deref(), Some("eng"));
    let form_data = challenge.form_data.as_ref().expect("re-populated form");
    assert_eq!(form_data.first("username"), Some("bob"));
    assert!(!form_data.contains_key("password"));

    assert!(ctx.user().is_none());
    assert!(!ctx.session().is_user_authenticated());
    assert!(ctx.session().user_session_notes.is_empty());

    let events = env.listener.errors(errors::USER_NOT_FOUND);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome, EventOutcome::Failure);
    assert_eq!(events[0].detail(details::USERNAME), Some("bob"));
    Ok(())
}

/// An empty or missing group takes the same path as a foreign group.
#[tokio::test]
async fn test_login_rejects_missing_group() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let mut empty = env.login("alice", PASSWORD, "", None);
    env.authenticator().action(&mut empty).await?;
    assert_eq!(failure_error(empty.status()), Some(FlowError::InvalidUser));

    let form = FormData::new()
        .with("username", "alice")
        .with("password", PASSWORD);
    let mut missing = env.context().with_form(form);
    env.authenticator().action(&mut missing).await?;
    assert_eq!(failure_error(missing.status()), Some(FlowError::InvalidUser));

    assert_eq!(env.listener.errors(errors::USER_NOT_FOUND).len(), 2);
    assert!(empty.session().user_session_notes.is_empty());
    assert!(missing.session().user_session_notes.is_empty());
    Ok(())
}

/// Group names match regardless of case, and the stored name is reported.
#[tokio::test]
async fn test_group_match_ignores_case() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let mut ctx = env.login("alice", PASSWORD, "aDmInS", Some(config(None, Some("false"))));

    env.authenticator().action(&mut ctx).await?;

    assert_eq!(ctx.status(), &FlowStatus::Success);
    assert_eq!(ctx.session().get_user_session_note("group"), Some("Admins"));
    Ok(())
}

/// Cancel ends the attempt without looking at the credentials.
#[tokio::test]
async fn test_cancel_skips_validation() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let form = FormData::new()
        .with("username", "alice")
        .with("password", PASSWORD)
        .with("group", "eng")
        .with("cancel", "");
    let mut ctx = env.context().with_form(form);

    env.authenticator().action(&mut ctx).await?;

    assert_eq!(ctx.status(), &FlowStatus::Cancelled);
    assert!(ctx.user().is_none());
    assert!(ctx.session().user_session_notes.is_empty());
    assert!(ctx.session().get_note(notes::ATTEMPTED_USERNAME).is_none());
    assert!(env.listener.events().is_empty());
    Ok(())
}

/// An empty note name disables the note without failing the login.
#[tokio::test]
async fn test_empty_note_name_skips_note() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let mut ctx = env.login("alice", PASSWORD, "eng", Some(config(Some(""), None)));

    env.authenticator().action(&mut ctx).await?;

    assert_eq!(ctx.status(), &FlowStatus::Success);
    assert!(ctx.session().user_session_notes.is_empty());
    Ok(())
}

/// A wrong password is reported by the credential stage; the group is never checked.
#[tokio::test]
async fn test_wrong_password() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let mut ctx = env.login("alice", "wrong", "eng", None);

    env.authenticator().action(&mut ctx).await?;

    assert_eq!(failure_error(ctx.status()), Some(FlowError::InvalidCredentials));
    let challenge = ctx.status().challenge().expect("failure challenge");
    assert_eq!(
        challenge.error,
        Some(FormMessage::field("password", "invalidUserMessage"))
    );
    assert!(ctx.user().is_none());
    assert!(ctx.session().user_session_notes.is_empty());
    assert_eq!(env.listener.errors(errors::INVALID_USER_CREDENTIALS).len(), 1);
    assert!(env.listener.errors(errors::USER_NOT_FOUND).is_empty());
    Ok(())
}

/// Unknown and disabled users are rejected by the credential stage.
#[tokio::test]
async fn test_unknown_and_disabled_users() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let mut unknown = env.login("mallory", PASSWORD, "eng", None);
    env.authenticator().action(&mut unknown).await?;
    assert_eq!(failure_error(unknown.status()), Some(FlowError::InvalidUser));

    let mut disabled = env.login("carol", PASSWORD, "eng", None);
    env.authenticator().action(&mut disabled).await?;
    assert_eq!(failure_error(disabled.status()), Some(FlowError::UserDisabled));
    assert!(disabled.session().user_session_notes.is_empty());

    assert_eq!(env.listener.errors(errors::USER_NOT_FOUND).len(), 1);
    assert_eq!(env.listener.errors(errors::USER_DISABLED).len(), 1);
    Ok(())
}

/// Login by email address works for the group form too.
#[tokio::test]
async fn test_login_with_email() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let mut ctx = env.login("alice@example.com", PASSWORD, "eng", None);

    env.authenticator().action(&mut ctx).await?;

    assert_eq!(ctx.status(), &FlowStatus::Success);
    assert_eq!(ctx.user().map(|u| u.username.as_str()), Some("alice"));
    Ok(())
}

/// A failed attempt may be retried in the same context.
#[tokio::test]
async fn test_retry_after_group_failure() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let authenticator = env.authenticator();
    let mut ctx = env.login("alice", PASSWORD, "sales", None);

    authenticator.action(&mut ctx).await?;
    assert_eq!(failure_error(ctx.status()), Some(FlowError::InvalidUser));

    let retry = FormData::new()
        .with("username", "alice")
        .with("password", PASSWORD)
        .with("group", "eng");
    let mut ctx = AuthenticationFlowContext::new(ctx.into_session(), env.listener.clone())
        .with_form(retry);
    authenticator.action(&mut ctx).await?;

    assert_eq!(ctx.status(), &FlowStatus::Success);
    assert_eq!(ctx.session().get_user_session_note("group"), Some("/org/Eng"));
    Ok(())
}

/// The initial page pre-fills the login hint.
#[tokio::test]
async fn test_authenticate_prefills_login_hint() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let session = env.session().with_client_note(notes::LOGIN_HINT, "alice");
    let mut ctx = AuthenticationFlowContext::new(session, env.listener.clone())
        .with_remember_me_username("bob");
    ctx.set_auth_note(notes::USER_SET_BEFORE_USERNAME_PASSWORD_AUTH, "true")?;

    env.authenticator().authenticate(&mut ctx).await?;

    let FlowStatus::Challenge(challenge) = ctx.status() else {
        panic!("expected a challenge, got {:?}", ctx.status());
    };
    assert_eq!(challenge.template, "login-group.ftl");
    assert_eq!(challenge.login.username.as_deref(), Some("alice"));
    assert!(!challenge.login.remember_me);
    assert!(challenge.error.is_none());
    assert!(ctx
        .session()
        .get_note(notes::USER_SET_BEFORE_USERNAME_PASSWORD_AUTH)
        .is_none());
    assert!(!ctx.is_terminal());
    Ok(())
}

/// Without a hint the remembered username is used and remember-me is ticked.
#[tokio::test]
async fn test_authenticate_prefills_remembered_username() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let mut ctx = env.context().with_remember_me_username("bob");

    env.authenticator().authenticate(&mut ctx).await?;

    let challenge = ctx.status().challenge().expect("challenge");
    assert_eq!(challenge.login.username.as_deref(), Some("bob"));
    assert!(challenge.login.remember_me);

    let mut blank = env.context();
    env.authenticator().authenticate(&mut blank).await?;
    let challenge = blank.status().challenge().expect("challenge");
    assert!(challenge.form_data.is_none());
    assert_eq!(challenge.login.username, None);
    Ok(())
}

/// After success the attempt is closed to further changes.
#[tokio::test]
async fn test_completed_attempt_is_final() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let mut ctx = env.login("alice", PASSWORD, "eng", None);
    env.authenticator().action(&mut ctx).await?;
    assert_eq!(ctx.status(), &FlowStatus::Success);

    let again = env.authenticator().action(&mut ctx).await;
    assert!(matches!(again, Err(AuthError::InvalidState(_))));
    assert!(ctx.set_user_session_note("group", "/org/Sales").is_err());
    assert_eq!(ctx.session().get_user_session_note("group"), Some("/org/Eng"));
    Ok(())
}

/// Remember-me on a successful login is stored as an auth note.
#[tokio::test]
async fn test_remember_me_note() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let form = FormData::new()
        .with("username", "alice")
        .with("password", PASSWORD)
        .with("group", "eng")
        .with("rememberMe", "on");
    let mut ctx = env.context().with_form(form);

    env.authenticator().action(&mut ctx).await?;

    assert_eq!(ctx.status(), &FlowStatus::Success);
    assert_eq!(ctx.session().get_note(notes::REMEMBER_ME), Some("true"));
    Ok(())
}
