//! Common test utilities and fixtures.

use std::sync::Arc;

use kc_auth::{
    AuthenticationFlowContext, Authenticator, AuthenticatorConfigModel, AuthenticatorFactory,
    FormData, GroupMembershipResolver, GroupUsernamePasswordForm, GroupUsernamePasswordFormFactory,
    PasswordHasherService, PasswordPolicy, UsernamePasswordValidator,
};
use kc_core::InMemoryEventListener;
use kc_model::{Credential, Group, User};
use kc_session::AuthenticationSession;
use kc_storage::{CredentialProvider, GroupProvider, InMemoryStore, UserProvider};
use uuid::Uuid;

/// Password shared by every seeded user.
pub const PASSWORD: &str = "correct horse battery staple";

/// Test environment: one realm in an in-memory store with the group form
/// registered.
///
/// Seeded groups: `/org`, `/org/Eng`, `/org/Sales`, `/Admins`.
/// Seeded users: `alice` (`/org/Eng`, `/Admins`), `bob` (`/org/Sales`),
/// `carol` (disabled, `/org/Eng`).
pub struct TestEnv {
    /// Realm all fixtures live in.
    pub realm_id: Uuid,
    /// Backing store.
    pub store: Arc<InMemoryStore>,
    /// Captures login events.
    pub listener: Arc<InMemoryEventListener>,
    /// Registered factory.
    pub factory: GroupUsernamePasswordFormFactory,
    hasher: PasswordHasherService,
}

impl TestEnv {
    /// Creates and seeds a new environment.
    pub async fn new() -> anyhow::Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("kc_auth=debug")
            .with_test_writer()
            .try_init();

        let realm_id = Uuid::now_v7();
        let store = Arc::new(InMemoryStore::new());
        let hasher = PasswordHasherService::new(PasswordPolicy::new().memory_cost(1024).time_cost(1));

        let validator = UsernamePasswordValidator::new(store.clone(), store.clone())
            .with_hasher(hasher.clone());
        let resolver = GroupMembershipResolver::new(store.clone(), store.clone());
        let form = GroupUsernamePasswordForm::new(Arc::new(validator), resolver);

        let env = Self {
            realm_id,
            store,
            listener: Arc::new(InMemoryEventListener::new()),
            factory: GroupUsernamePasswordFormFactory::new(form),
            hasher,
        };

        let org = env.create_group("org", None).await?;
        let eng = env.create_group("Eng", Some(org.id)).await?;
        let sales = env.create_group("Sales", Some(org.id)).await?;
        let admins = env.create_group("Admins", None).await?;

        env.create_user(User::new(realm_id, "alice").with_email("alice@example.com"), &[&eng, &admins])
            .await?;
        env.create_user(User::new(realm_id, "bob"), &[&sales]).await?;
        env.create_user(User::new(realm_id, "carol").with_enabled(false), &[&eng])
            .await?;

        Ok(env)
    }

    /// Creates a group, nested under `parent` when given.
    pub async fn create_group(&self, name: &str, parent: Option<Uuid>) -> anyhow::Result<Group> {
        let group = match parent {
            Some(parent_id) => Group::new_child(self.realm_id, parent_id, name),
            None => Group::new(self.realm_id, name),
        };
        GroupProvider::create(self.store.as_ref(), &group).await?;
        Ok(group)
    }

    /// Creates a user with [`PASSWORD`] and the given memberships, in order.
    pub async fn create_user(&self, user: User, groups: &[&Group]) -> anyhow::Result<User> {
        UserProvider::create(self.store.as_ref(), &user).await?;

        let hash = self.hasher.hash(PASSWORD)?;
        CredentialProvider::create(
            self.store.as_ref(),
            &Credential::new_password(user.id, self.realm_id, hash),
        )
        .await?;

        for group in groups {
            self.store
                .add_to_group(self.realm_id, user.id, group.id)
                .await?;
        }
        Ok(user)
    }

    /// The authenticator handed out by the factory.
    pub fn authenticator(&self) -> Arc<dyn Authenticator> {
        self.factory.create()
    }

    /// A new authentication session in the test realm.
    pub fn session(&self) -> AuthenticationSession {
        AuthenticationSession::new(self.realm_id, Uuid::now_v7(), "openid-connect")
    }

    /// A flow context for a fresh session.
    pub fn context(&self) -> AuthenticationFlowContext {
        AuthenticationFlowContext::new(self.session(), self.listener.clone())
    }

    /// A flow context carrying a login form submission.
    pub fn login(
        &self,
        username: &str,
        password: &str,
        group: &str,
        config: Option<AuthenticatorConfigModel>,
    ) -> AuthenticationFlowContext {
        let form = FormData::new()
            .with("username", username)
            .with("password", password)
            .with("group", group);

        let ctx = self.context().with_form(form);
        match config {
            Some(config) => ctx.with_config(config),
            None => ctx,
        }
    }
}
