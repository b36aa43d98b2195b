//! Async client library to interact with the Datadog API.
use std::sync::Arc;

use anyhow::Result;

mod error;

pub mod models;

#[cfg(any(test, feature = "test-fixture"))]
pub mod fixture;

pub use self::error::UserNotFound;

use self::models::ApiKeyValidation;
use self::models::RoleList;
use self::models::RoleUserRequest;
use self::models::TeamList;
use self::models::User;
use self::models::UserList;
use self::models::UserTeamList;
use self::models::UserTeamRequest;

/// Async API client to Datadog.
///
/// Cheap to clone: all clones share the same backend so a single handle can
/// be injected into every component that talks to the API.
#[derive(Clone)]
pub struct Client {
    backend: Arc<dyn IDatadog>,
}

impl Client {
    /// Exercise the configured API and application keys.
    pub async fn validate(&self) -> Result<ApiKeyValidation> {
        self.backend.validate().await
    }

    /// Fetch a single user by upstream ID.
    pub async fn user_get(&self, user: &str) -> Result<User> {
        self.backend.user_get(user).await
    }

    /// List one page of users on the account.
    pub async fn users_list(&self, page: u64) -> Result<UserList> {
        self.backend.users_list(page).await
    }

    /// List one page of teams on the account.
    pub async fn teams_list(&self, page: u64) -> Result<TeamList> {
        self.backend.teams_list(page).await
    }

    /// List one page of membership records for a team.
    pub async fn team_memberships(&self, team: &str, page: u64) -> Result<UserTeamList> {
        self.backend.team_memberships(team, page).await
    }

    /// Add a user to a team, optionally with the elevated team role.
    pub async fn team_membership_create(&self, team: &str, request: UserTeamRequest) -> Result<()> {
        self.backend.team_membership_create(team, request).await
    }

    /// Remove a user from a team.
    pub async fn team_membership_delete(&self, team: &str, user: &str) -> Result<()> {
        self.backend.team_membership_delete(team, user).await
    }

    /// List one page of roles on the account.
    pub async fn roles_list(&self, page: u64) -> Result<RoleList> {
        self.backend.roles_list(page).await
    }

    /// List one page of users holding a role.
    pub async fn role_users(&self, role: &str, page: u64) -> Result<UserList> {
        self.backend.role_users(role, page).await
    }

    /// Assign a role to a user.
    pub async fn role_user_add(&self, role: &str, request: RoleUserRequest) -> Result<()> {
        self.backend.role_user_add(role, request).await
    }

    /// Remove a role from a user.
    pub async fn role_user_remove(&self, role: &str, request: RoleUserRequest) -> Result<()> {
        self.backend.role_user_remove(role, request).await
    }
}

impl<B> From<B> for Client
where
    B: IDatadog + 'static,
{
    fn from(value: B) -> Self {
        let backend = Arc::new(value);
        Client { backend }
    }
}

/// Interface to Datadog API clients.
///
/// Enables implementation of Datadog API clients across different transport protocols.
#[async_trait::async_trait]
pub trait IDatadog: Send + Sync {
    /// Exercise the configured API and application keys.
    async fn validate(&self) -> Result<ApiKeyValidation>;

    /// Fetch a single user by upstream ID.
    async fn user_get(&self, user: &str) -> Result<User>;

    /// List one page of users on the account.
    async fn users_list(&self, page: u64) -> Result<UserList>;

    /// List one page of teams on the account.
    async fn teams_list(&self, page: u64) -> Result<TeamList>;

    /// List one page of membership records for a team.
    async fn team_memberships(&self, team: &str, page: u64) -> Result<UserTeamList>;

    /// Add a user to a team, optionally with the elevated team role.
    async fn team_membership_create(&self, team: &str, request: UserTeamRequest) -> Result<()>;

    /// Remove a user from a team.
    async fn team_membership_delete(&self, team: &str, user: &str) -> Result<()>;

    /// List one page of roles on the account.
    async fn roles_list(&self, page: u64) -> Result<RoleList>;

    /// List one page of users holding a role.
    async fn role_users(&self, role: &str, page: u64) -> Result<UserList>;

    /// Assign a role to a user.
    async fn role_user_add(&self, role: &str, request: RoleUserRequest) -> Result<()>;

    /// Remove a role from a user.
    async fn role_user_remove(&self, role: &str, request: RoleUserRequest) -> Result<()>;
}
