//! Mock client implementation for unit tests.
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::Result;

use crate::models::ApiKeyValidation;
use crate::models::Relationship;
use crate::models::RelationshipData;
use crate::models::Role;
use crate::models::RoleList;
use crate::models::RoleUserRequest;
use crate::models::Team;
use crate::models::TeamList;
use crate::models::User;
use crate::models::UserList;
use crate::models::UserTeam;
use crate::models::UserTeamAttributes;
use crate::models::UserTeamList;
use crate::models::UserTeamRelationships;
use crate::models::UserTeamRequest;

/// Mock client implementation for unit tests.
///
/// Clones share state: keep one handle to seed records and inspect the
/// calls performed while another is wrapped into a [`Client`](crate::Client).
#[derive(Clone)]
pub struct Client {
    page_size: usize,
    state: Arc<Mutex<ClientState>>,
}

impl Client {
    /// Mock client returning list pages of at most `page_size` records.
    pub fn with_page_size(page_size: usize) -> Client {
        Client {
            page_size,
            state: Arc::new(Mutex::new(ClientState::default())),
        }
    }

    /// Append a user record.
    pub fn append_user(&self, user: User) {
        self.state.lock().unwrap().users.push(user);
    }

    /// Append a team record.
    pub fn append_team(&self, team: Team) {
        self.state.lock().unwrap().teams.push(team);
    }

    /// Append a role record.
    pub fn append_role(&self, role: Role) {
        self.state.lock().unwrap().roles.push(role);
    }

    /// Record a team membership; `admin` marks the elevated team role.
    pub fn append_member<S1, S2>(&self, team: S1, user: S2, admin: bool)
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        let team = team.into();
        let user = user.into();
        let membership = UserTeam {
            id: format!("{}-{}", team, user),
            attributes: Some(UserTeamAttributes {
                role: admin.then(|| "admin".to_string()),
            }),
            relationships: UserTeamRelationships {
                user: Relationship {
                    data: RelationshipData {
                        id: user,
                        kind: "users".to_string(),
                    },
                },
            },
        };
        self.state
            .lock()
            .unwrap()
            .members
            .entry(team)
            .or_default()
            .push(membership);
    }

    /// Record a role membership.
    pub fn append_role_member<S1, S2>(&self, role: S1, user: S2)
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        self.state
            .lock()
            .unwrap()
            .role_members
            .entry(role.into())
            .or_default()
            .push(user.into());
    }

    /// Make the credential validation endpoint report the keys as invalid.
    pub fn deny_credentials(&self) {
        self.state.lock().unwrap().valid = false;
    }

    /// Names of the upstream calls performed so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record<S>(&self, call: S)
    where
        S: Into<String>,
    {
        self.state.lock().unwrap().calls.push(call.into());
    }
}

impl Default for Client {
    fn default() -> Self {
        Client::with_page_size(10)
    }
}

/// Internal state to implement API mocking.
struct ClientState {
    calls: Vec<String>,
    members: HashMap<String, Vec<UserTeam>>,
    role_members: HashMap<String, Vec<String>>,
    roles: Vec<Role>,
    teams: Vec<Team>,
    users: Vec<User>,
    valid: bool,
}

impl Default for ClientState {
    fn default() -> Self {
        ClientState {
            calls: Vec::new(),
            members: HashMap::new(),
            role_members: HashMap::new(),
            roles: Vec::new(),
            teams: Vec::new(),
            users: Vec::new(),
            valid: true,
        }
    }
}

fn slice_page<T>(items: &[T], page: u64, size: usize) -> Vec<T>
where
    T: Clone,
{
    items
        .iter()
        .skip(page as usize * size)
        .take(size)
        .cloned()
        .collect()
}

#[async_trait::async_trait]
impl super::IDatadog for Client {
    async fn validate(&self) -> Result<ApiKeyValidation> {
        self.record("validate");
        let valid = self.state.lock().unwrap().valid;
        Ok(ApiKeyValidation { valid })
    }

    async fn user_get(&self, user: &str) -> Result<User> {
        self.record(format!("user_get:{}", user));
        let state = self.state.lock().unwrap();
        let found = state
            .users
            .iter()
            .find(|candidate| candidate.id == user)
            .cloned();
        match found {
            Some(found) => Ok(found),
            None => anyhow::bail!(crate::UserNotFound::new(user)),
        }
    }

    async fn users_list(&self, page: u64) -> Result<UserList> {
        self.record(format!("users_list:{}", page));
        let state = self.state.lock().unwrap();
        let data = slice_page(&state.users, page, self.page_size);
        Ok(UserList { data })
    }

    async fn teams_list(&self, page: u64) -> Result<TeamList> {
        self.record(format!("teams_list:{}", page));
        let state = self.state.lock().unwrap();
        let data = slice_page(&state.teams, page, self.page_size);
        Ok(TeamList { data })
    }

    async fn team_memberships(&self, team: &str, page: u64) -> Result<UserTeamList> {
        self.record(format!("team_memberships:{}:{}", team, page));
        let state = self.state.lock().unwrap();
        let members = state.members.get(team).map(Vec::as_slice).unwrap_or(&[]);
        let data = slice_page(members, page, self.page_size);
        Ok(UserTeamList { data })
    }

    async fn team_membership_create(&self, team: &str, request: UserTeamRequest) -> Result<()> {
        let user = request.data.relationships.user.data.id.clone();
        self.record(format!("team_membership_create:{}:{}", team, user));
        let membership = UserTeam {
            id: format!("{}-{}", team, user),
            attributes: Some(request.data.attributes),
            relationships: request.data.relationships,
        };
        self.state
            .lock()
            .unwrap()
            .members
            .entry(team.to_string())
            .or_default()
            .push(membership);
        Ok(())
    }

    async fn team_membership_delete(&self, team: &str, user: &str) -> Result<()> {
        self.record(format!("team_membership_delete:{}:{}", team, user));
        let mut state = self.state.lock().unwrap();
        if let Some(members) = state.members.get_mut(team) {
            members.retain(|membership| membership.relationships.user.data.id != user);
        }
        Ok(())
    }

    async fn roles_list(&self, page: u64) -> Result<RoleList> {
        self.record(format!("roles_list:{}", page));
        let state = self.state.lock().unwrap();
        let data = slice_page(&state.roles, page, self.page_size);
        Ok(RoleList { data })
    }

    async fn role_users(&self, role: &str, page: u64) -> Result<UserList> {
        self.record(format!("role_users:{}:{}", role, page));
        let state = self.state.lock().unwrap();
        let members = state
            .role_members
            .get(role)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let members: Vec<User> = members
            .iter()
            .filter_map(|id| state.users.iter().find(|user| &user.id == id))
            .cloned()
            .collect();
        let data = slice_page(&members, page, self.page_size);
        Ok(UserList { data })
    }

    async fn role_user_add(&self, role: &str, request: RoleUserRequest) -> Result<()> {
        self.record(format!("role_user_add:{}:{}", role, request.data.id));
        self.state
            .lock()
            .unwrap()
            .role_members
            .entry(role.to_string())
            .or_default()
            .push(request.data.id);
        Ok(())
    }

    async fn role_user_remove(&self, role: &str, request: RoleUserRequest) -> Result<()> {
        self.record(format!("role_user_remove:{}:{}", role, request.data.id));
        let mut state = self.state.lock().unwrap();
        if let Some(members) = state.role_members.get_mut(role) {
            members.retain(|member| member != &request.data.id);
        }
        Ok(())
    }
}
