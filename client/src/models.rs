//! Datadog API wire models used by the connector.
//!
//! Only the fields the connector consumes are modelled; unknown fields in
//! upstream responses are ignored.
use serde::Deserialize;
use serde::Serialize;

/// Record type identifier for team membership requests.
const TYPE_TEAM_MEMBERSHIPS: &str = "team_memberships";

/// Record type identifier for user relationship requests.
const TYPE_USERS: &str = "users";

/// Result of exercising API credentials against the authentication endpoint.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ApiKeyValidation {
    /// Whether the API/application key pair is valid.
    #[serde(default)]
    pub valid: bool,
}

/// One page of user records.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserList {
    #[serde(default)]
    pub data: Vec<User>,
}

/// Envelope of single-user responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub data: User,
}

/// A Datadog user record.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct User {
    pub id: String,

    #[serde(default)]
    pub attributes: UserAttributes,
}

/// Attributes of a Datadog user record.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserAttributes {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    /// Upstream status string, e.g. `Active` or `Disabled`.
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub service_account: bool,
}

/// One page of team records.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TeamList {
    #[serde(default)]
    pub data: Vec<Team>,
}

/// A Datadog team record.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Team {
    pub id: String,

    #[serde(default)]
    pub attributes: TeamAttributes,
}

/// Attributes of a Datadog team record.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TeamAttributes {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// One page of team membership records.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserTeamList {
    #[serde(default)]
    pub data: Vec<UserTeam>,
}

/// A team membership record linking a user to a team.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserTeam {
    pub id: String,

    /// Membership attributes, including the optional elevated team role.
    #[serde(default)]
    pub attributes: Option<UserTeamAttributes>,

    pub relationships: UserTeamRelationships,
}

/// Attributes of a team membership record.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserTeamAttributes {
    /// Team role of the member, `admin` when elevated.
    #[serde(default)]
    pub role: Option<String>,
}

/// Relationships of a team membership record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserTeamRelationships {
    pub user: Relationship,
}

/// Envelope of a single relationship.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Relationship {
    pub data: RelationshipData,
}

/// Identity a relationship points at.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RelationshipData {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,
}

/// Request body to create a team membership.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserTeamRequest {
    pub data: UserTeamCreate,
}

impl UserTeamRequest {
    /// Membership creation request for a user, optionally with the elevated team role.
    pub fn new(user: &str, role: Option<&str>) -> UserTeamRequest {
        let attributes = UserTeamAttributes {
            role: role.map(String::from),
        };
        let relationships = UserTeamRelationships {
            user: Relationship {
                data: RelationshipData {
                    id: user.to_string(),
                    kind: TYPE_USERS.to_string(),
                },
            },
        };
        UserTeamRequest {
            data: UserTeamCreate {
                attributes,
                relationships,
                kind: TYPE_TEAM_MEMBERSHIPS.to_string(),
            },
        }
    }
}

/// Payload of a team membership creation request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserTeamCreate {
    pub attributes: UserTeamAttributes,
    pub relationships: UserTeamRelationships,

    #[serde(rename = "type")]
    pub kind: String,
}

/// One page of role records.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoleList {
    #[serde(default)]
    pub data: Vec<Role>,
}

/// A Datadog role record.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Role {
    pub id: String,

    #[serde(default)]
    pub attributes: RoleAttributes,
}

/// Attributes of a Datadog role record.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoleAttributes {
    #[serde(default)]
    pub name: String,
}

/// Request body to add or remove a user relationship on a role.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoleUserRequest {
    pub data: RelationshipData,
}

impl RoleUserRequest {
    /// User relationship request for role membership mutations.
    pub fn new(user: &str) -> RoleUserRequest {
        RoleUserRequest {
            data: RelationshipData {
                id: user.to_string(),
                kind: TYPE_USERS.to_string(),
            },
        }
    }
}
