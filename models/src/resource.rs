//! Identity resources enumerated from the upstream authority.
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value as Json;

use crate::Annotations;

/// Closed set of resource kinds the connector can sync.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    User,
    Team,
    Role,
}

impl ResourceKind {
    /// Kind identifier as it appears in resource IDs and pagination tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::User => "user",
            ResourceKind::Team => "team",
            ResourceKind::Role => "role",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resource kind identifier is not known to the connector.
#[derive(Debug, thiserror::Error)]
#[error("the resource kind identifier '{kind}' is not known to the connector")]
pub struct InvalidResourceKind {
    pub kind: String,
}

impl FromStr for ResourceKind {
    type Err = InvalidResourceKind;

    fn from_str(value: &str) -> Result<ResourceKind, Self::Err> {
        match value {
            "user" => Ok(ResourceKind::User),
            "team" => Ok(ResourceKind::Team),
            "role" => Ok(ResourceKind::Role),
            kind => Err(InvalidResourceKind {
                kind: kind.to_string(),
            }),
        }
    }
}

/// Definition of a syncable resource kind.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceType {
    /// Kind this definition describes.
    pub kind: ResourceKind,

    /// Human readable name for the kind.
    pub display_name: String,

    /// Annotations attached to every sync pass over this kind.
    pub annotations: Annotations,
}

/// Reference to an individual resource of a specific kind.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct ResourceId {
    pub kind: ResourceKind,
    pub id: String,
}

impl ResourceId {
    /// Reference to the resource of the given kind and upstream ID.
    pub fn new<S>(kind: ResourceKind, id: S) -> ResourceId
    where
        S: Into<String>,
    {
        ResourceId {
            kind,
            id: id.into(),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// The resource ID does not follow the 'kind:id' shape.
#[derive(Debug, thiserror::Error)]
#[error("the resource ID '{value}' does not follow the 'kind:id' shape")]
pub struct InvalidResourceId {
    pub value: String,
}

impl FromStr for ResourceId {
    type Err = InvalidResourceId;

    fn from_str(value: &str) -> Result<ResourceId, Self::Err> {
        let invalid = || InvalidResourceId {
            value: value.to_string(),
        };
        let (kind, id) = value.split_once(':').ok_or_else(invalid)?;
        if id.is_empty() {
            return Err(invalid());
        }
        let kind = kind.parse().map_err(|_| invalid())?;
        Ok(ResourceId::new(kind, id))
    }
}

/// An identity resource enumerated from the upstream authority.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Kind and upstream ID of the resource.
    pub id: ResourceId,

    /// Human readable name of the resource.
    pub display_name: String,

    /// Kind-specific structured profile.
    pub traits: ResourceTraits,
}

/// Kind-specific structured profile attached to a resource.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceTraits {
    User(UserTrait),
    Group(GroupTrait),
    Role(RoleTrait),
}

/// Profile of a principal able to hold entitlements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserTrait {
    pub profile: UserProfile,

    /// Primary email reported by the upstream authority.
    pub email: Option<String>,

    pub status: UserStatus,
    pub account_type: AccountType,
}

/// Well known profile fields of a user, tolerating upstream additions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub login: String,
    pub user_id: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Json>,
}

/// Activation state of a user on the upstream authority.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Enabled,
    Disabled,
    Unspecified,
}

/// Nature of the account behind a user.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Human,
    Service,
}

/// Profile of a group-like resource (Datadog teams).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupTrait {
    pub profile: GroupProfile,
}

/// Well known profile fields of a team, tolerating upstream additions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupProfile {
    pub team_name: String,
    pub team_description: String,
    pub team_id: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Json>,
}

/// Profile of a role resource.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoleTrait {
    pub profile: RoleProfile,
}

/// Well known profile fields of a role, tolerating upstream additions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleProfile {
    pub role_name: String,
    pub role_id: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Json>,
}

#[cfg(test)]
mod tests {
    use super::ResourceId;
    use super::ResourceKind;

    #[test]
    fn resource_id_round_trip() {
        let id = ResourceId::new(ResourceKind::Team, "abc-123");
        let encoded = id.to_string();
        assert_eq!(encoded, "team:abc-123");
        let decoded: ResourceId = encoded.parse().expect("the encoded ID to parse back");
        assert_eq!(decoded, id);
    }

    #[test]
    fn resource_id_rejects_missing_separator() {
        let result = "just-an-id".parse::<ResourceId>();
        let error = match result {
            Err(error) => error,
            Ok(_) => panic!("expected the parse to fail"),
        };
        assert_eq!(
            error.to_string(),
            "the resource ID 'just-an-id' does not follow the 'kind:id' shape",
        );
    }

    #[test]
    fn resource_id_rejects_unknown_kind() {
        assert!("cluster:abc".parse::<ResourceId>().is_err());
    }

    #[test]
    fn resource_id_rejects_empty_id() {
        assert!("user:".parse::<ResourceId>().is_err());
    }

    #[test]
    fn resource_kind_from_identifier() {
        let kind: ResourceKind = "role".parse().expect("the kind to be known");
        assert_eq!(kind, ResourceKind::Role);
    }
}
