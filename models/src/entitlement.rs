//! Grantable capabilities derived from upstream RBAC records.
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::Resource;
use crate::ResourceId;
use crate::ResourceKind;

/// Flavour of capability an entitlement represents.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntitlementKind {
    /// Plain membership of the owning resource.
    Assignment,

    /// Elevated capability layered on top of membership.
    Permission,
}

/// A grantable capability exposed by a resource.
///
/// Slugs are unique within the owning resource.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Entitlement {
    /// Resource exposing the entitlement.
    pub resource: ResourceId,

    /// Identifier of the entitlement within the owning resource.
    pub slug: String,

    pub kind: EntitlementKind,

    /// Resource kinds allowed to hold this entitlement.
    pub grantable_to: Vec<ResourceKind>,

    pub display_name: String,
    pub description: String,
}

impl Entitlement {
    /// Start building an assignment entitlement exposed by the given resource.
    pub fn assignment(resource: &Resource, slug: &str) -> EntitlementBuilder {
        EntitlementBuilder::new(resource, slug, EntitlementKind::Assignment)
    }

    /// Start building a permission entitlement exposed by the given resource.
    pub fn permission(resource: &Resource, slug: &str) -> EntitlementBuilder {
        EntitlementBuilder::new(resource, slug, EntitlementKind::Permission)
    }

    /// Reference to this entitlement usable in grants.
    pub fn reference(&self) -> EntitlementRef {
        EntitlementRef {
            resource: self.resource.clone(),
            slug: self.slug.clone(),
        }
    }
}

/// Incrementally build [`Entitlement`] objects.
pub struct EntitlementBuilder {
    resource: ResourceId,
    slug: String,
    kind: EntitlementKind,
    grantable_to: Vec<ResourceKind>,
    display_name: String,
    description: String,
}

impl EntitlementBuilder {
    fn new(resource: &Resource, slug: &str, kind: EntitlementKind) -> EntitlementBuilder {
        EntitlementBuilder {
            resource: resource.id.clone(),
            slug: slug.to_string(),
            kind,
            grantable_to: Vec::new(),
            display_name: String::new(),
            description: String::new(),
        }
    }

    /// Allow principals of the given kind to hold the entitlement.
    pub fn grantable_to(mut self, kind: ResourceKind) -> Self {
        self.grantable_to.push(kind);
        self
    }

    pub fn display_name<S>(mut self, display_name: S) -> Self
    where
        S: Into<String>,
    {
        self.display_name = display_name.into();
        self
    }

    pub fn description<S>(mut self, description: S) -> Self
    where
        S: Into<String>,
    {
        self.description = description.into();
        self
    }

    /// All options are set, get the entitlement object.
    pub fn build(self) -> Entitlement {
        Entitlement {
            resource: self.resource,
            slug: self.slug,
            kind: self.kind,
            grantable_to: self.grantable_to,
            display_name: self.display_name,
            description: self.description,
        }
    }
}

/// Reference to an entitlement by owning resource and slug.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct EntitlementRef {
    /// Resource exposing the entitlement.
    pub resource: ResourceId,

    /// Identifier of the entitlement within the owning resource.
    pub slug: String,
}

impl fmt::Display for EntitlementRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.slug)
    }
}

/// The entitlement reference does not follow the 'kind:resource-id:slug' shape.
#[derive(Debug, thiserror::Error)]
#[error("the entitlement reference '{value}' does not follow the 'kind:resource-id:slug' shape")]
pub struct InvalidEntitlementRef {
    pub value: String,
}

impl FromStr for EntitlementRef {
    type Err = InvalidEntitlementRef;

    fn from_str(value: &str) -> Result<EntitlementRef, Self::Err> {
        let invalid = || InvalidEntitlementRef {
            value: value.to_string(),
        };
        let mut parts = value.splitn(3, ':');
        let kind = parts.next().ok_or_else(invalid)?;
        let id = parts.next().ok_or_else(invalid)?;
        let slug = parts.next().ok_or_else(invalid)?;
        if id.is_empty() || slug.is_empty() {
            return Err(invalid());
        }
        let kind = kind.parse().map_err(|_| invalid())?;
        Ok(EntitlementRef {
            resource: ResourceId::new(kind, id),
            slug: slug.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Entitlement;
    use super::EntitlementKind;
    use super::EntitlementRef;
    use crate::Resource;
    use crate::ResourceId;
    use crate::ResourceKind;
    use crate::ResourceTraits;
    use crate::RoleProfile;
    use crate::RoleTrait;

    fn fixture_role() -> Resource {
        Resource {
            id: ResourceId::new(ResourceKind::Role, "r1"),
            display_name: "SRE".to_string(),
            traits: ResourceTraits::Role(RoleTrait {
                profile: RoleProfile {
                    role_name: "SRE".to_string(),
                    role_id: "r1".to_string(),
                    ..Default::default()
                },
            }),
        }
    }

    #[test]
    fn build_assignment_entitlement() {
        let role = fixture_role();
        let entitlement = Entitlement::assignment(&role, "member")
            .grantable_to(ResourceKind::User)
            .display_name("SRE Role member")
            .description("Member of SRE Datadog role")
            .build();
        assert_eq!(entitlement.kind, EntitlementKind::Assignment);
        assert_eq!(entitlement.resource, role.id);
        assert_eq!(entitlement.slug, "member");
        assert_eq!(entitlement.grantable_to, vec![ResourceKind::User]);
        assert_eq!(entitlement.display_name, "SRE Role member");
    }

    #[test]
    fn build_permission_entitlement() {
        let role = fixture_role();
        let entitlement = Entitlement::permission(&role, "admin").build();
        assert_eq!(entitlement.kind, EntitlementKind::Permission);
    }

    #[test]
    fn reference_round_trip() {
        let role = fixture_role();
        let entitlement = Entitlement::assignment(&role, "member").build();
        let encoded = entitlement.reference().to_string();
        assert_eq!(encoded, "role:r1:member");
        let decoded: EntitlementRef = encoded.parse().expect("the reference to parse back");
        assert_eq!(decoded, entitlement.reference());
    }

    #[test]
    fn reference_rejects_missing_slug() {
        assert!("role:r1".parse::<EntitlementRef>().is_err());
    }

    #[test]
    fn reference_rejects_unknown_kind() {
        assert!("cluster:r1:member".parse::<EntitlementRef>().is_err());
    }
}
