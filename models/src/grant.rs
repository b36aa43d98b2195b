//! Edges recording that a principal holds an entitlement.
use serde::Deserialize;
use serde::Serialize;

use crate::EntitlementRef;
use crate::Resource;
use crate::ResourceId;

/// An edge recording that a principal holds a specific entitlement.
///
/// A grant is valid only if the principal kind is listed in the
/// entitlement's `grantable_to` set.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    /// Principal holding the entitlement.
    pub principal: ResourceId,

    /// Entitlement held by the principal.
    pub entitlement: EntitlementRef,
}

impl Grant {
    /// Grant of the `slug` entitlement on `resource` to the given principal.
    pub fn new(resource: &Resource, slug: &str, principal: ResourceId) -> Grant {
        Grant {
            principal,
            entitlement: EntitlementRef {
                resource: resource.id.clone(),
                slug: slug.to_string(),
            },
        }
    }
}
