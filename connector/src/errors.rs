//! Typed errors for connector sync and mutation operations.
use dogsync_models::EntitlementRef;
use dogsync_models::ResourceId;
use dogsync_models::ResourceKind;

/// The pagination token could not be decoded.
///
/// Enumeration for the resource kind must restart with a fresh token.
#[derive(Debug, thiserror::Error)]
#[error("the pagination token could not be decoded")]
pub struct InvalidToken;

/// The upstream authority reported the API credentials as not valid.
#[derive(Debug, thiserror::Error)]
#[error("the Datadog API credentials are not valid")]
pub struct InvalidCredentials;

/// A mutation was attempted with a principal kind the entitlement does not allow.
///
/// No upstream call was made and retrying with the same input cannot succeed.
#[derive(Debug, thiserror::Error)]
#[error("only {expected} principals can hold '{slug}' on {kind} resources, not {actual}")]
pub struct PolicyViolation {
    /// Principal kind the entitlement can be granted to.
    pub expected: ResourceKind,

    /// Principal kind the mutation was attempted with.
    pub actual: ResourceKind,

    /// Kind of the resource exposing the entitlement.
    pub kind: ResourceKind,

    /// Slug of the entitlement the mutation addressed.
    pub slug: String,
}

impl PolicyViolation {
    /// A mutation of `entitlement` was refused for the given principal.
    pub fn new(
        expected: ResourceKind,
        principal: &ResourceId,
        entitlement: &EntitlementRef,
    ) -> Self {
        PolicyViolation {
            expected,
            actual: principal.kind,
            kind: entitlement.resource.kind,
            slug: entitlement.slug.clone(),
        }
    }
}

/// Resources of this kind expose no entitlements to grant or revoke.
#[derive(Debug, thiserror::Error)]
#[error("{kind} resources expose no entitlements to grant or revoke")]
pub struct MutationNotSupported {
    pub kind: ResourceKind,
}

/// Context attached to failed upstream calls.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamOperation {
    /// Listing resources of a kind failed.
    #[error("error listing {0} resources")]
    List(ResourceKind),

    /// Listing grants of a specific resource failed.
    #[error("error listing grants of {0} '{1}'")]
    // (kind, resource_id)
    Grants(ResourceKind, String),

    /// Resolving the identity behind a membership record failed.
    #[error("error resolving user '{0}' from a membership record")]
    // (user_id,)
    MemberLookup(String),

    /// Applying a grant upstream failed.
    #[error("error granting '{0}' to '{1}'")]
    // (entitlement, principal)
    Grant(String, String),

    /// Revoking a grant upstream failed.
    #[error("error revoking '{0}' from '{1}'")]
    // (entitlement, principal)
    Revoke(String, String),

    /// Exercising the API credentials failed.
    #[error("error validating API credentials")]
    Validate,
}
