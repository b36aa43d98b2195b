//! Preconditions shared by grant and revoke mutations.
use anyhow::Result;

use dogsync_context::Context;
use dogsync_models::EntitlementRef;
use dogsync_models::ResourceId;
use dogsync_models::ResourceKind;

use crate::errors::PolicyViolation;

/// Refuse mutations whose principal is not a user.
///
/// Returning an error here guarantees no upstream call is made for the
/// mutation: syncers check this before touching the API.
pub(crate) fn require_user_principal(
    context: &Context,
    principal: &ResourceId,
    entitlement: &EntitlementRef,
) -> Result<()> {
    if principal.kind == ResourceKind::User {
        return Ok(());
    }
    slog::warn!(
        context.logger, "Refusing mutation for non-user principal";
        "principal_kind" => principal.kind.as_str(),
        "principal_id" => &principal.id,
        "entitlement" => entitlement.to_string(),
    );
    anyhow::bail!(PolicyViolation::new(
        ResourceKind::User,
        principal,
        entitlement
    ))
}
