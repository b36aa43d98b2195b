//! Sync Datadog roles and their membership grants.
use anyhow::Result;

use datadog_client::models::Role;
use datadog_client::models::RoleUserRequest;
use datadog_client::Client;
use dogsync_context::Context;
use dogsync_models::Annotations;
use dogsync_models::Entitlement;
use dogsync_models::EntitlementRef;
use dogsync_models::Grant;
use dogsync_models::Resource;
use dogsync_models::ResourceId;
use dogsync_models::ResourceKind;
use dogsync_models::ResourceTraits;
use dogsync_models::ResourceType;
use dogsync_models::RoleProfile;
use dogsync_models::RoleTrait;

use crate::errors::UpstreamOperation;
use crate::mutation;
use crate::pagination;
use crate::types;
use crate::users;
use crate::Page;
use crate::ResourceSyncer;

/// Slug of the membership entitlement on a role.
const MEMBER: &str = "member";

/// Syncer for Datadog role resources and their membership grants.
pub struct RoleSyncer {
    resource_type: &'static ResourceType,
    client: Client,
}

impl RoleSyncer {
    pub fn new(client: Client) -> RoleSyncer {
        RoleSyncer {
            resource_type: &types::ROLE_TYPE,
            client,
        }
    }
}

/// Project a Datadog role record into a role resource.
fn role_resource(role: &Role) -> Resource {
    let name = role.attributes.name.clone();
    let profile = RoleProfile {
        role_name: name.clone(),
        role_id: role.id.clone(),
        ..Default::default()
    };
    Resource {
        id: ResourceId::new(ResourceKind::Role, &role.id),
        display_name: name,
        traits: ResourceTraits::Role(RoleTrait { profile }),
    }
}

#[async_trait::async_trait]
impl ResourceSyncer for RoleSyncer {
    fn resource_type(&self) -> &ResourceType {
        self.resource_type
    }

    async fn list(
        &self,
        context: &Context,
        _parent: Option<&ResourceId>,
        token: Option<&str>,
    ) -> Result<Page<Resource>> {
        let (bag, page) = pagination::parse_token(token, ResourceKind::Role, None)?;
        slog::debug!(context.logger, "Listing roles from Datadog"; "page" => page);
        let roles = self
            .client
            .roles_list(page)
            .await
            .map_err(|error| error.context(UpstreamOperation::List(ResourceKind::Role)))?;
        let items: Vec<Resource> = roles.data.iter().map(role_resource).collect();
        let next_token = match items.is_empty() {
            true => None,
            false => Some(bag.next_token(page + 1)),
        };
        Ok(Page::new(items, next_token))
    }

    async fn entitlements(
        &self,
        _context: &Context,
        resource: &Resource,
        _token: Option<&str>,
    ) -> Result<Page<Entitlement>> {
        let member = Entitlement::assignment(resource, MEMBER)
            .grantable_to(ResourceKind::User)
            .display_name(format!("{} Role {}", resource.display_name, MEMBER))
            .description(format!("Member of {} Datadog role", resource.display_name))
            .build();
        Ok(Page::new(vec![member], None))
    }

    async fn grants(
        &self,
        context: &Context,
        resource: &Resource,
        token: Option<&str>,
    ) -> Result<Page<Grant>> {
        let role = resource.id.id.as_str();
        let (bag, page) = pagination::parse_token(token, ResourceKind::Role, Some(role))?;
        slog::debug!(
            context.logger, "Listing role members from Datadog";
            "role" => role,
            "page" => page,
        );
        // Role listings return full user records, no secondary lookup needed.
        let members = self.client.role_users(role, page).await.map_err(|error| {
            let op = UpstreamOperation::Grants(ResourceKind::Role, role.to_string());
            error.context(op)
        })?;

        let items: Vec<Grant> = members
            .data
            .iter()
            .map(|user| {
                let principal = users::user_resource(user);
                Grant::new(resource, MEMBER, principal.id)
            })
            .collect();
        let next_token = match members.data.is_empty() {
            true => None,
            false => Some(bag.next_token(page + 1)),
        };
        Ok(Page::new(items, next_token))
    }

    async fn grant(
        &self,
        context: &Context,
        principal: &ResourceId,
        entitlement: &EntitlementRef,
    ) -> Result<Annotations> {
        mutation::require_user_principal(context, principal, entitlement)?;
        let request = RoleUserRequest::new(&principal.id);
        self.client
            .role_user_add(&entitlement.resource.id, request)
            .await
            .map_err(|error| {
                let op = UpstreamOperation::Grant(entitlement.to_string(), principal.to_string());
                error.context(op)
            })?;
        Ok(Annotations::new())
    }

    async fn revoke(&self, context: &Context, grant: &Grant) -> Result<Annotations> {
        mutation::require_user_principal(context, &grant.principal, &grant.entitlement)?;
        let request = RoleUserRequest::new(&grant.principal.id);
        self.client
            .role_user_remove(&grant.entitlement.resource.id, request)
            .await
            .map_err(|error| {
                let op = UpstreamOperation::Revoke(
                    grant.entitlement.to_string(),
                    grant.principal.to_string(),
                );
                error.context(op)
            })?;
        Ok(Annotations::new())
    }
}
