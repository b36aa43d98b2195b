//! Sync Datadog identity resources into a uniform resource, entitlement and
//! grant model.
//!
//! The connector enumerates users, teams and roles from the Datadog API,
//! derives the entitlements each resource exposes and the grants linking
//! users to them, and applies grant/revoke mutations back upstream.
//! Nothing is persisted locally: every sync pass recomputes the graph from
//! the upstream authority, and mutations never feed back into the read path.
//!
//! Cancellation is the caller's: dropping a returned future aborts the
//! in-flight upstream request, and no internal retry resurrects it.
use anyhow::Result;

use datadog_client::Client;
use dogsync_context::Context;
use dogsync_models::Annotations;
use dogsync_models::Entitlement;
use dogsync_models::EntitlementRef;
use dogsync_models::Grant;
use dogsync_models::Resource;
use dogsync_models::ResourceId;
use dogsync_models::ResourceKind;
use dogsync_models::ResourceType;

pub mod errors;
pub mod pagination;

mod mutation;
mod roles;
mod teams;
mod types;
mod users;

pub use self::roles::RoleSyncer;
pub use self::teams::TeamSyncer;
pub use self::types::ROLE_TYPE;
pub use self::types::TEAM_TYPE;
pub use self::types::USER_TYPE;
pub use self::users::UserSyncer;

/// One page of items returned by a paginated sync operation.
#[derive(Clone, Debug)]
pub struct Page<T> {
    /// Items projected from the current upstream page.
    pub items: Vec<T>,

    /// Token to resume enumeration from, `None` once exhausted.
    pub next_token: Option<String>,

    /// Annotations attached to the page, passed through unexamined.
    pub annotations: Annotations,
}

impl<T> Page<T> {
    /// A terminal page with no items attached.
    pub fn empty() -> Page<T> {
        Page::new(Vec::new(), None)
    }

    /// Page with the given items and resume token.
    pub fn new(items: Vec<T>, next_token: Option<String>) -> Page<T> {
        Page {
            items,
            next_token,
            annotations: Annotations::new(),
        }
    }
}

/// Sync and mutation operations for one resource kind.
///
/// Syncers are stateless between calls: all enumeration state travels in the
/// opaque tokens, so independent kinds can be driven concurrently while a
/// single kind pages strictly sequentially.
#[async_trait::async_trait]
pub trait ResourceSyncer: Send + Sync {
    /// Definition of the resource kind this syncer handles.
    fn resource_type(&self) -> &ResourceType;

    /// Enumerate one page of resources of this kind.
    async fn list(
        &self,
        context: &Context,
        parent: Option<&ResourceId>,
        token: Option<&str>,
    ) -> Result<Page<Resource>>;

    /// Enumerate one page of entitlements exposed by a resource.
    async fn entitlements(
        &self,
        context: &Context,
        resource: &Resource,
        token: Option<&str>,
    ) -> Result<Page<Entitlement>>;

    /// Enumerate one page of grants of a resource's entitlements.
    async fn grants(
        &self,
        context: &Context,
        resource: &Resource,
        token: Option<&str>,
    ) -> Result<Page<Grant>>;

    /// Grant an entitlement to a principal on the upstream authority.
    async fn grant(
        &self,
        context: &Context,
        principal: &ResourceId,
        entitlement: &EntitlementRef,
    ) -> Result<Annotations>;

    /// Revoke a granted entitlement on the upstream authority.
    async fn revoke(&self, context: &Context, grant: &Grant) -> Result<Annotations>;
}

/// Metadata describing the connector to orchestrators.
#[derive(Clone, Debug)]
pub struct ConnectorMetadata {
    pub display_name: String,
    pub description: String,
}

/// Datadog identity connector: resource syncers plus mutation dispatch.
pub struct Connector {
    client: Client,
}

impl Connector {
    /// Connector backed by the given API client handle.
    pub fn new(client: Client) -> Connector {
        Connector { client }
    }

    /// Metadata about the connector.
    pub fn metadata(&self) -> ConnectorMetadata {
        ConnectorMetadata {
            display_name: "Datadog".to_string(),
            description: "Sync users, teams and roles from Datadog".to_string(),
        }
    }

    /// One syncer per supported resource kind.
    pub fn syncers(&self) -> Vec<Box<dyn ResourceSyncer>> {
        vec![
            Box::new(UserSyncer::new(self.client.clone())),
            Box::new(TeamSyncer::new(self.client.clone())),
            Box::new(RoleSyncer::new(self.client.clone())),
        ]
    }

    /// Exercise the configured API credentials, failing fast when invalid.
    pub async fn validate(&self, context: &Context) -> Result<Annotations> {
        let validation = self
            .client
            .validate()
            .await
            .map_err(|error| error.context(errors::UpstreamOperation::Validate))?;
        if !validation.valid {
            anyhow::bail!(errors::InvalidCredentials);
        }
        slog::debug!(context.logger, "Datadog API credentials validated");
        Ok(Annotations::new())
    }

    /// Grant an entitlement to a principal through the owning syncer.
    pub async fn grant(
        &self,
        context: &Context,
        principal: &ResourceId,
        entitlement: &EntitlementRef,
    ) -> Result<Annotations> {
        match entitlement.resource.kind {
            ResourceKind::Team => {
                let syncer = TeamSyncer::new(self.client.clone());
                syncer.grant(context, principal, entitlement).await
            }
            ResourceKind::Role => {
                let syncer = RoleSyncer::new(self.client.clone());
                syncer.grant(context, principal, entitlement).await
            }
            ResourceKind::User => anyhow::bail!(errors::MutationNotSupported {
                kind: ResourceKind::User
            }),
        }
    }

    /// Revoke a granted entitlement through the owning syncer.
    pub async fn revoke(&self, context: &Context, grant: &Grant) -> Result<Annotations> {
        match grant.entitlement.resource.kind {
            ResourceKind::Team => {
                let syncer = TeamSyncer::new(self.client.clone());
                syncer.revoke(context, grant).await
            }
            ResourceKind::Role => {
                let syncer = RoleSyncer::new(self.client.clone());
                syncer.revoke(context, grant).await
            }
            ResourceKind::User => anyhow::bail!(errors::MutationNotSupported {
                kind: ResourceKind::User
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use datadog_client::fixture::Client as FixtureClient;
    use datadog_client::Client;
    use dogsync_context::Context;
    use dogsync_models::ResourceId;
    use dogsync_models::ResourceKind;

    use super::Connector;
    use crate::errors::InvalidCredentials;
    use crate::errors::MutationNotSupported;
    use crate::errors::PolicyViolation;

    fn fixture() -> (FixtureClient, Connector) {
        let fixture = FixtureClient::default();
        let connector = Connector::new(Client::from(fixture.clone()));
        (fixture, connector)
    }

    #[test]
    fn syncers_cover_every_kind_once() {
        let (_, connector) = fixture();
        let kinds: Vec<ResourceKind> = connector
            .syncers()
            .iter()
            .map(|syncer| syncer.resource_type().kind)
            .collect();
        assert_eq!(
            kinds,
            vec![ResourceKind::User, ResourceKind::Team, ResourceKind::Role],
        );
    }

    #[test]
    fn only_the_user_type_skips_entitlements() {
        let (_, connector) = fixture();
        for syncer in connector.syncers() {
            let resource_type = syncer.resource_type();
            let skips = resource_type.annotations.skips_entitlements_and_grants();
            assert_eq!(skips, resource_type.kind == ResourceKind::User);
        }
    }

    #[tokio::test]
    async fn validate_accepts_working_credentials() {
        let (_, connector) = fixture();
        let context = Context::fixture();
        connector
            .validate(&context)
            .await
            .expect("validation to pass");
    }

    #[tokio::test]
    async fn validate_fails_fast_on_denied_credentials() {
        let (fixture, connector) = fixture();
        fixture.deny_credentials();
        let context = Context::fixture();
        let error = match connector.validate(&context).await {
            Err(error) => error,
            Ok(_) => panic!("expected validation to fail"),
        };
        assert!(error.is::<InvalidCredentials>());
    }

    #[tokio::test]
    async fn grant_refuses_group_principal_on_role_entitlement() {
        let (fixture, connector) = fixture();
        let context = Context::fixture();
        let principal = ResourceId::new(ResourceKind::Team, "eng");
        let entitlement = "role:sre:member".parse().expect("the reference to parse");

        let error = match connector.grant(&context, &principal, &entitlement).await {
            Err(error) => error,
            Ok(_) => panic!("expected the grant to be refused"),
        };
        assert!(error.is::<PolicyViolation>());
        assert!(fixture.calls().is_empty());
    }

    #[tokio::test]
    async fn grant_rejects_user_owned_entitlements() {
        let (fixture, connector) = fixture();
        let context = Context::fixture();
        let principal = ResourceId::new(ResourceKind::User, "alice");
        let entitlement = "user:bob:member".parse().expect("the reference to parse");

        let error = match connector.grant(&context, &principal, &entitlement).await {
            Err(error) => error,
            Ok(_) => panic!("expected the grant to be rejected"),
        };
        assert!(error.is::<MutationNotSupported>());
        assert!(fixture.calls().is_empty());
    }

    #[tokio::test]
    async fn grant_reaches_the_owning_syncer() {
        let (fixture, connector) = fixture();
        let context = Context::fixture();
        let principal = ResourceId::new(ResourceKind::User, "alice");
        let entitlement = "team:eng:member".parse().expect("the reference to parse");

        connector
            .grant(&context, &principal, &entitlement)
            .await
            .expect("the grant to apply");
        assert_eq!(
            fixture.calls(),
            vec!["team_membership_create:eng:alice".to_string()],
        );
    }
}
