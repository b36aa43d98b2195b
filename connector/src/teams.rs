//! Sync Datadog teams as group resources and their membership grants.
use anyhow::Result;

use datadog_client::models::Team;
use datadog_client::models::UserTeamRequest;
use datadog_client::Client;
use dogsync_context::Context;
use dogsync_models::Annotations;
use dogsync_models::Entitlement;
use dogsync_models::EntitlementRef;
use dogsync_models::Grant;
use dogsync_models::GroupProfile;
use dogsync_models::GroupTrait;
use dogsync_models::Resource;
use dogsync_models::ResourceId;
use dogsync_models::ResourceKind;
use dogsync_models::ResourceTraits;
use dogsync_models::ResourceType;

use crate::errors::UpstreamOperation;
use crate::mutation;
use crate::pagination;
use crate::types;
use crate::users;
use crate::Page;
use crate::ResourceSyncer;

/// Slug of the plain membership entitlement on a team.
const MEMBER: &str = "member";

/// Slug of the elevated management entitlement on a team.
const ADMIN: &str = "admin";

/// Syncer for Datadog team resources and their membership grants.
pub struct TeamSyncer {
    resource_type: &'static ResourceType,
    client: Client,
}

impl TeamSyncer {
    pub fn new(client: Client) -> TeamSyncer {
        TeamSyncer {
            resource_type: &types::TEAM_TYPE,
            client,
        }
    }
}

/// Project a Datadog team record into a group resource.
fn team_resource(team: &Team) -> Resource {
    let name = team.attributes.name.clone();
    let profile = GroupProfile {
        team_name: name.clone(),
        team_description: team.attributes.description.clone().unwrap_or_default(),
        team_id: team.id.clone(),
        ..Default::default()
    };
    Resource {
        id: ResourceId::new(ResourceKind::Team, &team.id),
        display_name: name,
        traits: ResourceTraits::Group(GroupTrait { profile }),
    }
}

/// Entitlement exposed by a team for the given slug.
fn team_entitlement(resource: &Resource, slug: &str) -> Entitlement {
    let builder = match slug == ADMIN {
        true => Entitlement::permission(resource, slug),
        false => Entitlement::assignment(resource, slug),
    };
    builder
        .grantable_to(ResourceKind::User)
        .display_name(format!("{} Team {}", resource.display_name, slug))
        .description(format!("{} of {} Datadog team", slug, resource.display_name))
        .build()
}

#[async_trait::async_trait]
impl ResourceSyncer for TeamSyncer {
    fn resource_type(&self) -> &ResourceType {
        self.resource_type
    }

    async fn list(
        &self,
        context: &Context,
        _parent: Option<&ResourceId>,
        token: Option<&str>,
    ) -> Result<Page<Resource>> {
        let (bag, page) = pagination::parse_token(token, ResourceKind::Team, None)?;
        slog::debug!(context.logger, "Listing teams from Datadog"; "page" => page);
        let teams = self
            .client
            .teams_list(page)
            .await
            .map_err(|error| error.context(UpstreamOperation::List(ResourceKind::Team)))?;
        let items: Vec<Resource> = teams.data.iter().map(team_resource).collect();
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
        let items = vec![
            team_entitlement(resource, MEMBER),
            team_entitlement(resource, ADMIN),
        ];
        Ok(Page::new(items, None))
    }

    async fn grants(
        &self,
        context: &Context,
        resource: &Resource,
        token: Option<&str>,
    ) -> Result<Page<Grant>> {
        let team = resource.id.id.as_str();
        let (bag, page) = pagination::parse_token(token, ResourceKind::Team, Some(team))?;
        slog::debug!(
            context.logger, "Listing team memberships from Datadog";
            "team" => team,
            "page" => page,
        );
        let memberships = self
            .client
            .team_memberships(team, page)
            .await
            .map_err(|error| {
                let op = UpstreamOperation::Grants(ResourceKind::Team, team.to_string());
                error.context(op)
            })?;

        let mut items = Vec::new();
        for membership in &memberships.data {
            // Membership records only carry a user reference, resolve the
            // full identity before emitting grants for it.
            let user_id = &membership.relationships.user.data.id;
            let user = self.client.user_get(user_id).await.map_err(|error| {
                error.context(UpstreamOperation::MemberLookup(user_id.clone()))
            })?;
            let principal = users::user_resource(&user);
            items.push(Grant::new(resource, MEMBER, principal.id.clone()));

            // Elevated members hold the admin grant on top of membership,
            // never instead of it.
            let elevated = membership
                .attributes
                .as_ref()
                .and_then(|attributes| attributes.role.as_deref())
                == Some(ADMIN);
            if elevated {
                items.push(Grant::new(resource, ADMIN, principal.id));
            }
        }

        let next_token = match memberships.data.is_empty() {
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
        let role = match entitlement.slug == ADMIN {
            true => Some(ADMIN),
            false => None,
        };
        let request = UserTeamRequest::new(&principal.id, role);
        self.client
            .team_membership_create(&entitlement.resource.id, request)
            .await
            .map_err(|error| {
                let op = UpstreamOperation::Grant(entitlement.to_string(), principal.to_string());
                error.context(op)
            })?;
        Ok(Annotations::new())
    }

    async fn revoke(&self, context: &Context, grant: &Grant) -> Result<Annotations> {
        mutation::require_user_principal(context, &grant.principal, &grant.entitlement)?;
        self.client
            .team_membership_delete(&grant.entitlement.resource.id, &grant.principal.id)
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

#[cfg(test)]
mod tests {
    use datadog_client::fixture::Client as FixtureClient;
    use datadog_client::models::Team;
    use datadog_client::models::TeamAttributes;
    use datadog_client::models::User;
    use datadog_client::models::UserAttributes;
    use datadog_client::Client;
    use dogsync_context::Context;
    use dogsync_models::EntitlementKind;
    use dogsync_models::Grant;
    use dogsync_models::ResourceId;
    use dogsync_models::ResourceKind;

    use super::TeamSyncer;
    use crate::errors::PolicyViolation;
    use crate::ResourceSyncer;

    fn fixture_team(id: &str, name: &str) -> Team {
        Team {
            id: id.to_string(),
            attributes: TeamAttributes {
                name: name.to_string(),
                description: Some(format!("{} team", name)),
            },
        }
    }

    fn fixture_user(id: &str, name: &str) -> User {
        User {
            id: id.to_string(),
            attributes: UserAttributes {
                name: Some(name.to_string()),
                email: Some(format!("{}@example.com", id)),
                status: Some("Active".to_string()),
                service_account: false,
            },
        }
    }

    fn fixture_eng() -> (FixtureClient, TeamSyncer) {
        let fixture = FixtureClient::with_page_size(10);
        fixture.append_team(fixture_team("eng", "Eng"));
        fixture.append_user(fixture_user("alice", "Alice Doe"));
        fixture.append_user(fixture_user("bob", "Bob Low"));
        fixture.append_member("eng", "alice", true);
        fixture.append_member("eng", "bob", false);
        let syncer = TeamSyncer::new(Client::from(fixture.clone()));
        (fixture, syncer)
    }

    #[tokio::test]
    async fn entitlements_expose_member_and_admin() {
        let (_, syncer) = fixture_eng();
        let context = Context::fixture();
        let team = super::team_resource(&fixture_team("eng", "Eng"));

        let page = syncer
            .entitlements(&context, &team, None)
            .await
            .expect("entitlements to list");
        assert!(page.next_token.is_none());
        let slugs: Vec<(&str, EntitlementKind)> = page
            .items
            .iter()
            .map(|entitlement| (entitlement.slug.as_str(), entitlement.kind))
            .collect();
        assert_eq!(
            slugs,
            vec![
                ("member", EntitlementKind::Assignment),
                ("admin", EntitlementKind::Permission),
            ],
        );
        for entitlement in &page.items {
            assert_eq!(entitlement.grantable_to, vec![ResourceKind::User]);
        }
    }

    #[tokio::test]
    async fn grants_emit_admin_on_top_of_member() {
        let (_, syncer) = fixture_eng();
        let context = Context::fixture();
        let team = super::team_resource(&fixture_team("eng", "Eng"));

        let page = syncer
            .grants(&context, &team, None)
            .await
            .expect("the first grants page to list");
        let edges: Vec<String> = page
            .items
            .iter()
            .map(|grant| format!("{}->{}", grant.entitlement.slug, grant.principal))
            .collect();
        assert_eq!(
            edges,
            vec![
                "member->user:alice".to_string(),
                "admin->user:alice".to_string(),
                "member->user:bob".to_string(),
            ],
        );
        let token = page.next_token.expect("a resume token after a full page");

        let page = syncer
            .grants(&context, &team, Some(&token))
            .await
            .expect("the terminal grants page to list");
        assert!(page.items.is_empty());
        assert!(page.next_token.is_none());
    }

    #[tokio::test]
    async fn grants_terminal_page_requests_nothing_further() {
        let fixture = FixtureClient::with_page_size(10);
        fixture.append_team(fixture_team("eng", "Eng"));
        let syncer = TeamSyncer::new(Client::from(fixture.clone()));
        let context = Context::fixture();
        let team = super::team_resource(&fixture_team("eng", "Eng"));

        let page = syncer
            .grants(&context, &team, None)
            .await
            .expect("the empty grants page to list");
        assert!(page.items.is_empty());
        assert!(page.next_token.is_none());
        assert_eq!(fixture.calls(), vec!["team_memberships:eng:0".to_string()]);
    }

    #[tokio::test]
    async fn grant_refuses_non_user_principals() {
        let (fixture, syncer) = fixture_eng();
        let context = Context::fixture();
        let principal = ResourceId::new(ResourceKind::Team, "platform");
        let entitlement = "team:eng:member".parse().expect("the reference to parse");

        let error = match syncer.grant(&context, &principal, &entitlement).await {
            Err(error) => error,
            Ok(_) => panic!("expected the grant to be refused"),
        };
        assert!(error.is::<PolicyViolation>());
        // The precondition fails before any upstream call.
        assert!(fixture.calls().is_empty());
    }

    #[tokio::test]
    async fn grant_issues_one_upstream_write() {
        let (fixture, syncer) = fixture_eng();
        let context = Context::fixture();
        let principal = ResourceId::new(ResourceKind::User, "carol");
        let entitlement = "team:eng:admin".parse().expect("the reference to parse");

        syncer
            .grant(&context, &principal, &entitlement)
            .await
            .expect("the grant to apply");
        assert_eq!(
            fixture.calls(),
            vec!["team_membership_create:eng:carol".to_string()],
        );
    }

    #[tokio::test]
    async fn revoke_refuses_non_user_principals() {
        let (fixture, syncer) = fixture_eng();
        let context = Context::fixture();
        let team = super::team_resource(&fixture_team("eng", "Eng"));
        let grant = Grant::new(&team, "member", ResourceId::new(ResourceKind::Role, "sre"));

        let error = match syncer.revoke(&context, &grant).await {
            Err(error) => error,
            Ok(_) => panic!("expected the revoke to be refused"),
        };
        assert!(error.is::<PolicyViolation>());
        assert!(fixture.calls().is_empty());
    }

    #[tokio::test]
    async fn revoke_issues_one_upstream_write() {
        let (fixture, syncer) = fixture_eng();
        let context = Context::fixture();
        let team = super::team_resource(&fixture_team("eng", "Eng"));
        let grant = Grant::new(&team, "member", ResourceId::new(ResourceKind::User, "bob"));

        syncer.revoke(&context, &grant).await.expect("the revoke to apply");
        assert_eq!(
            fixture.calls(),
            vec!["team_membership_delete:eng:bob".to_string()],
        );
    }
}
