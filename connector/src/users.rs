//! Sync Datadog users as principal resources.
use anyhow::Result;

use datadog_client::models::User;
use datadog_client::Client;
use dogsync_context::Context;
use dogsync_models::AccountType;
use dogsync_models::Annotations;
use dogsync_models::Entitlement;
use dogsync_models::EntitlementRef;
use dogsync_models::Grant;
use dogsync_models::Resource;
use dogsync_models::ResourceId;
use dogsync_models::ResourceKind;
use dogsync_models::ResourceTraits;
use dogsync_models::ResourceType;
use dogsync_models::UserProfile;
use dogsync_models::UserStatus;
use dogsync_models::UserTrait;

use crate::errors::MutationNotSupported;
use crate::errors::UpstreamOperation;
use crate::pagination;
use crate::types;
use crate::Page;
use crate::ResourceSyncer;

/// Syncer for Datadog user resources.
pub struct UserSyncer {
    resource_type: &'static ResourceType,
    client: Client,
}

impl UserSyncer {
    pub fn new(client: Client) -> UserSyncer {
        UserSyncer {
            resource_type: &types::USER_TYPE,
            client,
        }
    }
}

/// Project a Datadog user record into a principal resource.
pub(crate) fn user_resource(user: &User) -> Resource {
    let name = user.attributes.name.clone().unwrap_or_default();
    let (first_name, last_name) = split_full_name(&name);
    let email = user.attributes.email.clone();
    let profile = UserProfile {
        first_name,
        last_name,
        login: email.clone().unwrap_or_default(),
        user_id: user.id.clone(),
        ..Default::default()
    };
    let status = match user.attributes.status.as_deref() {
        Some("Active") => UserStatus::Enabled,
        Some("Disabled") => UserStatus::Disabled,
        _ => UserStatus::Unspecified,
    };
    let account_type = match user.attributes.service_account {
        true => AccountType::Service,
        false => AccountType::Human,
    };
    Resource {
        id: ResourceId::new(ResourceKind::User, &user.id),
        display_name: name,
        traits: ResourceTraits::User(UserTrait {
            profile,
            email,
            status,
            account_type,
        }),
    }
}

/// Split a full name into first and last name parts.
fn split_full_name(name: &str) -> (String, String) {
    match name.split_once(' ') {
        Some((first, last)) => (first.to_string(), last.to_string()),
        None => (name.to_string(), String::new()),
    }
}

#[async_trait::async_trait]
impl ResourceSyncer for UserSyncer {
    fn resource_type(&self) -> &ResourceType {
        self.resource_type
    }

    async fn list(
        &self,
        context: &Context,
        _parent: Option<&ResourceId>,
        token: Option<&str>,
    ) -> Result<Page<Resource>> {
        let (bag, page) = pagination::parse_token(token, ResourceKind::User, None)?;
        slog::debug!(context.logger, "Listing users from Datadog"; "page" => page);
        let users = self
            .client
            .users_list(page)
            .await
            .map_err(|error| error.context(UpstreamOperation::List(ResourceKind::User)))?;
        let items: Vec<Resource> = users.data.iter().map(user_resource).collect();
        let next_token = match items.is_empty() {
            true => None,
            false => Some(bag.next_token(page + 1)),
        };
        Ok(Page::new(items, next_token))
    }

    // Users are leaf principals and expose no entitlements of their own.
    async fn entitlements(
        &self,
        _context: &Context,
        _resource: &Resource,
        _token: Option<&str>,
    ) -> Result<Page<Entitlement>> {
        Ok(Page::empty())
    }

    async fn grants(
        &self,
        _context: &Context,
        _resource: &Resource,
        _token: Option<&str>,
    ) -> Result<Page<Grant>> {
        Ok(Page::empty())
    }

    async fn grant(
        &self,
        _context: &Context,
        _principal: &ResourceId,
        _entitlement: &EntitlementRef,
    ) -> Result<Annotations> {
        anyhow::bail!(MutationNotSupported {
            kind: ResourceKind::User
        })
    }

    async fn revoke(&self, _context: &Context, _grant: &Grant) -> Result<Annotations> {
        anyhow::bail!(MutationNotSupported {
            kind: ResourceKind::User
        })
    }
}

#[cfg(test)]
mod tests {
    use datadog_client::fixture::Client as FixtureClient;
    use datadog_client::models::User;
    use datadog_client::models::UserAttributes;
    use datadog_client::Client;
    use dogsync_context::Context;
    use dogsync_models::AccountType;
    use dogsync_models::ResourceTraits;
    use dogsync_models::UserStatus;

    use super::UserSyncer;
    use crate::pagination::PaginationBag;
    use crate::ResourceSyncer;

    fn fixture_user(id: &str, name: &str, status: &str, service_account: bool) -> User {
        User {
            id: id.to_string(),
            attributes: UserAttributes {
                name: Some(name.to_string()),
                email: Some(format!("{}@example.com", id)),
                status: Some(status.to_string()),
                service_account,
            },
        }
    }

    #[test]
    fn project_human_user() {
        let user = fixture_user("u1", "Alice Doe", "Active", false);
        let resource = super::user_resource(&user);
        assert_eq!(resource.id.to_string(), "user:u1");
        assert_eq!(resource.display_name, "Alice Doe");
        let traits = match resource.traits {
            ResourceTraits::User(traits) => traits,
            traits => panic!("expected user traits, got {:?}", traits),
        };
        assert_eq!(traits.profile.first_name, "Alice");
        assert_eq!(traits.profile.last_name, "Doe");
        assert_eq!(traits.profile.login, "u1@example.com");
        assert_eq!(traits.status, UserStatus::Enabled);
        assert_eq!(traits.account_type, AccountType::Human);
    }

    #[test]
    fn project_disabled_service_account() {
        let user = fixture_user("bot", "deploys", "Disabled", true);
        let resource = super::user_resource(&user);
        let traits = match resource.traits {
            ResourceTraits::User(traits) => traits,
            traits => panic!("expected user traits, got {:?}", traits),
        };
        assert_eq!(traits.profile.first_name, "deploys");
        assert_eq!(traits.profile.last_name, "");
        assert_eq!(traits.status, UserStatus::Disabled);
        assert_eq!(traits.account_type, AccountType::Service);
    }

    #[test]
    fn project_unknown_status() {
        let user = fixture_user("u2", "Bob", "Pending", false);
        let resource = super::user_resource(&user);
        let traits = match resource.traits {
            ResourceTraits::User(traits) => traits,
            traits => panic!("expected user traits, got {:?}", traits),
        };
        assert_eq!(traits.status, UserStatus::Unspecified);
    }

    #[tokio::test]
    async fn list_advances_one_page_at_a_time() {
        let fixture = FixtureClient::with_page_size(1);
        fixture.append_user(fixture_user("u1", "Alice Doe", "Active", false));
        fixture.append_user(fixture_user("u2", "Bob Low", "Active", false));
        let syncer = UserSyncer::new(Client::from(fixture.clone()));
        let context = Context::fixture();

        let page = syncer
            .list(&context, None, None)
            .await
            .expect("the first page to list");
        assert_eq!(page.items.len(), 1);
        let token = page.next_token.expect("a resume token for the next page");
        let bag = PaginationBag::decode(&token).expect("the token to decode");
        assert_eq!(bag.page(), 1);

        let page = syncer
            .list(&context, None, Some(&token))
            .await
            .expect("the second page to list");
        assert_eq!(page.items[0].id.to_string(), "user:u2");
        assert!(page.next_token.is_some());
    }

    #[tokio::test]
    async fn list_terminates_on_empty_page() {
        let fixture = FixtureClient::with_page_size(10);
        let syncer = UserSyncer::new(Client::from(fixture.clone()));
        let context = Context::fixture();

        let page = syncer
            .list(&context, None, None)
            .await
            .expect("the empty page to list");
        assert!(page.items.is_empty());
        assert!(page.next_token.is_none());
        // The terminal page costs exactly one upstream request.
        assert_eq!(fixture.calls(), vec!["users_list:0".to_string()]);
    }

    #[tokio::test]
    async fn entitlements_and_grants_are_empty() {
        let fixture = FixtureClient::default();
        let syncer = UserSyncer::new(Client::from(fixture.clone()));
        let context = Context::fixture();
        let resource = super::user_resource(&fixture_user("u1", "Alice", "Active", false));

        let page = syncer
            .entitlements(&context, &resource, None)
            .await
            .expect("entitlements to return");
        assert!(page.items.is_empty());
        assert!(page.next_token.is_none());

        let page = syncer
            .grants(&context, &resource, None)
            .await
            .expect("grants to return");
        assert!(page.items.is_empty());
        assert!(page.next_token.is_none());

        // Leaf kinds answer locally, no upstream requests at all.
        assert!(fixture.calls().is_empty());
    }
}
