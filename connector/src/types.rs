//! Static definitions of the resource kinds synced from Datadog.
use once_cell::sync::Lazy;

use dogsync_models::Annotations;
use dogsync_models::ResourceKind;
use dogsync_models::ResourceType;

/// Resource type synced for Datadog users.
///
/// Users are leaf principals: the type carries the marker telling
/// orchestrators to skip the entitlements and grants phases.
pub static USER_TYPE: Lazy<ResourceType> = Lazy::new(|| {
    let mut annotations = Annotations::new();
    annotations.skip_entitlements_and_grants();
    ResourceType {
        kind: ResourceKind::User,
        display_name: "User".to_string(),
        annotations,
    }
});

/// Resource type synced for Datadog teams.
pub static TEAM_TYPE: Lazy<ResourceType> = Lazy::new(|| ResourceType {
    kind: ResourceKind::Team,
    display_name: "Team".to_string(),
    annotations: Annotations::new(),
});

/// Resource type synced for Datadog roles.
pub static ROLE_TYPE: Lazy<ResourceType> = Lazy::new(|| ResourceType {
    kind: ResourceKind::Role,
    display_name: "Role".to_string(),
    annotations: Annotations::new(),
});
