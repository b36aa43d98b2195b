//! Data model shared across the dogsync connector crates.
//!
//! Resources, entitlements and grants are ephemeral: they are recomputed on
//! every sync pass and never persisted by the connector itself.
mod annotations;
mod entitlement;
mod grant;
mod resource;

pub use self::annotations::Annotations;
pub use self::annotations::SKIP_ENTITLEMENTS_AND_GRANTS;
pub use self::entitlement::Entitlement;
pub use self::entitlement::EntitlementBuilder;
pub use self::entitlement::EntitlementKind;
pub use self::entitlement::EntitlementRef;
pub use self::entitlement::InvalidEntitlementRef;
pub use self::grant::Grant;
pub use self::resource::AccountType;
pub use self::resource::GroupProfile;
pub use self::resource::GroupTrait;
pub use self::resource::InvalidResourceId;
pub use self::resource::InvalidResourceKind;
pub use self::resource::Resource;
pub use self::resource::ResourceId;
pub use self::resource::ResourceKind;
pub use self::resource::ResourceTraits;
pub use self::resource::ResourceType;
pub use self::resource::RoleProfile;
pub use self::resource::RoleTrait;
pub use self::resource::UserProfile;
pub use self::resource::UserStatus;
pub use self::resource::UserTrait;
