//! Revoke a granted entitlement on the upstream authority.
use anyhow::Result;

use dogsync_conf::Conf;
use dogsync_models::EntitlementRef;
use dogsync_models::Grant;
use dogsync_models::ResourceId;

use super::MutationArgs;
use crate::init;

/// Apply one revoke mutation through the connector.
pub async fn run(conf: Conf, args: MutationArgs) -> Result<()> {
    let context = init::context(&conf);
    let connector = init::connector(&conf)?;
    let principal: ResourceId = args.principal.parse()?;
    let entitlement: EntitlementRef = args.entitlement.parse()?;
    let grant = Grant {
        principal,
        entitlement,
    };
    connector.revoke(&context, &grant).await?;
    slog::info!(
        context.logger, "Entitlement revoked";
        "entitlement" => args.entitlement,
        "principal" => args.principal,
    );
    Ok(())
}
