//! Grant an entitlement to a principal on the upstream authority.
use anyhow::Result;

use dogsync_conf::Conf;
use dogsync_models::EntitlementRef;
use dogsync_models::ResourceId;

use super::MutationArgs;
use crate::init;

/// Apply one grant mutation through the connector.
///
/// The upstream authority is the only state that changes: a later sync pass
/// is needed to observe the new edge.
pub async fn run(conf: Conf, args: MutationArgs) -> Result<()> {
    let context = init::context(&conf);
    let connector = init::connector(&conf)?;
    let principal: ResourceId = args.principal.parse()?;
    let entitlement: EntitlementRef = args.entitlement.parse()?;
    connector.grant(&context, &principal, &entitlement).await?;
    slog::info!(
        context.logger, "Entitlement granted";
        "entitlement" => args.entitlement,
        "principal" => args.principal,
    );
    Ok(())
}
