//! Check the configured Datadog API credentials and exit.
use anyhow::Result;

use dogsync_conf::Conf;

use crate::init;

/// Exercise the configured credentials against the authentication endpoint.
pub async fn run(conf: Conf) -> Result<()> {
    let context = init::context(&conf);
    let connector = init::connector(&conf)?;
    connector.validate(&context).await?;
    slog::info!(context.logger, "Datadog API credentials are valid");
    Ok(())
}
