//! Combine individual logical units to initialise and run a dogsync process.
use anyhow::Result;
use clap::Parser;

use dogsync_conf::Conf;

mod cmd;
mod init;

pub use self::cmd::Cli;

/// Initialise the dogsync process and invoke a command implementation.
pub async fn execute(cli: Cli, conf: Conf) -> Result<()> {
    match cli.command {
        cmd::Command::Grant(args) => cmd::grant::run(conf, args).await,
        cmd::Command::Revoke(args) => cmd::revoke::run(conf, args).await,
        cmd::Command::Sync => cmd::sync::run(conf).await,
        cmd::Command::Validate => cmd::validate::run(conf).await,
    }
}

/// Initialise the async runtime for the process and invoke [`execute`].
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let conf = dogsync_conf::load(&cli.config)?.with_env_overrides();
    conf.validate()?;
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed tokio runtime initialisation")
        .block_on(execute(cli, conf))
}
