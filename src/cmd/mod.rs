//! Built-in `dogsync` commands.
use clap::Args;
use clap::Parser;
use clap::Subcommand;

pub mod grant;
pub mod revoke;
pub mod sync;
pub mod validate;

/// Sync Datadog users, teams and roles into a resource and grant graph.
#[derive(Debug, Parser)]
#[command(version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the dogsync configuration to use.
    #[arg(short = 'c', long = "config", default_value_t = String::from("dogsync.yaml"))]
    pub config: String,

    /// Select the dogsync command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Select the dogsync command to run.
#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Grant an entitlement to a principal on the upstream authority.
    Grant(MutationArgs),

    /// Revoke a granted entitlement on the upstream authority.
    Revoke(MutationArgs),

    /// Enumerate resources, entitlements and grants and emit them as JSON lines.
    #[command(alias = "run")]
    Sync,

    /// Check the configured Datadog API credentials and exit.
    Validate,
}

/// Principal and entitlement addressed by a mutation command.
#[derive(Clone, Debug, Args)]
pub struct MutationArgs {
    /// Entitlement to mutate, addressed as 'kind:resource-id:slug'.
    #[arg(long = "entitlement")]
    pub entitlement: String,

    /// Principal the mutation applies to, addressed as 'kind:id'.
    #[arg(long = "principal")]
    pub principal: String,
}
