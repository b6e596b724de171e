use anyhow::Result;

use crate::{
    app::context::AppContext,
    cli::{Cli, Commands},
    core::harness::SuiteReport,
};

pub mod postgres;
pub mod toolchain;

/// Unified interface implemented by each subcommand handler.
pub trait Command {
    /// Execute the subcommand, producing the suite report that drives the
    /// process exit code.
    ///
    /// # Errors
    /// Returns an error only for faults outside a suite run (bad
    /// configuration, not per-step failures).
    fn run(&self, ctx: &AppContext) -> Result<SuiteReport>;
}

/// Central dispatcher: routes parsed CLI to subcommand handlers.
///
/// # Errors
/// Returns an error if the invoked subcommand fails.
pub fn dispatch(cli: &Cli) -> Result<SuiteReport> {
    let ctx = AppContext::from_cli(cli.verbose, cli.runtime.as_deref());

    match &cli.command {
        Commands::Postgres { image, name } => {
            let cmd = postgres::PostgresCommand {
                image: image.as_deref(),
                name: name.as_deref(),
            };
            cmd.run(&ctx)
        }
        Commands::Toolchain { image, name } => {
            let cmd = toolchain::ToolchainCommand {
                image: image.as_deref(),
                name: name.as_deref(),
            };
            cmd.run(&ctx)
        }
    }
}
