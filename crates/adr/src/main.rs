//! adr - Architecture Decision Record workflow
//!
//! Thin dispatcher: parse the verb, open the ADR root once, run one
//! operation. Any error exits with status 1.

mod cli;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // help and --version print to stdout and succeed; everything else is exit 1
            let code = if err.use_stderr() { 1 } else { 0 };
            err.print()?;
            std::process::exit(code);
        }
    };

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let ws = cli::open_workspace(cli.root.as_deref())?;

    match command {
        Commands::Validate => cli::cmd_validate(&ws),
        Commands::List { long, json } => cli::cmd_list(&ws, long, json),
        Commands::Status { json } => cli::cmd_status(&ws, json),
        Commands::New {
            category,
            title,
            register,
        } => cli::cmd_new(&ws, &category, &title, register),
        Commands::Merge { path, register } => cli::cmd_merge(&ws, &path, register),
        Commands::Cleanup => cli::cmd_cleanup(&ws),
        Commands::Pr { path } => cli::cmd_pr(&ws, &path),
        Commands::Permissions { json } => cli::cmd_permissions(&ws, json),
    }
}
