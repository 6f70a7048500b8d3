//! Poncho CLI library — argument parsing and command dispatch.

mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use poncho_core::config::{ObservabilityConfig, ToolsConfig};
use poncho_core::observability;
use poncho_env::{local, merge, pack_env, PackError, PonchoSpec, SystemRunner};

/// Run the CLI — parses args, sets up tracing, dispatches to the pipeline.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let obs = ObservabilityConfig::from_env().with_cli_overrides(cli.log_level.clone(), cli.quiet);
    observability::init_tracing(&obs);
    let tools = ToolsConfig::from_env();
    tracing::debug!(?tools, "Loaded tool configuration");

    match cli.command {
        Commands::Create { spec, output } => {
            pack_env(Path::new(&spec), Path::new(&output), &tools, &SystemRunner)
                .map_err(report)?;
        }
        Commands::Convert { spec } => {
            let local_pkgs = local::find_local_pip(&tools, &SystemRunner).map_err(report)?;
            let doc = PonchoSpec::from_file(Path::new(&spec))?;
            let merged = merge::merge_spec(&doc, &local_pkgs);
            println!(
                "{}",
                serde_json::to_string_pretty(&merged).context("Serialize merged spec")?
            );
        }
        Commands::Editable => {
            let local_pkgs = local::find_local_pip(&tools, &SystemRunner).map_err(report)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&local_pkgs).context("Serialize editable packages")?
            );
        }
    }
    Ok(())
}

/// Print the captured output of a failed external command before the error
/// itself is reported.
fn report(err: PackError) -> anyhow::Error {
    if let Some(output) = err.command_output() {
        eprintln!("{}", output);
    }
    err.into()
}
