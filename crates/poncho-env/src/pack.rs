//! `pack_env`: spec file in, environment archive out.

use std::path::{Path, PathBuf};

use poncho_core::config::ToolsConfig;

use crate::command::{conda_command, CommandRunner, ExternalCommand};
use crate::error::{PackError, Result};
use crate::fetch::{git_data, http_data};
use crate::installer::{install_local_pip, pip_version};
use crate::local::find_local_pip;
use crate::merge::{create_conda_spec, CONDA_SPEC_FILE};
use crate::spec::PonchoSpec;

/// Build the environment described by `spec_path` and write it to `output`
/// (overwritten if present).
///
/// All intermediate state lives in a temporary directory that doubles as the
/// conda prefix; it is removed when this function returns, whether or not the
/// run succeeded. The first failing external command aborts the run.
pub fn pack_env(
    spec_path: &Path,
    output: &Path,
    tools: &ToolsConfig,
    runner: &dyn CommandRunner,
) -> Result<PathBuf> {
    // packages installed as editable from pip
    let local_pip_pkgs = find_local_pip(tools, runner)?;
    let spec = PonchoSpec::from_file(spec_path)?;

    let env_dir = tempfile::Builder::new()
        .prefix("poncho-env-")
        .tempdir()
        .map_err(|e| PackError::io("Create temporary environment directory", e))?;
    let prefix = env_dir.path();
    tracing::info!("Creating temporary environment in {}", prefix.display());

    tracing::info!("Converting spec file...");
    let merged = create_conda_spec(&spec, prefix, &local_pip_pkgs)?;

    tracing::info!("Fetching git data...");
    git_data(&spec, prefix, tools, runner)?;

    tracing::info!("Fetching http data...");
    http_data(&spec, prefix, tools, runner)?;

    tracing::info!("Populating environment...");
    runner.run(
        &conda_command(&tools.conda, "env create", prefix)
            .arg("--file")
            .path_arg(&prefix.join(CONDA_SPEC_FILE)),
    )?;

    tracing::info!("Adding local packages...");
    if !merged.pip_local.is_empty() {
        let version = pip_version(tools, runner)?;
        for (name, path) in &merged.pip_local {
            install_local_pip(tools, runner, prefix, name, path, &version)?;
        }
    }

    tracing::info!("Generating environment file...");
    // --ignore-missing-files: conda-pack otherwise refuses prefixes where
    // common packages (e.g. python) have files removed after install.
    runner.run(
        &ExternalCommand::new(&tools.conda_pack)
            .arg("--prefix")
            .path_arg(prefix)
            .arg("--output")
            .path_arg(output)
            .args(["--force", "--ignore-missing-files"]),
    )?;

    tracing::info!(
        "To activate environment run poncho_package_run -e {} <command>",
        output.display()
    );

    env_dir
        .close()
        .map_err(|e| PackError::io("Remove temporary environment directory", e))?;
    Ok(output.to_path_buf())
}
