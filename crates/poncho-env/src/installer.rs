//! Reinstall editable pip packages into the new environment.

use std::path::Path;

use poncho_core::config::ToolsConfig;
use semver::Version;

use crate::command::{conda_command, CommandRunner, ExternalCommand};
use crate::error::{PackError, Result};

/// pip releases before this one need `--use-feature=in-tree-build` to build
/// from the source tree instead of a temporary copy.
pub const IN_TREE_BUILD_DEFAULT_SINCE: Version = Version::new(22, 1, 0);

/// Version of the `pip` found on PATH, from `pip -V`.
pub fn pip_version(tools: &ToolsConfig, runner: &dyn CommandRunner) -> Result<Version> {
    let pip = which::which(&tools.pip).map_err(|source| PackError::ToolNotFound {
        tool: tools.pip.clone(),
        source,
    })?;
    let out = runner.run(&ExternalCommand::new(pip.to_string_lossy()).arg("-V"))?;
    parse_pip_version(&out)
}

/// `pip 23.1.2 from /usr/lib/python3/site-packages/pip (python 3.11)` → 23.1.2
pub fn parse_pip_version(out: &str) -> Result<Version> {
    out.split_whitespace()
        .nth(1)
        .and_then(lenient_version)
        .ok_or_else(|| PackError::PipVersion(out.trim().to_string()))
}

/// Read the numeric release part of a PEP 440 version: `22` → 22.0.0,
/// `21.3` → 21.3.0, `23.0.post1` → 23.0.0, `22.1b1` → 22.1.0.
fn lenient_version(s: &str) -> Option<Version> {
    let mut parts = [0u64; 3];
    let mut filled = 0;
    for piece in s.split('.').take(3) {
        let digits: &str = &piece[..piece
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(piece.len())];
        if digits.is_empty() {
            break;
        }
        parts[filled] = digits.parse().ok()?;
        filled += 1;
        if digits.len() != piece.len() {
            break;
        }
    }
    if filled == 0 {
        return None;
    }
    Some(Version::new(parts[0], parts[1], parts[2]))
}

/// `conda run --prefix=<env> pip install [--use-feature=in-tree-build] <path>`
pub fn local_install_command(
    tools: &ToolsConfig,
    env_dir: &Path,
    pip_path: &str,
    pip_version: &Version,
) -> ExternalCommand {
    let cmd = conda_command(&tools.conda, "run", env_dir).args(["pip", "install"]);
    let cmd = if *pip_version < IN_TREE_BUILD_DEFAULT_SINCE {
        cmd.arg("--use-feature=in-tree-build")
    } else {
        cmd
    };
    cmd.arg(pip_path)
}

pub fn install_local_pip(
    tools: &ToolsConfig,
    runner: &dyn CommandRunner,
    env_dir: &Path,
    pip_name: &str,
    pip_path: &str,
    pip_version: &Version,
) -> Result<()> {
    tracing::info!("Installing {} from editable pip ({})", pip_name, pip_path);
    runner.run(&local_install_command(tools, env_dir, pip_path, pip_version))?;
    Ok(())
}
