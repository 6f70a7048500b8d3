//! Discover pip packages installed in editable (development) mode.

use std::collections::BTreeMap;

use poncho_core::config::ToolsConfig;

use crate::command::{CommandRunner, ExternalCommand};
use crate::error::{PackError, Result};

/// Editable package name → source checkout location.
pub type LocalPackages = BTreeMap<String, String>;

/// Number of header lines `pip list` prints before the first row.
const LISTING_HEADER_LINES: usize = 2;

/// Query the active environment for editable pip packages.
pub fn find_local_pip(tools: &ToolsConfig, runner: &dyn CommandRunner) -> Result<LocalPackages> {
    let cmd = ExternalCommand::new(&tools.python).args(["-m", "pip", "list", "--editable"]);
    let raw = runner.run(&cmd)?;
    let found = parse_editable_listing(&raw)?;
    tracing::debug!(count = found.len(), "Found editable pip packages");
    Ok(found)
}

/// Parse the tabular output of `pip list --editable`.
///
/// ```text
/// Package    Version Location
/// ---------- ------- ----------------------
/// mylib      0.3.0   /home/me/src/mylib
/// ```
///
/// Every row must have exactly three columns. Anything else means pip changed
/// its format, and the run fails instead of guessing.
pub fn parse_editable_listing(raw: &str) -> Result<LocalPackages> {
    let mut path_of = LocalPackages::new();
    for line in raw.lines().skip(LISTING_HEADER_LINES) {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [pkg, _version, location] => {
                path_of.insert((*pkg).to_string(), (*location).to_string());
            }
            _ => {
                return Err(PackError::MalformedEditableRow {
                    line: line.to_string(),
                    fields: fields.len(),
                })
            }
        }
    }
    Ok(path_of)
}
