//! Merge a poncho spec into a conda environment spec.
//!
//! Requirements that name a package installed as pip `--editable` in the
//! current environment are pulled out of the conda spec and reinstalled from
//! their local checkout once the environment exists.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{PackError, Result};
use crate::local::LocalPackages;
use crate::spec::{Dependency, PonchoSpec};

/// Channels used when the spec does not list any.
pub const DEFAULT_CHANNELS: &[&str] = &["conda-forge", "defaults"];

/// Name written into the conda spec. The prefix is passed explicitly, so the
/// name is never used to locate the environment.
pub const ENV_NAME: &str = "base";

/// File name of the conda spec inside the working directory.
pub const CONDA_SPEC_FILE: &str = "conda_spec.yml";

/// What `conda env create --file` receives. Conda rejects unknown keys, so
/// nothing else may be added here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CondaSpec {
    pub channels: Vec<String>,
    pub dependencies: Vec<Dependency>,
    pub name: String,
}

/// Merged result: the conda spec plus the editable packages to install
/// afterwards (name → local path).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedSpec {
    #[serde(flatten)]
    pub conda: CondaSpec,
    pub pip_local: BTreeMap<String, String>,
}

static VERSION_RE: OnceLock<Regex> = OnceLock::new();

/// Drop the version qualifier from a requirement: everything from the first
/// of `!~=<>` on. `foo>=1.2,<2` → `foo`; `foo` → `foo`.
pub fn strip_version(req: &str) -> &str {
    let re = VERSION_RE.get_or_init(|| Regex::new(r"[!~=<>].*$").expect("version qualifier regex"));
    match re.find(req) {
        Some(m) => &req[..m.start()],
        None => req,
    }
}

/// Merge `spec` against the editable packages in `local`. Pure; see
/// [`create_conda_spec`] for the variant that also writes the file.
pub fn merge_spec(spec: &PonchoSpec, local: &LocalPackages) -> MergedSpec {
    let mut matched = BTreeSet::new();

    let (channels, dependencies) = match &spec.conda {
        None => (default_channels(), Vec::new()),
        Some(conda) => {
            let channels = conda.channels.clone().unwrap_or_else(default_channels);
            let dependencies = match &conda.dependencies {
                Some(deps) => filter_dependencies(deps, local, &mut matched),
                None => legacy_dependencies(&conda.packages, &spec.pip, local, &mut matched),
            };
            (channels, dependencies)
        }
    };

    for name in local.keys() {
        if !matched.contains(name) {
            tracing::warn!(
                "pip package {} was found as pip --editable, but it is not part of the spec. Ignoring local installation.",
                name
            );
        }
    }

    let pip_local = matched
        .into_iter()
        .filter_map(|name| local.get(&name).map(|path| (name, path.clone())))
        .collect();

    MergedSpec {
        conda: CondaSpec {
            channels,
            dependencies,
            name: ENV_NAME.to_string(),
        },
        pip_local,
    }
}

/// Merge the spec and write the conda part to `<out_dir>/conda_spec.yml`.
///
/// The file is JSON, which conda reads as YAML. `pip_local` stays in memory.
pub fn create_conda_spec(
    spec: &PonchoSpec,
    out_dir: &Path,
    local: &LocalPackages,
) -> Result<MergedSpec> {
    let merged = merge_spec(spec, local);
    write_conda_spec(out_dir, &merged.conda)?;
    Ok(merged)
}

pub fn write_conda_spec(out_dir: &Path, conda: &CondaSpec) -> Result<PathBuf> {
    let path = out_dir.join(CONDA_SPEC_FILE);
    let body = serde_json::to_string_pretty(conda)?;
    std::fs::write(&path, body)
        .map_err(|e| PackError::io(format!("Write {}", path.display()), e))?;
    Ok(path)
}

fn default_channels() -> Vec<String> {
    DEFAULT_CHANNELS.iter().map(|c| c.to_string()).collect()
}

/// New layout: filter plain entries and the contents of every pip container.
fn filter_dependencies(
    deps: &[Dependency],
    local: &LocalPackages,
    matched: &mut BTreeSet<String>,
) -> Vec<Dependency> {
    let mut out = Vec::with_capacity(deps.len());
    for dep in deps {
        match dep {
            Dependency::Pip { pip } => out.push(Dependency::Pip {
                pip: remote_only(pip, local, matched),
            }),
            Dependency::Package(req) => {
                let name = strip_version(req);
                if local.contains_key(name) {
                    matched.insert(name.to_string());
                } else {
                    out.push(dep.clone());
                }
            }
            Dependency::Other(_) => out.push(dep.clone()),
        }
    }
    out
}

/// Legacy layout: `conda.packages` plus top-level `pip`, each de-duplicated in
/// first-seen order. The pip list is always appended as one container.
fn legacy_dependencies(
    packages: &[String],
    pip: &[String],
    local: &LocalPackages,
    matched: &mut BTreeSet<String>,
) -> Vec<Dependency> {
    let packages = remote_only(&unique_ordered(packages), local, matched);
    let pip = remote_only(&unique_ordered(pip), local, matched);

    let mut out: Vec<Dependency> = packages.into_iter().map(Dependency::Package).collect();
    out.push(Dependency::Pip { pip });
    out
}

/// Requirements whose bare name is not editable-local; the others are recorded in `matched`.
fn remote_only(reqs: &[String], local: &LocalPackages, matched: &mut BTreeSet<String>) -> Vec<String> {
    reqs.iter()
        .filter(|req| {
            let name = strip_version(req);
            if local.contains_key(name) {
                matched.insert(name.to_string());
                false
            } else {
                true
            }
        })
        .cloned()
        .collect()
}

fn unique_ordered(items: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|i| seen.insert(i.as_str()))
        .cloned()
        .collect()
}
