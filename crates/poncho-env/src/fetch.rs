//! Fetch git repositories and http files listed in the spec into the
//! environment directory, and record one `export` line per item in
//! `poncho/set_env`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use poncho_core::config::ToolsConfig;

use crate::command::{CommandRunner, ExternalCommand};
use crate::error::{PackError, Result};
use crate::spec::{HttpSource, PonchoSpec};

/// Directory, relative to the environment root, holding the activation fragment.
pub const ACTIVATION_DIR: &str = "poncho";
/// Sourced as `. poncho/set_env <env-root>` after the archive is unpacked.
pub const ACTIVATION_FILE: &str = "set_env";

/// How an http item is downloaded and unpacked, chosen from its
/// `(type, compression)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpLayout {
    TarGzip,
    Tar,
    Gzip,
    Plain,
}

impl HttpLayout {
    pub fn from_source(src: &HttpSource) -> Self {
        match (src.file_type.as_deref(), src.compression.as_deref()) {
            (Some("tar"), Some("gzip")) => Self::TarGzip,
            (Some("tar"), _) => Self::Tar,
            (_, Some("gzip")) => Self::Gzip,
            _ => Self::Plain,
        }
    }

    /// Suffix appended to the item name for the downloaded file.
    pub fn download_suffix(self) -> &'static str {
        match self {
            Self::TarGzip => ".tar.gz",
            Self::Tar => ".tar",
            Self::Gzip => ".gz",
            Self::Plain => "",
        }
    }
}

/// Clone every `git` item that has a `remote`.
pub fn git_data(
    spec: &PonchoSpec,
    out_dir: &Path,
    tools: &ToolsConfig,
    runner: &dyn CommandRunner,
) -> Result<()> {
    for (name, src) in &spec.git {
        let Some(ref remote) = src.remote else {
            continue;
        };
        // TODO: check out `ref` after cloning once it is settled whether an
        // unset ref means the remote's default branch.
        if let Some(ref git_ref) = src.git_ref {
            tracing::warn!(
                "git item {} declares ref '{}', which is not applied; cloning the default branch",
                name,
                git_ref
            );
        }
        let path = out_dir.join(name);
        runner.run(
            &ExternalCommand::new(&tools.git)
                .arg("clone")
                .arg(remote.as_str())
                .path_arg(&path),
        )?;
        append_export(out_dir, name)?;
    }
    Ok(())
}

/// Download every `http` item that has a `url`, unpacking it per its layout.
pub fn http_data(
    spec: &PonchoSpec,
    out_dir: &Path,
    tools: &ToolsConfig,
    runner: &dyn CommandRunner,
) -> Result<()> {
    for (name, src) in &spec.http {
        let Some(ref url) = src.url else {
            continue;
        };
        let layout = HttpLayout::from_source(src);
        let path = out_dir.join(name);
        let download = suffixed(&path, layout.download_suffix());

        runner.run(
            &ExternalCommand::new(&tools.curl)
                .arg(url.as_str())
                .arg("--output")
                .path_arg(&download),
        )?;

        match layout {
            HttpLayout::TarGzip | HttpLayout::Tar => {
                std::fs::create_dir(&path)
                    .map_err(|e| PackError::io(format!("Create {}", path.display()), e))?;
                let flags = if layout == HttpLayout::TarGzip { "-xzf" } else { "-xf" };
                runner.run(
                    &ExternalCommand::new(&tools.tar)
                        .arg(flags)
                        .path_arg(&download)
                        .arg("-C")
                        .path_arg(&path),
                )?;
            }
            HttpLayout::Gzip => {
                runner.run(&ExternalCommand::new(&tools.gzip).arg("-d").path_arg(&download))?;
            }
            HttpLayout::Plain => {}
        }
        append_export(out_dir, name)?;
    }
    Ok(())
}

/// Append `export <name>=$1/<name>` to `<out_dir>/poncho/set_env`, creating
/// the directory on first use.
pub fn append_export(out_dir: &Path, name: &str) -> Result<()> {
    let dir = out_dir.join(ACTIVATION_DIR);
    if !dir.exists() {
        std::fs::create_dir(&dir)
            .map_err(|e| PackError::io(format!("Create {}", dir.display()), e))?;
    }
    let file = dir.join(ACTIVATION_FILE);
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&file)
        .map_err(|e| PackError::io(format!("Open {}", file.display()), e))?;
    writeln!(f, "export {}=$1/{}", name, name)
        .map_err(|e| PackError::io(format!("Write {}", file.display()), e))?;
    Ok(())
}

fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}
