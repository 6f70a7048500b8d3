//! External command execution.
//!
//! Every collaborator (conda, pip, git, curl, tar, gzip, conda-pack) is driven
//! through one contract: build an argument list, run it synchronously, capture
//! its output, and fail the run on a non-zero exit.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{PackError, Result};

/// A program invocation, not yet executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Path argument, converted lossily.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for a in &self.args {
            write!(f, " {}", a)?;
        }
        Ok(())
    }
}

/// `conda <command...> --prefix=<prefix>`; further arguments are appended by the caller.
pub fn conda_command(conda: &str, command: &str, prefix: &Path) -> ExternalCommand {
    ExternalCommand::new(conda)
        .args(command.split_whitespace())
        .arg(format!("--prefix={}", prefix.display()))
}

/// Runs external commands for the pipeline.
///
/// Returns captured stdout on success and [`PackError::CommandFailed`] on a
/// non-zero exit. Implementations must block until the child exits.
pub trait CommandRunner {
    fn run(&self, cmd: &ExternalCommand) -> Result<String>;
}

/// Runs commands on the host with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, cmd: &ExternalCommand) -> Result<String> {
        tracing::debug!(command = %cmd, "Running external command");

        let mut c = Command::new(&cmd.program);
        c.args(&cmd.args);
        if let Some(ref dir) = cmd.cwd {
            c.current_dir(dir);
        }
        let out = c.output().map_err(|source| PackError::Spawn {
            command: cmd.to_string(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&out.stdout).into_owned();
        if !out.status.success() {
            let mut output = stdout;
            output.push_str(&String::from_utf8_lossy(&out.stderr));
            tracing::warn!("Error executing: {}", cmd);
            return Err(PackError::CommandFailed {
                command: cmd.to_string(),
                status: out.status.to_string(),
                output,
            });
        }
        Ok(stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_renders_full_command_line() {
        let cmd = ExternalCommand::new("conda")
            .args(["env", "create"])
            .arg("--prefix=/tmp/env");
        assert_eq!(cmd.to_string(), "conda env create --prefix=/tmp/env");
    }

    #[test]
    fn test_conda_command_puts_prefix_after_subcommand() {
        let cmd = conda_command("conda", "env create", Path::new("/tmp/env"))
            .arg("--file")
            .arg("/tmp/env/conda_spec.yml");
        assert_eq!(
            cmd.to_string(),
            "conda env create --prefix=/tmp/env --file /tmp/env/conda_spec.yml"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_stdout() {
        let out = SystemRunner
            .run(&ExternalCommand::new("sh").args(["-c", "echo hello"]))
            .unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_failure_with_output() {
        let err = SystemRunner
            .run(&ExternalCommand::new("sh").args(["-c", "echo partial; echo boom >&2; exit 3"]))
            .unwrap_err();
        match err {
            PackError::CommandFailed { command, output, .. } => {
                assert!(command.starts_with("sh -c"));
                assert!(output.contains("partial"));
                assert!(output.contains("boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_system_runner_missing_program() {
        let err = SystemRunner
            .run(&ExternalCommand::new("poncho-definitely-not-a-program"))
            .unwrap_err();
        assert!(matches!(err, PackError::Spawn { .. }));
    }
}
