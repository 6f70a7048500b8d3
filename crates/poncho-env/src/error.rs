//! Errors raised by the packaging pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the packaging pipeline.
///
/// Every variant is fatal for the run; nothing is retried.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("Could not start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error executing: {command} ({status})")]
    CommandFailed {
        command: String,
        status: String,
        /// Captured stdout followed by stderr.
        output: String,
    },

    #[error("Unexpected row in `pip list --editable` output: '{line}' ({fields} fields, expected 3)")]
    MalformedEditableRow { line: String, fields: usize },

    #[error("Invalid spec file {}: {source}", path.display())]
    InvalidSpec {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not serialize conda spec: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Could not parse pip version from '{0}'")]
    PipVersion(String),

    #[error("'{tool}' not found in PATH: {source}")]
    ToolNotFound {
        tool: String,
        #[source]
        source: which::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl PackError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Captured output of a failed external command, if any.
    pub fn command_output(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { output, .. } => Some(output),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PackError>;
