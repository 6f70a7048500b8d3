//! Recording command runner used by the pipeline tests.

use std::cell::RefCell;
use std::path::Path;

use crate::command::{CommandRunner, ExternalCommand};
use crate::error::{PackError, Result};

/// Records every command instead of running it. Commands whose rendered line,
/// with the program reduced to its file name, starts with a registered prefix
/// get a canned stdout or fail.
#[derive(Default)]
pub(crate) struct RecordingRunner {
    calls: RefCell<Vec<ExternalCommand>>,
    responses: Vec<(String, String)>,
    failures: Vec<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, prefix: &str, stdout: &str) -> Self {
        self.responses.push((prefix.to_string(), stdout.to_string()));
        self
    }

    pub fn fail_on(mut self, prefix: &str) -> Self {
        self.failures.push(prefix.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ExternalCommand> {
        self.calls.borrow().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.to_string()).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, cmd: &ExternalCommand) -> Result<String> {
        self.calls.borrow_mut().push(cmd.clone());
        let line = match_key(cmd);
        if self.failures.iter().any(|p| line.starts_with(p.as_str())) {
            return Err(PackError::CommandFailed {
                command: cmd.to_string(),
                status: "exit status: 1".to_string(),
                output: "fatal: simulated failure\n".to_string(),
            });
        }
        Ok(self
            .responses
            .iter()
            .find(|(p, _)| line.starts_with(p.as_str()))
            .map(|(_, out)| out.clone())
            .unwrap_or_default())
    }
}

fn match_key(cmd: &ExternalCommand) -> String {
    let program = Path::new(&cmd.program)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| cmd.program.clone());
    ExternalCommand {
        program,
        ..cmd.clone()
    }
    .to_string()
}
