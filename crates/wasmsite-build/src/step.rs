//! External tool invocation.
//!
//! Both compilers are driven the same way: build an argument list, spawn the
//! program directly (no shell), block until it exits and check the status.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::BuildError;

/// One invocation of an external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalStep {
    /// Human-readable description used in progress and error messages
    pub description: String,

    /// Program to execute, looked up on `PATH`
    pub program: String,

    /// Arguments passed verbatim
    pub args: Vec<String>,
}

impl ExternalStep {
    pub fn new(
        description: impl Into<String>,
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            description: description.into(),
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The command line as it would be typed in a shell, for logging.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How an external step terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepStatus {
    pub success: bool,

    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
}

impl StepStatus {
    pub const fn success() -> Self {
        Self {
            success: true,
            code: Some(0),
        }
    }

    pub const fn failure(code: i32) -> Self {
        Self {
            success: false,
            code: Some(code),
        }
    }
}

impl From<std::process::ExitStatus> for StepStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
        }
    }
}

/// Seam between the orchestrator and the operating system's process table.
pub trait CommandRunner {
    /// Run a build step to completion with inherited stdio.
    fn run(&self, step: &ExternalStep, cwd: &Path) -> io::Result<StepStatus>;

    /// Run a read-only probe and return its standard output followed by its
    /// standard error, so tools that report on either stream can be read.
    ///
    /// A probe that exits unsuccessfully is reported as an error.
    fn capture(&self, program: &str, args: &[String], cwd: &Path) -> io::Result<String>;
}

/// Runs tools as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, step: &ExternalStep, cwd: &Path) -> io::Result<StepStatus> {
        Command::new(&step.program)
            .args(&step.args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map(StepStatus::from)
    }

    fn capture(&self, program: &str, args: &[String], cwd: &Path) -> io::Result<String> {
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()?;

        if !output.status.success() {
            return Err(io::Error::other(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.stderr.is_empty() {
            text.push('\n');
            text.push_str(&String::from_utf8_lossy(&output.stderr));
        }
        Ok(text)
    }
}

/// Run one external step and turn anything but a clean exit into an error.
pub fn run_step(
    runner: &dyn CommandRunner,
    step: &ExternalStep,
    cwd: &Path,
) -> Result<(), BuildError> {
    tracing::info!("{} with '{}'", step.description, step.command_line());

    let status = runner.run(step, cwd).map_err(|source| BuildError::Spawn {
        program: step.program.clone(),
        source,
    })?;

    if !status.success {
        return Err(BuildError::StepFailed {
            description: step.description.clone(),
            code: status.code,
        });
    }

    tracing::debug!("{} finished", step.description);
    Ok(())
}
