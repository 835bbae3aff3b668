//! Error taxonomy for a build run.

use std::io;
use std::path::{Path, PathBuf};

use crate::host::ToolVersion;

/// Exit code used when the host toolchain does not satisfy the requirement.
pub const PRECONDITION_EXIT_CODE: i32 = 2;

/// Exit code for every failure that carries no code of its own.
pub const GENERIC_EXIT_CODE: i32 = 1;

/// The host environment failed the pre-build check.
#[derive(Debug, thiserror::Error)]
pub enum PreconditionError {
    #[error("Could not run `{program}` to determine the host version: {source}")]
    ProbeFailed {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Could not find a version number in the output of `{program}`: {output:?}")]
    Unparsable { program: String, output: String },

    #[error("{program} {required} or a more recent version is required (found {found})")]
    TooOld {
        program: String,
        found: ToolVersion,
        required: ToolVersion,
    },
}

/// Errors that abort a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error("Failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{description} failed ({})", describe_code(.code))]
    StepFailed {
        description: String,
        code: Option<i32>,
    },

    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to walk {}: {source}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

impl BuildError {
    pub(crate) fn io(action: &'static str, path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Process exit code that reports this error to the invoking shell.
    ///
    /// A failing tool's own exit code is passed through so that callers see
    /// the same status they would have seen running the tool by hand.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Precondition(_) => PRECONDITION_EXIT_CODE,
            Self::StepFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => GENERIC_EXIT_CODE,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_uses_dedicated_exit_code() {
        let err = BuildError::from(PreconditionError::TooOld {
            program: "rustc".into(),
            found: ToolVersion::new(1, 60, 0),
            required: ToolVersion::new(1, 70, 0),
        });

        assert_eq!(err.exit_code(), PRECONDITION_EXIT_CODE);
        assert_eq!(
            err.to_string(),
            "rustc 1.70.0 or a more recent version is required (found 1.60.0)"
        );
    }

    #[test]
    fn step_failure_propagates_tool_exit_code() {
        let err = BuildError::StepFailed {
            description: "compiling wasm".into(),
            code: Some(101),
        };
        assert_eq!(err.exit_code(), 101);
        assert_eq!(err.to_string(), "compiling wasm failed (exit code 101)");
    }

    #[test]
    fn signal_termination_maps_to_generic_code() {
        let err = BuildError::StepFailed {
            description: "compiling css".into(),
            code: None,
        };
        assert_eq!(err.exit_code(), GENERIC_EXIT_CODE);
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[test]
    fn io_error_names_path() {
        let err = BuildError::io(
            "Failed to copy",
            "pkg/portfolio.js",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(err.exit_code(), GENERIC_EXIT_CODE);
        assert!(err.to_string().starts_with("Failed to copy pkg/portfolio.js"));
    }
}
