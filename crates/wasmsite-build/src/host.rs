//! Host toolchain version check.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::PreconditionError;
use crate::step::CommandRunner;

/// A `MAJOR.MINOR.PATCH` version as reported by a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToolVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl ToolVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Find the first version number in free-form tool output, such as
    /// `rustc 1.79.0 (129f3b996 2024-06-10)`.
    pub fn find_in(text: &str) -> Option<Self> {
        let caps = VERSION_RE.captures(text)?;
        let part = |i: usize| -> Option<u64> {
            match caps.get(i) {
                Some(m) => m.as_str().parse().ok(),
                None => Some(0),
            }
        };

        Some(Self::new(part(1)?, part(2)?, part(3)?))
    }
}

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").expect("Invalid version regex")
});

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Error returned when a version string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid version {0:?}: expected MAJOR.MINOR or MAJOR.MINOR.PATCH")]
pub struct ParseVersionError(String);

impl FromStr for ToolVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parts: Vec<&str> = trimmed.split('.').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(ParseVersionError(s.to_string()));
        }

        let mut numbers = [0u64; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| ParseVersionError(s.to_string()))?;
        }

        Ok(Self::new(numbers[0], numbers[1], numbers[2]))
    }
}

/// Minimum version a host tool must report before anything is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRequirement {
    /// Program to probe
    pub program: String,

    /// Arguments that make the program print its version
    pub args: Vec<String>,

    /// Oldest accepted version
    pub minimum: ToolVersion,
}

impl Default for HostRequirement {
    fn default() -> Self {
        Self {
            program: "rustc".to_string(),
            args: vec!["--version".to_string()],
            minimum: ToolVersion::new(1, 70, 0),
        }
    }
}

impl HostRequirement {
    /// Probe the host and compare its version against the minimum.
    ///
    /// The probe only reads the tool's version output; nothing on disk is
    /// touched whatever the outcome.
    pub fn check(
        &self,
        runner: &dyn CommandRunner,
        cwd: &Path,
    ) -> Result<ToolVersion, PreconditionError> {
        let output = runner
            .capture(&self.program, &self.args, cwd)
            .map_err(|source| PreconditionError::ProbeFailed {
                program: self.program.clone(),
                source,
            })?;

        let found = ToolVersion::find_in(&output).ok_or_else(|| PreconditionError::Unparsable {
            program: self.program.clone(),
            output: output.trim().to_string(),
        })?;

        if found < self.minimum {
            return Err(PreconditionError::TooOld {
                program: self.program.clone(),
                found,
                required: self.minimum,
            });
        }

        tracing::debug!("{} {} satisfies >= {}", self.program, found, self.minimum);
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::{ExternalStep, StepStatus};
    use std::io;

    struct FixedOutput(io::Result<String>);

    impl CommandRunner for FixedOutput {
        fn run(&self, _step: &ExternalStep, _cwd: &Path) -> io::Result<StepStatus> {
            unreachable!("host check never runs build steps")
        }

        fn capture(&self, _program: &str, _args: &[String], _cwd: &Path) -> io::Result<String> {
            match &self.0 {
                Ok(out) => Ok(out.clone()),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }
    }

    #[test]
    fn finds_version_in_rustc_output() {
        let v = ToolVersion::find_in("rustc 1.79.0 (129f3b996 2024-06-10)").unwrap();
        assert_eq!(v, ToolVersion::new(1, 79, 0));
    }

    #[test]
    fn finds_two_part_version() {
        let v = ToolVersion::find_in("Python 3.8").unwrap();
        assert_eq!(v, ToolVersion::new(3, 8, 0));
    }

    #[test]
    fn compares_numerically_not_lexically() {
        assert!(ToolVersion::new(1, 10, 0) > ToolVersion::new(1, 9, 5));
        assert!(ToolVersion::new(2, 0, 0) > ToolVersion::new(1, 99, 99));
    }

    #[test]
    fn parses_minimum_from_config_string() {
        assert_eq!("1.70".parse::<ToolVersion>(), Ok(ToolVersion::new(1, 70, 0)));
        assert_eq!(
            " 0.12.1 ".parse::<ToolVersion>(),
            Ok(ToolVersion::new(0, 12, 1))
        );
        assert!("1".parse::<ToolVersion>().is_err());
        assert!("1.x".parse::<ToolVersion>().is_err());
        assert!("1.2.3.4".parse::<ToolVersion>().is_err());
    }

    #[test]
    fn accepts_exact_minimum() {
        let runner = FixedOutput(Ok("rustc 1.70.0 (90c541806 2023-05-31)\n".into()));
        let found = HostRequirement::default()
            .check(&runner, Path::new("."))
            .unwrap();
        assert_eq!(found, ToolVersion::new(1, 70, 0));
    }

    #[test]
    fn reads_version_reported_on_stderr() {
        // Empty stdout followed by the stderr text, as ProcessRunner joins them
        let runner = FixedOutput(Ok("\nwasm-tool 1.80.1\n".into()));
        let found = HostRequirement::default()
            .check(&runner, Path::new("."))
            .unwrap();
        assert_eq!(found, ToolVersion::new(1, 80, 1));
    }

    #[test]
    fn rejects_older_host() {
        let runner = FixedOutput(Ok("rustc 1.65.0\n".into()));
        let err = HostRequirement::default()
            .check(&runner, Path::new("."))
            .unwrap_err();
        assert!(matches!(
            err,
            PreconditionError::TooOld { found, .. } if found == ToolVersion::new(1, 65, 0)
        ));
    }

    #[test]
    fn rejects_output_without_version() {
        let runner = FixedOutput(Ok("command not understood".into()));
        let err = HostRequirement::default()
            .check(&runner, Path::new("."))
            .unwrap_err();
        assert!(matches!(err, PreconditionError::Unparsable { .. }));
    }

    #[test]
    fn missing_probe_is_a_precondition_failure() {
        let runner = FixedOutput(Err(io::Error::new(io::ErrorKind::NotFound, "no rustc")));
        let err = HostRequirement::default()
            .check(&runner, Path::new("."))
            .unwrap_err();
        assert!(matches!(err, PreconditionError::ProbeFailed { .. }));
    }
}
