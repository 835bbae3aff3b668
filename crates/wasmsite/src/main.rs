//! wasmsite CLI - assemble a deployable static site from a wasm-pack crate.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use wasmsite_build::error::GENERIC_EXIT_CODE;
use wasmsite_build::BuildError;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "wasmsite")]
#[command(about = "Build a deployable static site from a wasm-pack crate")]
#[command(version)]
pub struct Cli {
    /// Path to config file, relative to the project root [default: site.toml, if present]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Project root containing the static assets, stylesheet and wasm crate
    #[arg(short = 'C', long, default_value = ".")]
    root: PathBuf,

    /// Compile the wasm crate with the dev profile
    #[arg(long)]
    dev: bool,

    /// Skip the stylesheet compile
    #[arg(long)]
    no_css: bool,

    /// Do not check the host toolchain version
    #[arg(long)]
    skip_host_check: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match commands::build::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Map a failure onto the process exit status.
fn exit_code(err: &anyhow::Error) -> u8 {
    let code = err
        .downcast_ref::<BuildError>()
        .map(BuildError::exit_code)
        .unwrap_or(GENERIC_EXIT_CODE);

    u8::try_from(code)
        .ok()
        .filter(|code| *code != 0)
        .unwrap_or(GENERIC_EXIT_CODE as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasmsite_build::error::PRECONDITION_EXIT_CODE;
    use wasmsite_build::{PreconditionError, ToolVersion};

    #[test]
    fn parses_without_arguments() {
        let cli = Cli::try_parse_from(["wasmsite"]).unwrap();
        assert_eq!(cli.config, None);
        assert_eq!(cli.root, PathBuf::from("."));
        assert!(!cli.dev && !cli.no_css && !cli.skip_host_check && !cli.verbose);
    }

    #[test]
    fn parses_flags() {
        let cli =
            Cli::try_parse_from(["wasmsite", "-C", "site", "--dev", "--no-css", "-v"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("site"));
        assert!(cli.dev && cli.no_css && cli.verbose);
    }

    #[test]
    fn parses_explicit_config() {
        let cli = Cli::try_parse_from(["wasmsite", "-c", "custom.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn precondition_failure_exits_with_two() {
        let err = anyhow::Error::from(BuildError::from(PreconditionError::TooOld {
            program: "rustc".into(),
            found: ToolVersion::new(1, 0, 0),
            required: ToolVersion::new(1, 70, 0),
        }));
        assert_eq!(i32::from(exit_code(&err)), PRECONDITION_EXIT_CODE);
    }

    #[test]
    fn tool_exit_code_is_propagated() {
        let err = anyhow::Error::from(BuildError::StepFailed {
            description: "compiling wasm".into(),
            code: Some(101),
        });
        assert_eq!(exit_code(&err), 101);
    }

    #[test]
    fn out_of_range_code_falls_back_to_generic() {
        let err = anyhow::Error::from(BuildError::StepFailed {
            description: "compiling css".into(),
            code: Some(256),
        });
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn config_errors_are_generic() {
        assert_eq!(exit_code(&anyhow::anyhow!("Failed to parse site.toml")), 1);
    }
}
