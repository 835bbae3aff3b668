//! Site build command.

use anyhow::Result;
use wasmsite_build::SiteBuilder;

use crate::config::{ConfigFile, Overrides};
use crate::Cli;

/// Config file picked up from the project root when `--config` is not given.
const DEFAULT_CONFIG: &str = "site.toml";

/// Run the build command.
pub fn run(cli: &Cli) -> Result<()> {
    let file_config = match &cli.config {
        Some(path) => ConfigFile::load(&cli.root.join(path), true)?,
        None => ConfigFile::load(&cli.root.join(DEFAULT_CONFIG), false)?,
    };

    let overrides = Overrides {
        dev: cli.dev,
        no_css: cli.no_css,
        skip_host_check: cli.skip_host_check,
    };
    let config = file_config.into_build_config(cli.root.clone(), &overrides)?;

    let result = SiteBuilder::new(config).build()?;

    if let Some(version) = result.host_version {
        tracing::debug!("Host toolchain {}", version);
    }
    tracing::info!(
        "Copied {} static files and {} artifacts in {}ms",
        result.static_files,
        result.artifacts.len(),
        result.duration_ms
    );
    if let Some(stylesheet) = &result.stylesheet {
        tracing::info!("Stylesheet: {}", stylesheet.display());
    }
    tracing::info!("Build completed: {}", result.output_dir.display());

    Ok(())
}
