//! Build orchestrator.

use std::path::{self, Component, Path, PathBuf};
use std::time::Instant;

use crate::assemble::{clean_output, copy_tree, ensure_parent, place_artifacts};
use crate::error::BuildError;
use crate::host::{HostRequirement, ToolVersion};
use crate::layout::SiteLayout;
use crate::step::{run_step, CommandRunner, ProcessRunner};
use crate::toolchain::{CssToolConfig, WasmToolConfig};

/// Configuration for one build run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Project root; relative layout paths are resolved against it and the
    /// external tools run with it as their working directory
    pub root: PathBuf,

    /// Input and output paths
    pub layout: SiteLayout,

    /// Wasm packaging tool settings
    pub wasm: WasmToolConfig,

    /// CSS preprocessor settings
    pub css: CssToolConfig,

    /// Host version guard, `None` to skip the check
    pub host: Option<HostRequirement>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            layout: SiteLayout::default(),
            wasm: WasmToolConfig::default(),
            css: CssToolConfig::default(),
            host: Some(HostRequirement::default()),
        }
    }
}

/// Result of a successful build.
#[derive(Debug)]
pub struct BuildReport {
    /// Host version that passed the check, if it ran
    pub host_version: Option<ToolVersion>,

    /// Number of static files copied
    pub static_files: usize,

    /// Artifact paths inside the output directory
    pub artifacts: Vec<PathBuf>,

    /// Compiled stylesheet path, if the CSS step ran
    pub stylesheet: Option<PathBuf>,

    /// Output directory
    pub output_dir: PathBuf,

    /// Total build time in milliseconds
    pub duration_ms: u64,
}

/// Runs the build steps in their fixed order.
pub struct SiteBuilder<R = ProcessRunner> {
    config: BuildConfig,
    runner: R,
}

impl SiteBuilder {
    /// Create a builder that runs the real toolchain.
    pub fn new(config: BuildConfig) -> Self {
        Self::with_runner(config, ProcessRunner)
    }
}

impl<R: CommandRunner> SiteBuilder<R> {
    /// Create a builder that launches tools through `runner`.
    pub fn with_runner(config: BuildConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// Build the site.
    ///
    /// Stops at the first failing step. Whatever the failed step left in the
    /// output directory stays there for inspection.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let start = Instant::now();
        // Tools run inside the root and must receive root-independent paths
        let root = path::absolute(&self.config.root).map_err(|e| {
            BuildError::io("Failed to resolve project root", &self.config.root, e)
        })?;
        let root = root.as_path();
        let layout = self.config.layout.resolve(root);

        // Nothing may be touched before the host check passes
        let host_version = match &self.config.host {
            Some(requirement) => Some(requirement.check(&self.runner, root)?),
            None => {
                tracing::debug!("Skipping host version check");
                None
            }
        };

        tracing::info!(
            "Removing '{}' directory if it exists",
            layout.output_dir.display()
        );
        clean_output(&layout.output_dir)?;

        run_step(&self.runner, &self.config.wasm.step(&layout.package_dir), root)?;

        let stylesheet = match &layout.stylesheet {
            Some(css) => {
                let destination = layout.output_dir.join(&css.destination);
                ensure_parent(&destination)?;
                run_step(&self.runner, &self.config.css.step(css, &layout.output_dir), root)?;
                Some(destination)
            }
            None => None,
        };

        tracing::info!("Inserting files into '{}'", layout.output_dir.display());
        let copied = copy_tree(&layout.static_dir, &layout.output_dir)?;
        if let Some(css) = &layout.stylesheet {
            if overwrites(&copied, &css.destination) {
                tracing::warn!(
                    "Static asset {} replaced the compiled stylesheet",
                    css.destination.display()
                );
            }
        }

        let artifacts = place_artifacts(
            &layout.package_dir,
            &self.config.wasm.artifacts,
            &layout.output_dir,
        )?;

        Ok(BuildReport {
            host_version,
            static_files: copied.len(),
            artifacts,
            stylesheet,
            output_dir: layout.output_dir,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Whether any copied relative path names the same file as `destination`.
fn overwrites(copied: &[PathBuf], destination: &Path) -> bool {
    fn normal(p: &Path) -> Vec<Component<'_>> {
        p.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    }

    let target = normal(destination);
    copied.iter().any(|path| normal(path) == target)
}
