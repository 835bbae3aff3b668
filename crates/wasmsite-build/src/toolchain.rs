//! Command lines for the wasm packaging tool and the CSS preprocessor.

use std::path::Path;

use serde::Deserialize;

use crate::layout::{StylesheetLayout, WasmArtifacts};
use crate::step::ExternalStep;

/// Cargo profile the wasm crate is compiled with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WasmProfile {
    #[default]
    Release,
    Dev,
    Profiling,
}

impl WasmProfile {
    /// Flag understood by `wasm-pack build`.
    pub fn flag(self) -> &'static str {
        match self {
            Self::Release => "--release",
            Self::Dev => "--dev",
            Self::Profiling => "--profiling",
        }
    }
}

/// Settings for the wasm packaging tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WasmToolConfig {
    pub program: String,

    /// Output target mode (`web` produces an ES module loader)
    pub target: String,

    pub profile: WasmProfile,

    pub artifacts: WasmArtifacts,
}

impl Default for WasmToolConfig {
    fn default() -> Self {
        Self {
            program: "wasm-pack".to_string(),
            target: "web".to_string(),
            profile: WasmProfile::Release,
            artifacts: WasmArtifacts::default(),
        }
    }
}

impl WasmToolConfig {
    /// `wasm-pack build` writing its artifacts into `package_dir`.
    pub fn step(&self, package_dir: &Path) -> ExternalStep {
        ExternalStep::new(
            "compiling wasm",
            &self.program,
            [
                "build".to_string(),
                "--target".to_string(),
                self.target.clone(),
                self.profile.flag().to_string(),
                "--out-dir".to_string(),
                package_dir.display().to_string(),
                "--out-name".to_string(),
                self.artifacts.out_name.clone(),
            ],
        )
    }
}

/// Settings for the CSS preprocessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssToolConfig {
    pub program: String,
}

impl Default for CssToolConfig {
    fn default() -> Self {
        Self {
            program: "sass".to_string(),
        }
    }
}

impl CssToolConfig {
    /// Compile `stylesheet.source` into `output_dir/stylesheet.destination`.
    ///
    /// Source maps are disabled so the compiler writes exactly one file.
    pub fn step(&self, stylesheet: &StylesheetLayout, output_dir: &Path) -> ExternalStep {
        ExternalStep::new(
            "compiling css",
            &self.program,
            [
                "--no-source-map".to_string(),
                stylesheet.source.display().to_string(),
                output_dir
                    .join(&stylesheet.destination)
                    .display()
                    .to_string(),
            ],
        )
    }
}
