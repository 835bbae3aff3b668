//! Configuration file structure (site.toml).

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use wasmsite_build::{
    BuildConfig, CssToolConfig, HostRequirement, SiteLayout, StylesheetLayout, ToolVersion,
    WasmArtifacts, WasmProfile, WasmToolConfig,
};

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    paths: PathsConfig,
    #[serde(default)]
    wasm: WasmConfig,
    #[serde(default)]
    css: CssConfig,
    #[serde(default)]
    host: HostConfig,
}

#[derive(Debug, Deserialize)]
struct PathsConfig {
    #[serde(rename = "static", default = "default_static")]
    static_dir: PathBuf,
    #[serde(default = "default_package")]
    package: PathBuf,
    #[serde(default = "default_output")]
    output: PathBuf,
}

#[derive(Debug, Deserialize)]
struct WasmConfig {
    #[serde(default = "default_wasm_program")]
    program: String,
    #[serde(default = "default_target")]
    target: String,
    #[serde(default = "default_out_name")]
    out_name: String,
    #[serde(default)]
    profile: WasmProfile,
}

#[derive(Debug, Deserialize)]
struct CssConfig {
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default = "default_css_program")]
    program: String,
    #[serde(default = "default_css_source")]
    source: PathBuf,
    #[serde(default = "default_css_destination")]
    destination: PathBuf,
}

#[derive(Debug, Deserialize)]
struct HostConfig {
    #[serde(default = "default_host_program")]
    program: String,
    /// Arguments that make the program print its version
    #[serde(default = "default_host_args")]
    args: Vec<String>,
    #[serde(default = "default_minimum")]
    minimum: String,
}

fn default_static() -> PathBuf {
    PathBuf::from("static")
}
fn default_package() -> PathBuf {
    PathBuf::from("pkg")
}
fn default_output() -> PathBuf {
    PathBuf::from("build")
}
fn default_wasm_program() -> String {
    "wasm-pack".to_string()
}
fn default_target() -> String {
    "web".to_string()
}
fn default_out_name() -> String {
    WasmArtifacts::default().out_name
}
fn default_true() -> bool {
    true
}
fn default_css_program() -> String {
    "sass".to_string()
}
fn default_css_source() -> PathBuf {
    StylesheetLayout::default().source
}
fn default_css_destination() -> PathBuf {
    StylesheetLayout::default().destination
}
fn default_host_program() -> String {
    HostRequirement::default().program
}
fn default_host_args() -> Vec<String> {
    HostRequirement::default().args
}
fn default_minimum() -> String {
    HostRequirement::default().minimum.to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            static_dir: default_static(),
            package: default_package(),
            output: default_output(),
        }
    }
}

impl Default for WasmConfig {
    fn default() -> Self {
        Self {
            program: default_wasm_program(),
            target: default_target(),
            out_name: default_out_name(),
            profile: WasmProfile::default(),
        }
    }
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            program: default_css_program(),
            source: default_css_source(),
            destination: default_css_destination(),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            program: default_host_program(),
            args: default_host_args(),
            minimum: default_minimum(),
        }
    }
}

/// Overrides taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub dev: bool,
    pub no_css: bool,
    pub skip_host_check: bool,
}

impl ConfigFile {
    /// Load configuration from `path`.
    ///
    /// A missing file falls back to defaults unless `required` is set, which
    /// is the case when the path was named explicitly on the command line.
    /// Returns an error if the config file exists but is malformed.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        if !path.exists() {
            anyhow::ensure!(!required, "Config file not found: {}", path.display());
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Turn the file settings into a build configuration rooted at `root`.
    pub fn into_build_config(self, root: PathBuf, overrides: &Overrides) -> Result<BuildConfig> {
        let host = if overrides.skip_host_check {
            None
        } else {
            let minimum: ToolVersion = self
                .host
                .minimum
                .parse()
                .context("Invalid [host] minimum")?;
            Some(HostRequirement {
                program: self.host.program,
                args: self.host.args,
                minimum,
            })
        };

        let stylesheet = (self.css.enabled && !overrides.no_css).then(|| StylesheetLayout {
            source: self.css.source,
            destination: self.css.destination,
        });
        if let Some(css) = &stylesheet {
            anyhow::ensure!(
                stays_inside(&css.destination),
                "[css] destination must be a relative path inside the output directory: {}",
                css.destination.display()
            );
        }

        let profile = if overrides.dev {
            WasmProfile::Dev
        } else {
            self.wasm.profile
        };

        Ok(BuildConfig {
            root,
            layout: SiteLayout {
                static_dir: self.paths.static_dir,
                stylesheet,
                package_dir: self.paths.package,
                output_dir: self.paths.output,
            },
            wasm: WasmToolConfig {
                program: self.wasm.program,
                target: self.wasm.target,
                profile,
                artifacts: WasmArtifacts {
                    out_name: self.wasm.out_name,
                },
            },
            css: CssToolConfig {
                program: self.css.program,
            },
            host,
        })
    }
}

/// Whether `relative` names a file below the directory it is joined onto.
fn stays_inside(relative: &Path) -> bool {
    let mut components = relative.components().peekable();
    components.peek().is_some()
        && components.all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && relative.file_name().is_some()
}
