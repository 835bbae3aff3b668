//! Build orchestration for wasm-pack powered static sites.
//!
//! Checks the host toolchain, compiles the wasm crate and its stylesheet with
//! external tools, then assembles static assets and compiler artifacts into a
//! freshly cleaned output directory.

pub mod assemble;
pub mod builder;
pub mod error;
pub mod host;
pub mod layout;
pub mod step;
pub mod toolchain;

pub use builder::{BuildConfig, BuildReport, SiteBuilder};
pub use error::{BuildError, PreconditionError};
pub use host::{HostRequirement, ParseVersionError, ToolVersion};
pub use layout::{SiteLayout, StylesheetLayout, WasmArtifacts};
pub use step::{CommandRunner, ExternalStep, ProcessRunner, StepStatus};
pub use toolchain::{CssToolConfig, WasmProfile, WasmToolConfig};
