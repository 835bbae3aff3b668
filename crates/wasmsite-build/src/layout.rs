//! Project and output directory layout.

use std::path::{Path, PathBuf};

/// Where the stylesheet comes from and where its compiled form lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetLayout {
    /// Preprocessor source file
    pub source: PathBuf,

    /// Destination, relative to the output directory
    pub destination: PathBuf,
}

impl Default for StylesheetLayout {
    fn default() -> Self {
        Self {
            source: PathBuf::from("style/index.scss"),
            destination: PathBuf::from("css/index.css"),
        }
    }
}

/// Every path a build reads from or writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    /// Pre-authored files copied verbatim into the output
    pub static_dir: PathBuf,

    /// Stylesheet to compile, `None` to skip the CSS step
    pub stylesheet: Option<StylesheetLayout>,

    /// Directory the wasm packaging tool writes its artifacts to
    pub package_dir: PathBuf,

    /// Output directory, wiped and rebuilt on every run
    pub output_dir: PathBuf,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("static"),
            stylesheet: Some(StylesheetLayout::default()),
            package_dir: PathBuf::from("pkg"),
            output_dir: PathBuf::from("build"),
        }
    }
}

impl SiteLayout {
    /// Anchor every relative path at `root`. Absolute paths are kept.
    ///
    /// The stylesheet destination stays relative; it is always interpreted
    /// inside the output directory.
    pub fn resolve(&self, root: &Path) -> Self {
        Self {
            static_dir: root.join(&self.static_dir),
            stylesheet: self.stylesheet.as_ref().map(|css| StylesheetLayout {
                source: root.join(&css.source),
                destination: css.destination.clone(),
            }),
            package_dir: root.join(&self.package_dir),
            output_dir: root.join(&self.output_dir),
        }
    }

    /// Absolute location of the compiled stylesheet, if one is configured.
    pub fn stylesheet_output(&self) -> Option<PathBuf> {
        self.stylesheet
            .as_ref()
            .map(|css| self.output_dir.join(&css.destination))
    }
}

/// Names of the two files the wasm packaging tool produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WasmArtifacts {
    /// Base name passed to the packaging tool as `--out-name`
    pub out_name: String,
}

impl Default for WasmArtifacts {
    fn default() -> Self {
        Self {
            out_name: "portfolio".to_string(),
        }
    }
}

impl WasmArtifacts {
    /// JavaScript loader script.
    pub fn loader(&self) -> String {
        format!("{}.js", self.out_name)
    }

    /// Compiled WebAssembly module.
    pub fn module(&self) -> String {
        format!("{}_bg.wasm", self.out_name)
    }

    /// Both artifact file names, loader first.
    pub fn file_names(&self) -> [String; 2] {
        [self.loader(), self.module()]
    }
}
