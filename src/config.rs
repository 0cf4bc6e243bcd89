//! Configuration file support
//!
//! Settings are read from TOML and merged with command-line overrides
//! (CLI wins). Every field is optional; missing values fall back to the
//! built-in defaults.
//!
//! ```toml
//! [region]
//! preset = "standard"   # or "wide-label"
//! left = 0.85
//! top = 0.90
//!
//! [mask]
//! threshold = 200
//! dilate_iterations = 1
//!
//! [inpaint]
//! radius = 3.0
//!
//! [output]
//! prefix = "processed_"
//! save_mask = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cleanup::{RegionPreset, ScaleBarOptions};
use crate::dataset::{DatasetOptions, DEFAULT_OUTPUT_PREFIX};

/// Local config file name, looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "scalebar.toml";

/// Directory under the user config dir
pub const CONFIG_DIR_NAME: &str = "scalebar-clean";

/// Config error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// `[region]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    pub preset: Option<RegionPreset>,
    pub left: Option<f64>,
    pub top: Option<f64>,
}

/// `[mask]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    pub threshold: Option<u8>,
    pub dilate_iterations: Option<u8>,
}

/// `[inpaint]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InpaintConfig {
    pub radius: Option<f32>,
}

/// `[output]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub prefix: Option<String>,
    pub save_mask: Option<bool>,
}

/// Configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub region: RegionConfig,
    pub mask: MaskConfig,
    pub inpaint: InpaintConfig,
    pub output: OutputConfig,
}

/// Values set explicitly on the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub preset: Option<RegionPreset>,
    pub region_left: Option<f64>,
    pub region_top: Option<f64>,
    pub threshold: Option<u8>,
    pub dilate_iterations: Option<u8>,
    pub inpaint_radius: Option<f32>,
    pub prefix: Option<String>,
    pub save_mask: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Effective settings for a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    pub scale_bar: ScaleBarOptions,
    pub prefix: String,
    pub save_mask: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Config::default().merge_with_cli(&CliOverrides::default())
    }
}

impl RunConfig {
    /// Options for the dataset walker
    pub fn dataset_options(&self) -> DatasetOptions {
        DatasetOptions::default()
            .with_scale_bar(self.scale_bar)
            .with_prefix(self.prefix.clone())
            .with_save_mask(self.save_mask)
    }

    /// Pretty JSON rendering (dry-run output)
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

impl Config {
    /// Parse TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a specific config file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Candidate config locations in lookup order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join(CONFIG_DIR_NAME).join("config.toml"));
        }
        paths
    }

    /// Load the first config file found, or defaults when none exists
    pub fn load() -> Result<Self> {
        match Self::search_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Merge with CLI overrides into the effective run settings
    ///
    /// The selected preset supplies the base region; explicit edges from
    /// either source replace it.
    pub fn merge_with_cli(&self, cli: &CliOverrides) -> RunConfig {
        let defaults = cli
            .preset
            .or(self.region.preset)
            .unwrap_or_default()
            .options();

        let scale_bar = ScaleBarOptions::builder()
            .region_left(
                cli.region_left
                    .or(self.region.left)
                    .unwrap_or(defaults.region_left),
            )
            .region_top(cli.region_top.or(self.region.top).unwrap_or(defaults.region_top))
            .threshold(cli.threshold.or(self.mask.threshold).unwrap_or(defaults.threshold))
            .dilate_iterations(
                cli.dilate_iterations
                    .or(self.mask.dilate_iterations)
                    .unwrap_or(defaults.dilate_iterations),
            )
            .inpaint_radius(
                cli.inpaint_radius
                    .or(self.inpaint.radius)
                    .unwrap_or(defaults.inpaint_radius),
            )
            .build();

        RunConfig {
            scale_bar,
            prefix: cli
                .prefix
                .clone()
                .or_else(|| self.output.prefix.clone())
                .unwrap_or_else(|| DEFAULT_OUTPUT_PREFIX.to_string()),
            save_mask: cli.save_mask.or(self.output.save_mask).unwrap_or(false),
        }
    }
}
