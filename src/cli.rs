//! CLI argument definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::cleanup::RegionPreset;
use crate::config::CliOverrides;

/// Default input dataset root
pub const DEFAULT_INPUT_DIR: &str = "./Data";

/// Default output root
pub const DEFAULT_OUTPUT_DIR: &str = "./data_processed";

/// Remove burned-in scale bars from micrograph TIFF datasets
#[derive(Parser, Debug)]
#[command(name = "scalebar-clean")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input dataset root (searched recursively for .tif/.tiff)
    #[arg(value_name = "INPUT", env = "SCALEBAR_INPUT", default_value = DEFAULT_INPUT_DIR)]
    pub input: PathBuf,

    /// Output root (mirrors the input tree)
    #[arg(value_name = "OUTPUT", env = "SCALEBAR_OUTPUT", default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Config file (default: ./scalebar.toml, then user config dir)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Overlay region layout; --region-left/--region-top refine it
    #[arg(long, value_enum)]
    pub preset: Option<CliRegionPreset>,

    /// Luminance threshold on the 8-bit scale (inclusive)
    #[arg(long)]
    pub threshold: Option<u8>,

    /// Left edge of the overlay region as a fraction of width
    #[arg(long, value_parser = parse_fraction)]
    pub region_left: Option<f64>,

    /// Top edge of the overlay region as a fraction of height
    #[arg(long, value_parser = parse_fraction)]
    pub region_top: Option<f64>,

    /// Mask dilation passes (3x3)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=16))]
    pub dilate_iterations: Option<u8>,

    /// Inpainting neighbourhood radius in pixels
    #[arg(long)]
    pub inpaint_radius: Option<f32>,

    /// Filename prefix for processed outputs
    #[arg(long)]
    pub prefix: Option<String>,

    /// Also write the overlay mask as <name>_mask.png
    #[arg(long)]
    pub save_mask: bool,

    /// Show the execution plan without processing
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress per-file output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliRegionPreset {
    /// Ruler only (bottom-right 15% x 10%)
    Standard,
    /// Ruler and magnification label (bottom-right 30% x 15%)
    WideLabel,
}

impl From<CliRegionPreset> for RegionPreset {
    fn from(preset: CliRegionPreset) -> Self {
        match preset {
            CliRegionPreset::Standard => RegionPreset::Standard,
            CliRegionPreset::WideLabel => RegionPreset::WideLabel,
        }
    }
}

impl Cli {
    /// Values the user set explicitly; unset flags leave config file values alone
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            preset: self.preset.map(RegionPreset::from),
            region_left: self.region_left,
            region_top: self.region_top,
            threshold: self.threshold,
            dilate_iterations: self.dilate_iterations,
            inpaint_radius: self.inpaint_radius,
            prefix: self.prefix.clone(),
            save_mask: self.save_mask.then_some(true),
        }
    }
}

fn parse_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} is outside 0.0..=1.0", value))
    }
}
