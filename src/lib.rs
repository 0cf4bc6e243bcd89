//! # scalebar-clean
//!
//! Removes the burned-in scale bar and label overlay from the bottom-right
//! corner of micrograph TIFFs and writes cleaned copies to a mirrored tree.
//!
//! ## Modules
//!
//! - [`cleanup`] - Region Inpainter (mask + Telea fast-marching fill)
//! - [`dataset`] - Dataset Walker (recursive TIFF discovery, mirrored output)
//! - [`config`] - TOML configuration and CLI override merge
//! - [`cli`] - command-line arguments
//! - [`progress`] - console reporting
//!
//! ## Example
//!
//! ```rust,no_run
//! use scalebar_clean::{process_dataset, DatasetOptions};
//! use std::path::Path;
//!
//! let report = process_dataset(
//!     Path::new("Data"),
//!     Path::new("data_processed"),
//!     &DatasetOptions::default(),
//! )
//! .unwrap();
//! println!("{} ok, {} failed", report.succeeded(), report.failed());
//! ```

pub mod cleanup;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod progress;

pub use cleanup::{
    inpaint_scale_bar, CleanupError, RegionPreset, ScaleBarOptions, ScaleBarOptionsBuilder,
    ScaleBarRegion, ScaleBarRemover, ScaleBarResult, TeleaInpainter,
};
pub use cli::Cli;
pub use config::{CliOverrides, Config, ConfigError, RunConfig};
pub use dataset::{
    process_dataset, DatasetCallback, DatasetError, DatasetOptions, DatasetReport, DatasetWalker,
    FileError, FileOutcome, FileTask, SilentCallback,
};
pub use progress::{FileStage, OutputMode, ProgressTracker};

/// Process exit codes
pub mod exit_codes {
    /// Run completed (individual file failures included)
    pub const SUCCESS: i32 = 0;
    /// Unexpected fatal error
    pub const GENERAL_ERROR: i32 = 1;
    /// Invalid command-line arguments
    pub const INVALID_ARGS: i32 = 2;
    /// Input root missing
    pub const INPUT_NOT_FOUND: i32 = 3;
    /// Config file unreadable or invalid
    pub const CONFIG_ERROR: i32 = 4;
}
