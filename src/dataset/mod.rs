//! Dataset module
//!
//! Walks an input tree of TIFF micrographs, runs scale-bar removal on each
//! file and mirrors the results into an output tree.
//!
//! # Example
//!
//! ```rust,no_run
//! use scalebar_clean::{process_dataset, DatasetOptions};
//! use std::path::Path;
//!
//! let report = process_dataset(
//!     Path::new("./Data"),
//!     Path::new("./data_processed"),
//!     &DatasetOptions::default(),
//! )
//! .unwrap();
//!
//! for outcome in &report.outcomes {
//!     println!("{}", outcome);
//! }
//! ```

mod types;
mod walker;

// Re-export public API
pub use types::{
    DatasetError, DatasetReport, FileError, FileOutcome, FileTask, Result, DEFAULT_OUTPUT_PREFIX,
    MASK_SUFFIX, TIFF_EXTENSIONS,
};
pub use walker::{
    is_tiff, output_path_for, process_dataset, DatasetCallback, DatasetOptions, DatasetWalker,
    SilentCallback,
};
