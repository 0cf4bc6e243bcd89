//! Cleanup module for micrograph post-processing
//!
//! Removes burned-in overlays from acquisition images:
//!
//! # Features
//!
//! - **Scale-bar removal** ([`scale_bar`]) - locate the overlay corner and inpaint it
//! - **Masking** ([`mask`]) - bright-pixel threshold plus morphological dilation
//! - **Inpainting** ([`telea`]) - Telea fast-marching fill via the `inpaint` crate
//!
//! # Example
//!
//! ```rust,no_run
//! use scalebar_clean::{inpaint_scale_bar, ScaleBarOptions};
//!
//! let img = image::open("sample.tif").unwrap();
//! let cleaned = inpaint_scale_bar(img, &ScaleBarOptions::default()).unwrap();
//! cleaned.save("processed_sample.tif").unwrap();
//! ```

pub mod mask;
pub mod planes;
pub mod scale_bar;
pub mod telea;
mod types;

// Re-export public API
pub use mask::{build_mask, dilate_mask, threshold_mask};
pub use planes::RegionPlanes;
pub use scale_bar::{
    inpaint_scale_bar, RegionPreset, ScaleBarOptions, ScaleBarOptionsBuilder, ScaleBarRemover,
    ScaleBarResult,
};
pub use telea::TeleaInpainter;

pub use types::{CleanupError, ScaleBarRegion};
