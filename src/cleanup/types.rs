//! Common types for the cleanup module

use thiserror::Error;

/// Cleanup error types
#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("Unsupported color type: {0}")]
    UnsupportedColorType(String),

    #[error("Inpainting failed: {0}")]
    Inpaint(#[from] inpaint::Error),

    #[error("Region buffer does not match {width}x{height}x{channels}")]
    RegionShape {
        width: u32,
        height: u32,
        channels: usize,
    },
}

pub type Result<T> = std::result::Result<T, CleanupError>;

/// Rectangular sub-area of an image selected for masking and inpainting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScaleBarRegion {
    /// Left edge (inclusive)
    pub x: u32,
    /// Top edge (inclusive)
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ScaleBarRegion {
    /// Number of pixels covered by the region
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Zero-area regions are a no-op for inpainting
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check whether an absolute pixel coordinate lies inside the region
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x
            && y >= self.y
            && (x - self.x) < self.width
            && (y - self.y) < self.height
    }
}
