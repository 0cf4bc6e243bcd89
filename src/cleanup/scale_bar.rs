//! Scale-bar removal
//!
//! Acquisition software burns a calibration ruler and its label into a fixed
//! corner of each micrograph. This module locates that corner, masks the
//! bright overlay pixels and fills them with fast-marching inpainting.
//!
//! # Algorithm
//!
//! 1. Region: `[floor(w * left), w) × [floor(h * top), h)`
//! 2. Copy the region out as float colour samples
//! 3. Rec.601 luminance (grayscale used directly)
//! 4. Threshold: `luma >= threshold` (8-bit scale, inclusive)
//! 5. Dilate with a 3×3 square, `dilate_iterations` times
//! 6. Telea inpainting with `inpaint_radius`
//! 7. Write the synthesized pixels back into the same rectangle

use image::{DynamicImage, GrayImage, ImageBuffer, Pixel};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::telea::{TeleaInpainter, DEFAULT_INPAINT_RADIUS};
use super::mask::{build_mask, masked_pixel_count};
use super::planes::{RegionPlanes, Sample};
use super::types::{CleanupError, Result, ScaleBarRegion};

// ============================================================
// Constants
// ============================================================

/// Left edge of the scale-bar region as a fraction of image width
pub const DEFAULT_REGION_LEFT: f64 = 0.85;

/// Top edge of the scale-bar region as a fraction of image height
pub const DEFAULT_REGION_TOP: f64 = 0.90;

/// Brightness threshold (8-bit scale) for overlay pixels
pub const DEFAULT_THRESHOLD: u8 = 200;

/// Number of 3×3 dilation passes applied to the mask
pub const DEFAULT_DILATE_ITERATIONS: u8 = 1;

/// Wider label region for instruments that print magnification text
pub const WIDE_REGION_LEFT: f64 = 0.70;
pub const WIDE_REGION_TOP: f64 = 0.85;

const MIN_FRACTION: f64 = 0.0;
const MAX_FRACTION: f64 = 1.0;
const MAX_DILATE_ITERATIONS: u8 = 16;
const MIN_INPAINT_RADIUS: f32 = 1.0;
const MAX_INPAINT_RADIUS: f32 = 32.0;

// ============================================================
// Options
// ============================================================

/// Named region layouts selectable from config or the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegionPreset {
    /// Ruler only, bottom-right 15% × 10%
    #[default]
    Standard,
    /// Ruler plus magnification label, bottom-right 30% × 15%
    WideLabel,
}

impl RegionPreset {
    /// Options this preset starts from
    pub fn options(self) -> ScaleBarOptions {
        match self {
            Self::Standard => ScaleBarOptions::default(),
            Self::WideLabel => ScaleBarOptions::wide_label(),
        }
    }
}

/// Options for scale-bar removal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleBarOptions {
    /// Region left edge, fraction of width (0.0-1.0)
    pub region_left: f64,

    /// Region top edge, fraction of height (0.0-1.0)
    pub region_top: f64,

    /// Luminance threshold on the 8-bit scale, inclusive
    pub threshold: u8,

    /// 3×3 dilation passes
    pub dilate_iterations: u8,

    /// Inpainting neighbourhood radius in pixels
    pub inpaint_radius: f32,
}

impl Default for ScaleBarOptions {
    fn default() -> Self {
        Self {
            region_left: DEFAULT_REGION_LEFT,
            region_top: DEFAULT_REGION_TOP,
            threshold: DEFAULT_THRESHOLD,
            dilate_iterations: DEFAULT_DILATE_ITERATIONS,
            inpaint_radius: DEFAULT_INPAINT_RADIUS,
        }
    }
}

impl ScaleBarOptions {
    /// Create a builder
    pub fn builder() -> ScaleBarOptionsBuilder {
        ScaleBarOptionsBuilder::default()
    }

    /// Larger region for overlays that include a magnification label
    pub fn wide_label() -> Self {
        Self {
            region_left: WIDE_REGION_LEFT,
            region_top: WIDE_REGION_TOP,
            ..Default::default()
        }
    }
}

/// Builder for ScaleBarOptions
#[derive(Debug, Default)]
pub struct ScaleBarOptionsBuilder {
    options: ScaleBarOptions,
}

impl ScaleBarOptionsBuilder {
    /// Set region left edge fraction
    #[must_use]
    pub fn region_left(mut self, fraction: f64) -> Self {
        self.options.region_left = fraction.clamp(MIN_FRACTION, MAX_FRACTION);
        self
    }

    /// Set region top edge fraction
    #[must_use]
    pub fn region_top(mut self, fraction: f64) -> Self {
        self.options.region_top = fraction.clamp(MIN_FRACTION, MAX_FRACTION);
        self
    }

    /// Set brightness threshold
    #[must_use]
    pub fn threshold(mut self, threshold: u8) -> Self {
        self.options.threshold = threshold;
        self
    }

    /// Set dilation passes
    #[must_use]
    pub fn dilate_iterations(mut self, iterations: u8) -> Self {
        self.options.dilate_iterations = iterations.min(MAX_DILATE_ITERATIONS);
        self
    }

    /// Set inpainting radius
    #[must_use]
    pub fn inpaint_radius(mut self, radius: f32) -> Self {
        self.options.inpaint_radius = radius.clamp(MIN_INPAINT_RADIUS, MAX_INPAINT_RADIUS);
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> ScaleBarOptions {
        self.options
    }
}

// ============================================================
// Region
// ============================================================

impl ScaleBarRegion {
    /// Compute the scale-bar region for an image of the given size
    ///
    /// Bounds are truncated toward zero and clamped to the image, so the
    /// region never exceeds it and degenerates to empty for empty images.
    pub fn from_dimensions(width: u32, height: u32, options: &ScaleBarOptions) -> Self {
        let left = options.region_left.clamp(MIN_FRACTION, MAX_FRACTION);
        let top = options.region_top.clamp(MIN_FRACTION, MAX_FRACTION);
        let x = ((width as f64 * left) as u32).min(width);
        let y = ((height as f64 * top) as u32).min(height);

        Self {
            x,
            y,
            width: width - x,
            height: height - y,
        }
    }
}

// ============================================================
// Result
// ============================================================

/// Scale-bar removal result
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleBarResult {
    /// Region that was examined
    pub region: ScaleBarRegion,

    /// Pixels selected by threshold + dilation
    pub masked_pixels: u32,

    /// Pixels synthesized by the inpainter
    pub filled_pixels: u32,

    /// Image dimensions
    pub image_size: (u32, u32),
}

impl ScaleBarResult {
    /// Check whether anything was removed
    pub fn has_overlay(&self) -> bool {
        self.masked_pixels > 0
    }

    /// Masked pixels the inpainter could not reach; they keep their values
    pub fn unfilled_pixels(&self) -> u32 {
        self.masked_pixels.saturating_sub(self.filled_pixels)
    }

    /// Masked share of the region in percent
    pub fn coverage_percent(&self) -> f64 {
        let area = self.region.area();
        if area == 0 {
            return 0.0;
        }
        (self.masked_pixels as f64 / area as f64) * 100.0
    }
}

// ============================================================
// Scale Bar Remover
// ============================================================

/// Scale-bar removal processor
pub struct ScaleBarRemover;

impl ScaleBarRemover {
    /// Remove the scale bar from an image in place
    pub fn remove_in_place(
        image: &mut DynamicImage,
        options: &ScaleBarOptions,
    ) -> Result<ScaleBarResult> {
        Self::remove_with_mask(image, options).map(|(result, _)| result)
    }

    /// Remove the scale bar and also return the mask that was used
    pub fn remove_with_mask(
        image: &mut DynamicImage,
        options: &ScaleBarOptions,
    ) -> Result<(ScaleBarResult, GrayImage)> {
        match image {
            DynamicImage::ImageLuma8(buf) => Self::remove_from_buffer(buf, options),
            DynamicImage::ImageLumaA8(buf) => Self::remove_from_buffer(buf, options),
            DynamicImage::ImageRgb8(buf) => Self::remove_from_buffer(buf, options),
            DynamicImage::ImageRgba8(buf) => Self::remove_from_buffer(buf, options),
            DynamicImage::ImageLuma16(buf) => Self::remove_from_buffer(buf, options),
            DynamicImage::ImageLumaA16(buf) => Self::remove_from_buffer(buf, options),
            DynamicImage::ImageRgb16(buf) => Self::remove_from_buffer(buf, options),
            DynamicImage::ImageRgba16(buf) => Self::remove_from_buffer(buf, options),
            DynamicImage::ImageRgb32F(buf) => Self::remove_from_buffer(buf, options),
            DynamicImage::ImageRgba32F(buf) => Self::remove_from_buffer(buf, options),
            other => Err(CleanupError::UnsupportedColorType(format!(
                "{:?}",
                other.color()
            ))),
        }
    }

    /// Remove the scale bar from a typed image buffer in place
    pub fn remove_from_buffer<P>(
        image: &mut ImageBuffer<P, Vec<P::Subpixel>>,
        options: &ScaleBarOptions,
    ) -> Result<(ScaleBarResult, GrayImage)>
    where
        P: Pixel,
        P::Subpixel: Sample,
    {
        let (width, height) = image.dimensions();
        let region = ScaleBarRegion::from_dimensions(width, height, options);

        if region.is_empty() {
            debug!(width, height, "scale-bar region is empty, nothing to do");
            return Ok((
                ScaleBarResult {
                    region,
                    masked_pixels: 0,
                    filled_pixels: 0,
                    image_size: (width, height),
                },
                GrayImage::new(region.width, region.height),
            ));
        }

        let mut planes = RegionPlanes::extract(image, &region);
        let mask = build_mask(&planes, options.threshold, options.dilate_iterations);
        let masked_pixels = masked_pixel_count(&mask);

        debug!(
            x = region.x,
            y = region.y,
            w = region.width,
            h = region.height,
            masked_pixels,
            "scale-bar mask built"
        );

        let filled_pixels = if masked_pixels == 0 {
            0
        } else {
            let filled = TeleaInpainter::new(options.inpaint_radius).inpaint(&mut planes, &mask)?;
            let written = planes.write_back(image, &region, &mask);
            trace!(filled, written, "region written back");
            filled as u32
        };

        if filled_pixels < masked_pixels {
            warn!(
                masked_pixels,
                filled_pixels,
                "scale-bar region has no unmasked pixels, {} pixel(s) left unchanged",
                masked_pixels - filled_pixels
            );
        }

        Ok((
            ScaleBarResult {
                region,
                masked_pixels,
                filled_pixels,
                image_size: (width, height),
            },
            mask,
        ))
    }
}

/// Remove the scale bar and return the cleaned image
///
/// The returned image has the same dimensions and colour type as the input.
pub fn inpaint_scale_bar(mut image: DynamicImage, options: &ScaleBarOptions) -> Result<DynamicImage> {
    ScaleBarRemover::remove_in_place(&mut image, options)?;
    Ok(image)
}

// ============================================================
// Tests
// ============================================================
