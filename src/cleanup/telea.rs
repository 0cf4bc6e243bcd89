//! Telea inpainting of a region working copy
//!
//! The float planes are viewed as a `Luma<f32>` or `Rgb<f32>` buffer and
//! filled under the mask by the `inpaint` crate's fast-marching Telea
//! implementation. Samples stay in their native scale.

use image::{GrayImage, ImageBuffer, Luma, Pixel, Rgb};
use inpaint::prelude::*;

use super::mask::masked_pixel_count;
use super::planes::RegionPlanes;
use super::types::{CleanupError, Result};

/// Default neighbourhood radius in pixels
pub const DEFAULT_INPAINT_RADIUS: f32 = 3.0;

/// Telea fast-marching inpainter
#[derive(Debug, Clone, Copy)]
pub struct TeleaInpainter {
    radius: i32,
}

impl Default for TeleaInpainter {
    fn default() -> Self {
        Self::new(DEFAULT_INPAINT_RADIUS)
    }
}

impl TeleaInpainter {
    /// Create an inpainter; the radius is rounded to whole pixels, minimum 1
    pub fn new(radius: f32) -> Self {
        Self {
            radius: (radius.round() as i32).max(1),
        }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Fill every masked pixel of `planes` in place
    ///
    /// Returns the number of pixels synthesized. A region that is masked
    /// everywhere has no known pixel to propagate from and is left as is.
    pub fn inpaint(&self, planes: &mut RegionPlanes, mask: &GrayImage) -> Result<usize> {
        let masked = masked_pixel_count(mask) as usize;
        if masked == 0 || planes.is_empty() {
            return Ok(0);
        }
        // Any other masked component touches a known pixel inside the rectangle
        if masked >= planes.len() {
            return Ok(0);
        }

        let data = planes.data.clone();
        let (width, height) = (planes.width, planes.height);
        planes.data = match planes.channels {
            1 => fill::<Luma<f32>>(width, height, data, mask, self.radius)?,
            3 => fill::<Rgb<f32>>(width, height, data, mask, self.radius)?,
            channels => {
                return Err(CleanupError::RegionShape {
                    width,
                    height,
                    channels,
                })
            }
        };
        Ok(masked)
    }
}

fn fill<P>(width: u32, height: u32, data: Vec<f32>, mask: &GrayImage, radius: i32) -> Result<Vec<f32>>
where
    P: Pixel<Subpixel = f32>,
{
    let mut buffer =
        ImageBuffer::<P, Vec<f32>>::from_raw(width, height, data).ok_or(CleanupError::RegionShape {
            width,
            height,
            channels: P::CHANNEL_COUNT as usize,
        })?;
    buffer.telea_inpaint(mask, radius)?;
    Ok(buffer.into_raw())
}
