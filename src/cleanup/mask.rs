//! Bright-pixel mask construction
//!
//! Scale bars and their labels are rendered in white or near-white on top of
//! a darker micrograph. The mask marks those pixels, then grows them so the
//! anti-aliased fringe of text and ruler lines is covered as well.

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology::dilate;

use super::planes::RegionPlanes;

/// Mask value for pixels that must be synthesized
pub const MASK_ON: u8 = 255;

/// Mask value for pixels that are kept
pub const MASK_OFF: u8 = 0;

/// Threshold 8-bit-scale luminance into a binary mask
///
/// The comparison is inclusive: `luma >= threshold` is masked.
pub fn threshold_mask(luma: &[f32], width: u32, height: u32, threshold: u8) -> GrayImage {
    debug_assert_eq!(luma.len(), width as usize * height as usize);
    let threshold = threshold as f32;

    GrayImage::from_fn(width, height, |x, y| {
        let value = luma[y as usize * width as usize + x as usize].round();
        Luma([if value >= threshold { MASK_ON } else { MASK_OFF }])
    })
}

/// Grow the mask with a 3×3 square structuring element, `iterations` times
pub fn dilate_mask(mask: &GrayImage, iterations: u8) -> GrayImage {
    if iterations == 0 || mask.width() == 0 || mask.height() == 0 {
        return mask.clone();
    }
    // LInf distance k is the same as k passes of a 3x3 all-ones kernel
    dilate(mask, Norm::LInf, iterations)
}

/// Build the removal mask for a region
pub fn build_mask(planes: &RegionPlanes, threshold: u8, dilate_iterations: u8) -> GrayImage {
    let luma = planes.luminance_8bit();
    let mask = threshold_mask(&luma, planes.width, planes.height, threshold);
    dilate_mask(&mask, dilate_iterations)
}

/// Count masked pixels
pub fn masked_pixel_count(mask: &GrayImage) -> u32 {
    mask.pixels().filter(|p| p.0[0] != MASK_OFF).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_inclusive_boundary() {
        let luma = vec![199.0, 199.6, 200.0, 255.0];
        let mask = threshold_mask(&luma, 4, 1, 200);
        assert_eq!(mask.get_pixel(0, 0).0[0], MASK_OFF);
        // rounds to 200
        assert_eq!(mask.get_pixel(1, 0).0[0], MASK_ON);
        assert_eq!(mask.get_pixel(2, 0).0[0], MASK_ON);
        assert_eq!(mask.get_pixel(3, 0).0[0], MASK_ON);
    }

    #[test]
    fn test_dilate_single_pixel_to_square() {
        let mut mask = GrayImage::new(7, 7);
        mask.put_pixel(3, 3, Luma([MASK_ON]));

        let grown = dilate_mask(&mask, 1);
        assert_eq!(masked_pixel_count(&grown), 9);
        for y in 2..=4 {
            for x in 2..=4 {
                assert_eq!(grown.get_pixel(x, y).0[0], MASK_ON);
            }
        }
        assert_eq!(grown.get_pixel(1, 3).0[0], MASK_OFF);
        assert_eq!(grown.get_pixel(5, 5).0[0], MASK_OFF);
    }

    #[test]
    fn test_dilate_two_iterations() {
        let mut mask = GrayImage::new(9, 9);
        mask.put_pixel(4, 4, Luma([MASK_ON]));
        let grown = dilate_mask(&mask, 2);
        assert_eq!(masked_pixel_count(&grown), 25);
    }

    #[test]
    fn test_dilate_zero_iterations_is_identity() {
        let mut mask = GrayImage::new(3, 3);
        mask.put_pixel(1, 1, Luma([MASK_ON]));
        assert_eq!(dilate_mask(&mask, 0), mask);
    }

    #[test]
    fn test_dilate_empty_mask_stays_empty() {
        let mask = GrayImage::new(5, 5);
        assert_eq!(masked_pixel_count(&dilate_mask(&mask, 1)), 0);
    }

    #[test]
    fn test_build_mask_color_region() {
        // 4x1 RGB: dark, bright white, dark, dark
        let planes = RegionPlanes::from_samples(
            4,
            1,
            3,
            255.0,
            vec![
                20.0, 20.0, 20.0, 255.0, 255.0, 255.0, 20.0, 20.0, 20.0, 20.0, 20.0, 20.0,
            ],
        );
        let undilated = build_mask(&planes, 200, 0);
        assert_eq!(masked_pixel_count(&undilated), 1);

        let dilated = build_mask(&planes, 200, 1);
        assert_eq!(masked_pixel_count(&dilated), 3);
        assert_eq!(dilated.get_pixel(3, 0).0[0], MASK_OFF);
    }

    #[test]
    fn test_build_mask_saturated_blue_not_masked() {
        // pure blue is bright in value but dark in luminance
        let planes = RegionPlanes::from_samples(1, 1, 3, 255.0, vec![0.0, 0.0, 255.0]);
        assert_eq!(masked_pixel_count(&build_mask(&planes, 200, 0)), 0);
    }
}
