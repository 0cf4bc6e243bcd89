//! Float working copy of an image region
//!
//! The inpainter works on interleaved `f32` colour samples regardless of the
//! source bit depth. Samples keep their native scale (0-255, 0-65535 or the
//! raw float value); alpha channels are never copied and never written back.

use image::{GrayImage, ImageBuffer, Pixel};

use super::types::ScaleBarRegion;

/// Sample types the cleanup pipeline can round-trip without loss
pub trait Sample: Copy {
    /// Value that corresponds to full brightness
    const FULL_SCALE: f32;

    fn to_f32(self) -> f32;

    fn from_f32(value: f32) -> Self;
}

impl Sample for u8 {
    const FULL_SCALE: f32 = 255.0;

    fn to_f32(self) -> f32 {
        self as f32
    }

    fn from_f32(value: f32) -> Self {
        value.round().clamp(0.0, 255.0) as u8
    }
}

impl Sample for u16 {
    const FULL_SCALE: f32 = 65535.0;

    fn to_f32(self) -> f32 {
        self as f32
    }

    fn from_f32(value: f32) -> Self {
        value.round().clamp(0.0, 65535.0) as u16
    }
}

impl Sample for f32 {
    const FULL_SCALE: f32 = 1.0;

    fn to_f32(self) -> f32 {
        self
    }

    fn from_f32(value: f32) -> Self {
        value
    }
}

/// Number of colour (non-alpha) channels for a pixel type
pub fn color_channels<P: Pixel>() -> usize {
    match P::CHANNEL_COUNT {
        2 => 1,
        4 => 3,
        n => n as usize,
    }
}

/// Calculate Rec.601 luminance
pub fn luminance(r: f32, g: f32, b: f32) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}

/// Interleaved colour samples copied out of an image region
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPlanes {
    pub width: u32,
    pub height: u32,
    /// Colour channels per pixel (1 or 3)
    pub channels: usize,
    /// Full-brightness value in the source scale
    pub full_scale: f32,
    pub data: Vec<f32>,
}

impl RegionPlanes {
    /// Build planes directly from samples (tests and benches)
    pub fn from_samples(
        width: u32,
        height: u32,
        channels: usize,
        full_scale: f32,
        data: Vec<f32>,
    ) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize * channels);
        Self {
            width,
            height,
            channels,
            full_scale,
            data,
        }
    }

    /// Copy a region out of an image buffer
    pub fn extract<P>(image: &ImageBuffer<P, Vec<P::Subpixel>>, region: &ScaleBarRegion) -> Self
    where
        P: Pixel,
        P::Subpixel: Sample,
    {
        let channels = color_channels::<P>();
        let mut data = Vec::with_capacity(region.area() as usize * channels);

        for y in region.y..region.y + region.height {
            for x in region.x..region.x + region.width {
                let pixel = image.get_pixel(x, y);
                data.extend(pixel.channels()[..channels].iter().map(|s| Sample::to_f32(*s)));
            }
        }

        Self {
            width: region.width,
            height: region.height,
            channels,
            full_scale: <P::Subpixel as Sample>::FULL_SCALE,
            data,
        }
    }

    /// Pixel count
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Colour samples of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> &[f32] {
        let start = (y as usize * self.width as usize + x as usize) * self.channels;
        &self.data[start..start + self.channels]
    }

    /// Per-pixel luminance rescaled to the 8-bit range (0-255)
    pub fn luminance_8bit(&self) -> Vec<f32> {
        let scale = 255.0 / self.full_scale;
        self.data
            .chunks_exact(self.channels)
            .map(|px| {
                let lum = if self.channels >= 3 {
                    luminance(px[0], px[1], px[2])
                } else {
                    px[0]
                };
                lum * scale
            })
            .collect()
    }

    /// Write masked pixels back into the region they were copied from
    ///
    /// Unmasked pixels are left untouched so they stay bit-identical.
    /// Returns the number of pixels written.
    pub fn write_back<P>(
        &self,
        image: &mut ImageBuffer<P, Vec<P::Subpixel>>,
        region: &ScaleBarRegion,
        mask: &GrayImage,
    ) -> usize
    where
        P: Pixel,
        P::Subpixel: Sample,
    {
        let mut written = 0;
        for (x, y, m) in mask.enumerate_pixels() {
            if m.0[0] == 0 {
                continue;
            }
            let src = self.pixel(x, y);
            let dst = image.get_pixel_mut(region.x + x, region.y + y);
            for (d, s) in dst.channels_mut()[..self.channels].iter_mut().zip(src) {
                *d = <P::Subpixel as Sample>::from_f32(*s);
            }
            written += 1;
        }
        written
    }
}
