use image::Rgba;
use imageproc::definitions::Image;
use imageproc::map::map_colors;
use log::debug;

use crate::utils::clamp_round_u8;

/// Weight of the equalized value in the blended result.
const EQUALIZATION_WEIGHT: f32 = 0.8;
/// Weight of the original value in the blended result.
const ORIGINAL_WEIGHT: f32 = 0.2;
/// Saturation multiplier applied after equalization.
const SATURATION_BOOST: f32 = 1.2;

/// Per-channel cumulative distributions over non-transparent pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHistograms {
    cdf: [[u32; 256]; 3],
    pixel_count: u32,
}

impl ChannelHistograms {
    /// Builds histograms from every pixel with non-zero alpha.
    pub fn from_image(image: &Image<Rgba<u8>>) -> Self {
        let mut cdf = [[0u32; 256]; 3];
        let mut pixel_count = 0u32;

        for pixel in image.pixels().filter(|p| p[3] > 0) {
            for (channel, bins) in cdf.iter_mut().enumerate() {
                bins[usize::from(pixel[channel])] += 1;
            }
            pixel_count += 1;
        }

        for bins in &mut cdf {
            for value in 1..256 {
                bins[value] += bins[value - 1];
            }
        }

        Self { cdf, pixel_count }
    }

    #[inline]
    #[must_use]
    pub const fn pixel_count(&self) -> u32 {
        self.pixel_count
    }

    /// Partially equalized value for `value` in `channel`.
    #[must_use]
    pub fn equalize(&self, channel: usize, value: u8) -> u8 {
        let share = self.cdf[channel][usize::from(value)] as f32 / self.pixel_count as f32;
        clamp_round_u8(share * 255.0 * EQUALIZATION_WEIGHT + f32::from(value) * ORIGINAL_WEIGHT)
    }
}

/// Scales max/min saturation by [`SATURATION_BOOST`], capped at 1.
fn boost_saturation(rgb: [u8; 3]) -> [u8; 3] {
    let normalized = rgb.map(|channel| f32::from(channel) / 255.0);
    let max = normalized.iter().copied().fold(f32::MIN, f32::max);
    let min = normalized.iter().copied().fold(f32::MAX, f32::min);
    let saturation = if max == 0.0 { 0.0 } else { (max - min) / max };
    if saturation <= 0.0 {
        return rgb;
    }

    let factor = (saturation * SATURATION_BOOST).min(1.0) / saturation;
    normalized.map(|channel| clamp_round_u8(((channel - min) * factor + min).clamp(0.0, 1.0) * 255.0))
}

/// Trait for histogram-based color correction.
///
/// Blends per-channel histogram equalization with the original
/// (`0.8 * equalized + 0.2 * original`) over non-transparent pixels, then
/// boosts saturation. Transparent pixels and the alpha channel are copied
/// unchanged.
pub trait HistogramCorrectionExt {
    fn correct_colors(&self) -> Self;
}

impl HistogramCorrectionExt for Image<Rgba<u8>> {
    fn correct_colors(&self) -> Self {
        let histograms = ChannelHistograms::from_image(self);
        debug!(
            "color correction over {} opaque pixel(s)",
            histograms.pixel_count()
        );
        if histograms.pixel_count() == 0 {
            return self.clone();
        }

        map_colors(self, |pixel| {
            let Rgba([red, green, blue, alpha]) = pixel;
            if alpha == 0 {
                return pixel;
            }
            let equalized = [
                histograms.equalize(0, red),
                histograms.equalize(1, green),
                histograms.equalize(2, blue),
            ];
            let [r, g, b] = boost_saturation(equalized);
            Rgba([r, g, b, alpha])
        })
    }
}
