use image::Rgba;
use imageproc::definitions::Image;
use imageproc::map::map_colors;
use log::debug;

use crate::utils::clamp_round_u8;

/// Brightness/contrast pair used by the `brighten` enhancement mode.
pub const BRIGHTEN_ADJUSTMENT: (f32, f32) = (20.0, 10.0);
/// Brightness/contrast pair used by the `contrast` enhancement mode.
pub const CONTRAST_ADJUSTMENT: (f32, f32) = (0.0, 25.0);

/// Contrast multiplier `259 (c + 255) / (255 (259 - c))`.
#[inline]
#[must_use]
pub fn contrast_factor(contrast: f32) -> f32 {
    (259.0 * (contrast + 255.0)) / (255.0 * (259.0 - contrast))
}

/// Trait for linear brightness and contrast adjustment.
///
/// Each RGB channel becomes `clamp(factor * (v + brightness - 128) + 128)`.
/// Alpha is copied unchanged.
pub trait BrightnessContrastExt {
    fn adjust_brightness_contrast(&self, brightness: f32, contrast: f32) -> Self;
}

impl BrightnessContrastExt for Image<Rgba<u8>> {
    fn adjust_brightness_contrast(&self, brightness: f32, contrast: f32) -> Self {
        let factor = contrast_factor(contrast);
        debug!("brightness {brightness}, contrast {contrast} (factor {factor:.4})");

        let adjust = |value: u8| clamp_round_u8(factor * (f32::from(value) + brightness - 128.0) + 128.0);
        map_colors(self, |Rgba([red, green, blue, alpha])| {
            Rgba([adjust(red), adjust(green), adjust(blue), alpha])
        })
    }
}
