use image::{GenericImageView, Luma, Rgba};
use imageproc::{definitions::Image, map::map_colors2};

use crate::error::Error;
use crate::imageops_retouch::classifier::{BinaryMask, MASK_BACKGROUND};
use crate::utils::validate_matching_dimensions;

/// Multiplier applied to RGB of retained subject pixels.
pub const SUBJECT_BOOST: f64 = 1.05;

/// Trait providing functionality to cut out the background with a binary mask
///
/// Background pixels become fully transparent (their RGB is kept); subject
/// pixels keep their alpha and get a slight color boost.
pub trait CompositeAlphaExt {
    /// Applies the refined mask and returns a new image
    ///
    /// # Errors
    ///
    /// * `Error::DimensionMismatch` - When image and mask dimensions don't match
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use imageops_retouch::{CompositeAlphaExt, Image, MASK_FOREGROUND};
    /// use image::{ImageBuffer, Luma, Rgba};
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let image: Image<Rgba<u8>> = ImageBuffer::from_pixel(10, 10, Rgba([100, 100, 100, 255]));
    /// let mask: Image<Luma<u8>> = ImageBuffer::from_pixel(10, 10, Luma([MASK_FOREGROUND]));
    ///
    /// let cutout = image.composite_with_mask(&mask)?;
    /// # Ok(())
    /// # }
    /// ```
    fn composite_with_mask(&self, mask: &BinaryMask) -> Result<Image<Rgba<u8>>, Error>;
}

impl CompositeAlphaExt for Image<Rgba<u8>> {
    fn composite_with_mask(&self, mask: &BinaryMask) -> Result<Image<Rgba<u8>>, Error> {
        validate_dimensions(self, mask)?;

        let result = map_colors2(self, mask, |Rgba([red, green, blue, alpha]), Luma([value])| {
            if value == MASK_BACKGROUND {
                Rgba([red, green, blue, 0])
            } else {
                Rgba([boost(red), boost(green), boost(blue), alpha])
            }
        });

        Ok(result)
    }
}

/// Boosts one channel in double precision, rounding halves to even and
/// saturating at 255 the way a clamped byte store does.
#[inline]
fn boost(channel: u8) -> u8 {
    (f64::from(channel) * SUBJECT_BOOST)
        .round_ties_even()
        .min(255.0) as u8
}

/// Function to validate dimensions
#[inline]
fn validate_dimensions<I1, I2>(image: &I1, mask: &I2) -> Result<(), Error>
where
    I1: GenericImageView,
    I2: GenericImageView,
{
    validate_matching_dimensions(image.dimensions(), mask.dimensions())
}
