use image::imageops::{self, FilterType};
use image::Rgba;
use imageproc::definitions::Image;
use log::debug;

use crate::error::Error;
use crate::utils::validate_non_empty_image;

/// Resampling filter used for all upscaling.
const UPSCALE_FILTER: FilterType = FilterType::CatmullRom;

/// Trait for integer-factor high-quality upscaling.
pub trait UpscaleExt {
    /// Returns a copy scaled by `factor` in both dimensions.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidParameter` - When `factor` is zero
    /// * `Error::InvalidDimensions` - When the image is empty
    fn upscale(&self, factor: u32) -> Result<Self, Error>
    where
        Self: Sized;
}

impl UpscaleExt for Image<Rgba<u8>> {
    fn upscale(&self, factor: u32) -> Result<Self, Error> {
        if factor == 0 {
            return Err(Error::InvalidParameter {
                name: "factor",
                reason: "upscale factor must be at least 1".to_owned(),
            });
        }
        let (width, height) = self.dimensions();
        validate_non_empty_image(width, height)?;

        if factor == 1 {
            return Ok(self.clone());
        }

        let target = (
            width.checked_mul(factor),
            height.checked_mul(factor),
        );
        let (Some(new_width), Some(new_height)) = target else {
            return Err(Error::InvalidParameter {
                name: "factor",
                reason: format!("{width}x{height} scaled by {factor} overflows u32"),
            });
        };

        debug!("upscaling {width}x{height} -> {new_width}x{new_height}");
        Ok(imageops::resize(self, new_width, new_height, UPSCALE_FILTER))
    }
}
