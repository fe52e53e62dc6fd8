//! Raw-buffer entry points.
//!
//! Each function takes interleaved RGBA bytes plus explicit dimensions and
//! returns newly allocated images. Container formats are the caller's concern.

use image::Rgba;
use imageproc::definitions::Image;

use crate::error::Error;
use crate::imageops_retouch::enhancement::{EnhancementMode, EnhancementPipeline};
use crate::imageops_retouch::segmentation::{SegmentationOutput, SegmentationPipeline};
use crate::imageops_retouch::settings::ProcessingSettings;
use crate::utils::rgba_image_from_raw;

/// Removes the background at standard and 3x resolution.
///
/// # Errors
///
/// * `Error::InvalidDimensions` - When width or height is zero
/// * `Error::Decode` - When `data` is not `width * height * 4` bytes
pub fn remove_background(
    width: u32,
    height: u32,
    data: Vec<u8>,
    settings: &ProcessingSettings,
) -> Result<SegmentationOutput, Error> {
    let image = rgba_image_from_raw(width, height, data)?;
    SegmentationPipeline::new(*settings).run(&image)
}

/// Enhances an image at source resolution.
///
/// # Errors
///
/// * `Error::InvalidDimensions` - When width or height is zero
/// * `Error::Decode` - When `data` is not `width * height * 4` bytes
pub fn enhance(
    width: u32,
    height: u32,
    data: Vec<u8>,
    mode: EnhancementMode,
) -> Result<Image<Rgba<u8>>, Error> {
    let image = rgba_image_from_raw(width, height, data)?;
    EnhancementPipeline::new(mode).run(&image)
}

/// Upscales 2x and enhances.
///
/// # Errors
///
/// * `Error::InvalidDimensions` - When width or height is zero
/// * `Error::Decode` - When `data` is not `width * height * 4` bytes
pub fn enhance_remini_style(
    width: u32,
    height: u32,
    data: Vec<u8>,
    mode: EnhancementMode,
) -> Result<Image<Rgba<u8>>, Error> {
    let image = rgba_image_from_raw(width, height, data)?;
    EnhancementPipeline::new(mode).run_remini_style(&image)
}
