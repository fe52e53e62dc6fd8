//! Internal utility functions for imageops-retouch.
//!
//! This module contains common functionality used across the segmentation and
//! enhancement kernels.

use image::{ImageBuffer, Pixel, Rgba};
use imageproc::definitions::Image;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::error::Error;

/// Number of interleaved subpixels in an RGBA sample.
pub const RGBA_CHANNELS: usize = 4;

/// Rounds and clamps a floating-point channel value into the `u8` range.
///
/// Matches the behaviour of writing into a clamped byte array: values are
/// rounded to the nearest integer and saturated at 0 and 255.
#[inline]
pub fn clamp_round_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Euclidean distance between two RGB triples.
#[inline]
pub fn rgb_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Validates that an image has non-zero dimensions.
///
/// # Errors
///
/// * `Error::InvalidDimensions` - When width or height is zero
pub fn validate_non_empty_image(width: u32, height: u32) -> Result<(), Error> {
    if width == 0 || height == 0 {
        Err(Error::InvalidDimensions { width, height })
    } else {
        Ok(())
    }
}

/// Validates that two images have matching dimensions.
///
/// # Errors
///
/// * `Error::DimensionMismatch` - When the sizes differ
pub fn validate_matching_dimensions(
    expected: (u32, u32),
    actual: (u32, u32),
) -> Result<(), Error> {
    if expected != actual {
        Err(Error::DimensionMismatch { expected, actual })
    } else {
        Ok(())
    }
}

/// Interprets an interleaved RGBA byte vector as an image.
///
/// # Errors
///
/// * `Error::InvalidDimensions` - When width or height is zero
/// * `Error::Decode` - When `data.len() != width * height * 4`
pub fn rgba_image_from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Image<Rgba<u8>>, Error> {
    validate_non_empty_image(width, height)?;

    let expected = width as usize * height as usize * RGBA_CHANNELS;
    let actual = data.len();
    if actual != expected {
        return Err(Error::Decode {
            width,
            height,
            expected,
            actual,
        });
    }

    ImageBuffer::from_raw(width, height, data).ok_or(Error::Decode {
        width,
        height,
        expected,
        actual,
    })
}

/// Builds a new image row by row.
///
/// `fill_row` receives the row index and the interleaved subpixels of that
/// output row. Every row is computed from immutable inputs only, so rows may
/// run in parallel when the `rayon` feature is enabled without changing the
/// result. The buffer is allocated at its final size up front and filled in
/// place.
pub fn build_image<P, F>(width: u32, height: u32, fill_row: F) -> Image<P>
where
    P: Pixel<Subpixel = u8>,
    F: Fn(u32, &mut [u8]) + Send + Sync,
{
    let mut output: Image<P> = ImageBuffer::new(width, height);
    let stride = (width as usize * usize::from(P::CHANNEL_COUNT)).max(1);

    #[cfg(feature = "rayon")]
    output
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| fill_row(y as u32, row));

    #[cfg(not(feature = "rayon"))]
    output
        .chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| fill_row(y as u32, row));

    output
}
