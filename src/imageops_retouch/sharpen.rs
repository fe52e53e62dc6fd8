use image::Rgba;
use imageproc::definitions::Image;
use imageproc::map::map_colors2;
use log::debug;

use crate::error::Error;
use crate::utils::{build_image, clamp_round_u8, validate_non_empty_image, RGBA_CHANNELS};

const COLOR_CHANNELS: usize = 3;

/// Unsharp mask parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnsharpParams {
    /// Gain applied to the detail layer
    pub amount: f32,
    /// Gaussian sigma of the blur
    pub radius: f32,
    /// Minimum absolute detail (per channel) that gets amplified
    pub threshold: f32,
}

impl UnsharpParams {
    pub const AUTO: Self = Self::new(1.5, 1.0, 4.0);
    pub const PORTRAIT: Self = Self::new(2.0, 0.8, 5.0);
    pub const LANDSCAPE: Self = Self::new(1.2, 1.2, 3.0);
    pub const OLD_PHOTO: Self = Self::new(1.8, 1.0, 8.0);

    #[must_use]
    pub const fn new(amount: f32, radius: f32, threshold: f32) -> Self {
        Self {
            amount,
            radius,
            threshold,
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(Error::InvalidParameter {
                name: "radius",
                reason: format!("{} must be a positive finite number", self.radius),
            });
        }
        if !self.amount.is_finite() {
            return Err(Error::InvalidParameter {
                name: "amount",
                reason: "amount must be finite".to_owned(),
            });
        }
        if !(self.threshold.is_finite() && self.threshold >= 0.0) {
            return Err(Error::InvalidParameter {
                name: "threshold",
                reason: format!("{} must be a non-negative finite number", self.threshold),
            });
        }
        Ok(())
    }
}

impl Default for UnsharpParams {
    fn default() -> Self {
        Self::AUTO
    }
}

/// Normalized 1-D Gaussian kernel of length `2 * ceil(3 * sigma) + 1`.
#[must_use]
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let half = (3.0 * sigma).ceil() as i64;
    let denominator = 2.0 * sigma * sigma;
    let weights: Vec<f32> = (-half..=half)
        .map(|offset| (-((offset * offset) as f32) / denominator).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|weight| weight / sum).collect()
}

/// Trait for unsharp-mask sharpening.
///
/// The detail layer is `original - blurred`, where `blurred` is a separable
/// Gaussian blur (horizontal, then vertical, edges clamped). Channels whose
/// detail exceeds `threshold` become `original + detail * amount`. Alpha is
/// copied unchanged.
pub trait UnsharpMaskExt {
    /// # Errors
    ///
    /// * `Error::InvalidParameter` - When radius, amount or threshold is out of range
    /// * `Error::InvalidDimensions` - When the image is empty
    fn unsharp_mask(&self, params: &UnsharpParams) -> Result<Self, Error>
    where
        Self: Sized;
}

impl UnsharpMaskExt for Image<Rgba<u8>> {
    fn unsharp_mask(&self, params: &UnsharpParams) -> Result<Self, Error> {
        params.validate()?;
        let (width, height) = self.dimensions();
        validate_non_empty_image(width, height)?;

        let kernel = gaussian_kernel(params.radius);
        debug!(
            "unsharp mask {}x{}: amount {}, radius {}, threshold {}, kernel {}",
            width,
            height,
            params.amount,
            params.radius,
            params.threshold,
            kernel.len()
        );

        let horizontal = blur_pass_impl(self, &kernel, Direction::Horizontal);
        let blurred = blur_pass_impl(&horizontal, &kernel, Direction::Vertical);
        Ok(apply_unsharp_impl(self, &blurred, params))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Horizontal,
    Vertical,
}

/// One 1-D Gaussian pass over RGB, quantized back to bytes.
fn blur_pass_impl(image: &Image<Rgba<u8>>, kernel: &[f32], direction: Direction) -> Image<Rgba<u8>> {
    let (width, height) = image.dimensions();
    let half = (kernel.len() / 2) as i64;
    let (max_x, max_y) = (i64::from(width) - 1, i64::from(height) - 1);

    build_image(width, height, |y, row| {
        for (x, out) in (0..width).zip(row.chunks_exact_mut(RGBA_CHANNELS)) {
            let mut sums = [0.0f32; COLOR_CHANNELS];
            for (k, &weight) in kernel.iter().enumerate() {
                let offset = k as i64 - half;
                let (sx, sy) = match direction {
                    Direction::Horizontal => ((i64::from(x) + offset).clamp(0, max_x), i64::from(y)),
                    Direction::Vertical => (i64::from(x), (i64::from(y) + offset).clamp(0, max_y)),
                };
                let sample = image.get_pixel(sx as u32, sy as u32);
                for (c, sum) in sums.iter_mut().enumerate() {
                    *sum += f32::from(sample[c]) * weight;
                }
            }
            for (value, sum) in out.iter_mut().zip(sums) {
                *value = clamp_round_u8(sum);
            }
            out[3] = image.get_pixel(x, y)[3];
        }
    })
}

fn apply_unsharp_impl(
    original: &Image<Rgba<u8>>,
    blurred: &Image<Rgba<u8>>,
    params: &UnsharpParams,
) -> Image<Rgba<u8>> {
    map_colors2(original, blurred, |source, soft| {
        let mut result = source;
        for c in 0..COLOR_CHANNELS {
            let value = f32::from(source[c]);
            let difference = value - f32::from(soft[c]);
            if difference.abs() > params.threshold {
                result[c] = clamp_round_u8(value + difference * params.amount);
            }
        }
        result
    })
}

/// Default strength of the 3x3 sharpening kernel.
pub const KERNEL_SHARPEN_INTENSITY: f32 = 0.6;

/// Trait for 3x3 Laplacian sharpening.
///
/// Convolves RGB with `[0,-k,0; -k,1+4k,-k; 0,-k,0]`. The outermost one-pixel
/// frame and the alpha channel are copied unchanged.
pub trait KernelSharpenExt {
    fn sharpen_kernel(&self, intensity: f32) -> Self;
}

impl KernelSharpenExt for Image<Rgba<u8>> {
    fn sharpen_kernel(&self, intensity: f32) -> Self {
        let (width, height) = self.dimensions();
        debug!("3x3 sharpen {width}x{height}: intensity {intensity}");

        let center_weight = 1.0 + 4.0 * intensity;
        build_image(width, height, |y, row| {
            for (x, out) in (0..width).zip(row.chunks_exact_mut(RGBA_CHANNELS)) {
                let center = self.get_pixel(x, y);
                out.copy_from_slice(&center.0);
                if x == 0 || y == 0 || x + 1 >= width || y + 1 >= height {
                    continue;
                }
                let up = self.get_pixel(x, y - 1);
                let down = self.get_pixel(x, y + 1);
                let left = self.get_pixel(x - 1, y);
                let right = self.get_pixel(x + 1, y);
                for (c, value) in out.iter_mut().enumerate().take(COLOR_CHANNELS) {
                    let cross = f32::from(up[c])
                        + f32::from(down[c])
                        + f32::from(left[c])
                        + f32::from(right[c]);
                    *value = clamp_round_u8(center_weight * f32::from(center[c]) - intensity * cross);
                }
            }
        })
    }
}
