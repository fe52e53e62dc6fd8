use image::Rgba;
use imageproc::definitions::Image;
use itertools::iproduct;
use log::debug;

use crate::error::Error;
use crate::utils::{build_image, clamp_round_u8, validate_non_empty_image, RGBA_CHANNELS};

/// Bilateral filter parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BilateralParams {
    /// Neighborhood half-width in pixels
    pub radius: u32,
    /// Color-distance falloff
    pub sigma_color: f32,
    /// Spatial falloff
    pub sigma_space: f32,
}

impl BilateralParams {
    /// General enhancement preset.
    pub const STANDARD: Self = Self {
        radius: 2,
        sigma_color: 50.0,
        sigma_space: 50.0,
    };

    /// Higher-quality preset used after 2x upscaling.
    pub const HIGH_QUALITY: Self = Self {
        radius: 3,
        sigma_color: 30.0,
        sigma_space: 30.0,
    };

    fn validate(&self) -> Result<(), Error> {
        if self.radius == 0 {
            return Err(Error::InvalidParameter {
                name: "radius",
                reason: "bilateral radius must be positive".to_owned(),
            });
        }
        for (name, sigma) in [("sigma_color", self.sigma_color), ("sigma_space", self.sigma_space)] {
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(Error::InvalidParameter {
                    name,
                    reason: format!("{sigma} must be a positive finite number"),
                });
            }
        }
        Ok(())
    }
}

impl Default for BilateralParams {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Edge-preserving bilateral denoising.
///
/// Each non-transparent pixel becomes the weighted mean of its non-transparent
/// neighbors within `radius`, with
/// `w = exp(-d_space^2 / 2 sigma_space^2) * exp(-d_color^2 / 2 sigma_color^2)`.
/// Fully transparent pixels and the alpha channel are copied unchanged.
pub trait BilateralFilterExt {
    /// # Errors
    ///
    /// * `Error::InvalidParameter` - When radius is zero or a sigma is not positive
    /// * `Error::InvalidDimensions` - When the image is empty
    fn bilateral_filter(&self, params: &BilateralParams) -> Result<Self, Error>
    where
        Self: Sized;
}

impl BilateralFilterExt for Image<Rgba<u8>> {
    fn bilateral_filter(&self, params: &BilateralParams) -> Result<Self, Error> {
        params.validate()?;
        let (width, height) = self.dimensions();
        validate_non_empty_image(width, height)?;

        debug!(
            "bilateral filter {}x{}: radius {}, sigma color {}, sigma space {}",
            width, height, params.radius, params.sigma_color, params.sigma_space
        );
        Ok(bilateral_filter_impl(self, params))
    }
}

/// Precomputed spatial weights for every offset in the window.
fn spatial_weights(radius: i64, sigma_space: f32) -> Vec<(i64, i64, f32)> {
    let denominator = 2.0 * sigma_space * sigma_space;
    iproduct!(-radius..=radius, -radius..=radius)
        .map(|(dy, dx)| {
            let distance_sq = (dx * dx + dy * dy) as f32;
            (dx, dy, (-distance_sq / denominator).exp())
        })
        .collect()
}

fn bilateral_filter_impl(image: &Image<Rgba<u8>>, params: &BilateralParams) -> Image<Rgba<u8>> {
    let (width, height) = image.dimensions();
    let (w, h) = (i64::from(width), i64::from(height));
    let window = spatial_weights(i64::from(params.radius), params.sigma_space);
    let color_denominator = 2.0 * params.sigma_color * params.sigma_color;

    build_image(width, height, |y, row| {
        for (x, out) in (0..width).zip(row.chunks_exact_mut(RGBA_CHANNELS)) {
            let center = *image.get_pixel(x, y);
            out.copy_from_slice(&center.0);
            if center[3] == 0 {
                continue;
            }

            let mut total_weight = 0.0f32;
            let mut sums = [0.0f32; 3];
            for &(dx, dy, spatial_weight) in &window {
                let nx = i64::from(x) + dx;
                let ny = i64::from(y) + dy;
                if !(0..w).contains(&nx) || !(0..h).contains(&ny) {
                    continue;
                }
                let neighbor = image.get_pixel(nx as u32, ny as u32);
                if neighbor[3] == 0 {
                    continue;
                }

                let color_distance_sq: f32 = (0..3)
                    .map(|c| {
                        let diff = f32::from(center[c]) - f32::from(neighbor[c]);
                        diff * diff
                    })
                    .sum();
                let weight = spatial_weight * (-color_distance_sq / color_denominator).exp();

                total_weight += weight;
                for (c, sum) in sums.iter_mut().enumerate() {
                    *sum += f32::from(neighbor[c]) * weight;
                }
            }

            if total_weight > 0.0 {
                for (value, sum) in out.iter_mut().zip(sums) {
                    *value = clamp_round_u8(sum / total_weight);
                }
            }
        }
    })
}
