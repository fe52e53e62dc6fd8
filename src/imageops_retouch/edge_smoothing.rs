use image::Rgba;
use imageproc::definitions::Image;
use log::trace;

use crate::utils::{build_image, clamp_round_u8, RGBA_CHANNELS};

/// Number of smoothing passes used by the segmentation pipeline.
pub const EDGE_SMOOTHING_PASSES: u32 = 2;

const CENTER_WEIGHT: f32 = 4.0;
const NEIGHBOR_WEIGHT: f32 = 1.0;
const TOTAL_WEIGHT: f32 = CENTER_WEIGHT + 8.0 * NEIGHBOR_WEIGHT;

/// Softens partially transparent cut-out edges.
///
/// Each pass replaces every interior pixel with `0 < alpha < 255` by a 3x3
/// weighted average (center 4, neighbors 1, total 12) over all four channels.
/// Fully transparent and fully opaque pixels are never modified, and neither
/// is the outer one-pixel frame.
pub trait EdgeSmoothingExt {
    fn smooth_edges(&self, passes: u32) -> Self;
}

impl EdgeSmoothingExt for Image<Rgba<u8>> {
    fn smooth_edges(&self, passes: u32) -> Self {
        let mut current = self.clone();
        for pass in 0..passes {
            current = smooth_pass_impl(&current);
            trace!("edge smoothing pass {} complete", pass + 1);
        }
        current
    }
}

#[inline]
const fn is_edge_alpha(alpha: u8) -> bool {
    alpha > 0 && alpha < 255
}

/// One smoothing pass reading only from `source`.
fn smooth_pass_impl(source: &Image<Rgba<u8>>) -> Image<Rgba<u8>> {
    let (width, height) = source.dimensions();
    let is_interior = |x: u32, y: u32| x > 0 && y > 0 && x + 1 < width && y + 1 < height;

    build_image(width, height, |y, row| {
        for (x, out) in (0..width).zip(row.chunks_exact_mut(RGBA_CHANNELS)) {
            let center = *source.get_pixel(x, y);
            if !is_interior(x, y) || !is_edge_alpha(center[3]) {
                out.copy_from_slice(&center.0);
                continue;
            }

            let mut sums = [0.0f32; RGBA_CHANNELS];
            for ny in y - 1..=y + 1 {
                for nx in x - 1..=x + 1 {
                    let weight = if nx == x && ny == y {
                        CENTER_WEIGHT
                    } else {
                        NEIGHBOR_WEIGHT
                    };
                    let neighbor = source.get_pixel(nx, ny);
                    for (sum, &channel) in sums.iter_mut().zip(neighbor.0.iter()) {
                        *sum += f32::from(channel) * weight;
                    }
                }
            }

            for (value, sum) in out.iter_mut().zip(sums) {
                *value = clamp_round_u8(sum / TOTAL_WEIGHT);
            }
        }
    })
}
