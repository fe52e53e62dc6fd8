use image::Luma;
use itertools::iproduct;
use log::debug;

use crate::imageops_retouch::classifier::{BinaryMask, MASK_BACKGROUND, MASK_FOREGROUND};
use crate::utils::build_image;

/// Fraction of the kernel size that bounds the circular erosion footprint.
const FOOTPRINT_FRACTION: f64 = 0.7;

/// Morphological erosion of a binary mask.
///
/// A foreground pixel with any background pixel inside its circular footprint
/// is an erosion candidate. Candidates are removed only outside conservative
/// mode; in conservative mode the mask passes through unchanged.
#[derive(Debug, Clone)]
pub struct MaskRefiner {
    kernel_size: u32,
    conservative: bool,
    offsets: Vec<(i64, i64)>,
}

impl MaskRefiner {
    pub fn new(scale_factor: u32, conservative: bool) -> Self {
        let kernel_size = 2u32.max(3 * scale_factor);
        let k = i64::from(kernel_size);
        let limit = f64::from(kernel_size) * FOOTPRINT_FRACTION;

        let offsets = iproduct!(-k..=k, -k..=k)
            .map(|(dy, dx)| (dx, dy))
            .filter(|&(dx, dy)| ((dx * dx + dy * dy) as f64).sqrt() <= limit)
            .collect();

        Self {
            kernel_size,
            conservative,
            offsets,
        }
    }

    #[inline]
    #[must_use]
    pub const fn kernel_size(&self) -> u32 {
        self.kernel_size
    }

    /// Marks every erosion candidate with `MASK_FOREGROUND`.
    ///
    /// Reads only the input mask, so the result does not depend on visit order.
    pub fn erosion_candidates(&self, mask: &BinaryMask) -> BinaryMask {
        let (width, height) = mask.dimensions();
        let (w, h) = (i64::from(width), i64::from(height));

        build_image(width, height, |y, row| {
            for (x, out) in (0..width).zip(row.iter_mut()) {
                let Luma([value]) = *mask.get_pixel(x, y);
                let is_candidate = value == MASK_FOREGROUND
                    && self.offsets.iter().any(|&(dx, dy)| {
                        let nx = i64::from(x) + dx;
                        let ny = i64::from(y) + dy;
                        (0..w).contains(&nx)
                            && (0..h).contains(&ny)
                            && mask.get_pixel(nx as u32, ny as u32)[0] == MASK_BACKGROUND
                    });
                *out = if is_candidate {
                    MASK_FOREGROUND
                } else {
                    MASK_BACKGROUND
                };
            }
        })
    }

    /// Returns the refined mask as a new buffer.
    pub fn refine(&self, mask: &BinaryMask) -> BinaryMask {
        let candidates = self.erosion_candidates(mask);
        let candidate_count = candidates
            .pixels()
            .filter(|Luma([value])| *value == MASK_FOREGROUND)
            .count();

        debug!(
            "erosion kernel {}: {} candidate(s), conservative = {}",
            self.kernel_size, candidate_count, self.conservative
        );

        if self.conservative {
            return mask.clone();
        }

        let mut refined = mask.clone();
        refined
            .pixels_mut()
            .zip(candidates.pixels())
            .filter(|(_, Luma([candidate]))| *candidate == MASK_FOREGROUND)
            .for_each(|(pixel, _)| *pixel = Luma([MASK_BACKGROUND]));
        refined
    }
}
