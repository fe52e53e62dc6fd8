use image::{Luma, Rgba};
use imageproc::definitions::Image;
use log::debug;

use crate::imageops_retouch::edge_sampler::ColorCluster;
use crate::imageops_retouch::settings::ProcessingSettings;
use crate::utils::build_image;

/// Mask value marking a pixel for removal.
pub const MASK_BACKGROUND: u8 = 0;
/// Mask value marking a subject pixel.
pub const MASK_FOREGROUND: u8 = 255;

/// Per-pixel background/foreground decision, one byte per pixel.
pub type BinaryMask = Image<Luma<u8>>;

/// Threshold multiplier when several background colors were found.
const MULTI_BACKGROUND_FACTOR: f64 = 0.8;
/// Threshold multiplier in conservative mode.
const CONSERVATIVE_FACTOR: f64 = 0.7;
/// Extra tolerance granted to pixels inside the edge buffer.
const EDGE_RELAXATION: f64 = 20.0;
/// Minimum edge buffer width in pixels (before scaling).
const MIN_EDGE_BUFFER: f64 = 8.0;
/// Edge buffer width as a fraction of the shorter image side.
const EDGE_BUFFER_FRACTION: f64 = 0.03;

/// Color-distance classifier separating sampled background from subject.
#[derive(Debug, Clone)]
pub struct SegmentationClassifier<'a> {
    clusters: &'a [ColorCluster],
    threshold: f64,
    scale_factor: u32,
}

impl<'a> SegmentationClassifier<'a> {
    pub fn new(clusters: &'a [ColorCluster], settings: &ProcessingSettings, scale_factor: u32) -> Self {
        let sensitivity = f64::from(settings.sensitivity());
        let adaptive = if clusters.len() > 1 {
            sensitivity * MULTI_BACKGROUND_FACTOR
        } else {
            sensitivity
        };
        let threshold = if settings.conservative_mode() {
            adaptive * CONSERVATIVE_FACTOR
        } else {
            adaptive
        };

        Self {
            clusters,
            threshold,
            scale_factor,
        }
    }

    /// Distance below which a pixel away from the border is background.
    #[inline]
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Distance below which a pixel inside the edge buffer is background.
    #[inline]
    #[must_use]
    pub fn edge_threshold(&self) -> f64 {
        self.threshold + EDGE_RELAXATION
    }

    /// Width of the border zone that uses the relaxed threshold.
    #[must_use]
    pub fn edge_buffer(&self, width: u32, height: u32) -> f64 {
        let base = MIN_EDGE_BUFFER.max(f64::from(width.min(height)) * EDGE_BUFFER_FRACTION);
        base * f64::from(self.scale_factor)
    }

    /// Classifies a single color given whether it lies in the edge buffer.
    ///
    /// With no clusters every pixel is foreground.
    #[must_use]
    pub fn is_background(&self, rgb: [f64; 3], in_edge_zone: bool) -> bool {
        let min_distance = self
            .clusters
            .iter()
            .map(|cluster| cluster.distance_to(rgb))
            .fold(f64::INFINITY, f64::min);

        if min_distance < self.threshold {
            return true;
        }
        in_edge_zone && min_distance < self.edge_threshold()
    }

    /// Produces the binary mask for `image`.
    ///
    /// Each output byte depends only on its own pixel and position.
    pub fn classify(&self, image: &Image<Rgba<u8>>) -> BinaryMask {
        let (width, height) = image.dimensions();
        let edge_buffer = self.edge_buffer(width, height);
        let (w, h) = (f64::from(width), f64::from(height));

        debug!(
            "classifying {}x{} at scale {}: threshold {:.2}, edge threshold {:.2}, edge buffer {:.2}",
            width,
            height,
            self.scale_factor,
            self.threshold,
            self.edge_threshold(),
            edge_buffer
        );

        build_image(width, height, |y, row| {
            let fy = f64::from(y);
            let row_in_edge = fy < edge_buffer || fy > h - edge_buffer;
            for (x, out) in (0..width).zip(row.iter_mut()) {
                let fx = f64::from(x);
                let in_edge_zone = row_in_edge || fx < edge_buffer || fx > w - edge_buffer;
                let Rgba([red, green, blue, _]) = *image.get_pixel(x, y);
                let rgb = [f64::from(red), f64::from(green), f64::from(blue)];
                *out = if self.is_background(rgb, in_edge_zone) {
                    MASK_BACKGROUND
                } else {
                    MASK_FOREGROUND
                };
            }
        })
    }
}

/// Counts background entries in a mask.
#[must_use]
pub fn count_background(mask: &BinaryMask) -> usize {
    mask.pixels()
        .filter(|Luma([value])| *value == MASK_BACKGROUND)
        .count()
}
