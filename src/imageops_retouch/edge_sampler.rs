use image::Rgba;
use imageproc::definitions::Image;
use log::{debug, trace};

use crate::utils::rgb_distance;

/// Minimum thickness of the sampled border band in pixels.
const MIN_BAND_THICKNESS: f64 = 5.0;
/// Band thickness as a fraction of the shorter image side.
const BAND_FRACTION: f64 = 0.02;
/// Only every n-th pixel along an edge is sampled.
const SAMPLE_STRIDE: usize = 3;
/// Samples closer than this to a centroid join its cluster.
const CLUSTER_RADIUS: f64 = 30.0;
/// Number of dominant clusters kept.
const MAX_CLUSTERS: usize = 3;

/// Running centroid of a group of similar border colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorCluster {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub count: u32,
}

impl ColorCluster {
    fn seed(sample: [f64; 3]) -> Self {
        Self {
            r: sample[0],
            g: sample[1],
            b: sample[2],
            count: 1,
        }
    }

    #[inline]
    #[must_use]
    pub const fn centroid(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    /// Euclidean RGB distance from `color` to the centroid.
    #[inline]
    #[must_use]
    pub fn distance_to(&self, color: [f64; 3]) -> f64 {
        rgb_distance(self.centroid(), color)
    }

    fn absorb(&mut self, sample: [f64; 3]) {
        let count = f64::from(self.count);
        let next = count + 1.0;
        self.r = (self.r * count + sample[0]) / next;
        self.g = (self.g * count + sample[1]) / next;
        self.b = (self.b * count + sample[2]) / next;
        self.count += 1;
    }
}

/// Thickness of the border band scanned for background colors.
#[inline]
fn band_thickness(width: u32, height: u32) -> f64 {
    MIN_BAND_THICKNESS.max(f64::from(width.min(height)) * BAND_FRACTION)
}

#[inline]
fn rgb_of(image: &Image<Rgba<u8>>, x: u32, y: u32) -> [f64; 3] {
    let Rgba([red, green, blue, _]) = *image.get_pixel(x, y);
    [f64::from(red), f64::from(green), f64::from(blue)]
}

/// Collects border samples in a fixed traversal order.
///
/// For each band row `i`: top and bottom rows widthwise, then left and right
/// columns heightwise, both strided. Clustering is greedy, so this order is
/// part of the observable behaviour.
fn collect_edge_samples(image: &Image<Rgba<u8>>) -> Vec<[f64; 3]> {
    let (width, height) = image.dimensions();
    let thickness = band_thickness(width, height);
    let mut samples = Vec::new();

    let mut i = 0u32;
    while f64::from(i) < thickness {
        if i < height {
            for x in (0..width).step_by(SAMPLE_STRIDE) {
                samples.push(rgb_of(image, x, i));
                samples.push(rgb_of(image, x, height - 1 - i));
            }
        }
        if i < width {
            for y in (0..height).step_by(SAMPLE_STRIDE) {
                samples.push(rgb_of(image, i, y));
                samples.push(rgb_of(image, width - 1 - i, y));
            }
        }
        i += 1;
    }

    samples
}

/// Greedy single-pass clustering: each sample joins the first cluster within
/// [`CLUSTER_RADIUS`], or seeds a new one.
fn cluster_samples(samples: &[[f64; 3]]) -> Vec<ColorCluster> {
    let mut clusters: Vec<ColorCluster> = Vec::new();

    for &sample in samples {
        match clusters
            .iter_mut()
            .find(|cluster| cluster.distance_to(sample) < CLUSTER_RADIUS)
        {
            Some(cluster) => cluster.absorb(sample),
            None => clusters.push(ColorCluster::seed(sample)),
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    clusters.sort_by(|a, b| b.count.cmp(&a.count));
    clusters.truncate(MAX_CLUSTERS);
    clusters
}

/// Estimates up to three dominant background colors from the image border.
///
/// Returns clusters ordered by descending sample count. The result may hold
/// fewer than three entries; callers treat an empty result as "no confident
/// background".
pub fn sample_background_colors(image: &Image<Rgba<u8>>) -> Vec<ColorCluster> {
    let samples = collect_edge_samples(image);
    trace!("collected {} border samples", samples.len());

    let clusters = cluster_samples(&samples);
    debug!(
        "sampled {} background cluster(s) from {}x{} image",
        clusters.len(),
        image.width(),
        image.height()
    );
    clusters
}
