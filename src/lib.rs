//! # imageops-retouch
//!
//! Client-local background removal and photo enhancement on RGBA buffers.
//!
//! This crate provides two pipelines built from small, independent kernels:
//!
//! - **Background Removal**: Edge color sampling, adaptive threshold classification,
//!   mask refinement, alpha compositing and edge smoothing, at standard and 3x resolution
//! - **Enhancement**: Bilateral denoising, unsharp masking, histogram color correction and
//!   brightness/contrast, selected by a named mode, plus a 2x Remini-style variant
//!
//! Every kernel is also available as an extension trait on `Image<Rgba<u8>>`.
//!
//! ## Example Usage
//!
//! ```no_run
//! use imageops_retouch::{
//!     BilateralFilterExt, BilateralParams, EnhancementMode, EnhancementPipeline,
//!     ProcessingSettings, SegmentationPipeline, UnsharpMaskExt, UnsharpParams,
//! };
//! use imageproc::definitions::Image;
//! use image::Rgba;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let image: Image<Rgba<u8>> = Image::from_pixel(100, 100, Rgba([240, 240, 240, 255]));
//!
//! // Cut out the subject at 1x and 3x
//! let settings = ProcessingSettings::new(35, true, true)?;
//! let output = SegmentationPipeline::new(settings).run(&image)?;
//!
//! // Enhance the HD cut-out
//! let mode: EnhancementMode = "portrait".parse()?;
//! let enhanced = EnhancementPipeline::new(mode).run(&output.hd)?;
//!
//! // Or call kernels directly
//! let denoised = image.bilateral_filter(&BilateralParams::STANDARD)?;
//! let sharpened = denoised.unsharp_mask(&UnsharpParams::AUTO)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `rayon`: Row-parallel kernels and concurrent standard/HD passes
//! - `serde`: Enables serialization support for settings and parameters

mod error;
mod imageops_retouch;
mod utils;

#[cfg(test)]
mod test_utils;

pub use error::Error;
pub use imageops_retouch::alpha_composite::{CompositeAlphaExt, SUBJECT_BOOST};
pub use imageops_retouch::api::{enhance, enhance_remini_style, remove_background};
pub use imageops_retouch::bilateral::{BilateralFilterExt, BilateralParams};
pub use imageops_retouch::classifier::{
    count_background, BinaryMask, SegmentationClassifier, MASK_BACKGROUND, MASK_FOREGROUND,
};
pub use imageops_retouch::edge_sampler::{sample_background_colors, ColorCluster};
pub use imageops_retouch::edge_smoothing::{EdgeSmoothingExt, EDGE_SMOOTHING_PASSES};
pub use imageops_retouch::enhancement::{EnhancementMode, EnhancementPipeline, REMINI_SCALE};
pub use imageops_retouch::histogram::{ChannelHistograms, HistogramCorrectionExt};
pub use imageops_retouch::mask_refine::MaskRefiner;
pub use imageops_retouch::resample::UpscaleExt;
pub use imageops_retouch::run_control::{
    ProgressEvent, ProgressObserver, RequestGeneration, RequestTicket, RunContext, Stage,
};
pub use imageops_retouch::segmentation::{
    SegmentationOutput, SegmentationPipeline, HD_SCALE, STANDARD_SCALE,
};
pub use imageops_retouch::settings::{ProcessingSettings, MAX_SENSITIVITY, MIN_SENSITIVITY};
pub use imageops_retouch::sharpen::{
    gaussian_kernel, KernelSharpenExt, UnsharpMaskExt, UnsharpParams, KERNEL_SHARPEN_INTENSITY,
};
pub use imageops_retouch::tone::{
    contrast_factor, BrightnessContrastExt, BRIGHTEN_ADJUSTMENT, CONTRAST_ADJUSTMENT,
};
pub use utils::rgba_image_from_raw;

// Re-export imageproc::definitions::Image for convenience
pub use imageproc::definitions::Image;
