//! Background removal pipeline.
//!
//! One pass runs edge sampling, classification, mask refinement, alpha
//! compositing and optional edge smoothing at a given resolution multiplier.
//! [`SegmentationPipeline::run`] executes a standard pass on the source and an
//! HD pass on a 3x upscale of the source.

use image::Rgba;
use imageproc::definitions::Image;
use log::debug;

use crate::error::Error;
use crate::imageops_retouch::alpha_composite::CompositeAlphaExt;
use crate::imageops_retouch::classifier::{count_background, SegmentationClassifier};
use crate::imageops_retouch::edge_sampler::sample_background_colors;
use crate::imageops_retouch::edge_smoothing::{EdgeSmoothingExt, EDGE_SMOOTHING_PASSES};
use crate::imageops_retouch::mask_refine::MaskRefiner;
use crate::imageops_retouch::resample::UpscaleExt;
use crate::imageops_retouch::run_control::{RunContext, Stage};
use crate::imageops_retouch::settings::ProcessingSettings;
use crate::utils::validate_non_empty_image;

/// Resolution multiplier of the standard pass.
pub const STANDARD_SCALE: u32 = 1;
/// Resolution multiplier of the HD pass.
pub const HD_SCALE: u32 = 3;

/// Both background removal results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentationOutput {
    /// Cut-out at source resolution
    pub standard: Image<Rgba<u8>>,
    /// Cut-out at three times the source resolution
    pub hd: Image<Rgba<u8>>,
}

/// Background removal driven by [`ProcessingSettings`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentationPipeline {
    settings: ProcessingSettings,
}

impl SegmentationPipeline {
    #[must_use]
    pub const fn new(settings: ProcessingSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub const fn settings(&self) -> &ProcessingSettings {
        &self.settings
    }

    /// Runs the standard and HD passes without supervision.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidDimensions` - When the image is empty
    pub fn run(&self, image: &Image<Rgba<u8>>) -> Result<SegmentationOutput, Error> {
        self.run_with_context(image, RunContext::new())
    }

    /// Runs the standard and HD passes, checking `context` at every stage.
    ///
    /// With the `rayon` feature the two passes run concurrently; either
    /// failing fails the whole run. Without it the HD pass only starts once
    /// the standard pass has succeeded.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidDimensions` - When the image is empty
    /// * `Error::Superseded` - When a newer run started before delivery
    pub fn run_with_context(
        &self,
        image: &Image<Rgba<u8>>,
        context: RunContext<'_>,
    ) -> Result<SegmentationOutput, Error> {
        let (width, height) = image.dimensions();
        validate_non_empty_image(width, height)?;
        debug!(
            "background removal {}x{}: sensitivity {}, smoothing {}, conservative {}",
            width,
            height,
            self.settings.sensitivity(),
            self.settings.edge_smoothing(),
            self.settings.conservative_mode()
        );

        #[cfg(feature = "rayon")]
        let (standard, hd) = {
            let (standard, hd) = rayon::join(
                || self.run_at_scale(image, STANDARD_SCALE, context),
                || self.run_at_scale(image, HD_SCALE, context),
            );
            (standard?, hd?)
        };

        #[cfg(not(feature = "rayon"))]
        let (standard, hd) = {
            let standard = self.run_at_scale(image, STANDARD_SCALE, context)?;
            (standard, self.run_at_scale(image, HD_SCALE, context)?)
        };

        Ok(SegmentationOutput { standard, hd })
    }

    /// One segmentation pass. `scale_factor > 1` upscales the source first.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidDimensions` - When the image is empty
    /// * `Error::InvalidParameter` - When `scale_factor` is zero
    /// * `Error::Superseded` - When a newer run started
    pub fn run_at_scale(
        &self,
        image: &Image<Rgba<u8>>,
        scale_factor: u32,
        context: RunContext<'_>,
    ) -> Result<Image<Rgba<u8>>, Error> {
        let (width, height) = image.dimensions();
        validate_non_empty_image(width, height)?;

        let scaled;
        let working = if scale_factor == STANDARD_SCALE {
            image
        } else {
            context.checkpoint(Stage::Upscaling, scale_factor)?;
            scaled = image.upscale(scale_factor)?;
            &scaled
        };

        context.checkpoint(Stage::SamplingEdges, scale_factor)?;
        let clusters = sample_background_colors(working);

        context.checkpoint(Stage::Classifying, scale_factor)?;
        let classifier = SegmentationClassifier::new(&clusters, &self.settings, scale_factor);
        let mask = classifier.classify(working);

        context.checkpoint(Stage::RefiningMask, scale_factor)?;
        let refined = MaskRefiner::new(scale_factor, self.settings.conservative_mode()).refine(&mask);
        debug!(
            "pass x{}: {} background pixel(s) after refinement",
            scale_factor,
            count_background(&refined)
        );

        context.checkpoint(Stage::Compositing, scale_factor)?;
        let mut output = working.composite_with_mask(&refined)?;

        if self.settings.edge_smoothing() {
            context.checkpoint(Stage::SmoothingEdges, scale_factor)?;
            output = output.smooth_edges(EDGE_SMOOTHING_PASSES);
        }

        context.deliver(output, scale_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imageops_retouch::run_control::{ProgressEvent, RequestGeneration};
    use crate::test_utils::create_bordered_image;
    use image::ImageBuffer;
    use std::sync::Mutex;

    #[test]
    fn run_with_uniform_image_removes_everything() {
        let image = ImageBuffer::from_pixel(10, 10, Rgba([255u8, 255, 255, 255]));
        let settings = ProcessingSettings::new(40, false, false).unwrap();

        let output = SegmentationPipeline::new(settings).run(&image).unwrap();

        assert!(output.standard.pixels().all(|p| p[3] == 0));
        assert_eq!(output.hd.dimensions(), (30, 30));
        assert!(output.hd.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn run_at_scale_with_distinct_subject_keeps_subject() {
        let image = create_bordered_image(40, 40, 10, Rgba([220, 30, 30, 255]), Rgba([20, 40, 220, 255]));
        let pipeline = SegmentationPipeline::default();

        let standard = pipeline
            .run_at_scale(&image, STANDARD_SCALE, RunContext::new())
            .unwrap();

        assert_eq!(standard.get_pixel(0, 0)[3], 0);
        assert_eq!(standard.get_pixel(20, 20)[3], 255);
    }

    #[test]
    fn run_with_empty_image_returns_invalid_dimensions() {
        let image: Image<Rgba<u8>> = ImageBuffer::new(0, 0);
        assert!(matches!(
            SegmentationPipeline::default().run(&image),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn run_with_context_with_superseded_ticket_delivers_nothing() {
        let image = ImageBuffer::from_pixel(8, 8, Rgba([10u8, 10, 10, 255]));
        let generation = RequestGeneration::new();
        let ticket = generation.begin();
        generation.begin();

        let context = RunContext::new().with_ticket(&ticket);
        assert!(matches!(
            SegmentationPipeline::default().run_with_context(&image, context),
            Err(Error::Superseded { .. })
        ));
    }

    #[cfg(not(feature = "rayon"))]
    #[test]
    fn run_with_context_superseded_during_standard_pass_skips_hd_pass() {
        let image = ImageBuffer::from_pixel(8, 8, Rgba([10u8, 10, 10, 255]));
        let generation = RequestGeneration::new();
        let ticket = generation.begin();
        let events = Mutex::new(Vec::new());
        let observer = |event: ProgressEvent| {
            events.lock().unwrap().push(event);
            generation.begin();
        };
        let context = RunContext::new()
            .with_ticket(&ticket)
            .with_observer(&observer);

        let result = SegmentationPipeline::default().run_with_context(&image, context);

        assert!(matches!(result, Err(Error::Superseded { .. })));
        assert_eq!(
            *events.lock().unwrap(),
            vec![ProgressEvent {
                stage: Stage::SamplingEdges,
                scale_factor: STANDARD_SCALE,
            }]
        );
    }

    #[test]
    fn run_at_scale_with_observer_reports_stages_in_order() {
        let events = Mutex::new(Vec::new());
        let observer = |event: ProgressEvent| events.lock().unwrap().push(event.stage);
        let context = RunContext::new().with_observer(&observer);
        let image = ImageBuffer::from_pixel(6, 6, Rgba([0u8, 0, 0, 255]));

        SegmentationPipeline::default()
            .run_at_scale(&image, HD_SCALE, context)
            .unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                Stage::Upscaling,
                Stage::SamplingEdges,
                Stage::Classifying,
                Stage::RefiningMask,
                Stage::Compositing,
                Stage::SmoothingEdges,
                Stage::Finished,
            ]
        );
    }
}
