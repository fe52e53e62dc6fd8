//! Detail enhancement pipeline.
//!
//! A mode selects which kernels run:
//!
//! | mode                                   | stages                                         |
//! |----------------------------------------|------------------------------------------------|
//! | `auto`, `portrait`, `landscape`, `old-photo` | denoise, unsharp mask (mode preset), color correction |
//! | `sharpen`                              | 3x3 kernel sharpen                             |
//! | `brighten`, `contrast`                 | brightness/contrast                            |
//! | `denoise`                              | bilateral filter                               |
//!
//! The Remini-style variant always upscales 2x and then runs denoise, unsharp
//! mask and color correction regardless of mode.

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use imageproc::definitions::Image;
use log::debug;

use crate::error::Error;
use crate::imageops_retouch::bilateral::{BilateralFilterExt, BilateralParams};
use crate::imageops_retouch::histogram::HistogramCorrectionExt;
use crate::imageops_retouch::resample::UpscaleExt;
use crate::imageops_retouch::run_control::{RunContext, Stage};
use crate::imageops_retouch::sharpen::{KernelSharpenExt, UnsharpMaskExt, UnsharpParams, KERNEL_SHARPEN_INTENSITY};
use crate::imageops_retouch::tone::{BrightnessContrastExt, BRIGHTEN_ADJUSTMENT, CONTRAST_ADJUSTMENT};
use crate::utils::validate_non_empty_image;

/// Resolution multiplier of the Remini-style variant.
pub const REMINI_SCALE: u32 = 2;

/// Named enhancement preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum EnhancementMode {
    #[default]
    Auto,
    Portrait,
    Landscape,
    OldPhoto,
    Sharpen,
    Brighten,
    Contrast,
    Denoise,
}

impl EnhancementMode {
    pub const ALL: [Self; 8] = [
        Self::Auto,
        Self::Portrait,
        Self::Landscape,
        Self::OldPhoto,
        Self::Sharpen,
        Self::Brighten,
        Self::Contrast,
        Self::Denoise,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
            Self::OldPhoto => "old-photo",
            Self::Sharpen => "sharpen",
            Self::Brighten => "brighten",
            Self::Contrast => "contrast",
            Self::Denoise => "denoise",
        }
    }

    /// Unsharp mask preset for this mode; modes without one use [`UnsharpParams::AUTO`].
    #[must_use]
    pub const fn unsharp_preset(self) -> UnsharpParams {
        match self {
            Self::Portrait => UnsharpParams::PORTRAIT,
            Self::Landscape => UnsharpParams::LANDSCAPE,
            Self::OldPhoto => UnsharpParams::OLD_PHOTO,
            Self::Auto | Self::Sharpen | Self::Brighten | Self::Contrast | Self::Denoise => {
                UnsharpParams::AUTO
            }
        }
    }
}

impl fmt::Display for EnhancementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EnhancementMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| Error::UnsupportedMode(s.to_owned()))
    }
}

/// Enhancement driven by an [`EnhancementMode`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnhancementPipeline {
    mode: EnhancementMode,
}

impl EnhancementPipeline {
    #[must_use]
    pub const fn new(mode: EnhancementMode) -> Self {
        Self { mode }
    }

    #[must_use]
    pub const fn mode(&self) -> EnhancementMode {
        self.mode
    }

    /// # Errors
    ///
    /// * `Error::InvalidDimensions` - When the image is empty
    pub fn run(&self, image: &Image<Rgba<u8>>) -> Result<Image<Rgba<u8>>, Error> {
        self.run_with_context(image, RunContext::new())
    }

    /// Runs the mode's kernels at source resolution.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidDimensions` - When the image is empty
    /// * `Error::Superseded` - When a newer run started
    pub fn run_with_context(
        &self,
        image: &Image<Rgba<u8>>,
        context: RunContext<'_>,
    ) -> Result<Image<Rgba<u8>>, Error> {
        let (width, height) = image.dimensions();
        validate_non_empty_image(width, height)?;
        debug!("enhance {}x{}: mode {}", width, height, self.mode);

        let output = match self.mode {
            EnhancementMode::Auto
            | EnhancementMode::Portrait
            | EnhancementMode::Landscape
            | EnhancementMode::OldPhoto => {
                self.full_chain(image, &BilateralParams::STANDARD, 1, context)?
            }
            EnhancementMode::Sharpen => {
                context.checkpoint(Stage::Sharpening, 1)?;
                image.sharpen_kernel(KERNEL_SHARPEN_INTENSITY)
            }
            EnhancementMode::Brighten => {
                context.checkpoint(Stage::AdjustingTone, 1)?;
                let (brightness, contrast) = BRIGHTEN_ADJUSTMENT;
                image.adjust_brightness_contrast(brightness, contrast)
            }
            EnhancementMode::Contrast => {
                context.checkpoint(Stage::AdjustingTone, 1)?;
                let (brightness, contrast) = CONTRAST_ADJUSTMENT;
                image.adjust_brightness_contrast(brightness, contrast)
            }
            EnhancementMode::Denoise => {
                context.checkpoint(Stage::Denoising, 1)?;
                image.bilateral_filter(&BilateralParams::STANDARD)?
            }
        };

        context.deliver(output, 1)
    }

    /// # Errors
    ///
    /// * `Error::InvalidDimensions` - When the image is empty
    /// * `Error::InvalidParameter` - When the upscaled size overflows
    pub fn run_remini_style(&self, image: &Image<Rgba<u8>>) -> Result<Image<Rgba<u8>>, Error> {
        self.run_remini_style_with_context(image, RunContext::new())
    }

    /// Upscales 2x, then denoises, sharpens with the mode preset and corrects color.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidDimensions` - When the image is empty
    /// * `Error::InvalidParameter` - When the upscaled size overflows
    /// * `Error::Superseded` - When a newer run started
    pub fn run_remini_style_with_context(
        &self,
        image: &Image<Rgba<u8>>,
        context: RunContext<'_>,
    ) -> Result<Image<Rgba<u8>>, Error> {
        let (width, height) = image.dimensions();
        validate_non_empty_image(width, height)?;
        debug!("remini-style enhance {}x{}: mode {}", width, height, self.mode);

        context.checkpoint(Stage::Upscaling, REMINI_SCALE)?;
        let upscaled = image.upscale(REMINI_SCALE)?;
        let output = self.full_chain(&upscaled, &BilateralParams::HIGH_QUALITY, REMINI_SCALE, context)?;

        context.deliver(output, REMINI_SCALE)
    }

    fn full_chain(
        &self,
        image: &Image<Rgba<u8>>,
        denoise: &BilateralParams,
        scale_factor: u32,
        context: RunContext<'_>,
    ) -> Result<Image<Rgba<u8>>, Error> {
        context.checkpoint(Stage::Denoising, scale_factor)?;
        let denoised = image.bilateral_filter(denoise)?;

        context.checkpoint(Stage::Sharpening, scale_factor)?;
        let sharpened = denoised.unsharp_mask(&self.mode.unsharp_preset())?;

        context.checkpoint(Stage::CorrectingColor, scale_factor)?;
        Ok(sharpened.correct_colors())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imageops_retouch::run_control::{ProgressEvent, RequestGeneration};
    use image::ImageBuffer;
    use std::sync::Mutex;

    #[test]
    fn from_str_with_known_names_round_trips_display() {
        for mode in EnhancementMode::ALL {
            assert_eq!(mode.to_string().parse::<EnhancementMode>(), Ok(mode));
        }
        assert_eq!("old-photo".parse(), Ok(EnhancementMode::OldPhoto));
    }

    #[test]
    fn from_str_with_unknown_name_returns_unsupported_mode() {
        assert_eq!(
            "vintage".parse::<EnhancementMode>(),
            Err(Error::UnsupportedMode("vintage".to_owned()))
        );
        assert!("Auto".parse::<EnhancementMode>().is_err());
    }

    #[test]
    fn unsharp_preset_with_single_kernel_modes_falls_back_to_auto() {
        assert_eq!(EnhancementMode::Portrait.unsharp_preset(), UnsharpParams::PORTRAIT);
        assert_eq!(EnhancementMode::Denoise.unsharp_preset(), UnsharpParams::AUTO);
        assert_eq!(EnhancementMode::Brighten.unsharp_preset(), UnsharpParams::AUTO);
    }

    #[test]
    fn run_with_brighten_mode_lifts_gray() {
        let image = ImageBuffer::from_pixel(5, 5, Rgba([128u8, 128, 128, 255]));
        let result = EnhancementPipeline::new(EnhancementMode::Brighten)
            .run(&image)
            .unwrap();

        assert!(result.pixels().all(|p| p[0] > 128 && p[1] > 128 && p[2] > 128 && p[3] == 255));
    }

    #[test]
    fn run_with_every_mode_keeps_dimensions_and_alpha() {
        let image = ImageBuffer::from_fn(9, 7, |x, y| {
            Rgba([(x * 25) as u8, (y * 30) as u8, 90, if x == 0 { 0 } else { 255 }])
        });

        for mode in EnhancementMode::ALL {
            let result = EnhancementPipeline::new(mode).run(&image).unwrap();
            assert_eq!(result.dimensions(), image.dimensions(), "{mode}");
            for (before, after) in image.pixels().zip(result.pixels()) {
                assert_eq!(before[3], after[3], "{mode}");
            }
        }
    }

    #[test]
    fn run_remini_style_with_any_mode_doubles_dimensions() {
        let image = ImageBuffer::from_pixel(6, 4, Rgba([60u8, 120, 180, 255]));
        let result = EnhancementPipeline::new(EnhancementMode::Contrast)
            .run_remini_style(&image)
            .unwrap();
        assert_eq!(result.dimensions(), (12, 8));
    }

    #[test]
    fn run_remini_style_with_observer_reports_full_chain() {
        let stages = Mutex::new(Vec::new());
        let observer = |event: ProgressEvent| stages.lock().unwrap().push(event.stage);
        let context = RunContext::new().with_observer(&observer);
        let image = ImageBuffer::from_pixel(3, 3, Rgba([10u8, 20, 30, 255]));

        EnhancementPipeline::new(EnhancementMode::Sharpen)
            .run_remini_style_with_context(&image, context)
            .unwrap();

        assert_eq!(
            *stages.lock().unwrap(),
            vec![
                Stage::Upscaling,
                Stage::Denoising,
                Stage::Sharpening,
                Stage::CorrectingColor,
                Stage::Finished,
            ]
        );
    }

    #[test]
    fn run_with_superseded_ticket_returns_error() {
        let image = ImageBuffer::from_pixel(3, 3, Rgba([10u8, 20, 30, 255]));
        let generation = RequestGeneration::new();
        let ticket = generation.begin();
        generation.begin();

        let result = EnhancementPipeline::default()
            .run_with_context(&image, RunContext::new().with_ticket(&ticket));
        assert!(matches!(result, Err(Error::Superseded { .. })));
    }

    #[test]
    fn run_with_empty_image_returns_invalid_dimensions() {
        let image: Image<Rgba<u8>> = ImageBuffer::new(4, 0);
        assert!(matches!(
            EnhancementPipeline::default().run(&image),
            Err(Error::InvalidDimensions { .. })
        ));
    }
}
