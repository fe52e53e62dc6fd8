//! Edge case and error handling tests for imageops-retouch
//!
//! These tests verify that the crate rejects malformed inputs with the right
//! error and handles degenerate but valid inputs without failing.

use image::{Luma, Rgba};
use imageops_retouch::{
    enhance, enhance_remini_style, remove_background, rgba_image_from_raw, BilateralFilterExt,
    BilateralParams, CompositeAlphaExt, EnhancementMode, EnhancementPipeline, Error,
    HistogramCorrectionExt, Image, KernelSharpenExt, ProcessingSettings, SegmentationClassifier,
    SegmentationPipeline, UnsharpMaskExt, UnsharpParams, UpscaleExt, MASK_FOREGROUND,
    MAX_SENSITIVITY, MIN_SENSITIVITY,
};

#[test]
fn raw_entry_points_with_wrong_length_return_decode_error() {
    let settings = ProcessingSettings::default();
    let expected = Error::Decode {
        width: 3,
        height: 2,
        expected: 24,
        actual: 23,
    };

    assert_eq!(remove_background(3, 2, vec![0; 23], &settings), Err(expected.clone()));
    assert_eq!(enhance(3, 2, vec![0; 23], EnhancementMode::Auto), Err(expected.clone()));
    assert_eq!(
        enhance_remini_style(3, 2, vec![0; 23], EnhancementMode::Auto),
        Err(expected)
    );
}

#[test]
fn raw_entry_points_with_zero_dimension_return_invalid_dimensions() {
    assert!(matches!(
        remove_background(0, 5, Vec::new(), &ProcessingSettings::default()),
        Err(Error::InvalidDimensions { width: 0, height: 5 })
    ));
    assert!(matches!(
        enhance(5, 0, Vec::new(), EnhancementMode::Denoise),
        Err(Error::InvalidDimensions { width: 5, height: 0 })
    ));
    assert!(matches!(
        enhance_remini_style(0, 0, Vec::new(), EnhancementMode::Auto),
        Err(Error::InvalidDimensions { .. })
    ));
}

#[test]
fn rgba_image_from_raw_with_oversized_buffer_returns_decode_error() {
    assert!(matches!(
        rgba_image_from_raw(1, 1, vec![0; 5]),
        Err(Error::Decode { expected: 4, actual: 5, .. })
    ));
}

#[test]
fn enhancement_mode_with_unknown_name_returns_unsupported_mode() {
    let result = "hdr".parse::<EnhancementMode>();
    assert_eq!(result, Err(Error::UnsupportedMode("hdr".to_owned())));
    assert_eq!(
        result.unwrap_err().to_string(),
        "Unsupported enhancement mode: hdr"
    );
}

#[test]
fn processing_settings_with_out_of_range_sensitivity_returns_error() {
    assert!(ProcessingSettings::new(MIN_SENSITIVITY, true, true).is_ok());
    assert!(ProcessingSettings::new(MAX_SENSITIVITY, true, true).is_ok());
    assert!(matches!(
        ProcessingSettings::new(MIN_SENSITIVITY - 1, true, true),
        Err(Error::InvalidParameter { name: "sensitivity", .. })
    ));
    assert!(matches!(
        ProcessingSettings::new(MAX_SENSITIVITY + 1, true, true),
        Err(Error::InvalidParameter { name: "sensitivity", .. })
    ));
}

#[test]
fn single_pixel_image_is_processed_without_error() {
    let image = Image::from_pixel(1, 1, Rgba([12u8, 34, 56, 255]));

    let output = SegmentationPipeline::default().run(&image).unwrap();
    assert_eq!(output.standard.dimensions(), (1, 1));
    assert_eq!(output.hd.dimensions(), (3, 3));

    for mode in EnhancementMode::ALL {
        let enhanced = EnhancementPipeline::new(mode).run(&image).unwrap();
        assert_eq!(enhanced.dimensions(), (1, 1));
    }
}

#[test]
fn image_smaller_than_sampling_band_is_processed_without_error() {
    let image = Image::from_fn(3, 2, |x, _| Rgba([(x * 80) as u8, 10, 10, 255]));
    let output = SegmentationPipeline::default().run(&image).unwrap();
    assert_eq!(output.standard.dimensions(), (3, 2));
}

#[test]
fn classifier_with_no_clusters_keeps_every_pixel() {
    let image = Image::from_fn(6, 6, |x, y| Rgba([(x * 40) as u8, (y * 40) as u8, 0, 255]));
    let mask = SegmentationClassifier::new(&[], &ProcessingSettings::default(), 1).classify(&image);
    assert!(mask.pixels().all(|Luma([value])| *value == MASK_FOREGROUND));
}

#[test]
fn fully_transparent_image_keeps_alpha_through_enhancement() {
    let image = Image::from_pixel(5, 5, Rgba([90u8, 90, 90, 0]));

    assert_eq!(image.correct_colors(), image);
    assert_eq!(image.bilateral_filter(&BilateralParams::STANDARD).unwrap(), image);
    let enhanced = EnhancementPipeline::default().run(&image).unwrap();
    assert!(enhanced.pixels().all(|p| p[3] == 0));
}

#[test]
fn composite_with_mismatched_mask_returns_dimension_mismatch() {
    let image = Image::from_pixel(4, 4, Rgba([0u8, 0, 0, 255]));
    let mask = Image::from_pixel(4, 3, Luma([MASK_FOREGROUND]));

    assert_eq!(
        image.composite_with_mask(&mask),
        Err(Error::DimensionMismatch {
            expected: (4, 4),
            actual: (4, 3)
        })
    );
}

#[test]
fn kernels_with_invalid_parameters_return_invalid_parameter() {
    let image = Image::from_pixel(4, 4, Rgba([0u8, 0, 0, 255]));

    let bilateral = BilateralParams {
        sigma_space: f32::NAN,
        ..BilateralParams::STANDARD
    };
    assert!(matches!(
        image.bilateral_filter(&bilateral),
        Err(Error::InvalidParameter { name: "sigma_space", .. })
    ));

    let unsharp = UnsharpParams::new(1.0, 1.0, -1.0);
    assert!(matches!(
        image.unsharp_mask(&unsharp),
        Err(Error::InvalidParameter { name: "threshold", .. })
    ));

    assert!(matches!(
        image.upscale(u32::MAX),
        Err(Error::InvalidParameter { name: "factor", .. })
    ));
}

#[test]
fn sharpen_kernel_on_two_by_two_image_copies_frame() {
    let image = Image::from_fn(2, 2, |x, y| Rgba([(x * 100) as u8, (y * 100) as u8, 7, 255]));
    assert_eq!(image.sharpen_kernel(0.6), image);
}

#[test]
fn empty_image_passed_to_kernels_returns_invalid_dimensions() {
    let image: Image<Rgba<u8>> = Image::new(0, 4);

    assert!(matches!(
        image.bilateral_filter(&BilateralParams::STANDARD),
        Err(Error::InvalidDimensions { .. })
    ));
    assert!(matches!(
        image.unsharp_mask(&UnsharpParams::AUTO),
        Err(Error::InvalidDimensions { .. })
    ));
    assert!(matches!(
        EnhancementPipeline::default().run_remini_style(&image),
        Err(Error::InvalidDimensions { .. })
    ));
}
