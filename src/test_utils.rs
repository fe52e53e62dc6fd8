//! Test utilities for imageops-retouch
//!
//! This module provides deterministic image builders shared by the kernel tests.
//! It is only compiled when running tests.

#[cfg(test)]
use image::Rgba;
#[cfg(test)]
use imageproc::definitions::Image;

/// Creates a deterministic pseudo-random RGBA image.
///
/// Color channels follow a fixed hash of the coordinates. Every seventh pixel
/// is fully transparent and every fifth of the rest is semi-transparent, so
/// kernels that treat alpha specially get exercised.
///
/// # Arguments
/// * `width` - Width of the image to create
/// * `height` - Height of the image to create
#[cfg(test)]
pub fn create_noisy_rgba_image(width: u32, height: u32) -> Image<Rgba<u8>> {
    Image::from_fn(width, height, |x, y| {
        let index = y * width + x;
        let hash = index.wrapping_mul(2_654_435_761).rotate_left(13) ^ (x * 31 + y * 17);
        let [r, g, b, _] = hash.to_le_bytes();
        let alpha = if index % 7 == 3 {
            0
        } else if index % 5 == 1 {
            128
        } else {
            255
        };
        Rgba([r, g, b, alpha])
    })
}

/// Creates an image with a uniform border of `border` pixels around a
/// differently colored center.
///
/// # Arguments
/// * `width` - Width of the image to create
/// * `height` - Height of the image to create
/// * `border` - Border thickness in pixels
/// * `border_color` - Color of the border
/// * `center_color` - Color of the interior
#[cfg(test)]
pub fn create_bordered_image(
    width: u32,
    height: u32,
    border: u32,
    border_color: Rgba<u8>,
    center_color: Rgba<u8>,
) -> Image<Rgba<u8>> {
    Image::from_fn(width, height, |x, y| {
        let inside = x >= border && y >= border && x + border < width && y + border < height;
        if inside {
            center_color
        } else {
            border_color
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_noisy_rgba_image_with_same_size_is_deterministic() {
        let first = create_noisy_rgba_image(9, 6);
        let second = create_noisy_rgba_image(9, 6);
        assert_eq!(first, second);
        assert!(first.pixels().any(|p| p[3] == 0));
        assert!(first.pixels().any(|p| p[3] == 128));
        assert!(first.pixels().any(|p| p[3] == 255));
    }

    #[test]
    fn create_bordered_image_with_border_colors_frame_only() {
        let image = create_bordered_image(6, 5, 2, Rgba([1, 1, 1, 255]), Rgba([9, 9, 9, 255]));
        assert_eq!(image.get_pixel(0, 0), &Rgba([1, 1, 1, 255]));
        assert_eq!(image.get_pixel(2, 2), &Rgba([9, 9, 9, 255]));
        assert_eq!(image.get_pixel(3, 2), &Rgba([9, 9, 9, 255]));
        assert_eq!(image.get_pixel(4, 2), &Rgba([1, 1, 1, 255]));
        assert_eq!(image.get_pixel(2, 3), &Rgba([1, 1, 1, 255]));
    }
}
