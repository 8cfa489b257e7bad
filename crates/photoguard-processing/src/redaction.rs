//! Region obscuring

use image::{imageops, RgbImage};
use imageproc::filter::separable_filter_equal;
use photoguard_core::RedactionSettings;

use crate::detection::Region;

/// Blurs each region in place with a fixed-size separable Gaussian.
///
/// Only pixels inside a region change. Regions are processed in order, so an
/// overlap is blurred twice.
#[derive(Debug, Clone)]
pub struct GaussianRedactor {
    kernel: Vec<f32>,
}

impl GaussianRedactor {
    /// `kernel_size` is rounded up to the next odd number.
    pub fn new(kernel_size: u32, sigma: f32) -> Self {
        let size = if kernel_size % 2 == 0 {
            kernel_size + 1
        } else {
            kernel_size
        };
        Self {
            kernel: gaussian_kernel(size, sigma),
        }
    }

    pub fn kernel_size(&self) -> usize {
        self.kernel.len()
    }

    pub fn redact(&self, image: &mut RgbImage, regions: &[Region]) {
        for region in regions {
            if region.width == 0 || region.height == 0 {
                continue;
            }

            let patch =
                imageops::crop_imm(&*image, region.x, region.y, region.width, region.height)
                    .to_image();
            let blurred = separable_filter_equal(&patch, self.kernel.as_slice());
            imageops::replace(&mut *image, &blurred, region.x as i64, region.y as i64);
        }
    }
}

impl Default for GaussianRedactor {
    fn default() -> Self {
        Self::from(&RedactionSettings::default())
    }
}

impl From<&RedactionSettings> for GaussianRedactor {
    fn from(settings: &RedactionSettings) -> Self {
        Self::new(settings.kernel_size, settings.sigma)
    }
}

/// Normalized 1-D Gaussian weights of length `size`.
fn gaussian_kernel(size: u32, sigma: f32) -> Vec<f32> {
    let center = (size as f32 - 1.0) / 2.0;
    let denom = 2.0 * sigma * sigma;

    let weights: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - center;
            (-(d * d) / denom).exp()
        })
        .collect();

    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    /// 1px black/white stripes so any blur visibly changes pixels.
    fn striped(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, _| {
            if x % 2 == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        })
    }

    #[test]
    fn test_kernel_is_normalized_and_symmetric() {
        let kernel = gaussian_kernel(51, 30.0);
        assert_eq!(kernel.len(), 51);
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4);
        assert!((kernel[0] - kernel[50]).abs() < 1e-6);
        assert!(kernel[25] > kernel[0]);
    }

    #[test]
    fn test_even_kernel_size_rounded_up() {
        assert_eq!(GaussianRedactor::new(50, 30.0).kernel_size(), 51);
        assert_eq!(GaussianRedactor::default().kernel_size(), 51);
    }

    #[test]
    fn test_only_region_pixels_change() {
        let original = striped(80, 60);
        let mut image = original.clone();
        let region = Region::new(20, 10, 30, 25);

        GaussianRedactor::default().redact(&mut image, &[region]);

        assert_eq!(image.dimensions(), original.dimensions());
        let mut changed_inside = 0;
        for (x, y, pixel) in image.enumerate_pixels() {
            let inside = x >= region.x
                && x < region.x + region.width
                && y >= region.y
                && y < region.y + region.height;
            if inside {
                if pixel != original.get_pixel(x, y) {
                    changed_inside += 1;
                }
            } else {
                assert_eq!(pixel, original.get_pixel(x, y), "pixel ({}, {}) moved", x, y);
            }
        }
        assert!(changed_inside > 0);
    }

    #[test]
    fn test_blur_flattens_stripes() {
        let mut image = striped(64, 64);
        GaussianRedactor::default().redact(&mut image, &[Region::new(0, 0, 64, 64)]);

        let center = image.get_pixel(32, 32);
        assert!(center[0] > 100 && center[0] < 155, "got {:?}", center);
    }

    #[test]
    fn test_no_regions_is_noop() {
        let original = striped(32, 32);
        let mut image = original.clone();

        GaussianRedactor::default().redact(&mut image, &[]);

        assert_eq!(image, original);
    }

    #[test]
    fn test_region_on_image_edge() {
        let original = striped(40, 40);
        let mut image = original.clone();

        GaussianRedactor::default().redact(&mut image, &[Region::new(30, 30, 10, 10)]);

        assert_eq!(image.dimensions(), (40, 40));
        assert_eq!(image.get_pixel(29, 29), original.get_pixel(29, 29));
    }
}
