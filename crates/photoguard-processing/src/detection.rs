//! Face detection abstraction

use image::{GrayImage, RgbImage};
use photoguard_core::DetectionSettings;

/// Axis-aligned rectangle in pixel coordinates, always inside the image it
/// was produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Intersect a raw detector box with a `width` x `height` image.
    ///
    /// Returns `None` when nothing of the box lies inside the image.
    pub fn clamped(
        x: i64,
        y: i64,
        box_width: u32,
        box_height: u32,
        width: u32,
        height: u32,
    ) -> Option<Self> {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + box_width as i64).min(width as i64);
        let y1 = (y + box_height as i64).min(height as i64);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(Self {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }
}

/// Detector tuning derived from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionParams {
    /// Step between pyramid levels (> 1.0).
    pub scale_factor: f32,
    pub min_face_size: u32,
    pub score_threshold: f64,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self::from(&DetectionSettings::default())
    }
}

impl From<&DetectionSettings> for DetectionParams {
    fn from(settings: &DetectionSettings) -> Self {
        Self {
            scale_factor: settings.scale_factor,
            min_face_size: settings.min_face_size,
            score_threshold: settings.score_threshold,
        }
    }
}

/// Pluggable face detection backend.
///
/// Implementations are deterministic for a given image and must only return
/// regions inside it. Detection is CPU bound and runs off the async runtime.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, gray: &GrayImage) -> Vec<Region>;

    fn name(&self) -> &'static str;
}

/// Luminance projection used as detector input.
pub fn to_grayscale(image: &RgbImage) -> GrayImage {
    image::imageops::grayscale(image)
}
