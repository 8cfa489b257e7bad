use std::io::Cursor;
use std::path::Path;

use image::GrayImage;

use crate::detection::{DetectionParams, FaceDetector, Region};
use crate::error::ProcessingError;

/// Face detector backed by the `rustface` crate (SeetaFace frontal cascade).
///
/// The model is read once; each `detect` call builds a fresh detector from a
/// clone of it, so one instance can be shared across threads.
pub struct RustfaceDetector {
    model: rustface::Model,
    params: DetectionParams,
}

impl RustfaceDetector {
    /// Load the SeetaFace model at `model_path`.
    pub fn from_path(
        model_path: impl AsRef<Path>,
        params: DetectionParams,
    ) -> Result<Self, ProcessingError> {
        let path = model_path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| ProcessingError::Model(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(&data, params)
    }

    pub fn from_bytes(data: &[u8], params: DetectionParams) -> Result<Self, ProcessingError> {
        let model = rustface::read_model(Cursor::new(data))
            .map_err(|e| ProcessingError::Model(e.to_string()))?;

        tracing::debug!(
            min_face_size = params.min_face_size,
            scale_factor = params.scale_factor,
            score_threshold = params.score_threshold,
            "Face model loaded"
        );

        Ok(Self { model, params })
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, gray: &GrayImage) -> Vec<Region> {
        let (width, height) = gray.dimensions();

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        // rustface rejects windows below 20px
        detector.set_min_face_size(self.params.min_face_size.max(20));
        detector.set_score_thresh(self.params.score_threshold);
        // rustface shrinks by this factor per pyramid level
        detector.set_pyramid_scale_factor((1.0 / self.params.scale_factor).clamp(0.01, 0.99));
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));

        faces
            .iter()
            .filter_map(|face| {
                let bbox = face.bbox();
                Region::clamped(
                    bbox.x() as i64,
                    bbox.y() as i64,
                    bbox.width(),
                    bbox.height(),
                    width,
                    height,
                )
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "rustface"
    }
}
