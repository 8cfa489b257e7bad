//! Deterministic detectors for orchestration tests.

use photoguard_processing::{FaceDetector, GrayImage, Region};

/// Returns the same regions for every image.
pub struct StubDetector {
    regions: Vec<Region>,
}

impl StubDetector {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    pub fn none() -> Self {
        Self::new(Vec::new())
    }
}

impl FaceDetector for StubDetector {
    fn detect(&self, _gray: &GrayImage) -> Vec<Region> {
        self.regions.clone()
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Panics on every call.
pub struct PanickingDetector;

impl FaceDetector for PanickingDetector {
    fn detect(&self, _gray: &GrayImage) -> Vec<Region> {
        panic!("cascade evaluation failed")
    }

    fn name(&self) -> &'static str {
        "panicking"
    }
}
