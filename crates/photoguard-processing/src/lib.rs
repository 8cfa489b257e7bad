//! Photoguard Processing Library
//!
//! Pure, synchronous image work for the redaction pipeline:
//! - decoding stored bytes and re-encoding the result (codec)
//! - locating faces (detection, with a SeetaFace backend)
//! - obscuring located regions (redaction)
//!
//! Nothing here touches the network or the filesystem apart from loading the
//! detector model.

pub mod codec;
pub mod detection;
pub mod error;
pub mod redaction;
#[cfg(feature = "detector-rustface")]
pub mod rustface_detector;

pub use codec::{decode_image, encode_jpeg};
pub use detection::{to_grayscale, DetectionParams, FaceDetector, Region};
pub use error::ProcessingError;
pub use redaction::GaussianRedactor;
#[cfg(feature = "detector-rustface")]
pub use rustface_detector::RustfaceDetector;

pub use image::{GrayImage, Rgb, RgbImage};
