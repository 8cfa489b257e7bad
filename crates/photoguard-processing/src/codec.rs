//! Image decoding and re-encoding

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use crate::error::ProcessingError;

/// Decode stored bytes into a 3-channel color raster.
///
/// The container format is sniffed from the bytes. Alpha and palette images
/// are flattened to RGB.
pub fn decode_image(data: &[u8]) -> Result<RgbImage, ProcessingError> {
    let reader = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ProcessingError::Decode(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| ProcessingError::Decode(e.to_string()))?;

    Ok(img.to_rgb8())
}

/// Encode a raster as baseline JPEG at `quality` (1-100).
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, ProcessingError> {
    let estimated_size = (image.width() * image.height()) as usize / 4;
    let mut buffer = Vec::with_capacity(estimated_size);

    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    encoder
        .encode_image(image)
        .map_err(|e| ProcessingError::Encode(e.to_string()))?;

    Ok(buffer)
}
