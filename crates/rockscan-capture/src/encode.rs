//! Lossy still encoding

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use rockscan_domain::{EncodedImage, Frame};

/// Encode an RGB frame as JPEG at the given quality (1..=100)
///
/// Output is not byte-for-byte deterministic across encoder versions.
pub fn encode_jpeg(frame: &Frame, quality: u8) -> Result<EncodedImage, String> {
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
    encoder
        .encode(&frame.rgb, frame.width, frame.height, ExtendedColorType::Rgb8)
        .map_err(|e| format!("JPEG encoding failed: {}", e))?;
    Ok(EncodedImage::jpeg(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Frame {
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                rgb.extend_from_slice(&[(x * 8) as u8, (y * 8) as u8, 128]);
            }
        }
        Frame::new(width, height, rgb).unwrap()
    }

    #[test]
    fn test_output_is_jpeg() {
        let still = encode_jpeg(&gradient(16, 16), 85).unwrap();
        assert_eq!(still.mime_type, "image/jpeg");
        // SOI marker
        assert_eq!(&still.bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_decodes_back_to_same_dimensions() {
        let still = encode_jpeg(&gradient(24, 10), 85).unwrap();
        let decoded = image::load_from_memory(&still.bytes).unwrap();
        assert_eq!(decoded.width(), 24);
        assert_eq!(decoded.height(), 10);
    }
}
