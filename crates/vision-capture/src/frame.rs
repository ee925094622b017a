//! Video frame type and raw pixel operations

use crate::CaptureError;
use image::{ImageBuffer, ImageEncoder, Rgb, RgbImage};

/// Decoded RGB video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ns: u64, sequence: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp_ns,
            sequence,
        }
    }

    /// Create a frame filled with a single color
    pub fn filled(width: u32, height: u32, rgb: [u8; 3], timestamp_ns: u64, sequence: u32) -> Self {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..(width * height) {
            data.extend_from_slice(&rgb);
        }
        Self::new(data, width, height, timestamp_ns, sequence)
    }

    /// Get pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Blend the top `rows` rows toward black. `alpha` is the black weight,
    /// clamped to 0..1.
    pub fn darken_band(&mut self, rows: u32, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        let rows = rows.min(self.height);
        let end = (rows * self.width * 3) as usize;
        for value in &mut self.data[..end] {
            *value = (f32::from(*value) * (1.0 - alpha)) as u8;
        }
    }

    /// Fill an axis-aligned rectangle, clipped to the frame bounds.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, rgb: [u8; 3]) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for row in y.min(self.height)..y_end {
            for col in x.min(self.width)..x_end {
                let idx = ((row * self.width + col) * 3) as usize;
                self.data[idx..idx + 3].copy_from_slice(&rgb);
            }
        }
    }

    /// View the frame as an `image` buffer. `None` when the pixel buffer
    /// does not match the declared dimensions.
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        ImageBuffer::<Rgb<u8>, _>::from_raw(self.width, self.height, self.data.clone())
    }

    /// Rebuild a frame from an `image` buffer, keeping capture metadata.
    pub fn from_rgb_image(img: RgbImage, timestamp_ns: u64, sequence: u32) -> Self {
        let (width, height) = img.dimensions();
        Self::new(img.into_raw(), width, height, timestamp_ns, sequence)
    }

    /// Encode as JPEG for transport or persistence.
    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, CaptureError> {
        if self.data.len() != (self.width * self.height * 3) as usize {
            return Err(CaptureError::BadBuffer);
        }
        let mut out = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality);
        encoder
            .write_image(
                &self.data,
                self.width,
                self.height,
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| CaptureError::Encode(e.to_string()))?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_pixel_bounds() {
        let frame = VideoFrame::filled(4, 2, [10, 20, 30], 0, 0);

        assert_eq!(frame.get_pixel(0, 0), Some([10, 20, 30]));
        assert_eq!(frame.get_pixel(3, 1), Some([10, 20, 30]));
        assert_eq!(frame.get_pixel(4, 0), None);
        assert_eq!(frame.get_pixel(0, 2), None);
    }

    #[test]
    fn test_darken_band() {
        let mut frame = VideoFrame::filled(4, 4, [100, 100, 100], 0, 0);
        frame.darken_band(2, 0.5);

        assert_eq!(frame.get_pixel(0, 0), Some([50, 50, 50]));
        assert_eq!(frame.get_pixel(0, 1), Some([50, 50, 50]));
        assert_eq!(frame.get_pixel(0, 2), Some([100, 100, 100]));
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut frame = VideoFrame::filled(4, 4, [0, 0, 0], 0, 0);
        frame.fill_rect(2, 2, 10, 10, [255, 0, 0]);

        assert_eq!(frame.get_pixel(1, 1), Some([0, 0, 0]));
        assert_eq!(frame.get_pixel(2, 2), Some([255, 0, 0]));
        assert_eq!(frame.get_pixel(3, 3), Some([255, 0, 0]));
    }

    #[test]
    fn test_encode_jpeg_magic() {
        let frame = VideoFrame::filled(16, 16, [128, 64, 32], 0, 0);
        let jpeg = frame.encode_jpeg(80).unwrap();

        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_rejects_bad_buffer() {
        let frame = VideoFrame::new(vec![0; 5], 16, 16, 0, 0);
        assert!(frame.encode_jpeg(80).is_err());
    }
}
