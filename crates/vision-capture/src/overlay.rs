//! Status overlay rendering for streamed frames

use crate::{CaptureError, VideoFrame};
use ab_glyph::{FontVec, PxScale};
use image::Rgb;
use imageproc::drawing::draw_text_mut;
use std::path::Path;
use tracing::{info, warn};

const BANNER_HEIGHT: u32 = 80;
const BANNER_ALPHA: f32 = 0.7;

/// Draws the live-status banner onto frames and encodes them for the feed.
///
/// The font is loaded once at startup. A missing or unreadable font file
/// disables text for the process lifetime; the banner and status strip
/// still render.
pub struct OverlayRenderer {
    font: Option<FontVec>,
    quality: u8,
}

impl OverlayRenderer {
    pub fn new(font_path: &Path) -> Self {
        let font = match std::fs::read(font_path) {
            Ok(bytes) => match FontVec::try_from_vec(bytes) {
                Ok(font) => {
                    info!(path = %font_path.display(), "overlay font loaded");
                    Some(font)
                }
                Err(e) => {
                    warn!(path = %font_path.display(), error = %e, "overlay font unreadable, text disabled");
                    None
                }
            },
            Err(e) => {
                warn!(path = %font_path.display(), error = %e, "overlay font not found, text disabled");
                None
            }
        };
        Self { font, quality: 80 }
    }

    /// Renderer with no font, banner only
    pub fn bannered() -> Self {
        Self {
            font: None,
            quality: 80,
        }
    }

    /// Draw the status banner onto a copy of `frame` and encode it as JPEG.
    pub fn annotate(
        &self,
        frame: &VideoFrame,
        ear: f32,
        danger: bool,
    ) -> Result<Vec<u8>, CaptureError> {
        let mut frame = frame.clone();
        let band = frame.height.min(BANNER_HEIGHT);
        frame.darken_band(band, BANNER_ALPHA);

        let color = if danger {
            [220, 40, 40]
        } else {
            [40, 200, 80]
        };
        frame.fill_rect(0, band.saturating_sub(6), frame.width, 6, color);

        if let Some(font) = &self.font {
            if let Some(mut img) = frame.to_rgb_image() {
                draw_text_mut(
                    &mut img,
                    Rgb([255, 255, 255]),
                    20,
                    18,
                    PxScale::from(22.0),
                    font,
                    &format!("EAR: {ear:.2}"),
                );
                let label = if danger { "DROWSY!" } else { "ACTIVE" };
                let x = img.width().saturating_sub(180) as i32;
                draw_text_mut(&mut img, Rgb(color), x, 18, PxScale::from(26.0), font, label);
                let (timestamp_ns, sequence) = (frame.timestamp_ns, frame.sequence);
                frame = VideoFrame::from_rgb_image(img, timestamp_ns, sequence);
            }
        }

        frame.encode_jpeg(self.quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotate_without_font_still_encodes() {
        let renderer = OverlayRenderer::bannered();
        let frame = VideoFrame::filled(64, 48, [100, 100, 100], 0, 0);

        let jpeg = renderer.annotate(&frame, 0.25, false).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn missing_font_degrades() {
        let renderer = OverlayRenderer::new(Path::new("/nonexistent/font.ttf"));
        let frame = VideoFrame::filled(64, 48, [100, 100, 100], 0, 0);

        assert!(renderer.annotate(&frame, 0.1, true).is_ok());
    }
}
