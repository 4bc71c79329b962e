use image::{ImageBuffer, Rgba, RgbaImage};
use std::path::Path;

use crate::error::{FrameError, Result};

/// A single RGBA8888 video frame
///
/// Wraps an RGBA image buffer laid out exactly as frei0r hosts hand frames
/// to the filter: row-major, four bytes per pixel, no padding.
#[derive(Clone, Debug)]
pub struct RgbaFrame {
    buffer: RgbaImage,
}

impl RgbaFrame {
    /// Create a new frame with the given dimensions filled with the specified color
    pub fn new_filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let buffer = ImageBuffer::from_pixel(width, height, Rgba(color));
        Self { buffer }
    }

    /// Load any supported image file and convert it to RGBA
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|_| FrameError::LoadFailed { path: path.display().to_string() })?;
        Ok(Self { buffer: image.to_rgba8() })
    }

    /// Create a frame from raw RGBA bytes
    pub fn from_rgba_bytes(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let actual = data.len();
        ImageBuffer::from_raw(width, height, data)
            .map(|buffer| Self { buffer })
            .ok_or_else(|| {
                FrameError::SizeMismatch {
                    expected: crate::backend::frame_len(width, height),
                    actual,
                }
                .into()
            })
    }

    /// Get the width of the frame
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Get the height of the frame
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Raw packed RGBA bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_raw()
    }

    /// Mutable raw packed RGBA bytes
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Save the frame as a PNG file
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.buffer
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| FrameError::SaveFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn pixel(frame: &RgbaFrame, x: u32, y: u32) -> &[u8] {
        let offset = (y * frame.width() + x) as usize * 4;
        &frame.as_bytes()[offset..offset + 4]
    }

    #[test]
    fn test_filled_frame_layout() {
        let frame = RgbaFrame::new_filled(3, 2, [1, 2, 3, 4]);
        assert_eq!(frame.as_bytes().len(), 3 * 2 * 4);
        assert_eq!(&frame.as_bytes()[..8], &[1, 2, 3, 4, 1, 2, 3, 4]);
        assert_eq!(pixel(&frame, 2, 1), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_from_rgba_bytes_checks_length() {
        assert!(RgbaFrame::from_rgba_bytes(2, 2, vec![0; 16]).is_ok());
        assert!(RgbaFrame::from_rgba_bytes(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn test_png_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frame.png");

        let mut frame = RgbaFrame::new_filled(8, 8, [200, 100, 50, 255]);
        frame.as_bytes_mut()[0] = 7;
        frame.save_png(&path).unwrap();

        let loaded = RgbaFrame::open(&path).unwrap();
        assert_eq!(loaded.width(), 8);
        assert_eq!(loaded.height(), 8);
        assert_eq!(pixel(&loaded, 0, 0), &[7, 100, 50, 255]);
        assert_eq!(pixel(&loaded, 7, 7), &[200, 100, 50, 255]);
    }

    #[test]
    fn test_open_missing_image() {
        assert!(RgbaFrame::open("/nonexistent/frame.png").is_err());
    }
}
