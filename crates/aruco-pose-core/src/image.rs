//! Owned RGB pixel buffers exchanged with the image stream.

use crate::Stamp;

/// Channels per pixel in an [`ImageFrame`] buffer.
pub const RGB_CHANNELS: usize = 3;

/// Errors raised when adopting a raw pixel buffer.
///
/// Wire-format decoding happens upstream; a buffer that does not match its
/// declared geometry is the in-memory equivalent of a decode failure and is
/// skipped at the frame boundary.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("image has zero dimension ({width}x{height})")]
    EmptyDimensions { width: usize, height: usize },
    #[error("buffer of {len} bytes does not match {width}x{height} rgb8 geometry")]
    BufferGeometry {
        width: usize,
        height: usize,
        len: usize,
    },
}

/// An RGB8 image frame with capture metadata.
///
/// Pixels are row-major, three bytes per pixel. The buffer length is
/// validated on construction so downstream pixel access can stay unchecked
/// on the read path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageFrame {
    width: usize,
    height: usize,
    data: Vec<u8>,
    frame_id: String,
    stamp: Stamp,
}

impl ImageFrame {
    /// Adopt a raw RGB8 buffer, validating its geometry.
    pub fn new(
        width: usize,
        height: usize,
        data: Vec<u8>,
        frame_id: impl Into<String>,
        stamp: Stamp,
    ) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::EmptyDimensions { width, height });
        }
        if data.len() != width * height * RGB_CHANNELS {
            return Err(ImageError::BufferGeometry {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
            frame_id: frame_id.into(),
            stamp,
        })
    }

    /// Allocate a frame filled with a single color.
    pub fn filled(
        width: usize,
        height: usize,
        rgb: [u8; 3],
        frame_id: impl Into<String>,
        stamp: Stamp,
    ) -> Result<Self, ImageError> {
        let mut data = Vec::with_capacity(width * height * RGB_CHANNELS);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Self::new(width, height, data, frame_id, stamp)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major RGB8 bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Name of the coordinate frame the image was captured in.
    #[inline]
    pub fn frame_id(&self) -> &str {
        &self.frame_id
    }

    /// Capture time of the image.
    #[inline]
    pub fn stamp(&self) -> Stamp {
        self.stamp
    }

    /// Read one pixel; `None` outside the image.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = (y * self.width + x) * RGB_CHANNELS;
        Some([self.data[at], self.data[at + 1], self.data[at + 2]])
    }

    /// Write one pixel; writes outside the image are ignored, so overlay
    /// drawing does not need to clip segments itself.
    pub fn put_pixel(&mut self, x: i64, y: i64, rgb: [u8; 3]) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let at = (y as usize * self.width + x as usize) * RGB_CHANNELS;
        self.data[at..at + RGB_CHANNELS].copy_from_slice(&rgb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        let err = ImageFrame::new(4, 4, vec![0u8; 47], "cam", Stamp::default()).unwrap_err();
        assert_eq!(
            err,
            ImageError::BufferGeometry {
                width: 4,
                height: 4,
                len: 47
            }
        );

        let err = ImageFrame::new(0, 4, Vec::new(), "cam", Stamp::default()).unwrap_err();
        assert!(matches!(err, ImageError::EmptyDimensions { .. }));
    }

    #[test]
    fn pixel_writes_clip_to_bounds() {
        let mut frame = ImageFrame::filled(3, 2, [0, 0, 0], "cam", Stamp::default()).unwrap();
        frame.put_pixel(1, 1, [9, 8, 7]);
        frame.put_pixel(-1, 0, [255, 255, 255]);
        frame.put_pixel(3, 0, [255, 255, 255]);

        assert_eq!(frame.pixel(1, 1), Some([9, 8, 7]));
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0]));
        assert_eq!(frame.pixel(3, 0), None);
    }
}
