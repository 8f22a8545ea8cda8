/// Errors raised when wrapping raw pixel buffers.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("invalid frame dimensions (width={width}, height={height})")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid frame buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },
}

fn expected_len(width: usize, height: usize, channels: usize) -> Result<usize, FrameError> {
    if width == 0 || height == 0 {
        return Err(FrameError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(FrameError::InvalidDimensions { width, height })
}

/// Borrowed RGB8 frame, row-major, 3 bytes per pixel.
///
/// Only constructible through [`RgbImageView::new`] or [`RgbImage::view`], so
/// `data.len() == width * height * 3` always holds.
#[derive(Clone, Copy, Debug)]
pub struct RgbImageView<'a> {
    width: usize,
    height: usize,
    data: &'a [u8],
}

impl<'a> RgbImageView<'a> {
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, FrameError> {
        let expected = expected_len(width, height, 3)?;
        if data.len() != expected {
            return Err(FrameError::InvalidBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// Owned RGB8 frame. This is the unit the frame source hands to the pipeline.
///
/// Fields are private so the buffer length can't drift from the dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbImage {
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, FrameError> {
        RgbImageView::new(width, height, &data)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Frame filled with a single colour.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Result<Self, FrameError> {
        let len = expected_len(width, height, 3)?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Owned copy of a borrowed frame.
    pub fn from_view(view: &RgbImageView<'_>) -> Self {
        Self {
            width: view.width,
            height: view.height,
            data: view.data.to_vec(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable pixel bytes; the length is fixed.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn view(&self) -> RgbImageView<'_> {
        RgbImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn put_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = (y * self.width + x) * 3;
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    /// Paint an axis-aligned rectangle clipped to the frame bounds.
    pub fn fill_rect(&mut self, x0: usize, y0: usize, w: usize, h: usize, rgb: [u8; 3]) {
        let x1 = (x0 + w).min(self.width);
        let y1 = (y0 + h).min(self.height);
        for y in y0.min(y1)..y1 {
            for x in x0.min(x1)..x1 {
                self.put_pixel(x, y, rgb);
            }
        }
    }
}

/// Binary mask, one byte per pixel (0 = background, anything else = set).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl Mask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x] != 0
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.data[y * self.width + x] = if on { 255 } else { 0 };
    }

    pub fn count_set(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_rejects_wrong_buffer_length() {
        let data = vec![0u8; 10];
        let err = RgbImageView::new(2, 2, &data).unwrap_err();
        assert_eq!(
            err,
            FrameError::InvalidBuffer {
                expected: 12,
                got: 10
            }
        );
    }

    #[test]
    fn zero_sized_frames_are_rejected() {
        assert!(matches!(
            RgbImage::from_raw(0, 4, Vec::new()),
            Err(FrameError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn owned_frame_keeps_buffer_consistent_with_dimensions() {
        assert_eq!(
            RgbImage::from_raw(4, 3, vec![0u8; 35]),
            Err(FrameError::InvalidBuffer {
                expected: 36,
                got: 35
            })
        );

        let img = RgbImage::filled(4, 3, [1, 2, 3]).unwrap();
        let view = img.view();
        assert_eq!((view.width(), view.height()), (4, 3));
        assert_eq!(view.data().len(), img.width() * img.height() * 3);
        assert_eq!(RgbImage::from_view(&view), img);
        assert_eq!(img.into_raw().len(), 36);
    }

    #[test]
    fn fill_rect_is_clipped() {
        let mut img = RgbImage::filled(4, 3, [0, 0, 0]).unwrap();
        img.fill_rect(2, 1, 10, 10, [9, 8, 7]);
        let v = img.view();
        assert_eq!(v.pixel(1, 1), [0, 0, 0]);
        assert_eq!(v.pixel(3, 2), [9, 8, 7]);
        assert_eq!(v.pixel(2, 0), [0, 0, 0]);
    }

    #[test]
    fn mask_counts_set_pixels() {
        let mut m = Mask::new(3, 3);
        m.set(0, 0, true);
        m.set(2, 2, true);
        m.set(2, 2, true);
        assert_eq!(m.count_set(), 2);
        assert!(m.get(2, 2));
        assert!(!m.get(1, 1));
    }
}
