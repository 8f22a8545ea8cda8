//! Frame acquisition seam.
//!
//! Cameras and file readers live outside this crate; they implement
//! [`FrameSource`]. A source that has no frame right now returns `Ok(None)`
//! and the caller retries after a short delay without touching tracker state.

use aerotrack_core::{FrameError, Point, RgbImage};

/// Errors a frame source may report.
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    /// A finite source has no more frames.
    #[error("frame source exhausted")]
    Exhausted,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to decode frame {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("camera {index}: {reason}")]
    Camera { index: i32, reason: String },

    #[error(transparent)]
    Frame(#[from] FrameError),
}

pub trait FrameSource {
    /// Next frame, or `Ok(None)` when none is available at the moment.
    fn next_frame(&mut self) -> Result<Option<RgbImage>, SourceError>;
}

impl<F: FrameSource + ?Sized> FrameSource for Box<F> {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, SourceError> {
        (**self).next_frame()
    }
}

/// Colours used by [`render_marker_pair`].
pub const MARKER_YELLOW: [u8; 3] = [255, 220, 0];
pub const BACKGROUND_BLUE: [u8; 3] = [20, 40, 200];

/// Render two square yellow markers centred on `left` and `right`.
pub fn render_marker_pair(
    width: usize,
    height: usize,
    left: Point,
    right: Point,
    half_side: usize,
) -> Result<RgbImage, FrameError> {
    let mut img = RgbImage::filled(width, height, BACKGROUND_BLUE)?;
    for c in [left, right] {
        let x0 = (c.x.round() as isize - half_side as isize).max(0) as usize;
        let y0 = (c.y.round() as isize - half_side as isize).max(0) as usize;
        img.fill_rect(x0, y0, 2 * half_side, 2 * half_side, MARKER_YELLOW);
    }
    Ok(img)
}

/// Synthetic rigid bar: two markers at `radius` either side of `center`,
/// rotated by successive angles (radians). Useful for demos and tests.
pub struct SyntheticPairSource {
    width: usize,
    height: usize,
    center: Point,
    radius: f64,
    half_side: usize,
    angles: Vec<f64>,
    cursor: usize,
    /// Every n-th frame is reported as unavailable (0 = never).
    drop_every: usize,
    repeat: bool,
}

impl SyntheticPairSource {
    pub fn new(width: usize, height: usize, angles: Vec<f64>) -> Self {
        Self {
            width,
            height,
            center: Point::new(width as f64 / 2.0, height as f64 / 2.0),
            radius: width.min(height) as f64 / 4.0,
            half_side: (width.min(height) / 40).max(4),
            angles,
            cursor: 0,
            drop_every: 0,
            repeat: false,
        }
    }

    pub fn with_dropouts(mut self, every: usize) -> Self {
        self.drop_every = every;
        self
    }

    /// Cycle through the angle list forever.
    pub fn repeating(mut self) -> Self {
        self.repeat = true;
        self
    }

    fn marker_positions(&self, angle: f64) -> (Point, Point) {
        let (s, c) = angle.sin_cos();
        let dx = self.radius * c;
        let dy = self.radius * s;
        (
            Point::new(self.center.x - dx, self.center.y - dy),
            Point::new(self.center.x + dx, self.center.y + dy),
        )
    }
}

impl FrameSource for SyntheticPairSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, SourceError> {
        if self.angles.is_empty() || (!self.repeat && self.cursor >= self.angles.len()) {
            return Err(SourceError::Exhausted);
        }
        let n = self.cursor;
        self.cursor += 1;
        if self.drop_every > 0 && (n + 1) % self.drop_every == 0 {
            return Ok(None);
        }
        let angle = self.angles[n % self.angles.len()];
        let (left, right) = self.marker_positions(angle);
        Ok(Some(render_marker_pair(
            self.width,
            self.height,
            left,
            right,
            self.half_side,
        )?))
    }
}
