//! Live camera frame source.
//!
//! Captures through OpenCV's `videoio` backend. The requested resolution is
//! asked of the driver; frames that still arrive at another size are resized
//! so the pipeline always sees the configured geometry. A failed grab is
//! reported as "no frame yet" and the vision loop retries.

use aerotrack_core::RgbImage;
use aerotrack_vision::{FrameSource, SourceError};
use opencv::core::{Mat, Size};
use opencv::imgproc;
use opencv::prelude::*;
use opencv::videoio::{VideoCapture, CAP_ANY, CAP_PROP_FRAME_HEIGHT, CAP_PROP_FRAME_WIDTH};

use crate::config::Resolution;

pub struct CameraSource {
    capture: VideoCapture,
    index: i32,
    resolution: Resolution,
    bgr: Mat,
    rgb: Mat,
}

impl CameraSource {
    /// Open capture device `index` and request `resolution` from the driver.
    pub fn open(index: i32, resolution: Resolution) -> Result<Self, SourceError> {
        let err = |e: opencv::Error| camera_error(index, e);

        let mut capture = VideoCapture::new(index, CAP_ANY).map_err(err)?;
        if !capture.is_opened().map_err(err)? {
            return Err(SourceError::Camera {
                index,
                reason: "device could not be opened".into(),
            });
        }
        capture
            .set(CAP_PROP_FRAME_WIDTH, f64::from(resolution.width))
            .map_err(err)?;
        capture
            .set(CAP_PROP_FRAME_HEIGHT, f64::from(resolution.height))
            .map_err(err)?;
        log::info!(
            "camera {index} opened, requested {}x{}",
            resolution.width,
            resolution.height
        );

        Ok(Self {
            capture,
            index,
            resolution,
            bgr: Mat::default(),
            rgb: Mat::default(),
        })
    }

    pub fn index(&self) -> i32 {
        self.index
    }

    fn convert(&mut self) -> Result<RgbImage, SourceError> {
        let index = self.index;
        let err = |e: opencv::Error| camera_error(index, e);

        let Resolution { width, height } = self.resolution;
        let size = Size::new(width as i32, height as i32);
        if self.bgr.cols() != size.width || self.bgr.rows() != size.height {
            let mut resized = Mat::default();
            imgproc::resize(&self.bgr, &mut resized, size, 0.0, 0.0, imgproc::INTER_LINEAR)
                .map_err(err)?;
            self.bgr = resized;
        }
        imgproc::cvt_color(&self.bgr, &mut self.rgb, imgproc::COLOR_BGR2RGB, 0).map_err(err)?;

        let bytes = self.rgb.data_bytes().map_err(err)?.to_vec();
        let (cols, rows) = (self.rgb.cols() as usize, self.rgb.rows() as usize);
        Ok(RgbImage::from_raw(cols, rows, bytes)?)
    }
}

fn camera_error(index: i32, e: opencv::Error) -> SourceError {
    SourceError::Camera {
        index,
        reason: e.to_string(),
    }
}

impl FrameSource for CameraSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, SourceError> {
        let grabbed = self
            .capture
            .read(&mut self.bgr)
            .map_err(|e| camera_error(self.index, e))?;
        if !grabbed || self.bgr.rows() == 0 || self.bgr.cols() == 0 {
            log::debug!("camera {}: no frame", self.index);
            return Ok(None);
        }
        self.convert().map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_device_is_reported_with_its_index() {
        match CameraSource::open(97, Resolution::default()) {
            Err(SourceError::Camera { index, .. }) => assert_eq!(index, 97),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("camera 97 should not exist"),
        }
    }
}
