//! Image-sequence frame source.
//!
//! Plays back a directory of image files in file-name order, one frame per
//! call. Frames are decoded with the `image` crate, converted to RGB8 and
//! resized to the configured resolution when they differ.

use std::fs;
use std::path::{Path, PathBuf};

use aerotrack_core::RgbImage;
use aerotrack_vision::{FrameSource, SourceError};
use image::imageops::FilterType;

use crate::config::Resolution;

const EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    next: usize,
    resolution: Option<Resolution>,
    repeat: bool,
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

impl ImageSequenceSource {
    /// Collect image files from `dir`, sorted by name.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, SourceError> {
        let dir = dir.as_ref();
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && has_image_extension(&path) {
                paths.push(path);
            }
        }
        if paths.is_empty() {
            return Err(SourceError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no image files in {}", dir.display()),
            )));
        }
        paths.sort();
        log::info!("{} frames found in {}", paths.len(), dir.display());

        Ok(Self::from_paths(paths))
    }

    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            next: 0,
            resolution: None,
            repeat: false,
        }
    }

    /// Resize every frame to `resolution`.
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }

    /// Start over after the last file instead of ending.
    pub fn repeating(mut self) -> Self {
        self.repeat = true;
        self
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    fn decode(&self, path: &Path) -> Result<RgbImage, SourceError> {
        let decoded = image::open(path).map_err(|e| SourceError::Decode {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut rgb = decoded.to_rgb8();

        if let Some(Resolution { width, height }) = self.resolution {
            if rgb.dimensions() != (width, height) {
                rgb = image::imageops::resize(&rgb, width, height, FilterType::Triangle);
            }
        }

        let (w, h) = rgb.dimensions();
        Ok(RgbImage::from_raw(w as usize, h as usize, rgb.into_raw())?)
    }
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, SourceError> {
        if self.next >= self.paths.len() {
            if !self.repeat || self.paths.is_empty() {
                return Err(SourceError::Exhausted);
            }
            self.next = 0;
        }
        let idx = self.next;
        self.next += 1;
        self.decode(&self.paths[idx]).map(Some)
    }
}
