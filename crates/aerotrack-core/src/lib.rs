//! Core types for the aerotrack angle pipeline.
//!
//! This crate holds the pieces every other crate shares: RGB frame buffers
//! and binary masks, 8-bit HSV conversion, the exponential smoother, the
//! single-slot angle register and the logger. It knows nothing about
//! sockets or segmentation.

mod ema;
mod hsv;
mod image;
mod logger;
mod register;

pub use ema::{Blend, Ema};
pub use hsv::{in_band, rgb_to_hsv8};
pub use image::{FrameError, Mask, RgbImage, RgbImageView};
pub use register::{angle_register, AngleReader, AngleWriter};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;

/// Pixel coordinates, floating point.
pub type Point = nalgebra::Point2<f64>;
