//! High-level facade crate for the `aerotrack-*` workspace.
//!
//! This crate provides:
//! - re-exports of the core, vision and telemetry crates
//! - JSON configuration for the sender and the relay
//! - sender orchestration: the vision loop on the calling thread and the
//!   telemetry publisher on a scoped thread, sharing one angle register
//! - (feature `image`) a directory-of-images frame source
//! - (feature `camera`) a live capture source backed by OpenCV `videoio`
//! - (feature `cli`) the `aerotrack` binary with `send`, `relay` and
//!   `init-config` subcommands
//!
//! ## Quickstart
//!
//! ```no_run
//! use std::sync::atomic::AtomicBool;
//! use aerotrack::{run_sender, RunLimits, SenderConfig};
//! use aerotrack::vision::SyntheticPairSource;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SenderConfig::default();
//! let mut source = SyntheticPairSource::new(640, 480, vec![0.0, 0.1, 0.2]);
//! let running = AtomicBool::new(true);
//!
//! let report = run_sender(&config, &mut source, RunLimits::default(), &running)?;
//! println!("final angle: {} rad", report.final_angle);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `aerotrack::core`: frames, HSV helpers, EMA smoothing, the angle register, logger.
//! - `aerotrack::vision`: segmentation, detection, pairing, angle estimation.
//! - `aerotrack::telemetry`: wire format, publisher, relay.

pub use aerotrack_core as core;
pub use aerotrack_telemetry as telemetry;
pub use aerotrack_vision as vision;

pub use aerotrack_telemetry::{RelayConfig, RelayStats, TelemetryRelay};
pub use aerotrack_vision::{AnglePipeline, PipelineParams};

#[cfg(feature = "camera")]
mod camera;
mod config;
mod sender;
#[cfg(feature = "image")]
mod source;

pub use config::{ConfigError, JsonConfig, Resolution, SenderConfig};
pub use sender::{
    run_sender, run_vision_loop, RunLimits, SenderError, SenderReport, VisionLoopStats,
};
#[cfg(feature = "camera")]
pub use camera::CameraSource;
#[cfg(feature = "image")]
pub use source::ImageSequenceSource;
