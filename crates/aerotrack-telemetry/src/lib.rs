//! UDP angle telemetry.
//!
//! - [`wire`]: the 8-byte little-endian `f64` datagram.
//! - [`TelemetryPublisher`]: sends the latest register value on a fixed period.
//! - [`TelemetryRelay`]: receives datagrams, logs them and forwards the raw
//!   bytes downstream.
//!
//! Delivery is fire-and-forget in both directions. Socket setup failures are
//! returned as [`TelemetryError`]; per-datagram failures are logged and
//! counted in the stats structs.

mod error;
mod net;
mod publisher;
mod relay;
pub mod wire;

pub use error::{Result, TelemetryError};
pub use publisher::{PublisherConfig, PublisherStats, TelemetryPublisher};
pub use relay::{RelayConfig, RelayOutcome, RelayStats, TelemetryRelay, RELAY_BUFFER_LEN};
pub use wire::{decode_angle, encode_angle, WireError, ANGLE_DATAGRAM_LEN};
