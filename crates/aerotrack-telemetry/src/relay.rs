//! Receive-and-forward relay.
//!
//! Listens for angle datagrams, logs each decoded value in radians and
//! degrees, and forwards the datagram's raw bytes unchanged to a downstream
//! consumer. Datagrams shorter than eight bytes are dropped.

use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TelemetryError};
use crate::net::bind_outbound;
use crate::wire::decode_angle;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Receive buffer size; longer datagrams are truncated by the OS.
pub const RELAY_BUFFER_LEN: usize = 1024;

/// Read timeout used to poll the shutdown flag.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub listen: SocketAddr,
    pub forward: SocketAddr,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 5005)),
            forward: SocketAddr::from((Ipv4Addr::LOCALHOST, 5006)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayStats {
    pub received: u64,
    pub forwarded: u64,
    pub dropped: u64,
    pub forward_failed: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RelayOutcome {
    /// Decoded and handed to the forward socket. `sent` is false when the
    /// forward send failed.
    Forwarded { angle: f64, sent: bool },
    /// Too short to hold an angle.
    Dropped { len: usize },
}

pub struct TelemetryRelay {
    inbound: UdpSocket,
    outbound: UdpSocket,
    config: RelayConfig,
    stats: RelayStats,
}

impl TelemetryRelay {
    pub fn bind(config: RelayConfig) -> Result<Self> {
        let inbound = UdpSocket::bind(config.listen).map_err(|source| TelemetryError::Bind {
            addr: config.listen,
            source,
        })?;
        inbound.set_read_timeout(Some(POLL_INTERVAL))?;

        let outbound = bind_outbound(&config.forward)?;

        Ok(Self {
            inbound,
            outbound,
            config,
            stats: RelayStats::default(),
        })
    }

    /// Address actually bound for listening (resolves port 0).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.inbound.local_addr()?)
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn stats(&self) -> RelayStats {
        self.stats
    }

    /// Decode, log and forward one received payload.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self, payload), fields(len = payload.len()))
    )]
    pub fn handle_datagram(&mut self, payload: &[u8]) -> RelayOutcome {
        self.stats.received += 1;
        let angle = match decode_angle(payload) {
            Ok(angle) => angle,
            Err(e) => {
                self.stats.dropped += 1;
                log::warn!("dropping datagram: {e}");
                return RelayOutcome::Dropped { len: payload.len() };
            }
        };

        log::info!("angle: {:.6} rad ({:.3} deg)", angle, angle.to_degrees());

        let sent = match self.outbound.send_to(payload, self.config.forward) {
            Ok(_) => {
                self.stats.forwarded += 1;
                true
            }
            Err(e) => {
                self.stats.forward_failed += 1;
                log::warn!("forward to {} failed: {}", self.config.forward, e);
                false
            }
        };
        RelayOutcome::Forwarded { angle, sent }
    }

    /// Block on the listen socket until `running` clears.
    pub fn run(mut self, running: &AtomicBool) -> RelayStats {
        log::info!(
            "relaying angle datagrams {} -> {}",
            self.local_addr()
                .map_or_else(|_| self.config.listen.to_string(), |a| a.to_string()),
            self.config.forward
        );
        let mut buf = [0u8; RELAY_BUFFER_LEN];

        while running.load(Ordering::Relaxed) {
            match self.inbound.recv_from(&mut buf) {
                Ok((len, from)) => {
                    log::trace!("{len} bytes from {from}");
                    self.handle_datagram(&buf[..len]);
                }
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    continue;
                }
                Err(e) => {
                    log::error!("receive failed: {e}");
                }
            }
        }

        log::info!(
            "relay stopped: {} received, {} forwarded, {} dropped, {} forward failures",
            self.stats.received,
            self.stats.forwarded,
            self.stats.dropped,
            self.stats.forward_failed
        );
        self.stats
    }
}
