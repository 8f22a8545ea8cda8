//! Periodic angle publisher.
//!
//! Every `period` the publisher reads the latest value from the angle
//! register, encodes it and sends one datagram to the destination. There is
//! no acknowledgement, retry or backpressure; a failed send is logged and the
//! next tick carries on. Because the period (2 ms by default) is much shorter
//! than a camera frame, most datagrams repeat the previous angle.

use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use aerotrack_core::AngleReader;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TelemetryError};
use crate::net::bind_outbound;
use crate::wire::encode_angle;

/// Log the first send failure and then every n-th one.
const FAILURE_LOG_EVERY: u64 = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublisherConfig {
    pub destination: SocketAddr,
    pub period: Duration,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            destination: SocketAddr::from((Ipv4Addr::LOCALHOST, 5005)),
            period: Duration::from_millis(2),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublisherStats {
    pub sent: u64,
    pub failed: u64,
}

pub struct TelemetryPublisher {
    socket: UdpSocket,
    config: PublisherConfig,
    reader: AngleReader,
    stats: PublisherStats,
}

impl TelemetryPublisher {
    /// Bind an ephemeral local socket for sending to `config.destination`.
    pub fn bind(config: PublisherConfig, reader: AngleReader) -> Result<Self> {
        if config.period.is_zero() {
            return Err(TelemetryError::ZeroPeriod);
        }
        let socket = bind_outbound(&config.destination)?;
        Ok(Self {
            socket,
            config,
            reader,
            stats: PublisherStats::default(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    pub fn stats(&self) -> PublisherStats {
        self.stats
    }

    /// Send the current angle once. Returns whether the send succeeded.
    pub fn tick(&mut self) -> bool {
        let value = self.reader.latest();
        let payload = encode_angle(value);
        match self.socket.send_to(&payload, self.config.destination) {
            Ok(_) => {
                self.stats.sent += 1;
                true
            }
            Err(e) => {
                self.stats.failed += 1;
                if self.stats.failed % FAILURE_LOG_EVERY == 1 {
                    log::warn!(
                        "UDP send to {} failed ({} failures so far): {}",
                        self.config.destination,
                        self.stats.failed,
                        e
                    );
                }
                false
            }
        }
    }

    /// Publish on a fixed schedule until `running` clears.
    ///
    /// Ticks are anchored to the start time; if the loop falls behind it
    /// skips the missed slots instead of bursting to catch up.
    pub fn run(mut self, running: &AtomicBool) -> PublisherStats {
        log::info!(
            "publishing angle to {} every {:.1} ms",
            self.config.destination,
            self.config.period.as_secs_f64() * 1e3
        );
        let period = self.config.period;
        let mut next = Instant::now();

        while running.load(Ordering::Relaxed) {
            self.tick();

            next += period;
            let now = Instant::now();
            if next > now {
                std::thread::sleep(next - now);
            } else {
                let behind = now - next;
                let skipped = (behind.as_nanos() / period.as_nanos()) as u32;
                next += period * (skipped + 1);
                std::thread::sleep(next.saturating_duration_since(now));
            }
        }

        log::info!(
            "publisher stopped: {} sent, {} failed",
            self.stats.sent,
            self.stats.failed
        );
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::decode_angle;
    use aerotrack_core::angle_register;

    fn loopback_receiver() -> UdpSocket {
        let sock = UdpSocket::bind("127.0.0.1:0").unwrap();
        sock.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        sock
    }

    #[test]
    fn zero_period_is_rejected() {
        let (_w, r) = angle_register(0.0);
        let cfg = PublisherConfig {
            period: Duration::ZERO,
            ..PublisherConfig::default()
        };
        assert!(matches!(
            TelemetryPublisher::bind(cfg, r),
            Err(TelemetryError::ZeroPeriod)
        ));
    }

    #[test]
    fn tick_sends_latest_angle() {
        let rx = loopback_receiver();
        let (w, r) = angle_register(0.0);
        let cfg = PublisherConfig {
            destination: rx.local_addr().unwrap(),
            period: Duration::from_millis(2),
        };
        let mut publisher = TelemetryPublisher::bind(cfg, r).unwrap();

        w.publish(0.75);
        assert!(publisher.tick());

        let mut buf = [0u8; 64];
        let (n, _) = rx.recv_from(&mut buf).unwrap();
        assert_eq!(n, 8);
        assert_eq!(decode_angle(&buf[..n]).unwrap(), 0.75);
        assert_eq!(publisher.stats().sent, 1);
    }

    // Sending to the limited broadcast address without SO_BROADCAST fails
    // with EACCES on Linux.
    #[cfg(target_os = "linux")]
    #[test]
    fn failed_sends_are_counted_and_publishing_continues() {
        let (w, r) = angle_register(0.25);
        let cfg = PublisherConfig {
            destination: "255.255.255.255:5005".parse().unwrap(),
            period: Duration::from_millis(1),
        };
        let mut publisher = TelemetryPublisher::bind(cfg, r).unwrap();

        assert!(!publisher.tick());
        assert!(!publisher.tick());
        assert_eq!(publisher.stats(), PublisherStats { sent: 0, failed: 2 });

        let rx = loopback_receiver();
        publisher.config.destination = rx.local_addr().unwrap();
        w.publish(0.5);
        assert!(publisher.tick());
        let mut buf = [0u8; 16];
        let (n, _) = rx.recv_from(&mut buf).unwrap();
        assert_eq!(decode_angle(&buf[..n]).unwrap(), 0.5);
        assert_eq!(publisher.stats(), PublisherStats { sent: 1, failed: 2 });
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn run_keeps_ticking_through_send_failures() {
        let (_w, r) = angle_register(0.0);
        let cfg = PublisherConfig {
            destination: "255.255.255.255:5005".parse().unwrap(),
            period: Duration::from_millis(1),
        };
        let publisher = TelemetryPublisher::bind(cfg, r).unwrap();
        let running = AtomicBool::new(true);

        let stats = std::thread::scope(|s| {
            let handle = s.spawn(|| publisher.run(&running));
            std::thread::sleep(Duration::from_millis(30));
            running.store(false, Ordering::Relaxed);
            handle.join().unwrap()
        });
        assert_eq!(stats.sent, 0);
        assert!(stats.failed >= 2, "{stats:?}");
    }

    #[test]
    fn run_stops_when_flag_clears() {
        let rx = loopback_receiver();
        let (w, r) = angle_register(-0.5);
        let cfg = PublisherConfig {
            destination: rx.local_addr().unwrap(),
            period: Duration::from_millis(1),
        };
        let publisher = TelemetryPublisher::bind(cfg, r).unwrap();
        let running = AtomicBool::new(true);

        let stats = std::thread::scope(|s| {
            let handle = s.spawn(|| publisher.run(&running));
            let mut buf = [0u8; 16];
            let (n, _) = rx.recv_from(&mut buf).unwrap();
            assert_eq!(decode_angle(&buf[..n]).unwrap(), -0.5);
            w.publish(1.0);
            std::thread::sleep(Duration::from_millis(20));
            running.store(false, Ordering::Relaxed);
            handle.join().unwrap()
        });
        assert!(stats.sent >= 2, "{stats:?}");
    }
}
