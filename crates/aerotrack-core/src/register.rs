//! Single-slot angle register shared by the vision loop and the publisher.
//!
//! The value is published as raw `f64` bits in an `AtomicU64`, so readers
//! never block the writer and always see the latest complete value.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct Slot {
    bits: AtomicU64,
}

/// Write half. There is exactly one, owned by the vision pipeline.
#[derive(Debug)]
pub struct AngleWriter {
    slot: Arc<Slot>,
}

/// Read half. Cheap to clone; reads are latest-value and non-blocking.
#[derive(Clone, Debug)]
pub struct AngleReader {
    slot: Arc<Slot>,
}

/// Create a register holding `initial` radians.
pub fn angle_register(initial: f64) -> (AngleWriter, AngleReader) {
    let slot = Arc::new(Slot {
        bits: AtomicU64::new(initial.to_bits()),
    });
    (
        AngleWriter { slot: slot.clone() },
        AngleReader { slot },
    )
}

impl AngleWriter {
    #[inline]
    pub fn publish(&self, radians: f64) {
        self.slot.bits.store(radians.to_bits(), Ordering::Release);
    }

    /// Value last published through this writer.
    #[inline]
    pub fn current(&self) -> f64 {
        f64::from_bits(self.slot.bits.load(Ordering::Acquire))
    }

    pub fn reader(&self) -> AngleReader {
        AngleReader {
            slot: self.slot.clone(),
        }
    }
}

impl AngleReader {
    #[inline]
    pub fn latest(&self) -> f64 {
        f64::from_bits(self.slot.bits.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn reader_sees_initial_value() {
        let (_w, r) = angle_register(0.25);
        assert_eq!(r.latest(), 0.25);
    }

    #[test]
    fn publish_is_bit_exact() {
        let (w, r) = angle_register(0.0);
        let v = -0.123_456_789_012_345_67_f64;
        w.publish(v);
        assert_eq!(r.latest().to_bits(), v.to_bits());
        assert_eq!(w.current().to_bits(), v.to_bits());
    }

    #[test]
    fn readers_on_other_threads_observe_latest() {
        let (w, r) = angle_register(0.0);
        let r2 = w.reader();
        w.publish(1.5);
        let seen = thread::spawn(move || r2.latest()).join().unwrap();
        assert_eq!(seen, 1.5);
        assert_eq!(r.latest(), 1.5);
    }
}
