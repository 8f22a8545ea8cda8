//! Exponential moving average.
//!
//! `new = (1 - alpha) * old + alpha * sample`, evaluated as
//! `old + alpha * (sample - old)` so a constant input stays bit-exact. The
//! first sample is taken verbatim, so there is no warm-up transient from an
//! implicit zero state.

use nalgebra::Point2;

/// Values that can be linearly blended towards a sample.
pub trait Blend: Copy {
    /// Return `(1 - alpha) * self + alpha * sample`.
    fn blend(self, sample: Self, alpha: f64) -> Self;
}

impl Blend for f64 {
    #[inline]
    fn blend(self, sample: Self, alpha: f64) -> Self {
        self + alpha * (sample - self)
    }
}

impl Blend for Point2<f64> {
    #[inline]
    fn blend(self, sample: Self, alpha: f64) -> Self {
        Point2::new(self.x.blend(sample.x, alpha), self.y.blend(sample.y, alpha))
    }
}

/// One-slot exponential smoother.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ema<T> {
    alpha: f64,
    value: Option<T>,
}

impl<T: Blend> Ema<T> {
    pub fn new(alpha: f64) -> Self {
        Self { alpha, value: None }
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Current smoothed value, `None` until the first sample.
    #[inline]
    pub fn value(&self) -> Option<T> {
        self.value
    }

    /// Feed one sample and return the new smoothed value.
    pub fn update(&mut self, sample: T) -> T {
        let next = match self.value {
            Some(old) => old.blend(sample, self.alpha),
            None => sample,
        };
        self.value = Some(next);
        next
    }

    pub fn reset(&mut self) {
        self.value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn first_sample_is_verbatim() {
        let mut ema = Ema::new(0.1);
        assert_eq!(ema.update(42.0), 42.0);
        assert_eq!(ema.value(), Some(42.0));
    }

    #[test]
    fn second_sample_moves_by_alpha() {
        let mut ema = Ema::new(0.1);
        ema.update(0.0);
        assert_relative_eq!(ema.update(10.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(ema.update(10.0), 1.9, epsilon = 1e-12);
    }

    #[test]
    fn constant_input_is_a_fixed_point() {
        let mut ema = Ema::new(0.1);
        for _ in 0..50 {
            assert_eq!(ema.update(107.3), 107.3);
        }
    }

    #[test]
    fn points_blend_per_axis() {
        let mut ema = Ema::new(0.5);
        ema.update(Point2::new(0.0, 10.0));
        let p = ema.update(Point2::new(4.0, 0.0));
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn reset_forgets_history() {
        let mut ema = Ema::new(0.3);
        ema.update(5.0);
        ema.reset();
        assert_eq!(ema.value(), None);
        assert_eq!(ema.update(-1.0), -1.0);
    }

    proptest! {
        #[test]
        fn output_never_overshoots(
            samples in prop::collection::vec(-1.0e4f64..1.0e4, 3..64),
            alpha in 0.001f64..0.999,
        ) {
            let mut ema = Ema::new(alpha);
            let mut previous: Option<f64> = None;
            for s in samples {
                let out = ema.update(s);
                if let Some(prev) = previous {
                    let lo = prev.min(s);
                    let hi = prev.max(s);
                    let tol = 1e-9 * (1.0 + lo.abs().max(hi.abs()));
                    prop_assert!(out >= lo - tol && out <= hi + tol,
                        "out={} prev={} sample={}", out, prev, s);
                }
                previous = Some(out);
            }
        }
    }
}
