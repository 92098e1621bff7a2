//! Backoff state carried across consecutive rejections.

use std::time::Duration;

/// Current backoff and its bounds.
///
/// Each rejection grows the backoff by roughly 2x with symmetric Gaussian
/// jitter; a fetch that is not rejected resets it to the initial value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            current: initial,
        }
    }

    pub fn current(&self) -> Duration {
        self.current
    }

    /// Advance to the next backoff and return it.
    ///
    /// Below the cap: `2 * current + current * gaussian`, clamped to
    /// `[0, max]`. At the cap: `max`. A backoff that clamped to zero grows
    /// from `initial` again, so later rejections still compound.
    pub fn grow(&mut self, gaussian: f64) -> Duration {
        self.current = if self.current < self.max {
            let base = if self.current.is_zero() {
                self.initial
            } else {
                self.current
            };
            let cur_ms = base.as_millis() as f64;
            let raw_ms = 2.0 * cur_ms + cur_ms * gaussian;
            let ms = raw_ms.max(0.0).min(self.max.as_millis() as f64);
            Duration::from_millis(ms as u64)
        } else {
            self.max
        };
        self.current
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: Duration = Duration::from_secs(60);

    #[test]
    fn grows_about_twofold_without_jitter() {
        let mut b = Backoff::new(2 * MIN, 20 * MIN);
        assert_eq!(b.grow(0.0), 4 * MIN);
        assert_eq!(b.grow(0.0), 8 * MIN);
    }

    #[test]
    fn jitter_scales_growth() {
        let mut b = Backoff::new(2 * MIN, 20 * MIN);
        assert_eq!(b.grow(1.0), 6 * MIN);
        let mut b = Backoff::new(2 * MIN, 20 * MIN);
        assert_eq!(b.grow(-1.0), 2 * MIN);
    }

    #[test]
    fn never_exceeds_max() {
        let mut b = Backoff::new(2 * MIN, 20 * MIN);
        for g in [3.0, 3.0, 0.5, 10.0, -0.2, 1.0] {
            assert!(b.grow(g) <= 20 * MIN);
        }
        assert_eq!(b.current(), 20 * MIN);
        assert_eq!(b.grow(-5.0), 20 * MIN);
    }

    #[test]
    fn large_negative_sample_clamps_to_zero() {
        let mut b = Backoff::new(2 * MIN, 20 * MIN);
        assert_eq!(b.grow(-4.0), Duration::ZERO);
    }

    #[test]
    fn growth_restarts_from_initial_after_clamping_to_zero() {
        let mut b = Backoff::new(2 * MIN, 20 * MIN);
        assert_eq!(b.grow(-2.5), Duration::ZERO);
        assert_eq!(b.grow(1.0), 6 * MIN);
        assert_eq!(b.grow(2.0), 20 * MIN);
        assert_eq!(b.grow(3.0), 20 * MIN);
    }

    #[test]
    fn reset_returns_to_initial() {
        let mut b = Backoff::new(2 * MIN, 20 * MIN);
        b.grow(1.0);
        b.grow(1.0);
        b.reset();
        assert_eq!(b.current(), 2 * MIN);
        assert_eq!(b.grow(0.0), 4 * MIN);
    }
}
