//! Time source and blocking sleep.
//!
//! The engine never reads the system clock directly; it goes through a
//! [`Clock`] so tests can substitute a deterministic one. [`SystemClock`]
//! sleeps in short slices and checks a shared flag, so another thread
//! (e.g. a Ctrl-C handler) can cut a sleep short via [`SleepInterrupter`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Error returned when a sleep was cut short by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

impl std::fmt::Display for Interrupted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sleep interrupted")
    }
}

impl std::error::Error for Interrupted {}

/// Wall time in milliseconds and a blocking sleep.
pub trait Clock: Send {
    /// Current time in milliseconds. Only differences between readings matter.
    fn now_millis(&self) -> u64;

    /// Block for `duration`. Fails if the sleep was interrupted.
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted>;
}

/// Handle used to interrupt the sleep currently running on a [`SystemClock`].
///
/// An interrupt is consumed by the sleep that observes it; later sleeps run
/// normally unless interrupted again.
#[derive(Debug, Clone, Default)]
pub struct SleepInterrupter {
    flag: Arc<AtomicBool>,
}

impl SleepInterrupter {
    pub fn interrupt(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    fn take(&self) -> bool {
        self.flag.swap(false, Ordering::SeqCst)
    }
}

/// Granularity at which a sleeping [`SystemClock`] checks for interrupts.
const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Monotonic clock backed by [`Instant`] and `std::thread::sleep`.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
    interrupter: SleepInterrupter,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            interrupter: SleepInterrupter::default(),
        }
    }

    /// Handle that interrupts this clock's sleeps. Clones share the same flag.
    pub fn interrupter(&self) -> SleepInterrupter {
        self.interrupter.clone()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        let deadline = Instant::now() + duration;
        loop {
            if self.interrupter.take() {
                return Err(Interrupted);
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            std::thread::sleep((deadline - now).min(SLEEP_SLICE));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLEEP: Duration = Duration::from_millis(100);
    const SLACK_MS: u64 = 80;

    #[test]
    fn now_advances() {
        let clock = SystemClock::new();
        let before = clock.now_millis();
        std::thread::sleep(Duration::from_millis(20));
        assert!(clock.now_millis() >= before + 20);
    }

    #[test]
    fn sleeps_for_roughly_the_requested_duration() {
        let clock = SystemClock::new();
        let before = Instant::now();
        clock.sleep(SLEEP).unwrap();
        let elapsed = before.elapsed();
        assert!(elapsed >= SLEEP);
        assert!(elapsed.as_millis() as u64 <= SLEEP.as_millis() as u64 + SLACK_MS);
    }

    #[test]
    fn interrupt_cuts_sleep_short_once() {
        let clock = SystemClock::new();
        let handle = clock.interrupter();
        let t = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(30));
            handle.interrupt();
        });
        let before = Instant::now();
        assert_eq!(clock.sleep(Duration::from_secs(10)), Err(Interrupted));
        assert!(before.elapsed() < Duration::from_secs(2));
        t.join().unwrap();

        // The interrupt was consumed.
        assert_eq!(clock.sleep(Duration::from_millis(1)), Ok(()));
    }

    #[test]
    fn pending_interrupt_fails_zero_sleep() {
        let clock = SystemClock::new();
        clock.interrupter().interrupt();
        assert_eq!(clock.sleep(Duration::ZERO), Err(Interrupted));
    }
}
