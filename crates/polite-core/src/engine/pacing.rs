//! Inter-request spacing.

use std::time::Duration;

/// How long to wait before the next render trigger.
///
/// The target interval since `last_request_ms` is
/// `min_wait + |gaussian * std_dev|`; the wait is whatever remains of it,
/// but never less than `min_wait`. Jitter only ever adds delay.
pub(crate) fn inter_request_delay(
    min_wait: Duration,
    std_dev: Duration,
    last_request_ms: u64,
    now_ms: u64,
    gaussian: f64,
) -> Duration {
    let floor_ms = min_wait.as_millis() as f64;
    let jitter_ms = (gaussian * std_dev.as_millis() as f64).abs();
    let remaining_ms = last_request_ms as f64 + floor_ms + jitter_ms - now_ms as f64;
    let delay_ms = remaining_ms.max(floor_ms);
    if delay_ms <= 0.0 {
        Duration::ZERO
    } else {
        Duration::from_millis(delay_ms as u64)
    }
}
