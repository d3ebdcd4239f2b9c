use std::time::Duration;

/// Delay before the given 1-based poll attempt.
///
/// Attempts `1..=linear_attempts` wait `base_ms * attempt`. Later attempts double
/// from `base_ms * linear_attempts`, so the schedule grows linearly first and then
/// exponentially. Every delay is capped at `max_ms`.
pub fn poll_delay(attempt: u32, base_ms: u64, max_ms: u64, linear_attempts: u32) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let delay_ms = if attempt <= linear_attempts {
        base_ms.saturating_mul(u64::from(attempt))
    } else {
        let exp_factor = 2u64.saturating_pow(attempt - linear_attempts);
        base_ms
            .saturating_mul(u64::from(linear_attempts.max(1)))
            .saturating_mul(exp_factor)
    };

    Duration::from_millis(delay_ms.min(max_ms))
}
