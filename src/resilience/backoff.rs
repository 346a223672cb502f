//! Poll delay: exponential growth with jitter.

use rand::Rng;
use std::time::Duration;

/// Delay to wait before poll number `attempt` (0-based).
///
/// The first poll is immediate. Later polls start at `base` and double
/// until `max`, with up to 10% jitter added on top of the capped value.
/// `base == max` gives a fixed interval.
pub fn poll_delay(attempt: u32, base: Duration, max: Duration) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let base_ms = base.as_millis() as u64;
    let max_ms = (max.as_millis() as u64).max(base_ms);

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_poll_is_immediate() {
        let d = poll_delay(0, Duration::from_secs(1), Duration::from_secs(8));
        assert_eq!(d, Duration::ZERO);
    }

    #[test]
    fn test_delay_growth_and_cap() {
        let base = Duration::from_millis(100);
        let max = Duration::from_millis(1000);

        let d1 = poll_delay(1, base, max);
        assert!(d1 >= Duration::from_millis(100) && d1 < Duration::from_millis(110));

        let d2 = poll_delay(2, base, max);
        assert!(d2 >= Duration::from_millis(200) && d2 < Duration::from_millis(220));

        let capped = poll_delay(30, base, max);
        assert!(capped >= max && capped < Duration::from_millis(1100));
    }

    #[test]
    fn test_zero_base_never_sleeps() {
        for attempt in 0..5 {
            assert_eq!(poll_delay(attempt, Duration::ZERO, Duration::ZERO), Duration::ZERO);
        }
    }
}
