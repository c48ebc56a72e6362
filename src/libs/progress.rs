//! Percent-complete of a fast.

use chrono::Duration;

/// Returns how far `elapsed` has progressed through `total`, in `[0, 100]`.
///
/// A zero (or negative) total yields 0. Elapsed time beyond the total is
/// normal, the user simply kept fasting past the target, and clamps to 100.
pub fn progress(elapsed: Duration, total: Duration) -> f64 {
    let total_ms = total.num_milliseconds();
    if total_ms <= 0 {
        return 0.0;
    }
    let percent = elapsed.num_milliseconds() as f64 / total_ms as f64 * 100.0;
    percent.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_total_is_zero() {
        assert_eq!(progress(Duration::hours(5), Duration::zero()), 0.0);
        assert_eq!(progress(Duration::zero(), Duration::zero()), 0.0);
    }

    #[test]
    fn halfway_and_overrun() {
        let total = Duration::hours(16);
        assert_eq!(progress(Duration::hours(8), total), 50.0);
        assert_eq!(progress(Duration::hours(20), total), 100.0);
        assert_eq!(progress(Duration::minutes(-5), total), 0.0);
    }

    #[test]
    fn monotonic_in_elapsed() {
        let total = Duration::hours(18);
        let mut previous = 0.0;
        for minutes in (0..=24 * 60).step_by(7) {
            let value = progress(Duration::minutes(minutes), total);
            assert!(value >= previous);
            assert!((0.0..=100.0).contains(&value));
            previous = value;
        }
    }
}
