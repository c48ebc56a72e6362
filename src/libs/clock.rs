//! Wall-clock abstraction.
//!
//! Every timestamp the stores record comes from a [`Clock`], so session
//! arithmetic can be driven deterministically in tests with [`MockClock`].
//!
//! ```rust
//! use chrono::Duration;
//! use fastline::libs::clock::{Clock, MockClock};
//!
//! let clock = MockClock::at_millis(1_700_000_000_000);
//! let start = clock.now();
//! clock.advance(Duration::hours(8));
//! assert_eq!(clock.now() - start, Duration::hours(8));
//! ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::{Arc, Mutex};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Milliseconds since the UNIX epoch.
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A manually driven clock for tests.
///
/// Clones share the same underlying instant, so a test can keep one handle
/// and hand another to the store under test.
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Creates a clock positioned at `millis` since the epoch.
    ///
    /// Out-of-range values fall back to the epoch itself.
    pub fn at_millis(millis: i64) -> Self {
        let start = Utc.timestamp_millis_opt(millis).single().unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        Self::new(start)
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }

    pub fn set(&self, to: DateTime<Utc>) {
        if let Ok(mut now) = self.now.lock() {
            *now = to;
        }
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|now| *now).unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}
