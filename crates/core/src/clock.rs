//! Time source for server-side timestamps.
//!
//! Repositories stamp `createdAt`/`updatedAt` themselves instead of trusting
//! callers; injecting the clock keeps those stamps deterministic in tests.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Source of "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and replays.
///
/// Every call to `now()` returns the current instant and then advances it by
/// `step`, so consecutive stamps are strictly increasing unless `step` is zero.
#[derive(Debug)]
pub struct ManualClock {
    state: Mutex<(DateTime<Utc>, Duration)>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self::stepping(start, Duration::seconds(1))
    }

    pub fn stepping(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            state: Mutex::new((start, step)),
        }
    }

    /// Jump the clock to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        if let Ok(mut state) = self.state.lock() {
            state.0 = instant;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        match self.state.lock() {
            Ok(mut state) => {
                let current = state.0;
                state.0 = current + state.1;
                current
            }
            // A poisoned clock still has to answer; fall back to wall time.
            Err(_) => Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_steps_forward() {
        let start = Utc.with_ymd_and_hms(2025, 10, 13, 8, 0, 0).unwrap();
        let clock = ManualClock::new(start);

        let a = clock.now();
        let b = clock.now();
        assert_eq!(a, start);
        assert!(b > a);
    }

    #[test]
    fn set_moves_the_clock() {
        let clock = ManualClock::stepping(Utc::now(), Duration::zero());
        let target = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        clock.set(target);
        assert_eq!(clock.now(), target);
        assert_eq!(clock.now(), target);
    }
}
