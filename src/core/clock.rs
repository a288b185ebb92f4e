//! Time source for the engine.
//!
//! Every start/stop/audit stamp goes through a [`Clock`] so duration
//! arithmetic is testable with a controlled time source.

use chrono::{DateTime, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant, settable from tests.
#[derive(Debug)]
pub struct FixedClock {
    now: std::cell::Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: std::cell::Cell::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance_secs(&self, secs: i64) {
        self.now.set(self.now.get() + chrono::Duration::seconds(secs));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Elapsed whole seconds between two instants, floored to zero so clock
/// skew can never produce a negative duration.
pub fn elapsed_secs(start: &DateTime<Utc>, end: &DateTime<Utc>) -> i64 {
    (*end - *start).num_seconds().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn elapsed_floors_negative_to_zero() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let skewed = t0 - chrono::Duration::seconds(30);
        assert_eq!(elapsed_secs(&t0, &skewed), 0);
    }

    #[test]
    fn elapsed_whole_seconds() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let t1 = t0 + chrono::Duration::milliseconds(5_413_900);
        assert_eq!(elapsed_secs(&t0, &t1), 5413);
    }
}
