//! The simulation clock capability consumed by the cost estimator.
//!
//! Customer models run against simulated time, so the estimator takes its notion of "now" from a
//! [`Clock`] supplied at construction rather than from the wall clock or a process-wide registry.
use chrono::{DateTime, Timelike, Utc};
use std::cell::Cell;
use std::rc::Rc;

/// Provides the current simulation time.
pub trait Clock {
    /// The current simulation time
    fn now(&self) -> DateTime<Utc>;

    /// The hour of day (0..=23) of the current simulation time
    fn hour_of_day(&self) -> u32 {
        self.now().hour()
    }
}

/// A clock holding an explicitly set simulation time.
///
/// The time only changes when the owning simulation calls [`FixedClock::set`] or
/// [`FixedClock::advance`]. Interior mutability keeps the clock shareable within a single-threaded
/// simulation via [`Rc`].
#[derive(Debug, Clone)]
pub struct FixedClock {
    current: Cell<DateTime<Utc>>,
}

impl FixedClock {
    /// Create a clock reading the given time
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Cell::new(start),
        }
    }

    /// Move the clock to the given time
    pub fn set(&self, time: DateTime<Utc>) {
        self.current.set(time);
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: chrono::Duration) {
        self.current.set(self.current.get() + duration);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.current.get()
    }
}

impl<C: Clock> Clock for Rc<C> {
    fn now(&self) -> DateTime<Utc> {
        self.as_ref().now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_set_and_advance() {
        let start = Utc.with_ymd_and_hms(2030, 6, 1, 10, 30, 0).unwrap();
        let clock = FixedClock::new(start);
        assert_eq!(clock.now(), start);
        assert_eq!(clock.hour_of_day(), 10);

        clock.advance(chrono::Duration::hours(14));
        assert_eq!(clock.hour_of_day(), 0);

        let later = Utc.with_ymd_and_hms(2030, 6, 3, 23, 0, 0).unwrap();
        clock.set(later);
        assert_eq!(clock.now(), later);
        assert_eq!(clock.hour_of_day(), 23);
    }

    #[test]
    fn test_shared_clock_through_rc() {
        let clock = Rc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
        ));
        let shared = Rc::clone(&clock);
        clock.advance(chrono::Duration::hours(5));
        assert_eq!(shared.hour_of_day(), 5);
    }
}
