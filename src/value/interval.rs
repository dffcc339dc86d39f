//! Temporal intervals used by TIME arithmetic.

use chrono::{Duration, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar/clock interval such as `1 YEARS 2 MONTHS 3 HOURS`.
///
/// Components are kept separately rather than normalized, so that
/// `1 MONTHS` and `30 DAYS` remain distinct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalInterval {
    pub years: i32,
    pub months: i32,
    pub days: i32,
    pub hours: i32,
    pub minutes: i32,
    pub seconds: i32,
}

impl TemporalInterval {
    pub fn new(years: i32, months: i32, days: i32, hours: i32, minutes: i32, seconds: i32) -> Self {
        Self {
            years,
            months,
            days,
            hours,
            minutes,
            seconds,
        }
    }

    /// Interval consisting only of clock components.
    pub fn clock(hours: i32, minutes: i32, seconds: i32) -> Self {
        Self::new(0, 0, 0, hours, minutes, seconds)
    }

    /// Component-wise sum of two intervals, `None` on overflow
    pub fn checked_add(&self, other: &TemporalInterval) -> Option<TemporalInterval> {
        Some(TemporalInterval {
            years: self.years.checked_add(other.years)?,
            months: self.months.checked_add(other.months)?,
            days: self.days.checked_add(other.days)?,
            hours: self.hours.checked_add(other.hours)?,
            minutes: self.minutes.checked_add(other.minutes)?,
            seconds: self.seconds.checked_add(other.seconds)?,
        })
    }

    /// Component-wise difference of two intervals, `None` on overflow
    pub fn checked_sub(&self, other: &TemporalInterval) -> Option<TemporalInterval> {
        Some(TemporalInterval {
            years: self.years.checked_sub(other.years)?,
            months: self.months.checked_sub(other.months)?,
            days: self.days.checked_sub(other.days)?,
            hours: self.hours.checked_sub(other.hours)?,
            minutes: self.minutes.checked_sub(other.minutes)?,
            seconds: self.seconds.checked_sub(other.seconds)?,
        })
    }

    pub fn checked_neg(&self) -> Option<TemporalInterval> {
        TemporalInterval::default().checked_sub(self)
    }

    /// Total length of the clock components in seconds.
    pub fn clock_seconds(&self) -> i64 {
        i64::from(self.hours) * 3600 + i64::from(self.minutes) * 60 + i64::from(self.seconds)
    }

    /// Shift a time of day by the clock components, wrapping around midnight.
    /// Calendar components have no meaning for a bare time and are ignored.
    pub fn add_to_time(&self, time: NaiveTime) -> NaiveTime {
        time.overflowing_add_signed(Duration::seconds(self.clock_seconds()))
            .0
    }

    pub fn subtract_from_time(&self, time: NaiveTime) -> NaiveTime {
        time.overflowing_sub_signed(Duration::seconds(self.clock_seconds()))
            .0
    }

    /// Ordering key used for comparisons: calendar part in months, clock part in seconds.
    pub(crate) fn sort_key(&self) -> (i64, i64, i64) {
        (
            i64::from(self.years) * 12 + i64::from(self.months),
            i64::from(self.days),
            self.clock_seconds(),
        )
    }
}

impl fmt::Display for TemporalInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            (self.years, "YEARS"),
            (self.months, "MONTHS"),
            (self.days, "DAYS"),
            (self.hours, "HOURS"),
            (self.minutes, "MINUTES"),
            (self.seconds, "SECONDS"),
        ];
        let mut first = true;
        for (amount, unit) in parts.iter().filter(|(amount, _)| *amount != 0) {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{} {}", amount, unit)?;
            first = false;
        }
        if first {
            write!(f, "0 SECONDS")?;
        }
        Ok(())
    }
}

/// Seconds since midnight, used when ordering times.
pub(crate) fn seconds_of_day(time: &NaiveTime) -> u32 {
    time.num_seconds_from_midnight()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_arithmetic() {
        let a = TemporalInterval::new(1, 2, 3, 4, 5, 6);
        let b = TemporalInterval::clock(1, 1, 1);
        assert_eq!(a.checked_add(&b), Some(TemporalInterval::new(1, 2, 3, 5, 6, 7)));
        assert_eq!(a.checked_sub(&b), Some(TemporalInterval::new(1, 2, 3, 3, 4, 5)));
        assert_eq!(b.checked_neg(), Some(TemporalInterval::clock(-1, -1, -1)));
    }

    #[test]
    fn test_interval_overflow() {
        let max = TemporalInterval::clock(i32::MAX, 0, 0);
        let min = TemporalInterval::new(i32::MIN, 0, 0, 0, 0, 0);
        assert_eq!(max.checked_add(&TemporalInterval::clock(1, 0, 0)), None);
        assert_eq!(min.checked_sub(&TemporalInterval::new(1, 0, 0, 0, 0, 0)), None);
        assert_eq!(min.checked_neg(), None);
    }

    #[test]
    fn test_interval_applied_to_time() {
        let time = NaiveTime::from_hms_opt(23, 30, 0).unwrap();
        let interval = TemporalInterval::clock(1, 0, 0);
        assert_eq!(
            interval.add_to_time(time),
            NaiveTime::from_hms_opt(0, 30, 0).unwrap()
        );
        assert_eq!(
            interval.subtract_from_time(time),
            NaiveTime::from_hms_opt(22, 30, 0).unwrap()
        );

        // Calendar components do not move a time of day
        let calendar = TemporalInterval::new(1, 0, 2, 0, 0, 0);
        assert_eq!(calendar.add_to_time(time), time);
    }

    #[test]
    fn test_interval_display() {
        assert_eq!(
            TemporalInterval::new(1, 0, 0, 2, 32, 1).to_string(),
            "1 YEARS 2 HOURS 32 MINUTES 1 SECONDS"
        );
        assert_eq!(TemporalInterval::default().to_string(), "0 SECONDS");
    }
}
