//! Run clock. Freezes "now" once per seeding run.
//!
//! Order ages (`days_old`), the 730-day lookback window and the email
//! timestamp are all measured against the same instant, so a long run
//! never drifts across midnight halfway through.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunClock {
    now: NaiveDateTime,
}

impl RunClock {
    /// Pin the clock to the local wall time at the moment of the call.
    pub fn system() -> Self {
        Self::fixed(Local::now().naive_local())
    }

    /// Pin the clock to an explicit instant (tests, replays).
    /// Sub-second precision is dropped; stored timestamps are whole seconds.
    pub fn fixed(now: NaiveDateTime) -> Self {
        Self {
            now: now.with_nanosecond(0).unwrap_or(now),
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    /// Whole calendar days between `date` and today.
    pub fn days_since(&self, date: NaiveDate) -> i64 {
        (self.today() - date).num_days()
    }

    /// `now` shifted back by `days` days, keeping the time of day.
    pub fn days_ago(&self, days: i64) -> NaiveDateTime {
        self.now - Duration::days(days)
    }

    /// Compact stamp used inside generated email addresses.
    pub fn email_stamp(&self) -> String {
        self.now.format("%Y%m%d%H%M%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_since_counts_calendar_days() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(0, 5, 0)
            .unwrap();
        let clock = RunClock::fixed(now);
        let yesterday_late = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(clock.days_since(yesterday_late), 1);
        assert_eq!(clock.days_since(clock.today()), 0);
    }

    #[test]
    fn email_stamp_is_fourteen_digits() {
        let clock = RunClock::fixed(
            NaiveDate::from_ymd_opt(2025, 1, 2)
                .unwrap()
                .and_hms_opt(3, 4, 5)
                .unwrap(),
        );
        assert_eq!(clock.email_stamp(), "20250102030405");
    }
}
