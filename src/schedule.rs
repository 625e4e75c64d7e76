//! Business-day arithmetic for sprint schedules.
//!
//! A sprint advances one day per weekday; weekends never count. All
//! derived values come from the signed business-day distance between
//! the schedule's start date and "today", so callers control the clock.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// True for Saturday and Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Signed count of business days between two dates.
///
/// Counts the weekdays in `[start, end)` when `end` is on or after
/// `start`, and minus the weekdays in `(end, start]` otherwise. The
/// start day itself is counted (when it falls on a weekday); the end
/// day never is. Same-day input yields 0. Note the two directions are
/// not mirror images when an endpoint lands on a weekend.
pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let calendar_days = (end - start).num_days();
    let sign: i64 = if calendar_days < 0 { -1 } else { 1 };

    // Whole weeks contribute five business days apiece regardless of
    // alignment; only the remainder (at most six days) needs walking.
    let weeks = calendar_days / 7;
    let mut count = weeks * 5;
    let mut cursor = start + Duration::days(weeks * 7);
    while cursor != end {
        if !is_weekend(cursor) {
            count += sign;
        }
        cursor += Duration::days(sign);
    }
    count
}

/// Sprint schedule parameters, each independently optional.
///
/// Derivations return `None` when the fields they need are unset, so a
/// half-configured schedule degrades instead of erroring. A cadence of
/// zero is treated as unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SprintSchedule {
    /// First day of the first sprint.
    pub start_date: Option<NaiveDate>,
    /// Number carried by the sprint that begins on `start_date`.
    pub start_sprint: Option<u32>,
    /// Business days per sprint.
    pub cadence: Option<u32>,
}

impl SprintSchedule {
    /// Business days elapsed since the start date; negative when the
    /// start date is still in the future.
    pub fn days_since_start(&self, today: NaiveDate) -> Option<i64> {
        let start = self.start_date?;
        Some(business_days_between(start, today))
    }

    /// Position of `today` within its sprint, in `1..=cadence`.
    ///
    /// The day number wraps with Euclidean remainder, so dates before
    /// the start date land on real late-sprint days (three business
    /// days early in a ten-day cadence is day 8) rather than on a
    /// nonsensical day 0 or below.
    pub fn active_day_number(&self, today: NaiveDate) -> Option<u32> {
        let cadence = self.cadence.filter(|&c| c > 0)?;
        let days = self.days_since_start(today)?;
        Some((days.rem_euclid(i64::from(cadence)) + 1) as u32)
    }

    /// Sprint number containing `today`.
    ///
    /// Floored division keeps this consistent with the day number:
    /// dates before the start date fall into earlier sprints, which go
    /// negative once `start_sprint` runs out.
    pub fn current_sprint_number(&self, today: NaiveDate) -> Option<i64> {
        let cadence = self.cadence.filter(|&c| c > 0)?;
        let start_sprint = self.start_sprint?;
        let days = self.days_since_start(today)?;
        Some(days.div_euclid(i64::from(cadence)) + i64::from(start_sprint))
    }
}
