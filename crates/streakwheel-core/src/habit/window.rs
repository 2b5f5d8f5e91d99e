//! Calendar windows for each recurrence frequency.
//!
//! Weeks start on Monday. Stepping between periods follows the calendar
//! (the month before March 31st is February, not "31 days earlier").

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::Frequency;

/// Inclusive calendar-date bounds of one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Window of the period `offset_periods` away from the one containing
/// `reference`. Zero is the current period, negative values walk backwards.
pub fn window_for(frequency: Frequency, reference: NaiveDate, offset_periods: i32) -> DateWindow {
    match frequency {
        Frequency::Daily => {
            let day = shift_days(reference, i64::from(offset_periods));
            DateWindow { start: day, end: day }
        }
        Frequency::Weekly => {
            let monday = shift_days(
                reference,
                -i64::from(reference.weekday().num_days_from_monday()),
            );
            let start = shift_days(monday, 7 * i64::from(offset_periods));
            DateWindow {
                start,
                end: shift_days(start, 6),
            }
        }
        Frequency::Monthly => {
            let first = NaiveDate::from_ymd_opt(reference.year(), reference.month(), 1)
                .unwrap_or(reference);
            let start = shift_months(first, offset_periods);
            let end = shift_days(shift_months(start, 1), -1);
            DateWindow { start, end }
        }
        Frequency::Yearly => {
            let year = reference.year().saturating_add(offset_periods);
            let bound = if year < reference.year() { NaiveDate::MIN } else { NaiveDate::MAX };
            DateWindow {
                start: NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(bound),
                end: NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(bound),
            }
        }
    }
}

fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let step = Months::new(months.unsigned_abs());
    if months < 0 {
        date.checked_sub_months(step).unwrap_or(NaiveDate::MIN)
    } else {
        date.checked_add_months(step).unwrap_or(NaiveDate::MAX)
    }
}
