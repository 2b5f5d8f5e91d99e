//! Current-streak calculation.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::{effective_target, window_for, Frequency};

/// Count consecutive qualifying periods ending at (or including) `today`.
///
/// Daily habits walk back from `today` one calendar day at a time; a run that
/// ended yesterday is still alive. Weekly, monthly and yearly habits walk back
/// period by period, each period needing at least `frequency_target` distinct
/// completion dates. The walk starts at the current period, so a current
/// period still short of the target yields zero.
///
/// Dates after `today` are ignored and duplicates count once.
pub fn current_streak<'a, I>(
    completed_dates: I,
    frequency: Frequency,
    frequency_target: i32,
    today: NaiveDate,
) -> u32
where
    I: IntoIterator<Item = &'a NaiveDate>,
{
    let dates: BTreeSet<NaiveDate> = completed_dates
        .into_iter()
        .copied()
        .filter(|date| *date <= today)
        .collect();

    if dates.is_empty() {
        return 0;
    }

    match frequency {
        Frequency::Daily => daily_streak(&dates, today),
        _ => periodic_streak(&dates, frequency, effective_target(frequency, frequency_target), today),
    }
}

fn daily_streak(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut cursor = today;

    for &date in dates.iter().rev() {
        if (cursor - date).num_days() > 1 {
            break;
        }
        streak += 1;
        cursor = date;
    }

    streak
}

fn periodic_streak(
    dates: &BTreeSet<NaiveDate>,
    frequency: Frequency,
    target: usize,
    today: NaiveDate,
) -> u32 {
    let mut streak = 0;
    let mut offset = 0;
    loop {
        let window = window_for(frequency, today, offset);
        if dates.range(window.start..=window.end).count() < target {
            break;
        }
        streak += 1;
        // Windows saturate at the earliest representable date.
        if window.start == NaiveDate::MIN {
            break;
        }
        offset -= 1;
    }

    streak
}
