use chrono::{Datelike, Duration, NaiveDate};
use tracing::{debug, warn};

use crate::domain::{dates::days_in_month, RecurrenceRule, RecurringItem};

/// Where a stepped rule starts when its start date lies in an earlier year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YearJump {
    /// Restart on January 1, whatever weekday that is.
    FirstOfYear,
    /// Restart on the first day of the year sharing the start date's weekday.
    SameWeekday,
}

/// `true` when `date` falls strictly after `end`. No end means never beyond.
pub fn is_beyond_end_date(date: NaiveDate, end: Option<NaiveDate>) -> bool {
    end.map_or(false, |end| date > end)
}

/// Ascending dates on which a rule fires inside `year`, none later than `end`.
pub fn expand(
    year: i32,
    start: NaiveDate,
    end: Option<NaiveDate>,
    rule: RecurrenceRule,
) -> Vec<NaiveDate> {
    match rule {
        RecurrenceRule::Daily => stepped(year, start, end, 1, YearJump::FirstOfYear),
        RecurrenceRule::Weekly => stepped(year, start, end, 7, YearJump::FirstOfYear),
        RecurrenceRule::BiWeekly => stepped(year, start, end, 14, YearJump::SameWeekday),
        RecurrenceRule::Monthly => monthly(year, start, end),
        RecurrenceRule::SemiMonthly => semi_monthly(year, start, end),
        RecurrenceRule::OnceOnly => once_only(year, start, end),
    }
}

/// Expands a stored item. Returns `None` when the start date cannot be parsed;
/// an unknown rule code yields an empty schedule.
pub fn expand_item(item: &RecurringItem, year: i32) -> Option<Vec<NaiveDate>> {
    let Some(start) = item.start() else {
        warn!(
            item = %item.id,
            name = %item.name,
            start_date = %item.start_date,
            "skipping item with unparsable start date"
        );
        return None;
    };
    let Some(rule) = item.rule() else {
        debug!(item = %item.id, code = item.rule_code, kind = %item.kind, "unknown rule code");
        return Some(Vec::new());
    };
    Some(expand(year, start, item.end_bound(), rule))
}

fn stepped(
    year: i32,
    start: NaiveDate,
    end: Option<NaiveDate>,
    step_days: i64,
    jump: YearJump,
) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let Some(mut cursor) = anchor(year, start, jump) else {
        return dates;
    };
    let step = Duration::days(step_days);

    while cursor.year() == year {
        if is_beyond_end_date(cursor, end) {
            break;
        }
        dates.push(cursor);
        match cursor.checked_add_signed(step) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    dates
}

// A start in a later year is returned unchanged; the caller's year check then
// yields nothing.
fn anchor(year: i32, start: NaiveDate, jump: YearJump) -> Option<NaiveDate> {
    if start.year() >= year {
        return Some(start);
    }
    let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
    match jump {
        YearJump::FirstOfYear => Some(first),
        YearJump::SameWeekday => {
            let wanted = start.weekday().num_days_from_monday() as i64;
            let actual = first.weekday().num_days_from_monday() as i64;
            first.checked_add_signed(Duration::days((wanted - actual).rem_euclid(7)))
        }
    }
}

fn monthly(year: i32, start: NaiveDate, end: Option<NaiveDate>) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(12);
    for month in 1..=12 {
        let day = start.day().min(days_in_month(year, month));
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            break;
        };
        if is_beyond_end_date(date, end) {
            break;
        }
        dates.push(date);
    }
    dates
}

fn semi_monthly(year: i32, start: NaiveDate, end: Option<NaiveDate>) -> Vec<NaiveDate> {
    let anchor_day = start.day();
    // Starting on the 1st pairs with the 15th; any other day pairs with day + 15.
    let offset = if anchor_day == 1 { 14 } else { 15 };
    let mut dates = Vec::with_capacity(24);

    for month in 1..=12 {
        let len = days_in_month(year, month);
        let first_day = anchor_day.min(len);
        let second_day = (anchor_day + offset).min(len);

        let mut days = vec![first_day];
        if second_day != first_day {
            days.push(second_day);
        }
        for day in days {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                if !is_beyond_end_date(date, end) {
                    dates.push(date);
                }
            }
        }
    }

    dates.sort();
    dates
}

fn once_only(year: i32, start: NaiveDate, end: Option<NaiveDate>) -> Vec<NaiveDate> {
    if start.year() == year && !is_beyond_end_date(start, end) {
        vec![start]
    } else {
        Vec::new()
    }
}
