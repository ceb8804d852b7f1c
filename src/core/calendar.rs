use chrono::{Datelike, Months, NaiveDate, Weekday};

fn is_working_day(date: NaiveDate, holidays: &[NaiveDate]) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !holidays.contains(&date)
}

/// Counts Monday-Friday days in `start..=end`, skipping listed holidays.
pub fn working_days_between(start: NaiveDate, end: NaiveDate, holidays: &[NaiveDate]) -> i64 {
    if end < start {
        return 0;
    }
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| is_working_day(*day, holidays))
        .count() as i64
}

/// Working days of a leave that fall inside the scoring period.
pub fn overlap_working_days(
    leave_start: NaiveDate,
    leave_end: NaiveDate,
    period_start: NaiveDate,
    period_end: NaiveDate,
    holidays: &[NaiveDate],
) -> f64 {
    let start = leave_start.max(period_start);
    let end = leave_end.min(period_end);
    working_days_between(start, end, holidays) as f64
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    // 每月第一天一定存在
    date.with_day(1).unwrap_or(date)
}

/// First days of the `count` calendar months ending with the month of `as_of`, oldest first.
pub fn trailing_month_starts(as_of: NaiveDate, count: u32) -> Vec<NaiveDate> {
    let current = month_start(as_of);
    (0..count)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .collect()
}
