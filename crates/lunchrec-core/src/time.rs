use chrono::{DateTime, Datelike, Duration as ChronoDuration, FixedOffset, NaiveDate, Utc, Weekday};
use std::time::Duration;

/// Asia/Seoul is fixed UTC+9 year-round (no DST), so a fixed offset is
/// sufficient and keeps the dependency set small.
pub fn seoul_offset() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

/// Current calendar date in Asia/Seoul.
pub fn seoul_today() -> NaiveDate {
    seoul_date_at(Utc::now())
}

/// Asia/Seoul calendar date for an arbitrary instant.
pub fn seoul_date_at(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&seoul_offset()).date_naive()
}

/// Saturdays and Sundays are never offered lunch dates.
pub fn is_workday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The dates a generation run covers: `today` plus the next `window_days`
/// calendar days, weekends removed.
pub fn workdays_in_window(today: NaiveDate, window_days: u32) -> Vec<NaiveDate> {
    (0..=i64::from(window_days))
        .map(|offset| today + ChronoDuration::days(offset))
        .filter(|date| is_workday(*date))
        .collect()
}

/// How long until the next Asia/Seoul midnight, for the daily regeneration
/// trigger.
pub fn until_next_seoul_midnight(now: DateTime<Utc>) -> Duration {
    let local = now.with_timezone(&seoul_offset());
    let next_midnight = (local.date_naive() + ChronoDuration::days(1))
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| naive.and_local_timezone(seoul_offset()).single());
    match next_midnight {
        Some(next) => (next - local).to_std().unwrap_or(Duration::ZERO),
        None => Duration::from_secs(24 * 3600),
    }
}
