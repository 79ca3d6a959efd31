//! Display labels. Every formatter returns `None` instead of failing so a caller can
//! render an empty label.

use chrono::{Duration, NaiveDateTime};

/// `"HH:MM-HH:MM"` covering the hour bucket `diff` hours before `now`.
pub fn hour_range_label(now: NaiveDateTime, diff: i64) -> Option<String> {
    let end = now.checked_sub_signed(Duration::try_hours(diff)?)?;
    let start = end.checked_sub_signed(Duration::try_hours(1)?)?;
    Some(format!("{}-{}", start.format("%H:%M"), end.format("%H:%M")))
}

/// Short weekday name of the hour bucket `diff` hours before `now`.
pub fn weekday_label(now: NaiveDateTime, diff: i64) -> Option<String> {
    let t = now.checked_sub_signed(Duration::try_hours(diff)?)?;
    Some(t.format("%a").to_string())
}

pub fn time_of_day(t: NaiveDateTime) -> String {
    t.format("%H:%M").to_string()
}

/// `"Today"`, `"Yesterday"` or `"N days ago"`, counting whole 24-hour periods.
pub fn relative_day(time: NaiveDateTime, now: NaiveDateTime) -> String {
    match (time - now).num_days() {
        0 => "Today".to_string(),
        -1 => "Yesterday".to_string(),
        diff => format!("{} days ago", -diff),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        // Wednesday
        NaiveDate::from_ymd_opt(2024, 5, 15)
            .unwrap()
            .and_hms_opt(14, 20, 0)
            .unwrap()
    }

    #[test]
    fn hour_range_spans_one_hour_back() {
        assert_eq!(hour_range_label(now(), 0).as_deref(), Some("13:20-14:20"));
        assert_eq!(hour_range_label(now(), 15).as_deref(), Some("22:20-23:20"));
    }

    #[test]
    fn out_of_range_offsets_fall_back_to_none() {
        assert_eq!(hour_range_label(now(), i64::MAX), None);
        assert_eq!(weekday_label(now(), i64::MIN), None);
    }

    #[test]
    fn weekday_follows_offset() {
        assert_eq!(weekday_label(now(), 0).as_deref(), Some("Wed"));
        assert_eq!(weekday_label(now(), 24).as_deref(), Some("Tue"));
    }

    #[test]
    fn relative_day_buckets() {
        let n = now();
        assert_eq!(relative_day(n - Duration::hours(3), n), "Today");
        assert_eq!(relative_day(n - Duration::hours(30), n), "Yesterday");
        assert_eq!(relative_day(n - Duration::days(4), n), "4 days ago");
        assert_eq!(time_of_day(n), "14:20");
    }
}
