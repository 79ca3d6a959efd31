use chrono::{Duration, NaiveDateTime};
use std::fmt;
use std::str::FromStr;

/// Rolling lookback used for popularity ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    Day,
    Week,
    Month,
    Year,
}

impl Window {
    pub const ALL: [Window; 4] = [Window::Day, Window::Week, Window::Month, Window::Year];

    pub fn hours(self) -> i64 {
        match self {
            Window::Day => 24,
            Window::Week => 24 * 7,
            Window::Month => 24 * 31,
            Window::Year => 24 * 365,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Window::Day => "day",
            Window::Week => "week",
            Window::Month => "month",
            Window::Year => "year",
        }
    }

    /// `(now - w, now]`
    pub fn current(self, now: NaiveDateTime) -> TimeRange {
        TimeRange::hours_back(now, 0, self.hours())
    }

    /// `(now - 2w, now - w]`, the equal-length range right before [`Window::current`].
    pub fn previous(self, now: NaiveDateTime) -> TimeRange {
        TimeRange::hours_back(now, self.hours(), self.hours() * 2)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Window {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Window::Day),
            "week" => Ok(Window::Week),
            "month" => Ok(Window::Month),
            "year" => Ok(Window::Year),
            other => anyhow::bail!("unknown window {other:?} (expected day|week|month|year)"),
        }
    }
}

/// Half-open time range, exclusive start and inclusive end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeRange {
    pub fn hours_back(now: NaiveDateTime, from_hours: i64, to_hours: i64) -> Self {
        Self {
            start: now - Duration::hours(to_hours),
            end: now - Duration::hours(from_hours),
        }
    }

    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start < t && t <= self.end
    }
}

/// Whole hours between `time` and `now`, truncated. Negative for future times.
pub fn hour_offset(now: NaiveDateTime, time: NaiveDateTime) -> i64 {
    (now - time).num_hours()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn window_lengths() {
        let hours: Vec<i64> = Window::ALL.iter().map(|w| w.hours()).collect();
        assert_eq!(hours, vec![24, 168, 744, 8760]);
    }

    #[test]
    fn previous_range_abuts_current_without_overlap() {
        let now = at(20, 12);
        let cur = Window::Day.current(now);
        let prev = Window::Day.previous(now);
        assert_eq!(prev.end, cur.start);

        let boundary = cur.start;
        assert!(!cur.contains(boundary));
        assert!(prev.contains(boundary));
        assert!(cur.contains(now));
        assert!(!prev.contains(at(18, 12)));
    }

    #[test]
    fn parses_window_names() {
        assert_eq!("Week".parse::<Window>().unwrap(), Window::Week);
        assert!("fortnight".parse::<Window>().is_err());
    }

    #[test]
    fn hour_offset_truncates() {
        let now = at(20, 12);
        assert_eq!(hour_offset(now, at(20, 12)), 0);
        assert_eq!(hour_offset(now, now - Duration::minutes(59)), 0);
        assert_eq!(hour_offset(now, now - Duration::minutes(61)), 1);
        assert_eq!(hour_offset(now, at(19, 12)), 24);
    }
}
