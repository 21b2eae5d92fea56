// src/timing.rs
use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;

use crate::error::{Error, Result};

/// 버전 업데이트 시점에 시작하는 배너의 시작 시각 표기
pub const VERSION_RELEASE: &str = "版本更新时间";

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// 2025年3月6日10:00
static RE_CN_DATETIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]{4})年([0-9]{1,2})月([0-9]{1,2})日([0-9]{1,2}):([0-9]{1,2})").unwrap()
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartTime {
    At(NaiveDateTime),
    /// Starts with the next version release; exact time unannounced.
    VersionRelease,
}

impl fmt::Display for StartTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartTime::At(t) => write!(f, "{}", t.format(TIMESTAMP_FORMAT)),
            StartTime::VersionRelease => f.write_str(VERSION_RELEASE),
        }
    }
}

/// Active window of a banner. `end` is always a literal, inclusive to the second.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: StartTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn start_string(&self) -> String {
        self.start.to_string()
    }

    pub fn end_string(&self) -> String {
        format_timestamp(&self.end)
    }
}

pub fn format_timestamp(t: &NaiveDateTime) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok()
}

/// 자유 텍스트에서 기간 추출
///
/// - 2개 이상: 첫 번째 = 시작(:00), 두 번째 = 종료(:59)
/// - 1개: 시작 = 버전 업데이트, 종료 = 그 시각(:59)
/// - 0개: `NoTimeFound`
pub fn extract_window(text: &str) -> Result<TimeWindow> {
    let mut found = RE_CN_DATETIME.captures_iter(text);
    let first = found.next().ok_or_else(|| Error::NoTimeFound(text.to_string()))?;

    match found.next() {
        Some(second) => {
            let start = to_datetime(&first, 0)?;
            let end = to_datetime(&second, 59)?;
            if start > end {
                return Err(Error::InvertedWindow {
                    start: format_timestamp(&start),
                    end: format_timestamp(&end),
                });
            }
            Ok(TimeWindow { start: StartTime::At(start), end })
        }
        None => Ok(TimeWindow {
            start: StartTime::VersionRelease,
            end: to_datetime(&first, 59)?,
        }),
    }
}

fn to_datetime(caps: &Captures<'_>, second: u32) -> Result<NaiveDateTime> {
    let raw = &caps[0];
    let num = |i: usize| caps[i].parse::<u32>().ok();
    let (Some(year), Some(month), Some(day), Some(hour), Some(minute)) =
        (caps[1].parse::<i32>().ok(), num(2), num(3), num(4), num(5))
    else {
        return Err(Error::InvalidTimestamp(raw.to_string()));
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .ok_or_else(|| Error::InvalidTimestamp(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_mentions_give_start_and_end() {
        let w = extract_window("2025年3月6日10:00 ~ 2025年3月26日11:59（服务器时间）").unwrap();
        assert_eq!(w.start_string(), "2025-03-06 10:00:00");
        assert_eq!(w.end_string(), "2025-03-26 11:59:59");
    }

    #[test]
    fn single_mention_starts_at_version_release() {
        let w = extract_window("1.4版本更新后 ~ 2024年12月12日09:59（服务器时间）").unwrap();
        assert_eq!(w.start, StartTime::VersionRelease);
        assert_eq!(w.start_string(), VERSION_RELEASE);
        assert_eq!(w.end_string(), "2024-12-12 09:59:59");
    }

    #[test]
    fn extra_mentions_are_ignored() {
        let w = extract_window(
            "2024年6月6日10:00 ~ 2024年6月26日11:59，补领截止2024年7月1日4:00",
        )
        .unwrap();
        assert_eq!(w.start_string(), "2024-06-06 10:00:00");
        assert_eq!(w.end_string(), "2024-06-26 11:59:59");
    }

    #[test]
    fn pads_single_digit_fields() {
        let w = extract_window("2024年1月2日3:4 ~ 2024年1月9日5:6").unwrap();
        assert_eq!(w.start_string(), "2024-01-02 03:04:00");
        assert_eq!(w.end_string(), "2024-01-09 05:06:59");
    }

    #[test]
    fn no_mention_is_an_error_carrying_the_text() {
        match extract_window("活动时间另行公告") {
            Err(Error::NoTimeFound(text)) => assert_eq!(text, "活动时间另行公告"),
            other => panic!("expected NoTimeFound, got {other:?}"),
        }
    }

    #[test]
    fn calendar_invalid_dates_are_rejected() {
        let err = extract_window("2025年2月30日10:00 ~ 2025年3月26日11:59").unwrap_err();
        assert!(matches!(err, Error::InvalidTimestamp(s) if s == "2025年2月30日10:00"));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let err = extract_window("2025年3月26日10:00 ~ 2025年3月6日11:59").unwrap_err();
        assert!(matches!(err, Error::InvertedWindow { .. }));
    }

    #[test]
    fn timestamp_round_trips_through_wire_format() {
        let t = parse_timestamp("2024-06-13 09:59:59").unwrap();
        assert_eq!(format_timestamp(&t), "2024-06-13 09:59:59");
        assert!(parse_timestamp(VERSION_RELEASE).is_none());
    }
}
