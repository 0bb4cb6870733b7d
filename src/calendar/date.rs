use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::successors;
use std::str::FromStr;
use thiserror::Error;
use time::{
    format_description::BorrowedFormatItem, macros::format_description, Date, Duration, Month,
    OffsetDateTime, Weekday,
};

static YMD_FMT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

const DAYS_IN_WEEK: i64 = 7;

/// A calendar day.  Equality and ordering are by day; there is no time of
/// day.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CalendarDate(Date);

impl CalendarDate {
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Result<CalendarDate, InvalidDate> {
        let invalid = || InvalidDate::new(format!("{year:04}-{month:02}-{day:02}"));
        let month = Month::try_from(month).map_err(|_| invalid())?;
        Date::from_calendar_date(year, month, day)
            .map(CalendarDate)
            .map_err(|_| invalid())
    }

    /// Parse a `yyyy-MM-dd` string.  A trailing time of day (`T...` or
    /// `␣...`) is accepted and discarded.
    pub fn parse(s: &str) -> Result<CalendarDate, InvalidDate> {
        let ymd = match s.char_indices().nth(10) {
            Some((i, 'T' | ' ')) => &s[..i],
            _ => s,
        };
        Date::parse(ymd, YMD_FMT)
            .map(CalendarDate)
            .map_err(|_| InvalidDate::new(s))
    }

    /// The UTC calendar day containing the given UNIX timestamp in
    /// milliseconds
    pub fn from_timestamp_millis(millis: i64) -> Result<CalendarDate, InvalidDate> {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
            .map(|dt| CalendarDate(dt.date()))
            .map_err(|_| InvalidDate::new(millis.to_string()))
    }

    pub fn date(&self) -> Date {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> Month {
        self.0.month()
    }

    pub fn day(&self) -> u8 {
        self.0.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    pub fn iso_week(&self) -> u8 {
        self.0.iso_week()
    }

    /// The canonical `yyyy-MM-dd` key under which markings are stored
    pub fn key(&self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.year(),
            u8::from(self.month()),
            self.day()
        )
    }

    pub fn first_of_month(&self) -> CalendarDate {
        // Every month has a first day, so this never falls back
        self.0.replace_day(1).map_or(*self, CalendarDate)
    }

    pub fn add_days(&self, days: i64) -> Result<CalendarDate, OutOfTimeError> {
        self.0
            .checked_add(Duration::days(days))
            .map(CalendarDate)
            .ok_or(OutOfTimeError)
    }

    /// Move by whole months.  The result is always the first of the target
    /// month so that month lengths never push it into the month after.
    pub fn add_months(&self, months: i32) -> Result<CalendarDate, OutOfTimeError> {
        let index = i64::from(self.year()) * 12 + i64::from(u8::from(self.month())) - 1
            + i64::from(months);
        let year = i32::try_from(index.div_euclid(12)).map_err(|_| OutOfTimeError)?;
        let month = u8::try_from(index.rem_euclid(12) + 1).map_err(|_| OutOfTimeError)?;
        let month = Month::try_from(month).map_err(|_| OutOfTimeError)?;
        Date::from_calendar_date(year, month, 1)
            .map(CalendarDate)
            .map_err(|_| OutOfTimeError)
    }

    pub fn last_day_of_month(&self) -> Result<CalendarDate, OutOfTimeError> {
        self.add_months(1)?.add_days(-1)
    }

    /// Number of days from `self` to `other`; negative if `other` is
    /// earlier
    pub fn days_until(&self, other: CalendarDate) -> i64 {
        (other.0 - self.0).whole_days()
    }

    pub fn to_data(&self) -> DateData {
        DateData {
            year: self.year(),
            month: u8::from(self.month()),
            day: self.day(),
            timestamp: self.0.midnight().assume_utc().unix_timestamp() * 1000,
            date_string: self.key(),
        }
    }
}

impl From<Date> for CalendarDate {
    fn from(date: Date) -> CalendarDate {
        CalendarDate(date)
    }
}

impl FromStr for CalendarDate {
    type Err = InvalidDate;

    fn from_str(s: &str) -> Result<CalendarDate, InvalidDate> {
        CalendarDate::parse(s)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Any of the forms in which a date may be supplied to the calendar
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DateLike {
    /// Milliseconds since the UNIX epoch
    Timestamp(i64),
    /// `yyyy-MM-dd`, optionally followed by a time of day
    Text(String),
    /// An object with a `timestamp` field, such as a serialized [`DateData`];
    /// other fields are ignored
    Stamped { timestamp: i64 },
    Parts { year: i32, month: u8, day: u8 },
    /// Anything else: a TOML date, a fractional timestamp, or a value that
    /// will be rejected as an invalid date when resolved
    Other(toml::Value),
}

impl DateLike {
    pub fn resolve(&self) -> Result<CalendarDate, InvalidDate> {
        match self {
            DateLike::Timestamp(ms) | DateLike::Stamped { timestamp: ms } => {
                CalendarDate::from_timestamp_millis(*ms)
            }
            DateLike::Text(s) => CalendarDate::parse(s),
            DateLike::Parts { year, month, day } => CalendarDate::from_ymd(*year, *month, *day),
            DateLike::Other(value) => resolve_other(value),
        }
    }
}

fn resolve_other(value: &toml::Value) -> Result<CalendarDate, InvalidDate> {
    let invalid = || InvalidDate::new(value.to_string());
    match value {
        toml::Value::Float(ms) => Duration::checked_seconds_f64(ms / 1000.0)
            .and_then(|d| OffsetDateTime::UNIX_EPOCH.checked_add(d))
            .map(|dt| CalendarDate(dt.date()))
            .ok_or_else(invalid),
        toml::Value::Datetime(dt) => match dt.date {
            Some(d) => CalendarDate::from_ymd(i32::from(d.year), d.month, d.day),
            None => Err(invalid()),
        },
        _ => Err(invalid()),
    }
}

impl From<CalendarDate> for DateLike {
    fn from(date: CalendarDate) -> DateLike {
        DateLike::Text(date.key())
    }
}

impl From<&str> for DateLike {
    fn from(s: &str) -> DateLike {
        DateLike::Text(s.to_owned())
    }
}

/// Plain-data form of a date as handed to listeners
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateData {
    pub year: i32,
    /// 1-based
    pub month: u8,
    pub day: u8,
    /// Milliseconds since the UNIX epoch at UTC midnight
    pub timestamp: i64,
    pub date_string: String,
}

impl TryFrom<&DateData> for CalendarDate {
    type Error = InvalidDate;

    fn try_from(data: &DateData) -> Result<CalendarDate, InvalidDate> {
        CalendarDate::from_ymd(data.year, data.month, data.day)
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid date: {input:?}")]
pub struct InvalidDate {
    input: String,
}

impl InvalidDate {
    fn new<S: Into<String>>(input: S) -> InvalidDate {
        InvalidDate {
            input: input.into(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub struct OutOfTimeError;

/// All days shown on the page for `month`: the days of the month, padded
/// with days of the adjacent months out to whole weeks starting on
/// `first_day`
pub fn page(month: CalendarDate, first_day: Weekday) -> Result<Vec<CalendarDate>, OutOfTimeError> {
    let first = month.first_of_month();
    let last = month.last_day_of_month()?;
    let lead = (i64::from(first.weekday().number_days_from_sunday()) + DAYS_IN_WEEK
        - i64::from(first_day.number_days_from_sunday()))
        % DAYS_IN_WEEK;
    let last_weekday = first_day.previous();
    let trail = (i64::from(last_weekday.number_days_from_sunday()) + DAYS_IN_WEEK
        - i64::from(last.weekday().number_days_from_sunday()))
        % DAYS_IN_WEEK;
    let start = first.add_days(-lead)?;
    let end = last.add_days(trail)?;
    Ok(iter_days_from(start).take_while(|&d| d <= end).collect())
}

pub fn is_gte(a: CalendarDate, b: CalendarDate) -> bool {
    a >= b
}

pub fn is_lte(a: CalendarDate, b: CalendarDate) -> bool {
    a <= b
}

pub fn same_month(a: CalendarDate, b: CalendarDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

pub fn same_date(a: CalendarDate, b: CalendarDate) -> bool {
    a == b
}

fn iter_days_from(date: CalendarDate) -> impl Iterator<Item = CalendarDate> {
    successors(Some(date.0), |&d| d.next_day()).map(CalendarDate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn cd(d: Date) -> CalendarDate {
        CalendarDate::from(d)
    }

    #[test]
    fn test_page_march_2024() {
        let days = page(cd(date!(2024 - 03 - 15)), Weekday::Sunday).unwrap();
        assert_eq!(days.len(), 42);
        assert_eq!(days.first(), Some(&cd(date!(2024 - 02 - 25))));
        assert_eq!(days.last(), Some(&cd(date!(2024 - 04 - 06))));
    }

    #[test]
    fn test_page_monday_start() {
        let days = page(cd(date!(2024 - 03 - 15)), Weekday::Monday).unwrap();
        assert_eq!(days.first(), Some(&cd(date!(2024 - 02 - 26))));
        assert_eq!(days.last(), Some(&cd(date!(2024 - 03 - 31))));
        assert_eq!(days.len(), 35);
        assert_eq!(days[0].weekday(), Weekday::Monday);
    }

    #[test]
    fn test_page_month_fills_exact_weeks() {
        // February 2015 starts on a Sunday and ends on a Saturday
        let days = page(cd(date!(2015 - 02 - 10)), Weekday::Sunday).unwrap();
        assert_eq!(days.len(), 28);
        assert_eq!(days.first(), Some(&cd(date!(2015 - 02 - 01))));
        assert_eq!(days.last(), Some(&cd(date!(2015 - 02 - 28))));
    }

    #[test]
    fn test_page_contiguous_whole_weeks() {
        for first_day in [Weekday::Sunday, Weekday::Wednesday, Weekday::Saturday] {
            let mut month = cd(date!(2023 - 01 - 01));
            for _ in 0..24 {
                let days = page(month, first_day).unwrap();
                assert_eq!(days.len() % 7, 0, "page for {month} is not whole weeks");
                assert_eq!(days[0].weekday(), first_day);
                for pair in days.windows(2) {
                    assert_eq!(pair[0].days_until(pair[1]), 1);
                }
                month = month.add_months(1).unwrap();
            }
        }
    }

    #[test]
    fn test_add_months_pins_first() {
        let jan31 = cd(date!(2024 - 01 - 31));
        assert_eq!(jan31.add_months(1), Ok(cd(date!(2024 - 02 - 01))));
        assert_eq!(jan31.add_months(-1), Ok(cd(date!(2023 - 12 - 01))));
        assert_eq!(jan31.add_months(-13), Ok(cd(date!(2022 - 12 - 01))));
        assert_eq!(jan31.add_months(23), Ok(cd(date!(2025 - 12 - 01))));
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(
            cd(date!(2024 - 02 - 10)).last_day_of_month(),
            Ok(cd(date!(2024 - 02 - 29)))
        );
        assert_eq!(
            cd(date!(2023 - 12 - 01)).last_day_of_month(),
            Ok(cd(date!(2023 - 12 - 31)))
        );
    }

    #[test]
    fn test_end_of_time() {
        let last = CalendarDate::from(Date::MAX);
        assert_eq!(last.add_days(1), Err(OutOfTimeError));
        assert_eq!(last.add_months(1), Err(OutOfTimeError));
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            CalendarDate::parse("2024-03-15"),
            Ok(cd(date!(2024 - 03 - 15)))
        );
        assert_eq!(
            CalendarDate::parse("2024-03-15T23:59:00Z"),
            Ok(cd(date!(2024 - 03 - 15)))
        );
        let err = CalendarDate::parse("2024-02-30").unwrap_err();
        assert_eq!(err.input(), "2024-02-30");
        assert!(CalendarDate::parse("March 15").is_err());
        assert!(CalendarDate::parse("").is_err());
    }

    #[test]
    fn test_from_ymd_invalid() {
        assert!(CalendarDate::from_ymd(2024, 13, 1).is_err());
        assert!(CalendarDate::from_ymd(2023, 2, 29).is_err());
        assert_eq!(
            CalendarDate::from_ymd(2024, 2, 29),
            Ok(cd(date!(2024 - 02 - 29)))
        );
    }

    #[test]
    fn test_key_and_data() {
        let d = cd(date!(2024 - 01 - 05));
        assert_eq!(d.key(), "2024-01-05");
        let data = d.to_data();
        assert_eq!(data.year, 2024);
        assert_eq!(data.month, 1);
        assert_eq!(data.day, 5);
        assert_eq!(data.timestamp, 1_704_412_800_000);
        assert_eq!(data.date_string, "2024-01-05");
        assert_eq!(CalendarDate::try_from(&data), Ok(d));
    }

    #[test]
    fn test_date_like_forms() {
        let want = Ok(cd(date!(2024 - 01 - 05)));
        let forms: Vec<DateLike> = serde_json::from_str(
            r#"["2024-01-05", 1704412800000, {"timestamp": 1704450000000},
                {"year": 2024, "month": 1, "day": 5},
                {"year": 1999, "month": 1, "day": 1, "timestamp": 1704412800000, "dateString": "x"}]"#,
        )
        .unwrap();
        assert_eq!(forms.len(), 5);
        for form in forms {
            assert_eq!(form.resolve(), want, "{form:?}");
        }
    }

    #[test]
    fn test_date_like_fractional_timestamp() {
        let forms: Vec<DateLike> =
            serde_json::from_str("[1.7044128e12, 1704450000000.5]").unwrap();
        for form in forms {
            assert!(matches!(form, DateLike::Other(_)), "{form:?}");
            assert_eq!(form.resolve(), Ok(cd(date!(2024 - 01 - 05))), "{form:?}");
        }
    }

    #[test]
    fn test_date_like_unrecognized_is_invalid_date() {
        let forms: Vec<DateLike> =
            serde_json::from_str(r#"[true, {"when": "2024-01-05"}, ["x"]]"#).unwrap();
        assert_eq!(forms.len(), 3);
        let errors = forms
            .iter()
            .map(|f| f.resolve().unwrap_err())
            .collect::<Vec<_>>();
        assert_eq!(errors[0].input(), "true");
        assert!(errors[1].input().contains("2024-01-05"));
        assert!(errors[2].input().contains('x'));
        let huge: DateLike = serde_json::from_str("1e300").unwrap();
        assert!(huge.resolve().is_err());
    }

    #[test]
    fn test_date_like_invalid() {
        assert!(DateLike::from("not a date").resolve().is_err());
        let parts = DateLike::Parts {
            year: 2024,
            month: 0,
            day: 1,
        };
        assert!(parts.resolve().is_err());
    }

    #[test]
    fn test_comparisons() {
        let a = cd(date!(2024 - 03 - 01));
        let b = cd(date!(2024 - 03 - 31));
        let c = cd(date!(2024 - 04 - 01));
        assert!(is_gte(b, a));
        assert!(is_gte(a, a));
        assert!(!is_gte(a, b));
        assert!(is_lte(a, b));
        assert!(is_lte(b, b));
        assert!(same_month(a, b));
        assert!(!same_month(b, c));
        assert!(!same_month(a, cd(date!(2023 - 03 - 01))));
        assert!(same_date(a, a));
        assert!(!same_date(a, b));
    }
}
