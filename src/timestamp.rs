//! ISO-8601 timestamps carried by the `Time` annotation.
//!
//! Text form accepted on decode:
//!
//! ```text
//! YYYY-MM-DD[<sep>HH:MM[:SS[.ffffff]]][Z|(+|-)HH:MM]
//! ```
//!
//! where `<sep>` is any single character (normally `T` or a space). Years
//! run from 1 to 9999 and offsets are whole minutes; anything else has no
//! text form and is rejected on both decode and encode. Timestamps are kept
//! at microsecond precision; a timestamp without an offset is treated as
//! local ("naive") time.

use std::fmt;
use std::str::FromStr;

use chrono::format::{self, Parsed, StrftimeItems};
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Timelike, Utc,
};

use crate::error::{Error, Result};

/// Earliest year with a text form.
pub const MIN_YEAR: i32 = 1;

/// Latest year with a text form.
pub const MAX_YEAR: i32 = 9999;

const DATE_FORMAT: &str = "%Y-%m-%d";
const FULL_TIME_FORMAT: &str = "%H:%M:%S%.f";
const SHORT_TIME_FORMAT: &str = "%H:%M";
const OFFSET_FORMAT: &str = "%:z";
const UTC_SUFFIX: &str = "Z";

/// A date and time with an optional UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    datetime: NaiveDateTime,
    offset: Option<FixedOffset>,
}

impl Timestamp {
    /// Creates a timestamp without a UTC offset.
    pub fn naive(datetime: NaiveDateTime) -> Self {
        Self {
            datetime: truncate_to_micros(datetime),
            offset: None,
        }
    }

    /// Creates a timestamp from local time and its UTC offset.
    pub fn with_offset(datetime: NaiveDateTime, offset: FixedOffset) -> Self {
        Self {
            datetime: truncate_to_micros(datetime),
            offset: Some(offset),
        }
    }

    /// Returns the local date and time.
    pub fn datetime(&self) -> NaiveDateTime {
        self.datetime
    }

    /// Returns the UTC offset, if any.
    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    /// Converts to an offset-aware datetime when an offset is present.
    pub fn to_fixed_offset(&self) -> Option<DateTime<FixedOffset>> {
        let offset = self.offset?;
        self.datetime.and_local_timezone(offset).single()
    }

    /// Checks that the timestamp has a text form: a year within
    /// `MIN_YEAR..=MAX_YEAR` and a whole-minute offset.
    pub fn check_representable(&self) -> Result<()> {
        let year_ok = (MIN_YEAR..=MAX_YEAR).contains(&self.datetime.year());
        let offset_ok = self
            .offset
            .map_or(true, |offset| offset.local_minus_utc() % 60 == 0);
        if year_ok && offset_ok {
            Ok(())
        } else {
            Err(Error::TimeOutOfRange(self.to_string()))
        }
    }

    /// Parses the ISO-8601 text form.
    pub fn parse(text: &str) -> Result<Self> {
        let (date, rest) = NaiveDate::parse_and_remainder(text, DATE_FORMAT)?;

        let mut chars = rest.chars();
        let timestamp = match chars.next() {
            None => Self::naive(date.and_time(NaiveTime::MIN)),
            Some(_separator) => {
                let (time, rest) = parse_time(chars.as_str())?;
                let datetime = date.and_time(time);
                match rest {
                    "" => Self::naive(datetime),
                    UTC_SUFFIX => Self::with_offset(datetime, Utc.fix()),
                    offset => Self::with_offset(datetime, parse_offset(offset)?),
                }
            }
        };

        timestamp.check_representable()?;
        Ok(timestamp)
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.datetime.format("%Y-%m-%dT%H:%M:%S"))?;

        let micros = self.datetime.nanosecond() / 1_000;
        if micros != 0 {
            write!(f, ".{:06}", micros)?;
        }

        if let Some(offset) = self.offset {
            let seconds = offset.local_minus_utc();
            let sign = if seconds < 0 { '-' } else { '+' };
            let seconds = seconds.unsigned_abs();
            write!(f, "{}{:02}:{:02}", sign, seconds / 3600, seconds / 60 % 60)?;
            if seconds % 60 != 0 {
                write!(f, ":{:02}", seconds % 60)?;
            }
        }
        Ok(())
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(datetime: NaiveDateTime) -> Self {
        Self::naive(datetime)
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(datetime: DateTime<FixedOffset>) -> Self {
        Self::with_offset(datetime.naive_local(), *datetime.offset())
    }
}

fn truncate_to_micros(datetime: NaiveDateTime) -> NaiveDateTime {
    let nanos = datetime.nanosecond();
    datetime
        .with_nanosecond(nanos - nanos % 1_000)
        .unwrap_or(datetime)
}

/// Parses `HH:MM:SS[.f]`, falling back to `HH:MM`.
fn parse_time(s: &str) -> Result<(NaiveTime, &str)> {
    NaiveTime::parse_and_remainder(s, FULL_TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_and_remainder(s, SHORT_TIME_FORMAT))
        .map_err(Error::from)
}

/// Parses `(+|-)HH:MM`; the whole input must be consumed.
fn parse_offset(s: &str) -> Result<FixedOffset> {
    let mut parsed = Parsed::default();
    format::parse(&mut parsed, s, StrftimeItems::new(OFFSET_FORMAT))?;
    Ok(parsed.to_fixed_offset()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datetime(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, us: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_micro_opt(h, mi, s, us)
            .unwrap()
    }

    #[test]
    fn test_parse_date_only() {
        let ts = Timestamp::parse("1234-01-02").unwrap();
        assert_eq!(ts.datetime(), datetime(1234, 1, 2, 0, 0, 0, 0));
        assert_eq!(ts.offset(), None);
        assert_eq!(ts.to_string(), "1234-01-02T00:00:00");
    }

    #[test]
    fn test_parse_with_offset_and_fraction() {
        let ts = Timestamp::parse("1234-01-02T04:05:06.789-05:00").unwrap();
        assert_eq!(ts.datetime(), datetime(1234, 1, 2, 4, 5, 6, 789_000));
        assert_eq!(ts.offset(), FixedOffset::west_opt(5 * 3600));
        assert_eq!(ts.to_string(), "1234-01-02T04:05:06.789000-05:00");
    }

    #[test]
    fn test_parse_separators_and_partial_times() {
        let ts = Timestamp::parse("2020-02-29 13:45").unwrap();
        assert_eq!(ts.datetime(), datetime(2020, 2, 29, 13, 45, 0, 0));

        let ts = Timestamp::parse("2020-02-29T13:45+01:00").unwrap();
        assert_eq!(ts.datetime(), datetime(2020, 2, 29, 13, 45, 0, 0));
        assert_eq!(ts.offset(), FixedOffset::east_opt(3600));

        let ts = Timestamp::parse("2020-02-29T13:45:10Z").unwrap();
        assert_eq!(ts.offset(), FixedOffset::east_opt(0));
        assert_eq!(ts.to_string(), "2020-02-29T13:45:10+00:00");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for text in [
            "",
            "2020",
            "2020-13-01",
            "2020-02-30",
            "2020-01-01T25:00",
            "2020-01-01T10:00.5",
            "2020-01-01T10:00:00+5",
            "2020-01-01T10:00:00:00",
            "2020-01-01T10:00:00.12345é",
            "2020-01-01T10:00:00Zulu",
        ] {
            assert!(
                matches!(Timestamp::parse(text), Err(Error::Time(_))),
                "accepted {:?}",
                text
            );
        }
    }

    #[test]
    fn test_parse_rejects_years_without_text_form() {
        assert_eq!(
            Timestamp::parse("0000-01-01"),
            Err(Error::TimeOutOfRange("0000-01-01T00:00:00".to_string()))
        );
        assert!(Timestamp::parse("+10000-01-01T00:00:00").is_err());
        assert!(Timestamp::parse("-0001-01-01T00:00:00").is_err());
        assert!(Timestamp::parse("0001-01-01").is_ok());
        assert!(Timestamp::parse("9999-12-31T23:59:59.999999").is_ok());
    }

    #[test]
    fn test_check_representable() {
        let ts = Timestamp::naive(datetime(9999, 12, 31, 0, 0, 0, 0));
        assert!(ts.check_representable().is_ok());

        let ts = Timestamp::naive(datetime(10000, 1, 1, 0, 0, 0, 0));
        assert!(matches!(ts.check_representable(), Err(Error::TimeOutOfRange(_))));

        let ts = Timestamp::naive(datetime(0, 1, 1, 0, 0, 0, 0));
        assert!(matches!(ts.check_representable(), Err(Error::TimeOutOfRange(_))));

        let offset = FixedOffset::east_opt(5 * 3600 + 30 * 60 + 15).unwrap();
        let ts = Timestamp::with_offset(datetime(2020, 1, 1, 0, 0, 0, 0), offset);
        assert!(matches!(ts.check_representable(), Err(Error::TimeOutOfRange(_))));
    }

    #[test]
    fn test_nanoseconds_truncated() {
        let ts = Timestamp::parse("2020-01-01T00:00:00.123456789").unwrap();
        assert_eq!(ts.datetime().nanosecond(), 123_456_000);

        let ts = Timestamp::naive(datetime(2020, 1, 1, 0, 0, 0, 0).with_nanosecond(5).unwrap());
        assert_eq!(ts.datetime().nanosecond(), 0);
    }

    #[test]
    fn test_from_fixed_offset_datetime() {
        let aware = DateTime::parse_from_rfc3339("2021-06-01T12:00:00+02:00").unwrap();
        let ts = Timestamp::from(aware);
        assert_eq!(ts.to_fixed_offset(), Some(aware));
        assert_eq!(ts.to_string(), "2021-06-01T12:00:00+02:00");
    }
}
