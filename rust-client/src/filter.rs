//! Query-parameter normalization shared by every chart view.
//!
//! Raw query-string pairs come in; a canonical [`ViewArgs`] comes out, or
//! a [`FilterError`] that the HTTP layer renders as a JSON error object.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, Duration, Month, PrimitiveDateTime, Time};

use crate::domain::CircuitSelector;

static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)([a-zA-Z]+)$").expect("duration pattern"));

const DATE_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");
const STAMP_FMT: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const STAMP_SPACE_FMT: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Time-bucket granularity for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Hour,
    Day,
    Month,
    Year,
}

impl Interval {
    /// Substring containment against the canonical names, so pluralized
    /// forms like `days` or `months` match.
    pub fn parse(raw: &str) -> Option<Interval> {
        [Interval::Hour, Interval::Day, Interval::Month, Interval::Year]
            .into_iter()
            .find(|i| raw.contains(i.name()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Interval::Hour => "hour",
            Interval::Day => "day",
            Interval::Month => "month",
            Interval::Year => "year",
        }
    }

    /// The matching `date_trunc` unit; coarsens monotonically
    /// hour -> day -> month -> year.
    pub fn trunc_unit(self) -> &'static str {
        self.name()
    }

    /// Month/year charts read the monthly fact tables; day/hour charts
    /// read the hourly ones.
    pub fn uses_monthly_tables(self) -> bool {
        matches!(self, Interval::Month | Interval::Year)
    }
}

/// Date-range bounds for fact-table filtering. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<PrimitiveDateTime>,
    pub end: Option<PrimitiveDateTime>,
}

/// Canonical, validated request parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewArgs {
    pub interval: Interval,
    pub range: DateRange,
    pub circuit: CircuitSelector,
    /// Base temperature (deg F) for on-the-fly HDD.
    pub base: f64,
    /// Temperature sensor device id.
    pub location: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("No arguments found.")]
    NoArguments,
    #[error("Interval '{0}' does not exist")]
    BadInterval(String),
    #[error("Circuit '{0}' does not exist")]
    UnknownCircuit(String),
}

impl ViewArgs {
    /// Normalize raw query-string pairs. An empty query string is an
    /// error; every individual parameter falls back to its default.
    pub fn from_pairs(pairs: &HashMap<String, String>) -> Result<ViewArgs, FilterError> {
        if pairs.is_empty() {
            return Err(FilterError::NoArguments);
        }

        let raw_interval = pairs.get("interval").map(String::as_str).unwrap_or("");
        let interval = Interval::parse(raw_interval)
            .ok_or_else(|| FilterError::BadInterval(raw_interval.to_string()))?;

        let start = pairs.get("start").and_then(|s| parse_stamp(s));
        let end = match pairs.get("end") {
            Some(raw) => parse_stamp(raw),
            None => end_from_duration(start, pairs.get("duration").map(String::as_str)),
        };

        let raw_circuit = pairs.get("circuit").map(String::as_str).unwrap_or("summary");
        let circuit = CircuitSelector::parse(raw_circuit)
            .ok_or_else(|| FilterError::UnknownCircuit(raw_circuit.to_string()))?;

        let base = pairs
            .get("base")
            .and_then(|b| b.parse::<f64>().ok())
            .unwrap_or(65.0);
        let location = pairs
            .get("location")
            .and_then(|l| l.parse::<i32>().ok())
            .unwrap_or(0);

        Ok(ViewArgs {
            interval,
            range: DateRange { start, end },
            circuit,
            base,
            location,
        })
    }
}

/// Accepts a bare date (midnight) or a full timestamp with `T` or space
/// separator. Anything else is treated as absent.
pub fn parse_stamp(raw: &str) -> Option<PrimitiveDateTime> {
    if let Ok(date) = Date::parse(raw, DATE_FMT) {
        return Some(PrimitiveDateTime::new(date, Time::MIDNIGHT));
    }
    PrimitiveDateTime::parse(raw, STAMP_FMT)
        .or_else(|_| PrimitiveDateTime::parse(raw, STAMP_SPACE_FMT))
        .ok()
}

/// `end = start + n * unit - 1 minute`, for durations written as
/// `<n><unit>` ("31days", "5months", "1year"). Missing or malformed
/// start/duration leaves the end bound open.
fn end_from_duration(
    start: Option<PrimitiveDateTime>,
    duration: Option<&str>,
) -> Option<PrimitiveDateTime> {
    let start = start?;
    let caps = DURATION_RE.captures(duration?)?;
    let n: i32 = caps[1].parse().ok()?;
    let unit = &caps[2];

    let advanced = if unit.contains("day") {
        start.checked_add(Duration::days(i64::from(n)))?
    } else if unit.contains("month") {
        add_months(start, n)?
    } else if unit.contains("year") {
        add_months(start, n.checked_mul(12)?)?
    } else {
        return None;
    };

    advanced.checked_sub(Duration::minutes(1))
}

/// Calendar-month addition, clamping the day to the target month's
/// length (Jan 31 + 1 month = Feb 28/29).
fn add_months(stamp: PrimitiveDateTime, months: i32) -> Option<PrimitiveDateTime> {
    let zero_based = (stamp.year() * 12) + i32::from(stamp.month() as u8) - 1;
    let target = zero_based.checked_add(months)?;
    let year = target.div_euclid(12);
    let month = Month::try_from((target.rem_euclid(12) + 1) as u8).ok()?;
    let day = stamp.day().min(time::util::days_in_month(month, year));
    let date = Date::from_calendar_date(year, month, day).ok()?;
    Some(PrimitiveDateTime::new(date, stamp.time()))
}

/// Item timestamps render with the time of day only at hourly grain.
pub fn format_stamp(interval: Interval, stamp: PrimitiveDateTime) -> String {
    let fmt = match interval {
        Interval::Hour => STAMP_FMT,
        _ => DATE_FMT,
    };
    stamp.format(fmt).unwrap_or_else(|_| stamp.to_string())
}

/// Space-separated timestamp, used by the per-house limits payload.
pub fn format_stamp_space(stamp: PrimitiveDateTime) -> String {
    stamp
        .format(STAMP_SPACE_FMT)
        .unwrap_or_else(|_| stamp.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn pairs(kv: &[(&str, &str)]) -> HashMap<String, String> {
        kv.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_query_string_is_an_error() {
        assert_eq!(
            ViewArgs::from_pairs(&HashMap::new()),
            Err(FilterError::NoArguments)
        );
    }

    #[test]
    fn interval_matching_accepts_plurals() {
        assert_eq!(Interval::parse("days"), Some(Interval::Day));
        assert_eq!(Interval::parse("months"), Some(Interval::Month));
        assert_eq!(Interval::parse("hour"), Some(Interval::Hour));
        assert_eq!(Interval::parse("years"), Some(Interval::Year));
        assert_eq!(Interval::parse("weeks"), None);
    }

    #[test]
    fn bad_interval_is_rejected_with_the_raw_value() {
        let err = ViewArgs::from_pairs(&pairs(&[("interval", "weeks")])).unwrap_err();
        assert_eq!(err.to_string(), "Interval 'weeks' does not exist");
    }

    #[test]
    fn defaults_apply_when_parameters_are_absent() {
        let args = ViewArgs::from_pairs(&pairs(&[("interval", "months")])).unwrap();
        assert_eq!(args.circuit.id(), "summary");
        assert_eq!(args.base, 65.0);
        assert_eq!(args.location, 0);
        assert_eq!(args.range, DateRange::default());
    }

    #[test]
    fn end_is_start_plus_duration_minus_one_minute() {
        let args = ViewArgs::from_pairs(&pairs(&[
            ("interval", "days"),
            ("start", "2014-01-01"),
            ("duration", "31days"),
        ]))
        .unwrap();
        assert_eq!(args.range.start, Some(datetime!(2014-01-01 00:00)));
        assert_eq!(args.range.end, Some(datetime!(2014-01-31 23:59)));

        let args = ViewArgs::from_pairs(&pairs(&[
            ("interval", "months"),
            ("start", "2012-01-01"),
            ("duration", "1year"),
        ]))
        .unwrap();
        assert_eq!(args.range.end, Some(datetime!(2012-12-31 23:59)));

        let args = ViewArgs::from_pairs(&pairs(&[
            ("interval", "months"),
            ("start", "2013-01-01"),
            ("duration", "4months"),
        ]))
        .unwrap();
        assert_eq!(args.range.end, Some(datetime!(2013-04-30 23:59)));
    }

    #[test]
    fn month_addition_clamps_to_month_length() {
        assert_eq!(
            add_months(datetime!(2013-01-31 00:00), 1),
            Some(datetime!(2013-02-28 00:00))
        );
        assert_eq!(
            add_months(datetime!(2012-01-31 00:00), 1),
            Some(datetime!(2012-02-29 00:00))
        );
        assert_eq!(
            add_months(datetime!(2013-11-30 12:30), 2),
            Some(datetime!(2014-01-30 12:30))
        );
    }

    #[test]
    fn malformed_duration_or_missing_start_leaves_end_open() {
        let args = ViewArgs::from_pairs(&pairs(&[
            ("interval", "days"),
            ("start", "2014-01-01"),
            ("duration", "eleven"),
        ]))
        .unwrap();
        assert_eq!(args.range.end, None);

        let args = ViewArgs::from_pairs(&pairs(&[
            ("interval", "days"),
            ("duration", "31days"),
        ]))
        .unwrap();
        assert_eq!(args.range.start, None);
        assert_eq!(args.range.end, None);

        let args = ViewArgs::from_pairs(&pairs(&[
            ("interval", "days"),
            ("start", "2014-01-01"),
            ("duration", "31fortnights"),
        ]))
        .unwrap();
        assert_eq!(args.range.end, None);
    }

    #[test]
    fn invalid_start_becomes_open_bound() {
        let args = ViewArgs::from_pairs(&pairs(&[
            ("interval", "days"),
            ("start", "not-a-date"),
        ]))
        .unwrap();
        assert_eq!(args.range.start, None);
    }

    #[test]
    fn explicit_end_is_parsed() {
        let args = ViewArgs::from_pairs(&pairs(&[
            ("interval", "months"),
            ("end", "2013-01-01"),
        ]))
        .unwrap();
        assert_eq!(args.range.end, Some(datetime!(2013-01-01 00:00)));
    }

    #[test]
    fn stamps_parse_with_and_without_time() {
        assert_eq!(parse_stamp("2013-05-04"), Some(datetime!(2013-05-04 00:00)));
        assert_eq!(
            parse_stamp("2013-05-04T06:00:00"),
            Some(datetime!(2013-05-04 06:00))
        );
        assert_eq!(
            parse_stamp("2013-05-04 06:00:00"),
            Some(datetime!(2013-05-04 06:00))
        );
        assert_eq!(parse_stamp(""), None);
    }

    #[test]
    fn stamp_formatting_follows_interval() {
        let at = datetime!(2013-01-01 15:00);
        assert_eq!(format_stamp(Interval::Hour, at), "2013-01-01T15:00:00");
        assert_eq!(format_stamp(Interval::Day, at), "2013-01-01");
        assert_eq!(format_stamp(Interval::Year, at), "2013-01-01");
    }

    #[test]
    fn unknown_circuit_is_rejected() {
        let err = ViewArgs::from_pairs(&pairs(&[
            ("interval", "months"),
            ("circuit", "garage"),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "Circuit 'garage' does not exist");
    }
}
