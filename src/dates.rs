//! Date coercion for the date column of the input table.
//!
//! Workbook date cells are converted by calamine; this module handles the
//! textual dates found in CSV exports and text-typed workbook cells. Any
//! time-of-day part is dropped.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Unambiguous date-only formats, tried first
pub const ISO_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Month-first date-only formats ("03/04/2021" is 4 March)
pub const MONTH_FIRST_FORMATS: &[&str] = &["%m/%d/%Y", "%m.%d.%Y", "%m-%d-%Y"];

/// Day-first date-only formats ("03/04/2021" is 3 April)
pub const DAY_FIRST_FORMATS: &[&str] = &["%d/%m/%Y", "%d.%m.%Y", "%d-%m-%Y"];

/// Date-time formats, tried after the date-only ones
pub const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Which reading wins when a date like "03/04/2021" fits both orders
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateOrder {
    #[default]
    MonthFirst,
    DayFirst,
}

impl DateOrder {
    /// Ambiguous formats in the order they are tried. The other order is
    /// still tried afterwards, so "13.01.2021" reads as 13 January either way.
    fn formats(self) -> impl Iterator<Item = &'static str> {
        let (preferred, fallback) = match self {
            DateOrder::MonthFirst => (MONTH_FIRST_FORMATS, DAY_FIRST_FORMATS),
            DateOrder::DayFirst => (DAY_FIRST_FORMATS, MONTH_FIRST_FORMATS),
        };
        preferred.iter().chain(fallback).copied()
    }
}

/// Parse a textual date or date-time
///
/// Returns `None` for empty input or when no known format matches.
pub fn parse_date(value: &str, order: DateOrder) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(date) = ISO_FORMATS
        .iter()
        .copied()
        .chain(order.formats())
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
    {
        return Some(date);
    }

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Some(dt.date());
    }

    // date part of "05.01.2021 23:59" and similar
    if let Some((date, time)) = value.split_once(' ') {
        if time.contains(':') {
            return parse_date(date, order);
        }
    }

    // "2021-01-01T00:00:00Z", "2021-01-01T00:00:00+03:00"
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn ambiguous_dates_read_month_first_by_default() {
        let order = DateOrder::default();
        assert_eq!(parse_date("2021-01-05", order), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_date("2021/01/05", order), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_date("03/04/2021", order), Some(ymd(2021, 3, 4)));
        assert_eq!(parse_date(" 05.01.2021 ", order), Some(ymd(2021, 5, 1)));
    }

    #[test]
    fn day_first_order_flips_ambiguous_dates() {
        let order = DateOrder::DayFirst;
        assert_eq!(parse_date("03/04/2021", order), Some(ymd(2021, 4, 3)));
        assert_eq!(parse_date("05.01.2021", order), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_date("2021-01-05", order), Some(ymd(2021, 1, 5)));
    }

    #[test]
    fn impossible_order_falls_back_to_the_other() {
        assert_eq!(parse_date("13.01.2021", DateOrder::MonthFirst), Some(ymd(2021, 1, 13)));
        assert_eq!(parse_date("12/31/2021", DateOrder::DayFirst), Some(ymd(2021, 12, 31)));
    }

    #[test]
    fn drops_time_of_day() {
        let order = DateOrder::default();
        assert_eq!(parse_date("2021-01-05 13:45:00", order), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_date("2021-01-05T08:00:00.250", order), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_date("2021-01-05T08:00:00Z", order), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_date("05.01.2021 23:59", DateOrder::DayFirst), Some(ymd(2021, 1, 5)));
    }

    #[test]
    fn rejects_garbage() {
        let order = DateOrder::default();
        assert_eq!(parse_date("", order), None);
        assert_eq!(parse_date("   ", order), None);
        assert_eq!(parse_date("yesterday", order), None);
        assert_eq!(parse_date("2021-13-01", order), None);
        assert_eq!(parse_date("someday 12:00", order), None);
    }
}
