// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Trip date handling.
//!
//! Trip dates are typed by hand as `dd/mm/yyyy` and stored verbatim. They are
//! only turned into a [`CalendarDate`] when something needs to bucket or
//! measure them, and a date that does not parse is simply left out of that
//! computation.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

static TRIP_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{2,4})$").expect("trip date pattern compiles")
});

/// A validated calendar day. Months are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Returns `None` for days that do not exist (31/04, 29/02 outside leap
    /// years, month 13, day 0) instead of rolling them into the next month.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(CalendarDate)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Whole days from `self` to `later`; negative when `later` is earlier.
    pub fn days_until(&self, later: &CalendarDate) -> i64 {
        (later.0 - self.0).num_days()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{:04}", self.day(), self.month(), self.year())
    }
}

/// Parse a `D{1,2}/M{1,2}/Y{2,4}` trip date.
///
/// Surrounding whitespace is ignored. A two digit year is read as `20yy`,
/// so `47` is 2047, never 1947. Years below 100 written with three or four
/// digits (`024`, `0024`) are rejected. Any other shape, or a day that does
/// not exist in the calendar, yields `None`.
pub fn parse_trip_date(text: &str) -> Option<CalendarDate> {
    let caps = TRIP_DATE.captures(text.trim())?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year_raw = &caps[3];
    let year: i32 = if year_raw.len() == 2 {
        format!("20{}", year_raw).parse().ok()?
    } else {
        year_raw.parse().ok()?
    };
    if year < 100 {
        return None;
    }
    CalendarDate::from_ymd(year, month, day)
}

/// English name for a 1-based month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    let idx = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(idx).copied()
}

/// 1-based month number for a full English month name. Case-sensitive.
pub fn month_number(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| *m == name)
        .map(|i| i as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_padded_and_unpadded_forms() {
        let d = parse_trip_date("05/03/2024").unwrap();
        assert_eq!((d.day(), d.month(), d.year()), (5, 3, 2024));
        let d = parse_trip_date("5/3/2024").unwrap();
        assert_eq!((d.day(), d.month(), d.year()), (5, 3, 2024));
        assert!(parse_trip_date("  1/1/2024 ").is_some());
    }

    #[test]
    fn two_digit_years_land_in_this_century() {
        assert_eq!(parse_trip_date("01/01/47").unwrap().year(), 2047);
        assert_eq!(parse_trip_date("01/01/99").unwrap().year(), 2099);
    }

    #[test]
    fn rejects_overflowing_days_and_months() {
        assert!(parse_trip_date("31/02/2024").is_none());
        assert!(parse_trip_date("31/04/2024").is_none());
        assert!(parse_trip_date("29/02/2023").is_none());
        assert!(parse_trip_date("15/13/2024").is_none());
        assert!(parse_trip_date("00/01/2024").is_none());
        assert!(parse_trip_date("10/00/2024").is_none());
        assert!(parse_trip_date("29/02/2024").is_some());
    }

    #[test]
    fn rejects_other_shapes() {
        for s in [
            "",
            "2024-01-01",
            "01-01-2024",
            "1/1/2",
            "1/1/20245",
            "123/1/2024",
            "a1/01/2024",
            "01/01/2024 extra",
            "01/01/0024",
        ] {
            assert!(parse_trip_date(s).is_none(), "{s:?} should not parse");
        }
    }

    #[test]
    fn display_round_trips() {
        for s in ["01/01/2024", "29/02/2028", "31/12/2099", "7/8/2025"] {
            let d = parse_trip_date(s).unwrap();
            assert_eq!(parse_trip_date(&d.to_string()), Some(d));
        }
        assert_eq!(parse_trip_date("7/8/2025").unwrap().to_string(), "07/08/2025");
    }

    #[test]
    fn month_names_are_one_based() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
        assert_eq!(month_number("March"), Some(3));
        assert_eq!(month_number("march"), None);
        assert_eq!(month_number("All"), None);
    }
}
