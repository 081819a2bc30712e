use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::TypeError;

/// Wire format of a reading date (`MM/DD/YYYY`).
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// A calendar date parsed from the `MM/DD/YYYY` wire format.
///
/// Ordering is chronological.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReadingDate(NaiveDate);

impl ReadingDate {
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
            .map(Self)
            .map_err(|e| TypeError::InvalidDate {
                value: raw.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Returns `true` if this date is strictly after `other`.
    pub fn is_after(&self, other: &Self) -> bool {
        self.0 > other.0
    }
}

impl FromStr for ReadingDate {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ReadingDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_month_first() {
        let date = ReadingDate::parse("12/01/2017").unwrap();
        assert_eq!(date, ReadingDate::from_ymd(2017, 12, 1).unwrap());
    }

    #[test]
    fn display_round_trips_wire_format() {
        let date = ReadingDate::parse("02/09/2018").unwrap();
        assert_eq!(date.to_string(), "02/09/2018");
    }

    #[test]
    fn chronological_ordering_crosses_years() {
        let late_2017 = ReadingDate::parse("12/20/2017").unwrap();
        let early_2018 = ReadingDate::parse("01/02/2018").unwrap();
        assert!(early_2018.is_after(&late_2017));
        assert!(!late_2017.is_after(&early_2018));
    }

    #[test]
    fn same_day_is_not_after() {
        let a = ReadingDate::parse("12/01/2017").unwrap();
        let b = ReadingDate::parse("12/01/2017").unwrap();
        assert!(!a.is_after(&b));
    }

    #[test]
    fn rejects_day_first_and_iso() {
        assert!(matches!(
            ReadingDate::parse("31/12/2017"),
            Err(TypeError::InvalidDate { .. })
        ));
        assert!(ReadingDate::parse("2017-12-01").is_err());
        assert!(ReadingDate::parse("").is_err());
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(ReadingDate::parse("02/30/2017").is_err());
    }

    proptest! {
        #[test]
        fn ordering_matches_calendar(
            y1 in 1990i32..2100, m1 in 1u32..=12, d1 in 1u32..=28,
            y2 in 1990i32..2100, m2 in 1u32..=12, d2 in 1u32..=28,
        ) {
            let a = ReadingDate::parse(&format!("{m1:02}/{d1:02}/{y1}")).unwrap();
            let b = ReadingDate::parse(&format!("{m2:02}/{d2:02}/{y2}")).unwrap();
            prop_assert_eq!(a.cmp(&b), (y1, m1, d1).cmp(&(y2, m2, d2)));
        }
    }
}
