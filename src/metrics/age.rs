//! Age calculation from a date of birth

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// A person's age, or the absence of a recorded birth date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Age {
    Years(i32),
    NotSpecified,
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Age::Years(years) => write!(f, "{} years old", years),
            Age::NotSpecified => f.write_str("Not specified"),
        }
    }
}

/// Whole years elapsed between `date_of_birth` and `today`.
///
/// One year is subtracted when this year's birthday has not happened yet.
pub fn calculate_age(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age - 1
    } else {
        age
    }
}

/// Age on `today`, if a birth date is known
pub fn age_on(date_of_birth: Option<NaiveDate>, today: NaiveDate) -> Age {
    match date_of_birth {
        Some(dob) => Age::Years(calculate_age(dob, today)),
        None => Age::NotSpecified,
    }
}

pub fn format_age(date_of_birth: Option<NaiveDate>, today: NaiveDate) -> String {
    age_on(date_of_birth, today).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_before_birthday() {
        assert_eq!(calculate_age(date(2000, 6, 15), date(2024, 6, 14)), 23);
    }

    #[test]
    fn test_age_on_birthday() {
        assert_eq!(calculate_age(date(2000, 6, 15), date(2024, 6, 15)), 24);
    }

    #[test]
    fn test_age_earlier_month() {
        assert_eq!(calculate_age(date(1961, 10, 22), date(2026, 3, 1)), 64);
    }

    #[test]
    fn test_leap_day_birth() {
        assert_eq!(calculate_age(date(2004, 2, 29), date(2025, 2, 28)), 20);
        assert_eq!(calculate_age(date(2004, 2, 29), date(2025, 3, 1)), 21);
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(Some(date(2000, 6, 15)), date(2024, 6, 14)), "23 years old");
        assert_eq!(format_age(None, date(2024, 6, 14)), "Not specified");
    }
}
