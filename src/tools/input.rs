//! Form input handling
//!
//! Validates raw numbers entered in the user's measurement system and
//! normalises them to centimeters and kilograms before they reach storage.
//! The conversion engine itself never validates, so every bound lives here.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::models::Sex;
use crate::units::{height_to_metric, weight_to_metric, HeightValue, MeasurementSystem, WeightValue};

pub const MAX_FEET: f64 = 8.0;
pub const MAX_INCHES: f64 = 11.0;
pub const MAX_STONES: f64 = 50.0;
pub const MAX_POUNDS: f64 = 13.0;

/// Fallback reference height when onboarding supplies none
pub const DEFAULT_HEIGHT_CM: f64 = 170.0;

/// Rejected form input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: &'static str, min: f64, max: f64 },

    #[error("{0} must be a whole number")]
    NotWholeNumber(&'static str),

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    #[error("Height must be entered in {expected} for {system} units")]
    WrongHeightUnits { system: &'static str, expected: &'static str },

    #[error("{0} is required")]
    Missing(&'static str),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Date of birth cannot be in the future")]
    FutureBirthDate,

    #[error("Unknown measurement system '{0}': expected metric, us or uk")]
    UnknownSystem(String),

    #[error("Unknown sex '{0}': expected male, female or not specified")]
    UnknownSex(String),
}

/// Raw height fields from a form. Which fields apply depends on the measurement system.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeightInput {
    pub height_cm: Option<f64>,
    pub feet: Option<f64>,
    pub inches: Option<f64>,
}

/// Raw weight fields from a form. `weight` is kg (metric) or lbs (US).
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightInput {
    pub weight: Option<f64>,
    pub stones: Option<f64>,
    pub pounds: Option<f64>,
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, InputError> {
    if !value.is_finite() || value < min || value > max {
        return Err(InputError::OutOfRange { field, min, max });
    }
    Ok(value)
}

fn check_whole(field: &'static str, value: f64) -> Result<f64, InputError> {
    if value.fract() != 0.0 {
        return Err(InputError::NotWholeNumber(field));
    }
    Ok(value)
}

fn check_positive(field: &'static str, value: f64) -> Result<f64, InputError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(InputError::NotPositive(field));
    }
    Ok(value)
}

/// Validate height fields and convert to centimeters.
///
/// Returns `Ok(None)` when no height was entered. For feet/inches, a missing
/// half of the pair counts as zero.
pub fn resolve_height(input: &HeightInput, system: MeasurementSystem) -> Result<Option<f64>, InputError> {
    if system.uses_imperial_height() {
        if input.feet.is_none() && input.inches.is_none() {
            if input.height_cm.is_some() {
                return Err(InputError::WrongHeightUnits { system: system.as_str(), expected: "feet and inches" });
            }
            return Ok(None);
        }
        let feet = check_range("feet", input.feet.unwrap_or(0.0), 0.0, MAX_FEET)?;
        let feet = check_whole("feet", feet)?;
        let inches = check_range("inches", input.inches.unwrap_or(0.0), 0.0, MAX_INCHES)?;
        let inches = check_whole("inches", inches)?;

        let cm = height_to_metric(HeightValue::FeetInches { feet, inches }, system);
        check_positive("height", cm).map(Some)
    } else {
        match input.height_cm {
            Some(cm) => {
                let cm = check_positive("height", cm)?;
                Ok(Some(height_to_metric(HeightValue::Simple(cm), system)))
            }
            None if input.feet.is_some() || input.inches.is_some() => {
                Err(InputError::WrongHeightUnits { system: system.as_str(), expected: "centimeters" })
            }
            None => Ok(None),
        }
    }
}

/// Validate weight fields and convert to kilograms
pub fn resolve_weight(input: &WeightInput, system: MeasurementSystem) -> Result<f64, InputError> {
    match system {
        MeasurementSystem::Uk => {
            if input.stones.is_none() && input.pounds.is_none() {
                return Err(InputError::Missing("weight"));
            }
            let stones = check_range("stones", input.stones.unwrap_or(0.0), 0.0, MAX_STONES)?;
            let stones = check_whole("stones", stones)?;
            let pounds = check_range("pounds", input.pounds.unwrap_or(0.0), 0.0, MAX_POUNDS)?;

            let kg = weight_to_metric(WeightValue::StonesPounds { stones, pounds }, system);
            check_positive("weight", kg)
        }
        MeasurementSystem::Us | MeasurementSystem::Metric => {
            let weight = input.weight.ok_or(InputError::Missing("weight"))?;
            let weight = check_positive("weight", weight)?;
            Ok(weight_to_metric(WeightValue::Simple(weight), system))
        }
    }
}

/// Normalise an entry date.
///
/// Accepts `YYYY-MM-DD` (kept as is) or an RFC 3339 timestamp (converted to UTC).
pub fn parse_entry_timestamp(value: &str) -> Result<String, InputError> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.format("%Y-%m-%d").to_string());
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc).format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .map_err(|_| InputError::InvalidDate(value.to_string()))
}

/// Parse a plain `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate, InputError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| InputError::InvalidDate(value.to_string()))
}

/// Parse a date of birth, rejecting dates after `today`
pub fn parse_birth_date(value: &str, today: NaiveDate) -> Result<NaiveDate, InputError> {
    let dob = parse_date(value)?;
    if dob > today {
        return Err(InputError::FutureBirthDate);
    }
    Ok(dob)
}

pub fn parse_system(value: &str) -> Result<MeasurementSystem, InputError> {
    MeasurementSystem::from_str(value).ok_or_else(|| InputError::UnknownSystem(value.to_string()))
}

pub fn parse_sex(value: Option<&str>) -> Result<Sex, InputError> {
    match value {
        Some(s) => Sex::from_str(s).ok_or_else(|| InputError::UnknownSex(s.to_string())),
        None => Ok(Sex::NotSpecified),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_height_imperial() {
        let input = HeightInput { feet: Some(5.0), inches: Some(8.0), ..Default::default() };
        assert_eq!(resolve_height(&input, MeasurementSystem::Us), Ok(Some(172.72)));
    }

    #[test]
    fn test_resolve_height_missing_inches_counts_as_zero() {
        let input = HeightInput { feet: Some(6.0), ..Default::default() };
        assert_eq!(resolve_height(&input, MeasurementSystem::Uk), Ok(Some(182.88)));
    }

    #[test]
    fn test_resolve_height_absent() {
        assert_eq!(resolve_height(&HeightInput::default(), MeasurementSystem::Us), Ok(None));
        assert_eq!(resolve_height(&HeightInput::default(), MeasurementSystem::Metric), Ok(None));
    }

    #[test]
    fn test_resolve_height_bounds() {
        let input = HeightInput { feet: Some(5.0), inches: Some(12.0), ..Default::default() };
        assert_eq!(
            resolve_height(&input, MeasurementSystem::Us),
            Err(InputError::OutOfRange { field: "inches", min: 0.0, max: 11.0 })
        );

        let input = HeightInput { feet: Some(9.0), inches: Some(0.0), ..Default::default() };
        assert!(matches!(
            resolve_height(&input, MeasurementSystem::Us),
            Err(InputError::OutOfRange { field: "feet", .. })
        ));

        let input = HeightInput { feet: Some(5.5), ..Default::default() };
        assert_eq!(resolve_height(&input, MeasurementSystem::Us), Err(InputError::NotWholeNumber("feet")));

        let input = HeightInput { feet: Some(0.0), inches: Some(0.0), ..Default::default() };
        assert_eq!(resolve_height(&input, MeasurementSystem::Us), Err(InputError::NotPositive("height")));
    }

    #[test]
    fn test_resolve_height_metric() {
        let input = HeightInput { height_cm: Some(181.5), ..Default::default() };
        assert_eq!(resolve_height(&input, MeasurementSystem::Metric), Ok(Some(181.5)));

        let input = HeightInput { height_cm: Some(0.0), ..Default::default() };
        assert_eq!(resolve_height(&input, MeasurementSystem::Metric), Err(InputError::NotPositive("height")));
    }

    #[test]
    fn test_resolve_height_wrong_units() {
        let cm_only = HeightInput { height_cm: Some(180.0), ..Default::default() };
        assert_eq!(
            resolve_height(&cm_only, MeasurementSystem::Uk),
            Err(InputError::WrongHeightUnits { system: "uk", expected: "feet and inches" })
        );

        let feet_only = HeightInput { feet: Some(6.0), ..Default::default() };
        assert_eq!(
            resolve_height(&feet_only, MeasurementSystem::Metric).unwrap_err().to_string(),
            "Height must be entered in centimeters for metric units"
        );

        // Both sets given: the system's own fields win
        let both = HeightInput { height_cm: Some(180.0), feet: Some(6.0), inches: Some(0.0) };
        assert_eq!(resolve_height(&both, MeasurementSystem::Us), Ok(Some(182.88)));
    }

    #[test]
    fn test_resolve_weight() {
        let us = WeightInput { weight: Some(154.0), ..Default::default() };
        assert_eq!(resolve_weight(&us, MeasurementSystem::Us), Ok(69.85));

        let metric = WeightInput { weight: Some(70.4), ..Default::default() };
        assert_eq!(resolve_weight(&metric, MeasurementSystem::Metric), Ok(70.4));

        let uk = WeightInput { stones: Some(11.0), pounds: Some(5.0), ..Default::default() };
        assert_eq!(resolve_weight(&uk, MeasurementSystem::Uk), Ok(72.12));
    }

    #[test]
    fn test_resolve_weight_errors() {
        assert_eq!(
            resolve_weight(&WeightInput::default(), MeasurementSystem::Metric),
            Err(InputError::Missing("weight"))
        );
        assert_eq!(
            resolve_weight(&WeightInput::default(), MeasurementSystem::Uk),
            Err(InputError::Missing("weight"))
        );

        let uk = WeightInput { stones: Some(10.0), pounds: Some(14.0), ..Default::default() };
        assert!(matches!(
            resolve_weight(&uk, MeasurementSystem::Uk),
            Err(InputError::OutOfRange { field: "pounds", .. })
        ));

        let negative = WeightInput { weight: Some(-3.0), ..Default::default() };
        assert_eq!(resolve_weight(&negative, MeasurementSystem::Us), Err(InputError::NotPositive("weight")));
    }

    #[test]
    fn test_parse_entry_timestamp() {
        assert_eq!(parse_entry_timestamp("2025-05-01").unwrap(), "2025-05-01");
        assert_eq!(
            parse_entry_timestamp("2025-05-01T10:30:00+02:00").unwrap(),
            "2025-05-01T08:30:00Z"
        );
        assert!(parse_entry_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_parse_birth_date() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        assert!(parse_birth_date("2000-06-15", today).is_ok());
        assert_eq!(parse_birth_date("2030-01-01", today), Err(InputError::FutureBirthDate));
        assert!(matches!(parse_birth_date("15/06/2000", today), Err(InputError::InvalidDate(_))));
    }

    #[test]
    fn test_error_messages() {
        let err = InputError::OutOfRange { field: "stones", min: 0.0, max: 50.0 };
        assert_eq!(err.to_string(), "stones must be between 0 and 50");
        assert_eq!(parse_system("parsecs").unwrap_err().to_string(), "Unknown measurement system 'parsecs': expected metric, us or uk");
    }

    #[test]
    fn test_parse_sex_defaults() {
        assert_eq!(parse_sex(None), Ok(Sex::NotSpecified));
        assert_eq!(parse_sex(Some("female")), Ok(Sex::Female));
        assert!(parse_sex(Some("robot")).is_err());
    }
}
