//! Unit conversion engine
//!
//! Converts between canonical metric values (centimeters, kilograms) and the
//! display values of a measurement system. Every function is pure and total:
//! inputs are assumed to be non-negative numbers that the caller has already
//! validated.

use super::system::{
    HeightValue, MeasurementSystem, WeightValue, CM_PER_FOOT, CM_PER_INCH, INCHES_PER_FOOT,
    KG_PER_STONE, LBS_PER_KG, LBS_PER_STONE,
};

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Split a total in minor units into (major, minor), rounding the minor part.
///
/// A remainder that rounds up to a whole major unit is carried, so 11.6 inches
/// becomes 1 foot 0 inches rather than 0 feet 12 inches.
fn split_with_carry(total_minor: f64, minor_per_major: f64) -> (f64, f64) {
    let major = (total_minor / minor_per_major).floor();
    let minor = (total_minor % minor_per_major).round();
    if minor >= minor_per_major {
        (major + 1.0, minor - minor_per_major)
    } else {
        (major, minor)
    }
}

/// Convert centimeters to feet and inches
pub fn cm_to_feet_inches(height_cm: f64) -> (f64, f64) {
    split_with_carry(height_cm / CM_PER_INCH, INCHES_PER_FOOT)
}

/// Convert feet and inches to centimeters (2 decimal places)
pub fn feet_inches_to_cm(feet: f64, inches: f64) -> f64 {
    let total_inches = feet * INCHES_PER_FOOT + inches;
    round_to(total_inches * CM_PER_INCH, 2)
}

/// Convert kilograms to stones and pounds
pub fn kg_to_stones_pounds(weight_kg: f64) -> (f64, f64) {
    split_with_carry(weight_kg * LBS_PER_KG, LBS_PER_STONE)
}

/// Convert stones and pounds to kilograms (2 decimal places)
pub fn stones_pounds_to_kg(stones: f64, pounds: f64) -> f64 {
    let total_pounds = stones * LBS_PER_STONE + pounds;
    round_to(total_pounds / LBS_PER_KG, 2)
}

/// Convert kilograms to pounds (2 decimal places)
pub fn kg_to_lbs(weight_kg: f64) -> f64 {
    round_to(weight_kg * LBS_PER_KG, 2)
}

/// Convert pounds to kilograms (2 decimal places)
pub fn lbs_to_kg(lbs: f64) -> f64 {
    round_to(lbs / LBS_PER_KG, 2)
}

/// Convert a stored height to the user's preferred display value
pub fn height_from_metric(height_cm: f64, system: MeasurementSystem) -> HeightValue {
    match system {
        MeasurementSystem::Us | MeasurementSystem::Uk => {
            let (feet, inches) = cm_to_feet_inches(height_cm);
            HeightValue::FeetInches { feet, inches }
        }
        MeasurementSystem::Metric => HeightValue::Simple(height_cm),
    }
}

/// Convert a height entered in the user's system to centimeters
pub fn height_to_metric(height: HeightValue, system: MeasurementSystem) -> f64 {
    match (system, height) {
        (MeasurementSystem::Us | MeasurementSystem::Uk, HeightValue::FeetInches { feet, inches }) => {
            feet_inches_to_cm(feet, inches)
        }
        // Legacy decimal-feet input
        (MeasurementSystem::Us | MeasurementSystem::Uk, HeightValue::Simple(feet)) => {
            round_to(feet * CM_PER_FOOT, 2)
        }
        (MeasurementSystem::Metric, HeightValue::Simple(cm)) => cm,
        (MeasurementSystem::Metric, HeightValue::FeetInches { .. }) => 0.0,
    }
}

/// Convert a stored weight to the user's preferred display value
pub fn weight_from_metric(weight_kg: f64, system: MeasurementSystem) -> WeightValue {
    match system {
        MeasurementSystem::Us => WeightValue::Simple(kg_to_lbs(weight_kg)),
        MeasurementSystem::Uk => {
            let (stones, pounds) = kg_to_stones_pounds(weight_kg);
            WeightValue::StonesPounds { stones, pounds }
        }
        MeasurementSystem::Metric => WeightValue::Simple(weight_kg),
    }
}

/// Convert a weight entered in the user's system to kilograms
pub fn weight_to_metric(weight: WeightValue, system: MeasurementSystem) -> f64 {
    match (system, weight) {
        (MeasurementSystem::Us, WeightValue::Simple(lbs)) => lbs_to_kg(lbs),
        (MeasurementSystem::Uk, WeightValue::StonesPounds { stones, pounds }) => {
            stones_pounds_to_kg(stones, pounds)
        }
        // Legacy decimal-stone input
        (MeasurementSystem::Uk, WeightValue::Simple(stones)) => round_to(stones * KG_PER_STONE, 2),
        (MeasurementSystem::Metric, WeightValue::Simple(kg)) => kg,
        (MeasurementSystem::Us | MeasurementSystem::Metric, WeightValue::StonesPounds { .. }) => 0.0,
    }
}

/// Format a stored height for display in the user's system
pub fn format_height_for_display(height_cm: f64, system: MeasurementSystem) -> String {
    match height_from_metric(height_cm, system) {
        HeightValue::FeetInches { feet, inches } => format!("{}'{}\"", feet, inches),
        HeightValue::Simple(cm) => format!("{} cm", cm),
    }
}

/// Format a stored weight for display in the user's system
pub fn format_weight_for_display(weight_kg: f64, system: MeasurementSystem) -> String {
    match (system, weight_from_metric(weight_kg, system)) {
        (_, WeightValue::StonesPounds { stones, pounds }) => format!("{}st {}lbs", stones, pounds),
        (MeasurementSystem::Us, WeightValue::Simple(lbs)) => format!("{} lbs", lbs),
        (_, WeightValue::Simple(kg)) => format!("{} kg", kg),
    }
}
