//! Measurement systems and display value types
//!
//! Provides the per-user measurement system, the tagged display values that
//! the conversion engine produces and accepts, and the standard conversion
//! factors between canonical metric units and US/UK units.

use serde::{Deserialize, Serialize};

/// Measurement system selected on a user's profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Centimeters and kilograms
    #[default]
    Metric,
    /// Feet/inches and pounds
    Us,
    /// Feet/inches and stone/pounds
    Uk,
}

impl MeasurementSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementSystem::Metric => "metric",
            MeasurementSystem::Us => "us",
            MeasurementSystem::Uk => "uk",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "si" => Some(MeasurementSystem::Metric),
            "us" | "imperial" => Some(MeasurementSystem::Us),
            "uk" | "british" => Some(MeasurementSystem::Uk),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MeasurementSystem::Metric => "METRIC",
            MeasurementSystem::Us => "US",
            MeasurementSystem::Uk => "UK",
        }
    }

    /// Whether heights are entered and shown as feet and inches
    pub fn uses_imperial_height(&self) -> bool {
        matches!(self, MeasurementSystem::Us | MeasurementSystem::Uk)
    }
}

/// A height as shown to (or entered by) the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum HeightValue {
    /// A single number (centimeters for metric, decimal feet for legacy US/UK input)
    Simple(f64),
    /// Feet and inches
    FeetInches { feet: f64, inches: f64 },
}

/// A weight as shown to (or entered by) the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum WeightValue {
    /// A single number (kilograms, pounds, or decimal stone for legacy UK input)
    Simple(f64),
    /// Stones and pounds
    StonesPounds { stones: f64, pounds: f64 },
}

/// Unit labels for input fields and table headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitLabels {
    pub height: &'static str,
    pub weight: &'static str,
}

// ============================================================================
// Length Conversion Constants
// ============================================================================

/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;
/// Centimeters per foot
pub const CM_PER_FOOT: f64 = 30.48;
/// Inches per foot
pub const INCHES_PER_FOOT: f64 = 12.0;

// ============================================================================
// Mass Conversion Constants
// ============================================================================

/// Pounds per kilogram
pub const LBS_PER_KG: f64 = 2.20462;
/// Pounds per stone
pub const LBS_PER_STONE: f64 = 14.0;
/// Kilograms per stone
pub const KG_PER_STONE: f64 = 6.35029;

/// Get the height and weight unit labels for a measurement system
pub fn unit_labels(system: MeasurementSystem) -> UnitLabels {
    match system {
        MeasurementSystem::Us => UnitLabels { height: "ft/in", weight: "lbs" },
        MeasurementSystem::Uk => UnitLabels { height: "ft/in", weight: "st/lbs" },
        MeasurementSystem::Metric => UnitLabels { height: "cm", weight: "kg" },
    }
}

/// Example height shown in an empty input
pub fn height_placeholder(system: MeasurementSystem) -> HeightValue {
    if system.uses_imperial_height() {
        HeightValue::FeetInches { feet: 5.0, inches: 8.0 }
    } else {
        HeightValue::Simple(170.0)
    }
}

/// Example weight shown in an empty input
pub fn weight_placeholder(system: MeasurementSystem) -> WeightValue {
    match system {
        MeasurementSystem::Us => WeightValue::Simple(150.0),
        MeasurementSystem::Uk => WeightValue::StonesPounds { stones: 11.0, pounds: 5.0 },
        MeasurementSystem::Metric => WeightValue::Simple(70.0),
    }
}
