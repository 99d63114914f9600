//! Body Mass Index calculation and classification

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lower bound of the normal band
pub const NORMAL_MIN_BMI: f64 = 18.5;
/// Lower bound of the overweight band
pub const OVERWEIGHT_MIN_BMI: f64 = 25.0;
/// Lower bound of the obese band
pub const OBESE_MIN_BMI: f64 = 30.0;

/// BMI category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Compute BMI from canonical height and weight.
///
/// `height_cm` must be greater than zero; a zero height yields a non-finite result.
pub fn compute_bmi(height_cm: f64, weight_kg: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Classify a BMI value. Each band includes its lower bound.
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < NORMAL_MIN_BMI {
        BmiCategory::Underweight
    } else if bmi < OVERWEIGHT_MIN_BMI {
        BmiCategory::Normal
    } else if bmi < OBESE_MIN_BMI {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Format a BMI value for display (one decimal place)
pub fn format_bmi(bmi: f64) -> String {
    format!("{:.1}", bmi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_bmi() {
        let bmi = compute_bmi(180.0, 75.0);
        assert!((bmi - 23.148).abs() < 0.001);
    }

    #[test]
    fn test_compute_bmi_zero_height_is_not_finite() {
        assert!(!compute_bmi(0.0, 70.0).is_finite());
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify_bmi(18.49), BmiCategory::Underweight);
        assert_eq!(classify_bmi(18.5), BmiCategory::Normal);
        assert_eq!(classify_bmi(24.99), BmiCategory::Normal);
        assert_eq!(classify_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(classify_bmi(29.99), BmiCategory::Overweight);
        assert_eq!(classify_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(BmiCategory::Normal.to_string(), "Normal");
        assert_eq!(BmiCategory::Obese.label(), "Obese");
    }

    #[test]
    fn test_format_bmi() {
        assert_eq!(format_bmi(23.148), "23.1");
        assert_eq!(format_bmi(30.0), "30.0");
    }
}
