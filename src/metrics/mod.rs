//! Derived metrics module
//!
//! BMI, BMI category, age and trend calculations over canonical metric values.

pub mod age;
pub mod bmi;
pub mod trend;

pub use age::{age_on, calculate_age, format_age, Age};
pub use bmi::{classify_bmi, compute_bmi, format_bmi, BmiCategory};
pub use trend::{bmi_trend, BmiTrend};
