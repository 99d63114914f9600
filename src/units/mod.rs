//! Unit conversion module
//!
//! Converts heights and weights between canonical metric storage units and
//! the Metric, US and UK display systems.

pub mod converter;
pub mod system;

pub use converter::{
    format_height_for_display, format_weight_for_display, height_from_metric, height_to_metric,
    round_to, weight_from_metric, weight_to_metric,
};
pub use system::{
    height_placeholder, unit_labels, weight_placeholder, HeightValue, MeasurementSystem,
    UnitLabels, WeightValue,
};
