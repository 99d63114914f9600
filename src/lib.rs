//! BMI Tracker Library
//!
//! Unit conversion, BMI and age calculations, and storage for
//! height/weight tracking.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod metrics;
pub mod models;
pub mod tools;
pub mod units;
