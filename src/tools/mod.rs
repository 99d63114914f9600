//! Tools module
//!
//! MCP tool implementations for the BMI tracker.

pub mod entries;
pub mod input;
pub mod profile;
pub mod status;
