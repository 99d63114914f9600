//! Data models
//!
//! Rust structs representing database entities.

mod bmi_entry;
mod profile;

pub use bmi_entry::{BmiEntry, BmiEntryCreate, BmiEntryUpdate};
pub use profile::{ProfileOnboarding, ProfileUpdate, Sex, UserProfile};
