//! Status Tool
//!
//! Provides runtime status information about the BMI tracker service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// BMI tracking instructions for AI assistants
pub const BMI_INSTRUCTIONS: &str = r#"
# BMI Tracker Instructions

Every tool takes a `user_id`: the opaque id of the signed-in user.

## First use

1. `register_user` creates an empty profile (safe to call repeatedly).
2. `complete_onboarding` sets the measurement system and reference height:
   - `system`: "metric", "us" or "uk"
   - metric: `height_cm`
   - us/uk: `height_feet` (0-8) and `height_inches` (0-11)
   - optional `date_of_birth` (YYYY-MM-DD) and `sex` ("male", "female", "not specified")
   - height defaults to 170 cm when not given

Entries cannot be added until onboarding is complete.

## Logging a measurement

Call `add_bmi_entry` with values in the user's own system:

| System | Height fields | Weight fields |
|--------|---------------|---------------|
| metric | height_cm | weight (kg) |
| us | height_feet, height_inches | weight (lbs) |
| uk | height_feet, height_inches | weight_stones (0-50), weight_pounds (0-13) |

- Height may be omitted; the profile's reference height is used.
- `date` is YYYY-MM-DD or an RFC 3339 timestamp; defaults to now.
- Values are stored in cm/kg and BMI is calculated when the entry is saved.

## Reviewing

- `list_bmi_entries`: newest first, shown in the user's units with BMI category.
- `get_bmi_trend`: first/latest BMI, change, min/max over an optional date range.
- `get_profile_summary`: height, age, sex and unit labels.

## BMI categories

| BMI | Category |
|-----|----------|
| below 18.5 | Underweight |
| 18.5 to below 25 | Normal |
| 25 to below 30 | Overweight |
| 30 and above | Obese |

## Changing things

- `update_bmi_entry`: only the fields you pass change; BMI is recalculated.
- `delete_bmi_entry`: removes an entry permanently.
- `update_profile`: change name, system, reference height, birth date or sex.
  Switching system changes how every entry is displayed; stored values are unchanged.
"#;

/// Runtime status of the service
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> ServiceStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        ServiceStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_missing_database() {
        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/bmitrack.db"));
        let status = tracker.get_status();

        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
    }
}
