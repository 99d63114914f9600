//! Profile MCP Tools
//!
//! Registration, onboarding and profile summary for the current user.

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::Database;
use crate::metrics::age_on;
use crate::models::{BmiEntry, ProfileOnboarding, ProfileUpdate, UserProfile};
use crate::tools::input::{
    parse_birth_date, parse_sex, parse_system, resolve_height, HeightInput, DEFAULT_HEIGHT_CM,
};
use crate::units::{
    format_height_for_display, height_from_metric, height_placeholder, unit_labels,
    weight_placeholder, HeightValue, UnitLabels, WeightValue,
};

/// Response for register_user
#[derive(Debug, Serialize)]
pub struct RegisterUserResponse {
    pub user_id: String,
    pub onboarding_completed: bool,
    pub created_at: String,
}

/// Profile as shown on the dashboard
#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    pub user_id: String,
    pub name: Option<String>,
    pub measurement_system: String,
    pub measurement_system_display: String,
    pub height: Option<HeightValue>,
    pub height_formatted: Option<String>,
    pub age: String,
    pub sex: String,
    pub onboarding_completed: bool,
    pub unit_labels: UnitLabels,
    pub height_placeholder: HeightValue,
    pub weight_placeholder: WeightValue,
    pub entry_count: i64,
}

/// Onboarding and profile amendment form fields
#[derive(Debug, Clone, Default)]
pub struct ProfileForm<'a> {
    pub name: Option<&'a str>,
    pub system: Option<&'a str>,
    pub height: HeightInput,
    pub date_of_birth: Option<&'a str>,
    pub sex: Option<&'a str>,
}

fn summarize(profile: &UserProfile, entry_count: i64, today: NaiveDate) -> ProfileSummary {
    let system = profile.measurement_system;
    ProfileSummary {
        user_id: profile.id.clone(),
        name: profile.name.clone(),
        measurement_system: system.as_str().to_string(),
        measurement_system_display: system.display_name().to_string(),
        height: profile.height_cm.map(|cm| height_from_metric(cm, system)),
        height_formatted: profile.height_cm.map(|cm| format_height_for_display(cm, system)),
        age: age_on(profile.birth_date(), today).to_string(),
        sex: profile.sex.as_str().to_string(),
        onboarding_completed: profile.onboarding_completed,
        unit_labels: unit_labels(system),
        height_placeholder: height_placeholder(system),
        weight_placeholder: weight_placeholder(system),
        entry_count,
    }
}

/// Create the user's profile on first authentication
pub fn register_user(db: &Database, user_id: &str) -> Result<RegisterUserResponse, String> {
    if user_id.trim().is_empty() {
        return Err("User ID is required".to_string());
    }
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = UserProfile::create_if_missing(&conn, user_id)
        .map_err(|e| format!("Failed to create profile: {}", e))?;

    Ok(RegisterUserResponse {
        user_id: profile.id,
        onboarding_completed: profile.onboarding_completed,
        created_at: profile.created_at,
    })
}

/// Complete onboarding: measurement system, reference height, date of birth and sex
pub fn complete_onboarding(
    db: &Database,
    user_id: &str,
    form: &ProfileForm<'_>,
    today: NaiveDate,
) -> Result<ProfileSummary, String> {
    let name = form
        .name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or("Name and system are required")?;
    let system_str = form.system.ok_or("Name and system are required")?;

    let system = parse_system(system_str).map_err(|e| e.to_string())?;
    let height_cm = resolve_height(&form.height, system)
        .map_err(|e| e.to_string())?
        .unwrap_or(DEFAULT_HEIGHT_CM);
    let date_of_birth = form
        .date_of_birth
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_birth_date(s, today))
        .transpose()
        .map_err(|e| e.to_string())?;
    let sex = parse_sex(form.sex).map_err(|e| e.to_string())?;

    let data = ProfileOnboarding {
        name: name.to_string(),
        measurement_system: system,
        height_cm,
        date_of_birth: date_of_birth.map(|d| d.format("%Y-%m-%d").to_string()),
        sex,
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profile = UserProfile::complete_onboarding(&conn, user_id, &data)
        .map_err(|e| format!("Failed to save: {}", e))?;
    tracing::info!(user_id, system = system.as_str(), "Onboarding completed");

    let entry_count = BmiEntry::count_for_user(&conn, user_id)
        .map_err(|e| format!("Database error: {}", e))?;

    Ok(summarize(&profile, entry_count, today))
}

/// Get the dashboard profile summary
pub fn get_profile_summary(
    db: &Database,
    user_id: &str,
    today: NaiveDate,
) -> Result<Option<ProfileSummary>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = UserProfile::get(&conn, user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?;

    match profile {
        Some(p) => {
            let entry_count = BmiEntry::count_for_user(&conn, user_id)
                .map_err(|e| format!("Database error: {}", e))?;
            Ok(Some(summarize(&p, entry_count, today)))
        }
        None => Ok(None),
    }
}

/// Amend a profile. Height fields are read in the resulting measurement system.
pub fn update_profile(
    db: &Database,
    user_id: &str,
    form: &ProfileForm<'_>,
    today: NaiveDate,
) -> Result<Option<ProfileSummary>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let existing = match UserProfile::get(&conn, user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?
    {
        Some(p) => p,
        None => return Ok(None),
    };

    let system = form
        .system
        .map(parse_system)
        .transpose()
        .map_err(|e| e.to_string())?;
    let effective_system = system.unwrap_or(existing.measurement_system);

    let update = ProfileUpdate {
        name: form.name.map(|n| n.trim().to_string()),
        measurement_system: system,
        height_cm: resolve_height(&form.height, effective_system).map_err(|e| e.to_string())?,
        // A blank date of birth clears it
        date_of_birth: match form.date_of_birth.map(str::trim) {
            None => None,
            Some("") => Some(None),
            Some(s) => {
                let dob = parse_birth_date(s, today).map_err(|e| e.to_string())?;
                Some(Some(dob.format("%Y-%m-%d").to_string()))
            }
        },
        sex: form.sex.map(|s| parse_sex(Some(s))).transpose().map_err(|e| e.to_string())?,
    };

    let updated = UserProfile::update(&conn, user_id, &update)
        .map_err(|e| format!("Failed to update profile: {}", e))?;

    match updated {
        Some(p) => {
            let entry_count = BmiEntry::count_for_user(&conn, user_id)
                .map_err(|e| format!("Database error: {}", e))?;
            Ok(Some(summarize(&p, entry_count, today)))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn test_db() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| run_migrations(conn)).unwrap();
        db
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
    }

    #[test]
    fn test_register_user_is_idempotent() {
        let db = test_db();
        let first = register_user(&db, "user-1").unwrap();
        let second = register_user(&db, "user-1").unwrap();

        assert!(!first.onboarding_completed);
        assert_eq!(first.created_at, second.created_at);
        assert!(register_user(&db, "  ").is_err());
    }

    #[test]
    fn test_onboarding_us_user() {
        let db = test_db();
        register_user(&db, "user-1").unwrap();

        let form = ProfileForm {
            name: Some("Jo"),
            system: Some("us"),
            height: HeightInput { feet: Some(5.0), inches: Some(8.0), ..Default::default() },
            date_of_birth: Some("2000-06-15"),
            sex: Some("male"),
        };
        let summary = complete_onboarding(&db, "user-1", &form, today()).unwrap();

        assert!(summary.onboarding_completed);
        assert_eq!(summary.measurement_system_display, "US");
        assert_eq!(summary.height_formatted.as_deref(), Some("5'8\""));
        assert_eq!(summary.age, "23 years old");
        assert_eq!(summary.unit_labels.weight, "lbs");
        assert_eq!(summary.entry_count, 0);
    }

    #[test]
    fn test_onboarding_defaults() {
        let db = test_db();
        let form = ProfileForm {
            name: Some("Kim"),
            system: Some("metric"),
            ..Default::default()
        };
        let summary = complete_onboarding(&db, "user-2", &form, today()).unwrap();

        assert_eq!(summary.height_formatted.as_deref(), Some("170 cm"));
        assert_eq!(summary.age, "Not specified");
        assert_eq!(summary.sex, "not specified");
    }

    #[test]
    fn test_onboarding_requires_name_and_system() {
        let db = test_db();
        let form = ProfileForm { system: Some("uk"), ..Default::default() };
        assert_eq!(
            complete_onboarding(&db, "user-1", &form, today()).unwrap_err(),
            "Name and system are required"
        );

        let form = ProfileForm { name: Some("Kim"), system: Some("cubits"), ..Default::default() };
        assert!(complete_onboarding(&db, "user-1", &form, today()).is_err());
    }

    #[test]
    fn test_onboarding_rejects_future_birth_date() {
        let db = test_db();
        let form = ProfileForm {
            name: Some("Kim"),
            system: Some("metric"),
            date_of_birth: Some("2030-01-01"),
            ..Default::default()
        };
        assert!(complete_onboarding(&db, "user-1", &form, today()).is_err());
    }

    #[test]
    fn test_profile_summary_missing_user() {
        let db = test_db();
        assert!(get_profile_summary(&db, "ghost", today()).unwrap().is_none());
    }

    #[test]
    fn test_update_profile_switches_system() {
        let db = test_db();
        let form = ProfileForm {
            name: Some("Kim"),
            system: Some("metric"),
            height: HeightInput { height_cm: Some(182.88), ..Default::default() },
            ..Default::default()
        };
        complete_onboarding(&db, "user-1", &form, today()).unwrap();

        let update = ProfileForm { system: Some("uk"), ..Default::default() };
        let summary = update_profile(&db, "user-1", &update, today()).unwrap().unwrap();

        assert_eq!(summary.measurement_system, "uk");
        assert_eq!(summary.height_formatted.as_deref(), Some("6'0\""));
        assert_eq!(summary.unit_labels.weight, "st/lbs");
    }

    #[test]
    fn test_update_profile_blank_birth_date_clears_it() {
        let db = test_db();
        let form = ProfileForm {
            name: Some("Kim"),
            system: Some("metric"),
            date_of_birth: Some("2000-06-15"),
            ..Default::default()
        };
        let summary = complete_onboarding(&db, "user-1", &form, today()).unwrap();
        assert_eq!(summary.age, "23 years old");

        let update = ProfileForm { date_of_birth: Some(""), ..Default::default() };
        let summary = update_profile(&db, "user-1", &update, today()).unwrap().unwrap();
        assert_eq!(summary.age, "Not specified");
    }

    #[test]
    fn test_update_profile_rejects_wrong_height_units() {
        let db = test_db();
        let form = ProfileForm { name: Some("Kim"), system: Some("uk"), ..Default::default() };
        complete_onboarding(&db, "user-1", &form, today()).unwrap();

        let update = ProfileForm {
            height: HeightInput { height_cm: Some(175.0), ..Default::default() },
            ..Default::default()
        };
        assert_eq!(
            update_profile(&db, "user-1", &update, today()).unwrap_err(),
            "Height must be entered in feet and inches for uk units"
        );
    }
}
