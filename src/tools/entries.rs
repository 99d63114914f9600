//! BMI Entry MCP Tools
//!
//! Entry form and dashboard operations. Input arrives in the user's
//! measurement system, is stored in cm/kg, and is rendered back in the
//! user's system on the way out.

use serde::Serialize;

use crate::db::Database;
use crate::metrics::{bmi_trend, classify_bmi, compute_bmi, format_bmi, BmiTrend};
use crate::models::{BmiEntry, BmiEntryCreate, BmiEntryUpdate, UserProfile};
use crate::tools::input::{
    parse_date, parse_entry_timestamp, parse_system, resolve_height, resolve_weight, HeightInput, WeightInput,
};
use crate::units::{
    format_height_for_display, format_weight_for_display, height_from_metric, unit_labels,
    weight_from_metric, HeightValue, MeasurementSystem, UnitLabels, WeightValue,
};

/// Entry form fields
#[derive(Debug, Clone, Default)]
pub struct EntryForm<'a> {
    pub date: Option<&'a str>,
    pub height: HeightInput,
    pub weight: WeightInput,
}

/// A stored entry rendered in the user's measurement system
#[derive(Debug, Serialize)]
pub struct BmiEntryView {
    pub id: i64,
    pub timestamp: String,
    pub height: HeightValue,
    pub height_formatted: String,
    pub weight: WeightValue,
    pub weight_formatted: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub bmi_formatted: String,
    pub category: String,
}

impl BmiEntryView {
    pub fn new(entry: &BmiEntry, system: MeasurementSystem) -> Self {
        Self {
            id: entry.id,
            timestamp: entry.timestamp.clone(),
            height: height_from_metric(entry.height_cm, system),
            height_formatted: format_height_for_display(entry.height_cm, system),
            weight: weight_from_metric(entry.weight_kg, system),
            weight_formatted: format_weight_for_display(entry.weight_kg, system),
            height_cm: entry.height_cm,
            weight_kg: entry.weight_kg,
            bmi: entry.bmi,
            bmi_formatted: format_bmi(entry.bmi),
            category: classify_bmi(entry.bmi).label().to_string(),
        }
    }
}

/// Response for list_bmi_entries
#[derive(Debug, Serialize)]
pub struct ListBmiEntriesResponse {
    pub measurement_system: String,
    pub unit_labels: UnitLabels,
    pub entries: Vec<BmiEntryView>,
    pub total: usize,
}

/// Response for get_bmi_trend
#[derive(Debug, Serialize)]
pub struct BmiTrendResponse {
    pub trend: Option<BmiTrend>,
    pub first_weight: Option<String>,
    pub latest_weight: Option<String>,
}

/// Response for calculate_bmi
#[derive(Debug, Serialize)]
pub struct BmiPreview {
    pub measurement_system: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub height_formatted: String,
    pub weight_formatted: String,
    pub bmi: f64,
    pub bmi_formatted: String,
    pub category: String,
}

/// Response for delete operations
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_id: i64,
}

fn weight_given(input: &WeightInput) -> bool {
    input.weight.is_some() || input.stones.is_some() || input.pounds.is_some()
}

/// Load the user's profile, requiring onboarding to be complete
fn onboarded_profile(conn: &rusqlite::Connection, user_id: &str) -> Result<UserProfile, String> {
    let profile = UserProfile::get(conn, user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .ok_or_else(|| format!("Profile not found for user: {}", user_id))?;

    if !profile.onboarding_completed {
        return Err("Onboarding not completed".to_string());
    }
    Ok(profile)
}

/// Add a new entry. Height falls back to the profile's reference height.
pub fn add_bmi_entry(db: &Database, user_id: &str, form: &EntryForm<'_>) -> Result<BmiEntryView, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profile = onboarded_profile(&conn, user_id)?;
    let system = profile.measurement_system;

    let timestamp = form
        .date
        .map(parse_entry_timestamp)
        .transpose()
        .map_err(|e| e.to_string())?;
    let height_cm = resolve_height(&form.height, system)
        .map_err(|e| e.to_string())?
        .or(profile.height_cm)
        .ok_or("Height is required")?;
    let weight_kg = resolve_weight(&form.weight, system).map_err(|e| e.to_string())?;

    let data = BmiEntryCreate {
        timestamp,
        height_cm,
        weight_kg,
    };
    let entry = BmiEntry::create(&conn, user_id, &data)
        .map_err(|e| format!("Failed to add entry: {}", e))?;

    Ok(BmiEntryView::new(&entry, system))
}

/// Calculate BMI for values in the given system without storing anything
pub fn calculate_bmi(system: &str, height: &HeightInput, weight: &WeightInput) -> Result<BmiPreview, String> {
    let system = parse_system(system).map_err(|e| e.to_string())?;
    let height_cm = resolve_height(height, system)
        .map_err(|e| e.to_string())?
        .ok_or("Height is required")?;
    let weight_kg = resolve_weight(weight, system).map_err(|e| e.to_string())?;
    let bmi = compute_bmi(height_cm, weight_kg);

    Ok(BmiPreview {
        measurement_system: system.as_str().to_string(),
        height_cm,
        weight_kg,
        height_formatted: format_height_for_display(height_cm, system),
        weight_formatted: format_weight_for_display(weight_kg, system),
        bmi,
        bmi_formatted: format_bmi(bmi),
        category: classify_bmi(bmi).label().to_string(),
    })
}

/// Update an entry. Omitted fields keep their stored values.
pub fn update_bmi_entry(
    db: &Database,
    user_id: &str,
    id: i64,
    form: &EntryForm<'_>,
) -> Result<Option<BmiEntryView>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profile = onboarded_profile(&conn, user_id)?;
    let system = profile.measurement_system;

    let weight_kg = if weight_given(&form.weight) {
        Some(resolve_weight(&form.weight, system).map_err(|e| e.to_string())?)
    } else {
        None
    };

    let data = BmiEntryUpdate {
        timestamp: form
            .date
            .map(parse_entry_timestamp)
            .transpose()
            .map_err(|e| e.to_string())?,
        height_cm: resolve_height(&form.height, system).map_err(|e| e.to_string())?,
        weight_kg,
    };

    let updated = BmiEntry::update(&conn, user_id, id, &data)
        .map_err(|e| format!("Failed to update entry: {}", e))?;

    Ok(updated.map(|entry| BmiEntryView::new(&entry, system)))
}

/// Delete an entry
pub fn delete_bmi_entry(db: &Database, user_id: &str, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = BmiEntry::delete(&conn, user_id, id)
        .map_err(|e| format!("Failed to delete entry: {}", e))?;

    if !deleted {
        return Err(format!("BMI entry not found with id: {}", id));
    }
    tracing::info!(user_id, entry_id = id, "Deleted BMI entry");

    Ok(DeleteResponse {
        success: true,
        deleted_id: id,
    })
}

/// Get one entry in the user's measurement system
pub fn get_bmi_entry(db: &Database, user_id: &str, id: i64) -> Result<Option<BmiEntryView>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profile = onboarded_profile(&conn, user_id)?;

    let entry = BmiEntry::get_by_id(&conn, user_id, id)
        .map_err(|e| format!("Failed to get entry: {}", e))?;

    Ok(entry.map(|e| BmiEntryView::new(&e, profile.measurement_system)))
}

/// List entries, newest first
pub fn list_bmi_entries(
    db: &Database,
    user_id: &str,
    limit: Option<i64>,
) -> Result<ListBmiEntriesResponse, String> {
    if matches!(limit, Some(n) if n < 1) {
        return Err("Limit must be at least 1".to_string());
    }
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profile = onboarded_profile(&conn, user_id)?;
    let system = profile.measurement_system;

    let entries = BmiEntry::list_for_user(&conn, user_id, limit)
        .map_err(|e| format!("Failed to list entries: {}", e))?;

    let views: Vec<BmiEntryView> = entries.iter().map(|e| BmiEntryView::new(e, system)).collect();
    let total = views.len();

    Ok(ListBmiEntriesResponse {
        measurement_system: system.as_str().to_string(),
        unit_labels: unit_labels(system),
        entries: views,
        total,
    })
}

/// Summarise how BMI changed, optionally within an inclusive date range
pub fn get_bmi_trend(
    db: &Database,
    user_id: &str,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<BmiTrendResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profile = onboarded_profile(&conn, user_id)?;
    let system = profile.measurement_system;

    let entries = match (start_date, end_date) {
        (None, None) => BmiEntry::list_for_user(&conn, user_id, None),
        (start, end) => {
            let start = match start {
                Some(s) => parse_date(s).map_err(|e| e.to_string())?.format("%Y-%m-%d").to_string(),
                None => "0000-01-01".to_string(),
            };
            // Date-only ends cover the whole day
            let end = match end {
                Some(s) => parse_date(s).map_err(|e| e.to_string())?.format("%Y-%m-%dT23:59:59Z").to_string(),
                None => "9999-12-31T23:59:59Z".to_string(),
            };
            BmiEntry::list_in_range(&conn, user_id, &start, &end)
        }
    }
    .map_err(|e| format!("Failed to list entries: {}", e))?;

    let trend = bmi_trend(entries.iter().map(|e| (e.timestamp.as_str(), e.id, e.bmi)));

    let weight_of = |id: i64| {
        entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| format_weight_for_display(e.weight_kg, system))
    };
    let first_weight = trend.as_ref().and_then(|t| weight_of(t.first_id));
    let latest_weight = trend.as_ref().and_then(|t| weight_of(t.latest_id));

    Ok(BmiTrendResponse {
        trend,
        first_weight,
        latest_weight,
    })
}
