//! User profile model
//!
//! One row per authenticated user. Holds the measurement system used for all
//! input and display, the reference height, and optional demographics.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::units::MeasurementSystem;

/// Sex recorded on a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    #[default]
    NotSpecified,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::NotSpecified => "not specified",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', " ").as_str() {
            "male" | "m" => Some(Sex::Male),
            "female" | "f" => Some(Sex::Female),
            "not specified" | "prefer not to say" | "" => Some(Sex::NotSpecified),
            _ => None,
        }
    }
}

/// A user's profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: Option<String>,
    pub measurement_system: MeasurementSystem,
    /// Reference height in cm, used when an entry omits height
    pub height_cm: Option<f64>,
    /// ISO date (YYYY-MM-DD)
    pub date_of_birth: Option<String>,
    pub sex: Sex,
    pub onboarding_completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Data collected by the onboarding form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileOnboarding {
    pub name: String,
    pub measurement_system: MeasurementSystem,
    pub height_cm: f64,
    pub date_of_birth: Option<String>,
    pub sex: Sex,
}

/// Data for amending a profile after onboarding
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub measurement_system: Option<MeasurementSystem>,
    pub height_cm: Option<f64>,
    /// `Some(None)` clears the stored date of birth
    pub date_of_birth: Option<Option<String>>,
    pub sex: Option<Sex>,
}

impl UserProfile {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let system_str: String = row.get("system_of_measurement")?;
        let sex_str: String = row.get("sex")?;

        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            measurement_system: MeasurementSystem::from_str(&system_str).unwrap_or_default(),
            height_cm: row.get("height")?,
            date_of_birth: row.get("date_of_birth")?,
            sex: Sex::from_str(&sex_str).unwrap_or_default(),
            onboarding_completed: row.get("onboarding_completed")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Parsed date of birth, if one is recorded and valid
    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.date_of_birth
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    }

    /// Create an empty profile on first authentication. Existing profiles are left untouched.
    pub fn create_if_missing(conn: &Connection, user_id: &str) -> DbResult<Self> {
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO users (id, onboarding_completed) VALUES (?1, 0)",
            [user_id],
        )?;
        if inserted > 0 {
            tracing::info!(user_id, "Created user profile");
        }

        Self::get(conn, user_id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a profile by user ID
    pub fn get(conn: &Connection, user_id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?1")?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Store onboarding answers and mark onboarding complete (upsert)
    pub fn complete_onboarding(
        conn: &Connection,
        user_id: &str,
        data: &ProfileOnboarding,
    ) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO users (id, name, system_of_measurement, height, date_of_birth, sex, onboarding_completed)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                system_of_measurement = excluded.system_of_measurement,
                height = excluded.height,
                date_of_birth = excluded.date_of_birth,
                sex = excluded.sex,
                onboarding_completed = 1,
                updated_at = datetime('now')
            "#,
            params![
                user_id,
                data.name,
                data.measurement_system.as_str(),
                data.height_cm,
                data.date_of_birth,
                data.sex.as_str(),
            ],
        )?;

        Self::get(conn, user_id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Amend a profile
    pub fn update(conn: &Connection, user_id: &str, data: &ProfileUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.clone()));
        }
        if let Some(system) = data.measurement_system {
            updates.push(format!("system_of_measurement = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(system.as_str()));
        }
        if let Some(height) = data.height_cm {
            updates.push(format!("height = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(height));
        }
        if let Some(ref dob) = data.date_of_birth {
            updates.push(format!("date_of_birth = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(dob.clone()));
        }
        if let Some(sex) = data.sex {
            updates.push(format!("sex = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(sex.as_str()));
        }

        if updates.is_empty() {
            return Self::get(conn, user_id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE users SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(user_id.to_string()));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get(conn, user_id)
    }
}
