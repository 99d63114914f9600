//! BMI entry model
//!
//! A height/weight observation owned by one user. Height and weight are
//! stored in cm and kg. The BMI column is written in the same statement as
//! height and weight on every insert and update, so it always matches them.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::metrics::compute_bmi;

/// A stored BMI entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiEntry {
    pub id: i64,
    pub user_id: String,
    pub timestamp: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiEntryCreate {
    pub timestamp: Option<String>,
    pub height_cm: f64,
    pub weight_kg: f64,
}

/// Data for updating an entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BmiEntryUpdate {
    pub timestamp: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
}

impl BmiEntry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            timestamp: row.get("timestamp")?,
            height_cm: row.get("height")?,
            weight_kg: row.get("weight")?,
            bmi: row.get("bmi")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create a new entry for a user
    pub fn create(conn: &Connection, user_id: &str, data: &BmiEntryCreate) -> DbResult<Self> {
        let timestamp = data.timestamp.clone().unwrap_or_else(|| {
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
        });
        let bmi = compute_bmi(data.height_cm, data.weight_kg);

        conn.execute(
            r#"
            INSERT INTO bmi_entries (user_id, timestamp, height, weight, bmi)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![user_id, timestamp, data.height_cm, data.weight_kg, bmi],
        )?;

        let id = conn.last_insert_rowid();
        tracing::info!(user_id, entry_id = id, bmi, "Created BMI entry");

        Self::get_by_id(conn, user_id, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get an entry by ID, only if it belongs to the user
    pub fn get_by_id(conn: &Connection, user_id: &str, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM bmi_entries WHERE id = ?1 AND user_id = ?2")?;

        let result = stmt.query_row(params![id, user_id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List a user's entries, newest first
    pub fn list_for_user(conn: &Connection, user_id: &str, limit: Option<i64>) -> DbResult<Vec<Self>> {
        let sql = match limit {
            Some(n) => format!(
                "SELECT * FROM bmi_entries WHERE user_id = ?1 ORDER BY timestamp DESC, id DESC LIMIT {}",
                n
            ),
            None => "SELECT * FROM bmi_entries WHERE user_id = ?1 ORDER BY timestamp DESC, id DESC".to_string(),
        };

        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// List a user's entries within an inclusive timestamp range, newest first
    pub fn list_in_range(
        conn: &Connection,
        user_id: &str,
        start: &str,
        end: &str,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM bmi_entries WHERE user_id = ?1 AND timestamp >= ?2 AND timestamp <= ?3 ORDER BY timestamp DESC, id DESC",
        )?;
        let entries = stmt
            .query_map(params![user_id, start, end], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Count a user's entries
    pub fn count_for_user(conn: &Connection, user_id: &str) -> DbResult<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM bmi_entries WHERE user_id = ?1",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Update an entry owned by the user.
    ///
    /// Unset fields keep their stored values; BMI is recomputed from the
    /// resulting height and weight in the same statement.
    pub fn update(
        conn: &Connection,
        user_id: &str,
        id: i64,
        data: &BmiEntryUpdate,
    ) -> DbResult<Option<Self>> {
        let existing = match Self::get_by_id(conn, user_id, id)? {
            Some(entry) => entry,
            None => return Ok(None),
        };

        let timestamp = data.timestamp.clone().unwrap_or(existing.timestamp);
        let height_cm = data.height_cm.unwrap_or(existing.height_cm);
        let weight_kg = data.weight_kg.unwrap_or(existing.weight_kg);
        let bmi = compute_bmi(height_cm, weight_kg);

        conn.execute(
            r#"
            UPDATE bmi_entries
            SET timestamp = ?1, height = ?2, weight = ?3, bmi = ?4, updated_at = datetime('now')
            WHERE id = ?5 AND user_id = ?6
            "#,
            params![timestamp, height_cm, weight_kg, bmi, id, user_id],
        )?;
        tracing::info!(user_id, entry_id = id, bmi, "Updated BMI entry");

        Self::get_by_id(conn, user_id, id)
    }

    /// Delete an entry owned by the user
    pub fn delete(conn: &Connection, user_id: &str, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM bmi_entries WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }

    /// Recompute the stored BMI of every entry from its height and weight.
    ///
    /// Returns the number of rows whose stored value changed.
    pub fn recalculate_all(conn: &mut Connection) -> DbResult<usize> {
        let tx = conn.transaction()?;
        let mut changed = 0;
        {
            let mut select = tx.prepare("SELECT id, height, weight, bmi FROM bmi_entries")?;
            let rows = select
                .query_map([], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, f64>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, f64>(3)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            let mut update = tx.prepare(
                "UPDATE bmi_entries SET bmi = ?1, updated_at = datetime('now') WHERE id = ?2",
            )?;
            for (id, height_cm, weight_kg, stored_bmi) in rows {
                let bmi = compute_bmi(height_cm, weight_kg);
                if bmi != stored_bmi {
                    update.execute(params![bmi, id])?;
                    changed += 1;
                }
            }
        }
        tx.commit()?;

        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::UserProfile;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        UserProfile::create_if_missing(&conn, "alice").unwrap();
        UserProfile::create_if_missing(&conn, "bob").unwrap();
        conn
    }

    fn entry(timestamp: &str, height_cm: f64, weight_kg: f64) -> BmiEntryCreate {
        BmiEntryCreate {
            timestamp: Some(timestamp.to_string()),
            height_cm,
            weight_kg,
        }
    }

    #[test]
    fn test_create_computes_bmi() {
        let conn = test_conn();
        let created = BmiEntry::create(&conn, "alice", &entry("2025-01-01", 180.0, 75.0)).unwrap();

        assert_eq!(created.user_id, "alice");
        assert!((created.bmi - 23.148).abs() < 0.001);
    }

    #[test]
    fn test_create_defaults_timestamp() {
        let conn = test_conn();
        let data = BmiEntryCreate { timestamp: None, height_cm: 170.0, weight_kg: 70.0 };
        let created = BmiEntry::create(&conn, "alice", &data).unwrap();
        assert!(created.timestamp.ends_with('Z'));
    }

    #[test]
    fn test_update_recomputes_bmi() {
        let conn = test_conn();
        let created = BmiEntry::create(&conn, "alice", &entry("2025-01-01", 180.0, 75.0)).unwrap();

        let update = BmiEntryUpdate { weight_kg: Some(81.0), ..Default::default() };
        let updated = BmiEntry::update(&conn, "alice", created.id, &update).unwrap().unwrap();

        assert_eq!(updated.height_cm, 180.0);
        assert_eq!(updated.weight_kg, 81.0);
        assert_eq!(updated.bmi, compute_bmi(180.0, 81.0));
        assert_eq!(updated.timestamp, "2025-01-01");
    }

    #[test]
    fn test_entries_are_scoped_to_owner() {
        let conn = test_conn();
        let created = BmiEntry::create(&conn, "alice", &entry("2025-01-01", 165.0, 60.0)).unwrap();

        assert!(BmiEntry::get_by_id(&conn, "bob", created.id).unwrap().is_none());
        assert!(BmiEntry::list_for_user(&conn, "bob", None).unwrap().is_empty());

        let update = BmiEntryUpdate { weight_kg: Some(99.0), ..Default::default() };
        assert!(BmiEntry::update(&conn, "bob", created.id, &update).unwrap().is_none());
        assert!(!BmiEntry::delete(&conn, "bob", created.id).unwrap());

        let still_there = BmiEntry::get_by_id(&conn, "alice", created.id).unwrap().unwrap();
        assert_eq!(still_there.weight_kg, 60.0);
    }

    #[test]
    fn test_list_newest_first_with_limit() {
        let conn = test_conn();
        BmiEntry::create(&conn, "alice", &entry("2025-01-01", 170.0, 70.0)).unwrap();
        BmiEntry::create(&conn, "alice", &entry("2025-03-01", 170.0, 68.0)).unwrap();
        BmiEntry::create(&conn, "alice", &entry("2025-02-01", 170.0, 69.0)).unwrap();

        let all = BmiEntry::list_for_user(&conn, "alice", None).unwrap();
        let dates: Vec<&str> = all.iter().map(|e| e.timestamp.as_str()).collect();
        assert_eq!(dates, vec!["2025-03-01", "2025-02-01", "2025-01-01"]);

        let limited = BmiEntry::list_for_user(&conn, "alice", Some(1)).unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(BmiEntry::count_for_user(&conn, "alice").unwrap(), 3);
    }

    #[test]
    fn test_list_in_range() {
        let conn = test_conn();
        BmiEntry::create(&conn, "alice", &entry("2025-01-01", 170.0, 70.0)).unwrap();
        BmiEntry::create(&conn, "alice", &entry("2025-02-01", 170.0, 69.0)).unwrap();
        BmiEntry::create(&conn, "alice", &entry("2025-03-01", 170.0, 68.0)).unwrap();

        let entries = BmiEntry::list_in_range(&conn, "alice", "2025-01-15", "2025-03-01").unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_delete() {
        let conn = test_conn();
        let created = BmiEntry::create(&conn, "alice", &entry("2025-01-01", 170.0, 70.0)).unwrap();

        assert!(BmiEntry::delete(&conn, "alice", created.id).unwrap());
        assert!(BmiEntry::get_by_id(&conn, "alice", created.id).unwrap().is_none());
    }

    #[test]
    fn test_recalculate_all_repairs_stale_bmi() {
        let mut conn = test_conn();
        let created = BmiEntry::create(&conn, "alice", &entry("2025-01-01", 180.0, 75.0)).unwrap();
        BmiEntry::create(&conn, "bob", &entry("2025-01-01", 160.0, 50.0)).unwrap();

        conn.execute("UPDATE bmi_entries SET bmi = 1.0 WHERE id = ?1", [created.id]).unwrap();

        assert_eq!(BmiEntry::recalculate_all(&mut conn).unwrap(), 1);
        let repaired = BmiEntry::get_by_id(&conn, "alice", created.id).unwrap().unwrap();
        assert_eq!(repaired.bmi, compute_bmi(180.0, 75.0));
    }

    #[test]
    fn test_entry_requires_existing_user() {
        let conn = test_conn();
        assert!(BmiEntry::create(&conn, "mallory", &entry("2025-01-01", 170.0, 70.0)).is_err());
    }
}
