//! Energy log storage. Logs are append-only; the only deletions are the
//! age-based retention sweep and the user cascade.

use super::users::ensure_user_internal;
use super::{Database, now_ms};
use crate::types::{EnergyLevel, EnergyLog};
use anyhow::Result;
use rusqlite::{Row, params};
use uuid::Uuid;

/// Milliseconds per day, for window and retention arithmetic.
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

fn parse_energy_log_row(row: &Row) -> rusqlite::Result<EnergyLog> {
    let mood_tags_json: String = row.get("mood_tags")?;

    Ok(EnergyLog {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        energy_level: row.get("energy_level")?,
        mood_tags: serde_json::from_str(&mood_tags_json).unwrap_or_default(),
        notes: row.get("notes")?,
        logged_at: row.get("logged_at")?,
    })
}

impl Database {
    /// Record an energy level. `logged_at` defaults to now; callers have
    /// already validated the level against the 1..=5 domain.
    pub fn create_energy_log(
        &self,
        user_id: &str,
        energy_level: EnergyLevel,
        mood_tags: Vec<String>,
        notes: Option<String>,
        logged_at: Option<i64>,
    ) -> Result<EnergyLog> {
        let log_id = Uuid::now_v7().to_string();
        let logged_at = logged_at.unwrap_or_else(now_ms);
        let mood_tags_json = serde_json::to_string(&mood_tags)?;

        self.with_conn(|conn| {
            ensure_user_internal(conn, user_id)?;

            conn.execute(
                "INSERT INTO energy_logs (id, user_id, energy_level, mood_tags, notes, logged_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![&log_id, user_id, energy_level, mood_tags_json, &notes, logged_at],
            )?;

            Ok(EnergyLog {
                id: log_id,
                user_id: user_id.to_string(),
                energy_level,
                mood_tags,
                notes,
                logged_at,
            })
        })
    }

    /// Get one log by id, scoped to its owner.
    pub fn get_energy_log(&self, log_id: &str, user_id: &str) -> Result<Option<EnergyLog>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM energy_logs WHERE id = ?1 AND user_id = ?2")?;

            let result = stmt.query_row(params![log_id, user_id], parse_energy_log_row);

            match result {
                Ok(log) => Ok(Some(log)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// List a user's logs recorded at or after `since_ms`, newest first.
    pub fn list_energy_logs(&self, user_id: &str, since_ms: i64) -> Result<Vec<EnergyLog>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM energy_logs
                 WHERE user_id = ?1 AND logged_at >= ?2
                 ORDER BY logged_at DESC",
            )?;
            let logs = stmt
                .query_map(params![user_id, since_ms], parse_energy_log_row)?
                .filter_map(|r| r.ok())
                .collect();
            Ok(logs)
        })
    }

    /// The user's most recent log, if any.
    pub fn latest_energy_log(&self, user_id: &str) -> Result<Option<EnergyLog>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM energy_logs WHERE user_id = ?1
                 ORDER BY logged_at DESC LIMIT 1",
            )?;

            let result = stmt.query_row(params![user_id], parse_energy_log_row);

            match result {
                Ok(log) => Ok(Some(log)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Retention sweep: delete every log older than the cutoff, across all
    /// users. Returns the number of rows removed.
    pub fn delete_energy_logs_before(&self, cutoff_ms: i64) -> Result<usize> {
        self.with_conn(|conn| {
            let deleted = conn.execute(
                "DELETE FROM energy_logs WHERE logged_at < ?1",
                params![cutoff_ms],
            )?;
            Ok(deleted)
        })
    }
}
