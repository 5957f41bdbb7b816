//! User records. Identity lives in the external provider; rows here exist
//! so owned records have something to cascade from.

use super::{Database, now_ms};
use crate::types::User;
use anyhow::Result;
use rusqlite::{Connection, Row, params};

fn parse_user_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        email: row.get("email")?,
        display_name: row.get("display_name")?,
        created_at: row.get("created_at")?,
    })
}

/// Insert a bare user row if none exists yet. Called before the first
/// owned-record insert so foreign keys hold for callers that never
/// registered explicitly.
pub fn ensure_user_internal(conn: &Connection, user_id: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO users (id, created_at) VALUES (?1, ?2)",
        params![user_id, now_ms()],
    )?;
    Ok(())
}

impl Database {
    /// Register or update a user. The id comes from the identity provider.
    pub fn upsert_user(
        &self,
        user_id: &str,
        email: Option<String>,
        display_name: Option<String>,
    ) -> Result<User> {
        let now = now_ms();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, email, display_name, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                    email = COALESCE(excluded.email, email),
                    display_name = COALESCE(excluded.display_name, display_name)",
                params![user_id, email, display_name, now],
            )?;

            let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?1")?;
            Ok(stmt.query_row(params![user_id], parse_user_row)?)
        })
    }

    /// Get a user by id.
    pub fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?1")?;

            let result = stmt.query_row(params![user_id], parse_user_row);

            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Delete a user and, via foreign keys, every record they own.
    /// Returns false when no such user exists.
    pub fn delete_user(&self, user_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM users WHERE id = ?1", params![user_id])?;
            Ok(deleted > 0)
        })
    }

}
