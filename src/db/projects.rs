//! Project CRUD. Every query is scoped to the owning user.

use super::users::ensure_user_internal;
use super::{Database, now_ms};
use crate::error::ApiError;
use crate::types::Project;
use anyhow::Result;
use rusqlite::{Row, params};
use uuid::Uuid;

fn parse_project_row(row: &Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        color: row.get("color")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

impl Database {
    /// Create a new project for a user.
    pub fn create_project(
        &self,
        user_id: &str,
        name: String,
        description: Option<String>,
        color: Option<String>,
    ) -> Result<Project> {
        let project_id = Uuid::now_v7().to_string();
        let now = now_ms();

        self.with_conn(|conn| {
            ensure_user_internal(conn, user_id)?;

            conn.execute(
                "INSERT INTO projects (id, user_id, name, description, color, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![&project_id, user_id, &name, &description, &color, now, now],
            )?;

            Ok(Project {
                id: project_id,
                user_id: user_id.to_string(),
                name,
                description,
                color,
                created_at: now,
                updated_at: now,
            })
        })
    }

    /// Get a project by id, scoped to its owner.
    pub fn get_project(&self, project_id: &str, user_id: &str) -> Result<Option<Project>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM projects WHERE id = ?1 AND user_id = ?2")?;

            let result = stmt.query_row(params![project_id, user_id], parse_project_row);

            match result {
                Ok(project) => Ok(Some(project)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// List all projects owned by a user.
    pub fn list_projects(&self, user_id: &str) -> Result<Vec<Project>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT * FROM projects WHERE user_id = ?1 ORDER BY created_at")?;
            let projects = stmt
                .query_map(params![user_id], parse_project_row)?
                .filter_map(|r| r.ok())
                .collect();
            Ok(projects)
        })
    }

    /// Update a project. Absent fields are left unchanged.
    pub fn update_project(
        &self,
        project_id: &str,
        user_id: &str,
        name: Option<String>,
        description: Option<String>,
        color: Option<String>,
    ) -> Result<Project> {
        let now = now_ms();

        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM projects WHERE id = ?1 AND user_id = ?2")?;
            let project = stmt
                .query_row(params![project_id, user_id], parse_project_row)
                .map_err(|_| ApiError::project_not_found(project_id))?;
            drop(stmt);

            let new_name = name.unwrap_or(project.name);
            let new_description = description.or(project.description);
            let new_color = color.or(project.color);

            conn.execute(
                "UPDATE projects SET name = ?1, description = ?2, color = ?3, updated_at = ?4
                 WHERE id = ?5 AND user_id = ?6",
                params![new_name, new_description, new_color, now, project_id, user_id],
            )?;

            Ok(Project {
                id: project_id.to_string(),
                user_id: user_id.to_string(),
                name: new_name,
                description: new_description,
                color: new_color,
                created_at: project.created_at,
                updated_at: now,
            })
        })
    }

    /// Delete a project. Tasks keep existing with their project link
    /// cleared (FK ON DELETE SET NULL). Returns false when not found.
    pub fn delete_project(&self, project_id: &str, user_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute(
                "DELETE FROM projects WHERE id = ?1 AND user_id = ?2",
                params![project_id, user_id],
            )?;
            Ok(deleted > 0)
        })
    }
}
