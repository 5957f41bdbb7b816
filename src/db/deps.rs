//! Task dependency edges. A task cannot depend on itself, directly or
//! transitively.

use super::tasks::{get_task_internal, parse_task_row};
use super::{Database, now_ms};
use crate::error::ApiError;
use crate::types::Task;
use anyhow::Result;
use rusqlite::{Connection, params};
use std::collections::{HashSet, VecDeque};

/// Check whether adding `task_id -> depends_on` would create a cycle.
/// A cycle exists when `task_id` is already reachable from `depends_on`.
fn would_create_cycle(conn: &Connection, task_id: &str, depends_on: &str) -> Result<bool> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    queue.push_back(depends_on.to_string());

    while let Some(current) = queue.pop_front() {
        if current == task_id {
            return Ok(true);
        }

        if !visited.insert(current.clone()) {
            continue;
        }

        let mut stmt =
            conn.prepare("SELECT depends_on FROM task_dependencies WHERE task_id = ?1")?;
        let next: Vec<String> = stmt
            .query_map(params![&current], |row| row.get(0))?
            .filter_map(|r| r.ok())
            .collect();

        queue.extend(next);
    }

    Ok(false)
}

impl Database {
    /// Add a dependency edge between two of the user's tasks.
    pub fn add_dependency(&self, user_id: &str, task_id: &str, depends_on: &str) -> Result<()> {
        self.with_conn(|conn| {
            if task_id == depends_on {
                return Err(ApiError::invalid_value(
                    "depends_on",
                    "A task cannot depend on itself",
                )
                .into());
            }

            // Both endpoints must exist and belong to the caller.
            if get_task_internal(conn, task_id, user_id)?.is_none() {
                return Err(ApiError::task_not_found(task_id).into());
            }
            if get_task_internal(conn, depends_on, user_id)?.is_none() {
                return Err(ApiError::task_not_found(depends_on).into());
            }

            if would_create_cycle(conn, task_id, depends_on)? {
                return Err(ApiError::dependency_cycle(task_id, depends_on).into());
            }

            let inserted = conn.execute(
                "INSERT OR IGNORE INTO task_dependencies (task_id, depends_on, created_at)
                 VALUES (?1, ?2, ?3)",
                params![task_id, depends_on, now_ms()],
            )?;

            if inserted == 0 {
                return Err(ApiError::already_exists(format!(
                    "Task {} already depends on {}",
                    task_id, depends_on
                ))
                .into());
            }

            Ok(())
        })
    }

    /// Remove a dependency edge. Returns false when no such edge exists.
    pub fn remove_dependency(
        &self,
        user_id: &str,
        task_id: &str,
        depends_on: &str,
    ) -> Result<bool> {
        self.with_conn(|conn| {
            if get_task_internal(conn, task_id, user_id)?.is_none() {
                return Err(ApiError::task_not_found(task_id).into());
            }

            let deleted = conn.execute(
                "DELETE FROM task_dependencies WHERE task_id = ?1 AND depends_on = ?2",
                params![task_id, depends_on],
            )?;
            Ok(deleted > 0)
        })
    }

    /// List the tasks a task directly depends on.
    pub fn list_dependencies(&self, user_id: &str, task_id: &str) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            if get_task_internal(conn, task_id, user_id)?.is_none() {
                return Err(ApiError::task_not_found(task_id).into());
            }

            let mut stmt = conn.prepare(
                "SELECT t.* FROM tasks t
                 INNER JOIN task_dependencies d ON t.id = d.depends_on
                 WHERE d.task_id = ?1
                 ORDER BY t.created_at",
            )?;

            let tasks = stmt
                .query_map(params![task_id], parse_task_row)?
                .filter_map(|r| r.ok())
                .collect();

            Ok(tasks)
        })
    }
}
