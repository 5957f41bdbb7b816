//! Aggregation queries for per-user statistics.

use super::Database;
use crate::types::{TaskStatus, UserStats};
use anyhow::Result;
use rusqlite::params;
use std::collections::HashMap;

impl Database {
    /// Aggregate statistics for one user.
    pub fn user_stats(&self, user_id: &str) -> Result<UserStats> {
        self.with_conn(|conn| {
            let (total_tasks, total_points, completed_points): (i64, i64, i64) = conn.query_row(
                "SELECT
                    COUNT(*) as total_tasks,
                    COALESCE(SUM(points), 0) as total_points,
                    COALESCE(SUM(CASE WHEN status = 'completed' THEN points ELSE 0 END), 0)
                        as completed_points
                 FROM tasks WHERE user_id = ?1",
                params![user_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?;

            // Initialize all statuses to 0 so absent ones still appear.
            let mut tasks_by_status: HashMap<String, i64> = HashMap::new();
            for status in [TaskStatus::Pending, TaskStatus::Completed] {
                tasks_by_status.insert(status.as_str().to_string(), 0);
            }

            let mut stmt = conn.prepare(
                "SELECT status, COUNT(*) as cnt FROM tasks WHERE user_id = ?1 GROUP BY status",
            )?;
            let status_counts: Vec<(String, i64)> = stmt
                .query_map(params![user_id], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
                })?
                .filter_map(|r| r.ok())
                .collect();

            for (status, count) in status_counts {
                tasks_by_status.insert(status, count);
            }

            let energy_logs: i64 = conn.query_row(
                "SELECT COUNT(*) FROM energy_logs WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )?;

            Ok(UserStats {
                total_tasks,
                tasks_by_status,
                total_points,
                completed_points,
                energy_logs,
            })
        })
    }
}
