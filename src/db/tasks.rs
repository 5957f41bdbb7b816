//! Task CRUD, completion, and energy-matched suggestions.

use super::users::ensure_user_internal;
use super::{Database, now_ms};
use crate::error::ApiError;
use crate::scoring;
use crate::types::{
    CompletionResult, ENERGY_REQUIREMENT_DEFAULT, EnergyLevel, NewTask, PRIORITY_DEFAULT,
    Priority, Task, TaskStatus, TaskUpdate, TaskWithEnergyMatch,
};
use anyhow::Result;
use rusqlite::{Connection, Row, params};
use uuid::Uuid;

/// Build an ORDER BY clause from sort_by and sort_order parameters.
/// Returns a safe SQL ORDER BY expression.
fn build_order_clause(sort_by: Option<&str>, sort_order: Option<&str>) -> String {
    let order = match sort_order {
        Some("asc") => "ASC",
        Some("desc") => "DESC",
        _ => match sort_by {
            // Priority defaults to descending (higher = more important),
            // due dates to ascending (soonest first), dates to descending.
            Some("priority") => "DESC",
            Some("due_date") => "ASC",
            _ => "DESC",
        },
    };

    match sort_by {
        Some("priority") => format!("t.priority {}", order),
        // Undated tasks always sort last regardless of direction.
        Some("due_date") => format!("t.due_date IS NULL, t.due_date {}", order),
        _ => format!("t.created_at {}", order),
    }
}

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let status: String = row.get("status")?;

    Ok(Task {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        project_id: row.get("project_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        energy_requirement: row.get("energy_requirement")?,
        priority: row.get("priority")?,
        status: TaskStatus::from_str(&status).unwrap_or(TaskStatus::Pending),
        due_date: row.get("due_date")?,
        points: row.get("points")?,
        estimated_duration: row.get("estimated_duration")?,
        actual_duration: row.get("actual_duration")?,
        completed_at: row.get("completed_at")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Internal helper to get a task using an existing connection.
pub(super) fn get_task_internal(
    conn: &Connection,
    task_id: &str,
    user_id: &str,
) -> Result<Option<Task>> {
    let mut stmt = conn.prepare("SELECT * FROM tasks WHERE id = ?1 AND user_id = ?2")?;

    let result = stmt.query_row(params![task_id, user_id], parse_task_row);

    match result {
        Ok(task) => Ok(Some(task)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Database {
    /// Create a new task. Points are derived from priority and energy
    /// requirement, defaulting both to 3 when absent.
    pub fn create_task(&self, user_id: &str, input: NewTask) -> Result<Task> {
        let task_id = Uuid::now_v7().to_string();
        let now = now_ms();
        let priority = input.priority.unwrap_or(PRIORITY_DEFAULT);
        let energy_requirement = input
            .energy_requirement
            .unwrap_or(ENERGY_REQUIREMENT_DEFAULT);
        let points = scoring::base_points(priority, energy_requirement);

        self.with_conn(|conn| {
            ensure_user_internal(conn, user_id)?;

            // Cross-user project references are a not-found, not a link.
            if let Some(ref project_id) = input.project_id {
                let owned: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM projects WHERE id = ?1 AND user_id = ?2)",
                    params![project_id, user_id],
                    |row| row.get(0),
                )?;
                if !owned {
                    return Err(ApiError::project_not_found(project_id).into());
                }
            }

            conn.execute(
                "INSERT INTO tasks (
                    id, user_id, project_id, title, description,
                    energy_requirement, priority, status, due_date, points,
                    estimated_duration, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    &task_id,
                    user_id,
                    &input.project_id,
                    &input.title,
                    &input.description,
                    energy_requirement,
                    priority,
                    TaskStatus::Pending.as_str(),
                    input.due_date,
                    points,
                    input.estimated_duration,
                    now,
                    now,
                ],
            )?;

            Ok(Task {
                id: task_id,
                user_id: user_id.to_string(),
                project_id: input.project_id,
                title: input.title,
                description: input.description,
                energy_requirement,
                priority,
                status: TaskStatus::Pending,
                due_date: input.due_date,
                points,
                estimated_duration: input.estimated_duration,
                actual_duration: None,
                completed_at: None,
                created_at: now,
                updated_at: now,
            })
        })
    }

    /// Get a task by id, scoped to its owner.
    pub fn get_task(&self, task_id: &str, user_id: &str) -> Result<Option<Task>> {
        self.with_conn(|conn| get_task_internal(conn, task_id, user_id))
    }

    /// List a user's tasks with optional filters.
    pub fn list_tasks(
        &self,
        user_id: &str,
        status: Option<TaskStatus>,
        project_id: Option<&str>,
        priority: Option<Priority>,
        sort_by: Option<&str>,
        sort_order: Option<&str>,
        limit: Option<i32>,
    ) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut sql = String::from("SELECT t.* FROM tasks t WHERE t.user_id = ?");
            let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
            params_vec.push(Box::new(user_id.to_string()));

            if let Some(s) = status {
                sql.push_str(" AND t.status = ?");
                params_vec.push(Box::new(s.as_str().to_string()));
            }

            if let Some(p) = project_id {
                sql.push_str(" AND t.project_id = ?");
                params_vec.push(Box::new(p.to_string()));
            }

            if let Some(p) = priority {
                sql.push_str(" AND t.priority = ?");
                params_vec.push(Box::new(p));
            }

            let order_clause = build_order_clause(sort_by, sort_order);
            sql.push_str(&format!(" ORDER BY {}", order_clause));

            if let Some(l) = limit {
                sql.push_str(&format!(" LIMIT {}", l));
            }

            let params_refs: Vec<&dyn rusqlite::ToSql> =
                params_vec.iter().map(|b| b.as_ref()).collect();

            let mut stmt = conn.prepare(&sql)?;
            let tasks = stmt
                .query_map(params_refs.as_slice(), parse_task_row)?
                .filter_map(|r| r.ok())
                .collect();

            Ok(tasks)
        })
    }

    /// Update a task. Points are recomputed whenever priority or energy
    /// requirement changes.
    pub fn update_task(&self, task_id: &str, user_id: &str, update: TaskUpdate) -> Result<Task> {
        let now = now_ms();

        self.with_conn(|conn| {
            let task = get_task_internal(conn, task_id, user_id)?
                .ok_or_else(|| ApiError::task_not_found(task_id))?;

            if let Some(ref project_id) = update.project_id {
                let owned: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM projects WHERE id = ?1 AND user_id = ?2)",
                    params![project_id, user_id],
                    |row| row.get(0),
                )?;
                if !owned {
                    return Err(ApiError::project_not_found(project_id).into());
                }
            }

            let new_title = update.title.unwrap_or(task.title);
            let new_description = update.description.or(task.description);
            let new_project_id = update.project_id.or(task.project_id);
            let new_priority = update.priority.unwrap_or(task.priority);
            let new_energy = update.energy_requirement.unwrap_or(task.energy_requirement);
            let new_due_date = update.due_date.or(task.due_date);
            let new_estimated = update.estimated_duration.or(task.estimated_duration);

            let new_points = if new_priority != task.priority || new_energy != task.energy_requirement
            {
                scoring::base_points(new_priority, new_energy)
            } else {
                task.points
            };

            conn.execute(
                "UPDATE tasks SET
                    title = ?1, description = ?2, project_id = ?3,
                    energy_requirement = ?4, priority = ?5, due_date = ?6,
                    points = ?7, estimated_duration = ?8, updated_at = ?9
                 WHERE id = ?10 AND user_id = ?11",
                params![
                    new_title,
                    new_description,
                    new_project_id,
                    new_energy,
                    new_priority,
                    new_due_date,
                    new_points,
                    new_estimated,
                    now,
                    task_id,
                    user_id,
                ],
            )?;

            Ok(Task {
                id: task_id.to_string(),
                title: new_title,
                description: new_description,
                project_id: new_project_id,
                energy_requirement: new_energy,
                priority: new_priority,
                due_date: new_due_date,
                points: new_points,
                estimated_duration: new_estimated,
                updated_at: now,
                ..task
            })
        })
    }

    /// Delete a task. Returns false when not found.
    pub fn delete_task(&self, task_id: &str, user_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute(
                "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
                params![task_id, user_id],
            )?;
            Ok(deleted > 0)
        })
    }

    /// Complete a task, awarding bonus points when the caller's current
    /// energy level matches the task's requirement exactly.
    ///
    /// The pending -> completed transition is terminal. The status guard is
    /// the conditional UPDATE itself; concurrent completions race at the
    /// store and exactly one wins.
    pub fn complete_task(
        &self,
        task_id: &str,
        user_id: &str,
        actual_duration: Option<i64>,
        current_energy_level: Option<EnergyLevel>,
    ) -> Result<CompletionResult> {
        let now = now_ms();

        self.with_conn(|conn| {
            let task = get_task_internal(conn, task_id, user_id)?
                .ok_or_else(|| ApiError::task_not_found(task_id))?;

            let updated = conn.execute(
                "UPDATE tasks SET
                    status = ?1, completed_at = ?2,
                    actual_duration = COALESCE(?3, actual_duration), updated_at = ?4
                 WHERE id = ?5 AND user_id = ?6 AND status = ?7",
                params![
                    TaskStatus::Completed.as_str(),
                    now,
                    actual_duration,
                    now,
                    task_id,
                    user_id,
                    TaskStatus::Pending.as_str(),
                ],
            )?;

            if updated == 0 {
                return Err(
                    ApiError::invalid_state(format!("Task {} is already completed", task_id))
                        .into(),
                );
            }

            let bonus_points = match current_energy_level {
                Some(level) if scoring::energy_match(task.energy_requirement, level) => {
                    scoring::bonus_points(task.points)
                }
                _ => 0,
            };
            let points_earned = task.points + bonus_points;

            Ok(CompletionResult {
                task: Task {
                    status: TaskStatus::Completed,
                    completed_at: Some(now),
                    actual_duration: actual_duration.or(task.actual_duration),
                    updated_at: now,
                    ..task
                },
                points_earned,
                bonus_points,
            })
        })
    }

    /// Rank a user's pending tasks against their current energy level.
    ///
    /// Scoring runs in-process over the fetched rows so it stays identical
    /// to what an in-database formulation would produce.
    pub fn suggest_tasks(
        &self,
        user_id: &str,
        current_energy_level: EnergyLevel,
        limit: Option<usize>,
    ) -> Result<Vec<TaskWithEnergyMatch>> {
        let pending = self.list_tasks(
            user_id,
            Some(TaskStatus::Pending),
            None,
            None,
            None,
            None,
            None,
        )?;

        let mut matches: Vec<TaskWithEnergyMatch> = pending
            .into_iter()
            .map(|task| scoring::annotate_task(task, current_energy_level))
            .collect();
        matches.sort_by(scoring::rank_matches);

        if let Some(limit) = limit {
            matches.truncate(limit);
        }

        Ok(matches)
    }
}
