//! Core domain types for the taskpulse backend.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Task priority as an integer, 1 (lowest) to 5 (highest).
pub type Priority = i32;

/// Self-reported energy level, 1 (lowest) to 5 (peak).
/// Also used for a task's declared energy requirement.
pub type EnergyLevel = i32;

/// Default priority applied when a task is created without one.
pub const PRIORITY_DEFAULT: Priority = 3;

/// Default energy requirement applied when a task is created without one.
pub const ENERGY_REQUIREMENT_DEFAULT: EnergyLevel = 3;

/// Check that a value lies in the 1..=5 energy/priority domain.
pub fn in_level_domain(value: i32) -> bool {
    (1..=5).contains(&value)
}

/// Task lifecycle status. The only transition is pending -> completed,
/// performed by the completion operation; it is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

/// A registered user. The id is the external identity provider's subject;
/// this service never verifies credentials itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub created_at: i64,
}

/// A project grouping tasks for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A task. `points` is derived from priority and energy requirement at
/// creation and recomputed whenever either changes; durations are minutes,
/// timestamps epoch milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub project_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub energy_requirement: EnergyLevel,
    pub priority: Priority,
    pub status: TaskStatus,
    pub due_date: Option<i64>,
    pub points: i32,
    pub estimated_duration: Option<i64>,
    pub actual_duration: Option<i64>,
    pub completed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for creating a task. Absent priority and energy requirement
/// default to 3; presence is checked explicitly so a supplied value is
/// never mistaken for a missing one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub project_id: Option<String>,
    pub energy_requirement: Option<EnergyLevel>,
    pub priority: Option<Priority>,
    pub due_date: Option<i64>,
    pub estimated_duration: Option<i64>,
}

/// Input for updating a task. Absent fields are left unchanged. Status is
/// deliberately not updatable here; completion is its own operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub project_id: Option<String>,
    pub energy_requirement: Option<EnergyLevel>,
    pub priority: Option<Priority>,
    pub due_date: Option<i64>,
    pub estimated_duration: Option<i64>,
}

/// A single energy self-report. Immutable once created; removed only by
/// retention cleanup or user deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyLog {
    pub id: String,
    pub user_id: String,
    pub energy_level: EnergyLevel,
    pub mood_tags: Vec<String>,
    pub notes: Option<String>,
    pub logged_at: i64,
}

/// Per-hour aggregate over a user's energy logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyEnergy {
    /// Hour of day, 0-23 (UTC).
    pub hour: u32,
    pub average: f64,
    pub count: usize,
}

/// Derived energy pattern over a trailing window of logs. Never persisted;
/// recomputed per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyPattern {
    pub average_energy: f64,
    /// Up to 3 hours whose mean energy is >= 4.0, best first.
    pub peak_hours: Vec<u32>,
    /// Up to 3 hours whose mean energy is <= 2.0, taken from the tail of
    /// the descending-mean ranking.
    pub low_hours: Vec<u32>,
    /// Full per-hour aggregates, ranked by mean descending.
    pub hourly: Vec<HourlyEnergy>,
}

/// A task annotated with how well it fits a queried energy level.
/// Derived per request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskWithEnergyMatch {
    #[serde(flatten)]
    pub task: Task,
    pub energy_match: bool,
    pub energy_match_score: f64,
    pub bonus_points: i32,
}

/// Kind of generated energy insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    PeakHours,
    EnergyMismatch,
    LowAverage,
}

/// An actionable observation derived from a user's energy pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyInsight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub message: String,
    pub confidence: f64,
}

/// Result of completing a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResult {
    pub task: Task,
    pub points_earned: i32,
    pub bonus_points: i32,
}

/// A team of users. The owner is always a member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub created_at: i64,
}

/// Membership of a user in a team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub team_id: String,
    pub user_id: String,
    pub role: String,
    pub joined_at: i64,
}

/// Aggregate statistics for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub total_tasks: i64,
    /// Task counts keyed by status name.
    pub tasks_by_status: HashMap<String, i64>,
    pub total_points: i64,
    /// Sum of base points over completed tasks.
    pub completed_points: i64,
    pub energy_logs: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_status_roundtrip() {
        for status in [TaskStatus::Pending, TaskStatus::Completed] {
            assert_eq!(TaskStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::from_str("archived"), None);
    }

    #[test]
    fn level_domain_bounds() {
        assert!(in_level_domain(1));
        assert!(in_level_domain(5));
        assert!(!in_level_domain(0));
        assert!(!in_level_domain(6));
    }
}
