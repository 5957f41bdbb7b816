//! Energy match scoring and suggestion ranking.

use crate::types::{EnergyLevel, Task, TaskWithEnergyMatch};
use std::cmp::Ordering;

/// Fraction of base points awarded as a bonus on a perfect match.
const BONUS_RATE: f64 = 0.25;

/// A task matches when its declared requirement equals the queried level.
pub fn energy_match(requirement: EnergyLevel, current: EnergyLevel) -> bool {
    requirement == current
}

/// 1.0 on an exact match, 0.5 when off by one level, 0.0 otherwise.
pub fn match_score(requirement: EnergyLevel, current: EnergyLevel) -> f64 {
    match (requirement - current).abs() {
        0 => 1.0,
        1 => 0.5,
        _ => 0.0,
    }
}

/// Bonus points for completing a task at its matching energy level.
pub fn bonus_points(points: i32) -> i32 {
    (points as f64 * BONUS_RATE).round() as i32
}

/// Annotate a task with match data for the queried energy level.
pub fn annotate_task(task: Task, current: EnergyLevel) -> TaskWithEnergyMatch {
    let matched = energy_match(task.energy_requirement, current);
    let score = match_score(task.energy_requirement, current);
    let bonus = if matched { bonus_points(task.points) } else { 0 };
    TaskWithEnergyMatch {
        task,
        energy_match: matched,
        energy_match_score: score,
        bonus_points: bonus,
    }
}

/// Suggestion order: match score descending, then priority descending,
/// then due date ascending with undated tasks last.
///
/// Both the suggestion endpoint and its tests go through this one
/// comparator, so a future in-database ranking has a single reference to
/// reproduce.
pub fn rank_matches(a: &TaskWithEnergyMatch, b: &TaskWithEnergyMatch) -> Ordering {
    b.energy_match_score
        .partial_cmp(&a.energy_match_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.task.priority.cmp(&a.task.priority))
        .then_with(|| match (a.task.due_date, b.task.due_date) {
            (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}
