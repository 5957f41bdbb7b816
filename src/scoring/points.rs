//! Task point calculation.

use crate::types::{EnergyLevel, Priority};

/// Multiplier per priority 1..=5.
const PRIORITY_MULTIPLIERS: [f64; 5] = [10.0, 20.0, 40.0, 80.0, 150.0];

/// Multiplier per energy requirement 1..=5.
const ENERGY_MULTIPLIERS: [f64; 5] = [0.5, 0.75, 1.0, 1.25, 1.5];

/// Fallback for priorities outside the table (same as priority 3).
const PRIORITY_MULTIPLIER_DEFAULT: f64 = 40.0;

/// Fallback for energy requirements outside the table (same as level 3).
const ENERGY_MULTIPLIER_DEFAULT: f64 = 1.0;

fn priority_multiplier(priority: Priority) -> f64 {
    if (1..=5).contains(&priority) {
        PRIORITY_MULTIPLIERS[(priority - 1) as usize]
    } else {
        PRIORITY_MULTIPLIER_DEFAULT
    }
}

fn energy_multiplier(energy_requirement: EnergyLevel) -> f64 {
    if (1..=5).contains(&energy_requirement) {
        ENERGY_MULTIPLIERS[(energy_requirement - 1) as usize]
    } else {
        ENERGY_MULTIPLIER_DEFAULT
    }
}

/// Base points for a task: `round(priority_multiplier * energy_multiplier)`.
///
/// Out-of-range inputs degrade to the default multipliers rather than
/// erroring. Callers that accept optional inputs apply the documented
/// defaults (priority 3, energy 3) with explicit presence checks before
/// calling.
pub fn base_points(priority: Priority, energy_requirement: EnergyLevel) -> i32 {
    (priority_multiplier(priority) * energy_multiplier(energy_requirement)).round() as i32
}
