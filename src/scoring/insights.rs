//! Insight generation from derived energy patterns.

use crate::types::{EnergyInsight, EnergyLog, EnergyPattern, InsightKind};

const PEAK_HOURS_CONFIDENCE: f64 = 0.85;
const ENERGY_MISMATCH_CONFIDENCE: f64 = 0.75;
const LOW_AVERAGE_CONFIDENCE: f64 = 0.80;

fn format_hour(hour: u32) -> String {
    format!("{hour}:00")
}

/// Generate insights for a pattern. Every rule is evaluated independently
/// and all applicable insights are returned in insertion order.
///
/// `current_hour` is the caller's clock (0-23, UTC) so results stay
/// deterministic under test.
pub fn energy_insights(
    pattern: &EnergyPattern,
    latest_log: Option<&EnergyLog>,
    current_hour: u32,
) -> Vec<EnergyInsight> {
    let mut insights = Vec::new();

    if !pattern.peak_hours.is_empty() {
        let hours: Vec<String> = pattern.peak_hours.iter().map(|&h| format_hour(h)).collect();
        insights.push(EnergyInsight {
            kind: InsightKind::PeakHours,
            message: format!("Your energy is usually highest around {}", hours.join(", ")),
            confidence: PEAK_HOURS_CONFIDENCE,
        });
    }

    if let Some(latest) = latest_log {
        if pattern.peak_hours.contains(&current_hour) && latest.energy_level < 4 {
            insights.push(EnergyInsight {
                kind: InsightKind::EnergyMismatch,
                message: format!(
                    "{} is normally a peak hour for you, but your last log was {}. \
                     Consider a lighter task or a short break.",
                    format_hour(current_hour),
                    latest.energy_level
                ),
                confidence: ENERGY_MISMATCH_CONFIDENCE,
            });
        }
    }

    if pattern.average_energy < 3.0 {
        insights.push(EnergyInsight {
            kind: InsightKind::LowAverage,
            message: format!(
                "Your average energy over the last 30 days is {:.1}. \
                 Consider scheduling fewer high-energy tasks.",
                pattern.average_energy
            ),
            confidence: LOW_AVERAGE_CONFIDENCE,
        });
    }

    insights
}
