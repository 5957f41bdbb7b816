//! Hourly energy pattern derivation.

use crate::types::{EnergyLog, EnergyPattern, HourlyEnergy};
use chrono::{DateTime, Timelike};

/// Average reported when a user has no logs in the window.
const DEFAULT_AVERAGE_ENERGY: f64 = 3.0;

/// Mean threshold for a peak hour.
const PEAK_THRESHOLD: f64 = 4.0;

/// Mean threshold for a low hour.
const LOW_THRESHOLD: f64 = 2.0;

/// Maximum number of peak/low hours reported.
const MAX_HIGHLIGHT_HOURS: usize = 3;

/// Derive a user's energy pattern from logs inside the caller's window
/// (the API supplies the trailing 30 days).
///
/// Logs are grouped by UTC hour-of-day of `logged_at`. Hours are ranked by
/// mean energy descending (ascending hour on ties); peak hours are the
/// first ranked entries with mean >= 4.0, low hours the *last* ranked
/// entries with mean <= 2.0, both capped at 3. The tail selection for low
/// hours is intentional and pinned by a test below.
pub fn energy_pattern(logs: &[EnergyLog]) -> EnergyPattern {
    if logs.is_empty() {
        return EnergyPattern {
            average_energy: DEFAULT_AVERAGE_ENERGY,
            peak_hours: Vec::new(),
            low_hours: Vec::new(),
            hourly: Vec::new(),
        };
    }

    let mut sums = [0i64; 24];
    let mut counts = [0usize; 24];
    let mut level_total = 0i64;

    for log in logs {
        let Some(dt) = DateTime::from_timestamp_millis(log.logged_at) else {
            continue;
        };
        let hour = dt.hour() as usize;
        sums[hour] += log.energy_level as i64;
        counts[hour] += 1;
        level_total += log.energy_level as i64;
    }

    let average_energy = level_total as f64 / logs.len() as f64;

    let mut hourly: Vec<HourlyEnergy> = (0..24)
        .filter(|&h| counts[h] > 0)
        .map(|h| HourlyEnergy {
            hour: h as u32,
            average: sums[h] as f64 / counts[h] as f64,
            count: counts[h],
        })
        .collect();
    hourly.sort_by(|a, b| {
        b.average
            .partial_cmp(&a.average)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.hour.cmp(&b.hour))
    });

    let peak_hours: Vec<u32> = hourly
        .iter()
        .filter(|h| h.average >= PEAK_THRESHOLD)
        .take(MAX_HIGHLIGHT_HOURS)
        .map(|h| h.hour)
        .collect();

    let qualifying_low: Vec<u32> = hourly
        .iter()
        .filter(|h| h.average <= LOW_THRESHOLD)
        .map(|h| h.hour)
        .collect();
    let low_hours: Vec<u32> = qualifying_low
        .iter()
        .skip(qualifying_low.len().saturating_sub(MAX_HIGHLIGHT_HOURS))
        .copied()
        .collect();

    EnergyPattern {
        average_energy,
        peak_hours,
        low_hours,
        hourly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn log_at(hour: u32, minute: u32, level: i32) -> EnergyLog {
        let ts = Utc
            .with_ymd_and_hms(2025, 6, 10, hour, minute, 0)
            .unwrap()
            .timestamp_millis();
        EnergyLog {
            id: format!("log-{hour}-{minute}"),
            user_id: "u1".to_string(),
            energy_level: level,
            mood_tags: Vec::new(),
            notes: None,
            logged_at: ts,
        }
    }

    #[test]
    fn empty_logs_yield_default_pattern() {
        let pattern = energy_pattern(&[]);
        assert_eq!(pattern.average_energy, 3.0);
        assert!(pattern.peak_hours.is_empty());
        assert!(pattern.low_hours.is_empty());
        assert!(pattern.hourly.is_empty());
    }

    #[test]
    fn average_is_over_logs_not_hours() {
        // Hour 9 has three logs, hour 22 has one; a per-hour average would
        // weight them equally.
        let logs = vec![
            log_at(9, 0, 5),
            log_at(9, 10, 5),
            log_at(9, 20, 5),
            log_at(22, 0, 1),
        ];
        let pattern = energy_pattern(&logs);
        assert_eq!(pattern.average_energy, 4.0);
    }

    #[test]
    fn peak_hours_ranked_and_capped_at_three() {
        let logs = vec![
            log_at(8, 0, 4),
            log_at(9, 0, 5),
            log_at(10, 0, 4),
            log_at(11, 0, 5),
            log_at(11, 30, 4), // mean 4.5
            log_at(14, 0, 2),
        ];
        let pattern = energy_pattern(&logs);
        // Means: 9 -> 5.0, 11 -> 4.5, 8 -> 4.0, 10 -> 4.0 (hour tiebreak).
        assert_eq!(pattern.peak_hours, vec![9, 11, 8]);
    }

    #[test]
    fn fewer_than_three_qualifying_peaks_are_returned_as_is() {
        let logs = vec![log_at(9, 0, 5), log_at(14, 0, 3)];
        let pattern = energy_pattern(&logs);
        assert_eq!(pattern.peak_hours, vec![9]);
    }

    #[test]
    fn low_hours_take_tail_of_descending_ranking() {
        // Four qualifying low hours; the tail of the descending ranking
        // drops the highest-mean one (hour 20, mean 2.0) and keeps the
        // three worst in ranking order.
        let logs = vec![
            log_at(9, 0, 5),
            log_at(20, 0, 2),  // mean 2.0
            log_at(21, 0, 2),
            log_at(21, 30, 1), // mean 1.5
            log_at(22, 0, 1),  // mean 1.0
            log_at(23, 0, 1),  // mean 1.0
        ];
        let pattern = energy_pattern(&logs);
        // Ranking among lows: 20 (2.0), 21 (1.5), 22 (1.0), 23 (1.0).
        assert_eq!(pattern.low_hours, vec![21, 22, 23]);
    }

    #[test]
    fn hourly_aggregates_carry_counts() {
        let logs = vec![log_at(9, 0, 4), log_at(9, 30, 2), log_at(13, 0, 3)];
        let pattern = energy_pattern(&logs);
        assert_eq!(
            pattern.hourly,
            vec![
                HourlyEnergy { hour: 9, average: 3.0, count: 2 },
                HourlyEnergy { hour: 13, average: 3.0, count: 1 },
            ]
        );
    }
}
