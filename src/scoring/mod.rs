//! Energy scoring engine.
//!
//! Pure functions over task and energy-log records: point calculation,
//! energy-match scoring, hourly pattern aggregation, and insight
//! derivation. No I/O happens here; callers read records from the
//! database and inject the current time where it matters.

pub mod insights;
pub mod matching;
pub mod pattern;
pub mod points;

pub use insights::energy_insights;
pub use matching::{annotate_task, bonus_points, energy_match, match_score, rank_matches};
pub use pattern::energy_pattern;
pub use points::base_points;
