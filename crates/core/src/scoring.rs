//! Scoring module - line-clear points, level progression and gravity cadence
//!
//! - Clearing `n` rows at level `L` awards `n * 100 * L` points.
//! - Level is `score / 1000 + 1`, so it only ever grows with the score.
//! - Gravity runs every `1000 / level` ms.

use crate::types::{BASE_DROP_MS, LINE_CLEAR_POINTS, POINTS_PER_LEVEL, STARTING_LEVEL};

/// Result of applying a line clear to the running totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Points awarded for this clear
    pub points: u32,
    /// Score after the clear
    pub score: u32,
    /// Level after the clear
    pub level: u32,
}

/// Points for clearing `lines` rows at `level`
pub fn line_clear_points(lines: u32, level: u32) -> u32 {
    lines
        .saturating_mul(LINE_CLEAR_POINTS)
        .saturating_mul(level)
}

/// Level reached at a given score
pub fn level_for_score(score: u32) -> u32 {
    score / POINTS_PER_LEVEL + STARTING_LEVEL
}

/// Gravity interval for a level, in milliseconds (never below 1ms)
pub fn drop_interval_ms(level: u32) -> u32 {
    (BASE_DROP_MS / level.max(1)).max(1)
}

/// Apply a lock that cleared `lines` rows.
///
/// With `lines == 0` nothing changes. The returned level never drops below
/// `level`.
pub fn calculate_score(lines: u32, score: u32, level: u32) -> ScoreResult {
    if lines == 0 {
        return ScoreResult {
            points: 0,
            score,
            level,
        };
    }

    let points = line_clear_points(lines, level);
    let score = score.saturating_add(points);
    ScoreResult {
        points,
        score,
        level: level.max(level_for_score(score)),
    }
}
