//! Score, level and drop speed derived from cleared lines.

use std::time::Duration;

pub const LINES_PER_LEVEL: u32 = 10;
pub const POINTS_PER_LINE: u32 = 100;
pub const BASE_DROP_MS: u64 = 500;
pub const DROP_STEP_MS: u64 = 50;
pub const MIN_DROP_MS: u64 = 100;

/// Drop interval for a level: 500 ms at level 1, 50 ms faster per level, floored at 100 ms.
pub fn drop_interval_for_level(level: u32) -> Duration {
    let faster_by = u64::from(level.saturating_sub(1)).saturating_mul(DROP_STEP_MS);
    Duration::from_millis(BASE_DROP_MS.saturating_sub(faster_by).max(MIN_DROP_MS))
}

/// What changed after a clear, so the caller can notify only what moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearOutcome {
    pub rows: u32,
    pub points: u32,
    pub level_changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreKeeper {
    score: u32,
    level: u32,
    lines: u32,
}

impl ScoreKeeper {
    pub fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            lines: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn drop_interval(&self) -> Duration {
        drop_interval_for_level(self.level)
    }

    /// Apply `rows` cleared lines. Points use the level in effect before this clear.
    pub fn apply_clear(&mut self, rows: u32) -> Option<ClearOutcome> {
        if rows == 0 {
            return None;
        }
        let points = rows * POINTS_PER_LINE * self.level;
        self.lines += rows;
        self.score += points;
        let level = self.lines / LINES_PER_LEVEL + 1;
        let level_changed = level != self.level;
        self.level = level;
        Some(ClearOutcome {
            rows,
            points,
            level_changed,
        })
    }
}

impl Default for ScoreKeeper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_at_level_one() {
        let mut s = ScoreKeeper::new();
        let out = s.apply_clear(1).unwrap();
        assert_eq!(out.points, 100);
        assert_eq!(s.score(), 100);
        assert!(!out.level_changed);
    }

    #[test]
    fn test_double_at_level_three() {
        let mut s = ScoreKeeper::new();
        for _ in 0..20 {
            s.apply_clear(1);
        }
        assert_eq!(s.level(), 3);
        let before = s.score();
        s.apply_clear(2);
        assert_eq!(s.score() - before, 600);
    }

    #[test]
    fn test_points_use_level_before_update() {
        let mut s = ScoreKeeper::new();
        for _ in 0..9 {
            s.apply_clear(1);
        }
        let before = s.score();
        let out = s.apply_clear(4).unwrap();
        assert_eq!(s.score() - before, 400);
        assert!(out.level_changed);
        assert_eq!(s.level(), 2);
    }

    #[test]
    fn test_ten_lines_reaches_level_two() {
        let mut s = ScoreKeeper::new();
        for _ in 0..5 {
            s.apply_clear(2);
        }
        assert_eq!(s.lines(), 10);
        assert_eq!(s.level(), 2);
        assert_eq!(s.drop_interval(), Duration::from_millis(450));
    }

    #[test]
    fn test_interval_floors_at_one_hundred() {
        let mut s = ScoreKeeper::new();
        for _ in 0..25 {
            s.apply_clear(4);
        }
        assert_eq!(s.lines(), 100);
        assert_eq!(s.drop_interval(), Duration::from_millis(100));
        s.apply_clear(4);
        assert_eq!(s.drop_interval(), Duration::from_millis(100));
        assert_eq!(drop_interval_for_level(1000), Duration::from_millis(100));
    }

    #[test]
    fn test_zero_rows_changes_nothing() {
        let mut s = ScoreKeeper::new();
        assert!(s.apply_clear(0).is_none());
        assert_eq!(s, ScoreKeeper::new());
    }
}
