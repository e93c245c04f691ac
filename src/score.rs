//! Line-clear scoring and level progression

use tracing::warn;

/// Base points for clearing 0, 1, 2, 3 or 4 rows at once
const LINE_POINTS: [u64; 5] = [0, 40, 100, 300, 1200];

/// Lines needed per level
const LINES_PER_LEVEL: u32 = 10;

/// Scoring state for one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level, starting at 0
    pub level: u32,
    /// Total lines cleared
    pub lines: u32,
    /// Best score seen, including previous sessions
    pub top_score: u64,
}

/// What changed after applying a clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreUpdate {
    /// Points awarded
    pub delta: u64,
    /// Whether the level went up
    pub leveled_up: bool,
    /// Whether the top score was beaten
    pub new_top: bool,
}

impl Score {
    /// Fresh score that remembers a previous best
    pub fn new(top_score: u64) -> Self {
        Self {
            top_score,
            ..Self::default()
        }
    }

    /// Points for clearing `lines` rows at `level`
    pub fn points_for(lines: usize, level: u32) -> u64 {
        let base = LINE_POINTS.get(lines).copied().unwrap_or_else(|| {
            warn!(lines, "impossible simultaneous clear, awarding nothing");
            0
        });
        base * (level as u64 + 1)
    }

    /// Apply the rows cleared before a spawn.
    ///
    /// The level rises by at most one per call, even if the lines total has
    /// passed several thresholds.
    pub fn apply_clear(&mut self, lines: usize) -> ScoreUpdate {
        let delta = Self::points_for(lines, self.level);
        self.lines += lines as u32;
        self.points += delta;

        let leveled_up = self.lines >= (self.level + 1) * LINES_PER_LEVEL;
        if leveled_up {
            self.level += 1;
        }

        let new_top = self.points > self.top_score;
        if new_top {
            self.top_score = self.points;
        }

        ScoreUpdate {
            delta,
            leveled_up,
            new_top,
        }
    }
}
