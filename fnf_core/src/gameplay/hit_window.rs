use serde::{Deserialize, Serialize};

use crate::config::{JudgeConfig, RatingWindow};

/// Rating tiers, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Sick,
    Good,
    Bad,
    Shit,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Sick, Rating::Good, Rating::Bad, Rating::Shit];

    pub fn name(self) -> &'static str {
        match self {
            Rating::Sick => "sick",
            Rating::Good => "good",
            Rating::Bad => "bad",
            Rating::Shit => "shit",
        }
    }

    /// Contribution of one hit to accuracy.
    pub fn accuracy_weight(self) -> f64 {
        match self {
            Rating::Sick => 1.0,
            Rating::Good => 0.75,
            Rating::Bad => 0.5,
            Rating::Shit => 0.25,
        }
    }
}

/// Maps a timing error to a rating: the tightest tier whose window still
/// contains the error wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitWindows {
    tiers: [(Rating, RatingWindow); 4],
}

impl Default for HitWindows {
    fn default() -> Self {
        Self::from_config(&JudgeConfig::default())
    }
}

impl HitWindows {
    pub fn from_config(config: &JudgeConfig) -> Self {
        Self {
            tiers: [
                (Rating::Sick, config.sick),
                (Rating::Good, config.good),
                (Rating::Bad, config.bad),
                (Rating::Shit, config.shit),
            ],
        }
    }

    /// `None` when the error is outside the widest window.
    pub fn classify(&self, time_diff: f64) -> Option<Rating> {
        let abs_diff = time_diff.abs();
        self.tiers
            .iter()
            .find(|(_, window)| abs_diff <= window.window_ms)
            .map(|(rating, _)| *rating)
    }

    pub fn widest(&self) -> f64 {
        self.tiers[3].1.window_ms
    }

    pub fn window(&self, rating: Rating) -> RatingWindow {
        self.tiers[rating as usize].1
    }

    pub fn score(&self, rating: Rating) -> i64 {
        self.window(rating).score
    }

    /// True once a note is further behind the song position than any tier allows.
    pub fn is_late_miss(&self, late_by: f64) -> bool {
        late_by > self.widest()
    }
}
