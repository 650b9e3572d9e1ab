use serde::Serialize;

use super::hit_window::{HitWindows, Rating};
use crate::config::{HealthConfig, JudgeConfig};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RatingCounts {
    pub sick: u32,
    pub good: u32,
    pub bad: u32,
    pub shit: u32,
}

impl RatingCounts {
    pub fn get(&self, rating: Rating) -> u32 {
        match rating {
            Rating::Sick => self.sick,
            Rating::Good => self.good,
            Rating::Bad => self.bad,
            Rating::Shit => self.shit,
        }
    }

    fn bump(&mut self, rating: Rating) {
        let slot = match rating {
            Rating::Sick => &mut self.sick,
            Rating::Good => &mut self.good,
            Rating::Bad => &mut self.bad,
            Rating::Shit => &mut self.shit,
        };
        *slot += 1;
    }

    pub fn total(&self) -> u32 {
        self.sick + self.good + self.bad + self.shit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClearKind {
    /// Nothing judged yet.
    None,
    /// Only sicks.
    Sfc,
    /// No bads, shits or misses.
    Gfc,
    /// No misses.
    Fc,
    Clear,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSnapshot {
    pub score: i64,
    pub combo: u32,
    pub max_combo: u32,
    pub misses: u32,
    pub rating_counts: RatingCounts,
    pub accuracy: f64,
    pub health: f64,
    pub clear: ClearKind,
}

/// Score, combo and health bookkeeping for one attempt.
///
/// `on_hit`, `on_miss`, `on_sustain_tick` and `reset` are the only ways the
/// counters change.
#[derive(Debug, Clone)]
pub struct ScoreState {
    windows: HitWindows,
    health_config: HealthConfig,

    score: i64,
    combo: u32,
    max_combo: u32,
    misses: u32,
    counts: RatingCounts,
    accuracy_points: f64,
    health: f64,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new(&JudgeConfig::default())
    }
}

impl ScoreState {
    pub fn new(config: &JudgeConfig) -> Self {
        Self {
            windows: HitWindows::from_config(config),
            health_config: config.health,
            score: 0,
            combo: 0,
            max_combo: 0,
            misses: 0,
            counts: RatingCounts::default(),
            accuracy_points: 0.0,
            health: config.health.start,
        }
    }

    pub fn on_hit(&mut self, rating: Rating) {
        self.score += self.windows.score(rating);
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
        self.counts.bump(rating);
        self.accuracy_points += rating.accuracy_weight();

        let h = &self.health_config;
        let delta = match rating {
            Rating::Sick => h.sick,
            Rating::Good => h.good,
            Rating::Bad => h.bad,
            Rating::Shit => h.shit,
        };
        self.change_health(delta);
    }

    pub fn on_miss(&mut self) {
        self.misses += 1;
        self.combo = 0;
        self.change_health(-self.health_config.miss_damage);
    }

    pub fn on_sustain_tick(&mut self, bonus: i64) {
        self.score += bonus;
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.combo = 0;
        self.max_combo = 0;
        self.misses = 0;
        self.counts = RatingCounts::default();
        self.accuracy_points = 0.0;
        self.health = self.health_config.start;
    }

    fn change_health(&mut self, delta: f64) {
        self.health = (self.health + delta).clamp(0.0, self.health_config.max);
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn rating_counts(&self) -> RatingCounts {
        self.counts
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    /// Weighted hit quality over every judged note, in `[0, 1]`.
    pub fn accuracy(&self) -> f64 {
        let judged = self.counts.total() + self.misses;
        if judged == 0 {
            return 0.0;
        }
        self.accuracy_points / judged as f64
    }

    pub fn clear_kind(&self) -> ClearKind {
        let c = &self.counts;
        if c.total() + self.misses == 0 {
            ClearKind::None
        } else if self.misses > 0 {
            ClearKind::Clear
        } else if c.sick == c.total() {
            ClearKind::Sfc
        } else if c.bad + c.shit == 0 {
            ClearKind::Gfc
        } else {
            ClearKind::Fc
        }
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            score: self.score,
            combo: self.combo,
            max_combo: self.max_combo,
            misses: self.misses,
            rating_counts: self.counts,
            accuracy: self.accuracy(),
            health: self.health,
            clear: self.clear_kind(),
        }
    }
}
