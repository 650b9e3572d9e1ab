use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{tier} window must be a finite value > 0, got {value}")]
    InvalidWindow { tier: &'static str, value: f64 },
    #[error("{tier} window ({value}ms) must be wider than the previous tier ({previous}ms)")]
    WindowOrder {
        tier: &'static str,
        value: f64,
        previous: f64,
    },
    #[error("sustain bonus interval must be > 0, got {0}")]
    BonusInterval(f64),
    #[error("sustain bonus must be >= 0, got {0}")]
    NegativeBonus(i64),
    #[error("hold piece height ({height}) must exceed overlap ({overlap}) and overlap must be >= 0")]
    PieceGeometry { height: f64, overlap: f64 },
    #[error("maximum health must be > 0, got {0}")]
    MaxHealth(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingWindow {
    pub score: i64,
    /// Widest |note time - song position| (ms) still judged as this tier.
    pub window_ms: f64,
}

/// Hold-body layout, used to decide when a hold piece passes the strumline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldGeometry {
    pub piece_height: f64,
    pub piece_overlap: f64,
    /// Half-height of the strumline hitbox in pixels.
    pub hitbox_px: f64,
    /// Pixels per ms at chart speed 1.
    pub scroll_factor: f64,
}

impl Default for HoldGeometry {
    fn default() -> Self {
        Self {
            piece_height: 30.0,
            piece_overlap: 2.0,
            hitbox_px: 10.0,
            scroll_factor: 0.45,
        }
    }
}

impl HoldGeometry {
    pub fn piece_spacing(&self) -> f64 {
        self.piece_height - self.piece_overlap
    }

    /// Pixels per ms of song time at the given chart speed.
    pub fn scroll_speed(&self, chart_speed: f64) -> f64 {
        chart_speed * self.scroll_factor
    }

    /// Pieces needed to cover a hold body of `sustain_length` ms.
    pub fn piece_count(&self, sustain_length: f64, chart_speed: f64) -> usize {
        let body_px = sustain_length * self.scroll_speed(chart_speed);
        if body_px <= 0.0 {
            return 0;
        }
        (body_px / self.piece_spacing()).ceil() as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    pub start: f64,
    pub max: f64,
    pub sick: f64,
    pub good: f64,
    pub bad: f64,
    pub shit: f64,
    pub miss_damage: f64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            start: 1.0,
            max: 2.0,
            sick: 0.04,
            good: 0.02,
            bad: 0.005,
            shit: -0.02,
            miss_damage: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeConfig {
    pub sick: RatingWindow,
    pub good: RatingWindow,
    pub bad: RatingWindow,
    pub shit: RatingWindow,

    /// Score added per completed interval of song time a hold is kept.
    pub sustain_bonus: i64,
    pub sustain_bonus_interval_ms: f64,

    /// When false, pressing a lane with nothing to hit counts as a miss.
    pub ghost_tapping: bool,

    pub hold: HoldGeometry,
    pub health: HealthConfig,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            sick: RatingWindow { score: 350, window_ms: 45.0 },
            good: RatingWindow { score: 200, window_ms: 90.0 },
            bad: RatingWindow { score: 100, window_ms: 135.0 },
            shit: RatingWindow { score: 50, window_ms: 180.0 },
            sustain_bonus: 5,
            sustain_bonus_interval_ms: 60.0,
            ghost_tapping: true,
            hold: HoldGeometry::default(),
            health: HealthConfig::default(),
        }
    }
}

impl JudgeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tiers = [
            ("sick", self.sick.window_ms),
            ("good", self.good.window_ms),
            ("bad", self.bad.window_ms),
            ("shit", self.shit.window_ms),
        ];
        let mut previous = 0.0;
        for (tier, value) in tiers {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidWindow { tier, value });
            }
            if value <= previous {
                return Err(ConfigError::WindowOrder { tier, value, previous });
            }
            previous = value;
        }

        if !(self.sustain_bonus_interval_ms.is_finite() && self.sustain_bonus_interval_ms > 0.0) {
            return Err(ConfigError::BonusInterval(self.sustain_bonus_interval_ms));
        }
        if self.sustain_bonus < 0 {
            return Err(ConfigError::NegativeBonus(self.sustain_bonus));
        }

        let hold = &self.hold;
        if !(hold.piece_overlap >= 0.0 && hold.piece_height > hold.piece_overlap) {
            return Err(ConfigError::PieceGeometry {
                height: hold.piece_height,
                overlap: hold.piece_overlap,
            });
        }
        if !(self.health.max > 0.0) {
            return Err(ConfigError::MaxHealth(self.health.max));
        }
        Ok(())
    }
}
