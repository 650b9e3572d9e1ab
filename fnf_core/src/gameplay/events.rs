use serde::Serialize;

use super::hit_window::Rating;
use crate::chart::Lane;

/// Everything the engine decided during one tick, in the order it happened.
/// `note` is an index into `Chart::notes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JudgeEvent {
    Hit {
        note: usize,
        rating: Rating,
        time_diff: f64,
    },
    Miss {
        note: usize,
        late_by: f64,
    },
    /// Key-down with nothing to hit; cosmetic only.
    GhostPress {
        lane: Lane,
    },
    /// Key-down with nothing to hit while ghost tapping is off.
    GhostMiss {
        lane: Lane,
    },
    OpponentHit {
        note: usize,
    },
    HoldStarted {
        note: usize,
    },
    HoldResumed {
        note: usize,
    },
    HoldReleased {
        note: usize,
        at: f64,
    },
    HoldExpired {
        note: usize,
        dismissed_pieces: usize,
    },
    PieceConsumed {
        note: usize,
        piece: usize,
    },
    SustainBonus {
        note: usize,
        amount: i64,
    },
}
