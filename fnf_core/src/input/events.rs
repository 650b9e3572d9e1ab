use serde::{Deserialize, Serialize};

use crate::chart::Lane;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Down,
    Up,
}

/// A key-down or key-up on one lane. Keyboard, gamepad and touch sources all
/// reduce to this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub lane: Lane,
    pub phase: Phase,
}

impl InputEvent {
    pub fn down(lane: Lane) -> Self {
        Self { lane, phase: Phase::Down }
    }

    pub fn up(lane: Lane) -> Self {
        Self { lane, phase: Phase::Up }
    }
}
