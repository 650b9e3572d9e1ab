use std::ops::Range;

use serde::Serialize;

use super::hit_window::Rating;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HoldPhase {
    #[default]
    Idle,
    Holding,
    /// Key let go before the hold ran out.
    Released,
    /// Hold ran its full length.
    Expired,
}

/// Runtime flags of one note. Only the judgment code mutates these; the
/// rendering side reads them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteState {
    pub(crate) hit: bool,
    pub(crate) missed: bool,
    pub(crate) sustain_active: bool,
    pub(crate) bot_processed: bool,
    pub(crate) hold: HoldPhase,
    pub(crate) rating: Option<Rating>,
    pub(crate) sustain_hit_time: Option<f64>,
    pub(crate) bonus_intervals: u64,
    /// Pieces are consumed head first, so this is a count of the prefix.
    pub(crate) consumed_pieces: usize,
}

impl NoteState {
    pub fn hit(&self) -> bool {
        self.hit
    }

    pub fn missed(&self) -> bool {
        self.missed
    }

    pub fn sustain_active(&self) -> bool {
        self.sustain_active
    }

    pub fn bot_processed(&self) -> bool {
        self.bot_processed
    }

    pub fn hold(&self) -> HoldPhase {
        self.hold
    }

    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    pub fn sustain_hit_time(&self) -> Option<f64> {
        self.sustain_hit_time
    }

    /// Indices of the hold pieces consumed or dismissed so far.
    pub fn processed_pieces(&self) -> Range<usize> {
        0..self.consumed_pieces
    }

    /// Hit or missed: the note can no longer be judged.
    pub fn is_resolved(&self) -> bool {
        self.hit || self.missed
    }
}

/// Per-note runtime state, parallel to `Chart::notes`.
#[derive(Debug, Clone, Default)]
pub struct NoteStates {
    states: Vec<NoteState>,
}

impl NoteStates {
    pub fn new(len: usize) -> Self {
        Self {
            states: vec![NoteState::default(); len],
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&NoteState> {
        self.states.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut NoteState> {
        self.states.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NoteState> {
        self.states.iter()
    }

    pub fn is_resolved(&self, index: usize) -> bool {
        self.states.get(index).is_some_and(NoteState::is_resolved)
    }

    /// Returns false (and changes nothing) if the note was already hit or missed.
    pub(crate) fn mark_hit(&mut self, index: usize, rating: Option<Rating>) -> bool {
        let Some(state) = self.states.get_mut(index) else {
            return false;
        };
        if state.hit || state.missed {
            return false;
        }
        state.hit = true;
        state.rating = rating;
        true
    }

    /// Returns false (and changes nothing) if the note was already hit or missed.
    pub(crate) fn mark_missed(&mut self, index: usize) -> bool {
        let Some(state) = self.states.get_mut(index) else {
            return false;
        };
        if state.hit || state.missed {
            return false;
        }
        state.missed = true;
        true
    }

    /// Returns false if the bot already handled this note.
    pub(crate) fn mark_bot_processed(&mut self, index: usize) -> bool {
        match self.states.get_mut(index) {
            Some(state) if !state.bot_processed => {
                state.bot_processed = true;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        let len = self.states.len();
        self.states.clear();
        self.states.resize(len, NoteState::default());
    }
}
