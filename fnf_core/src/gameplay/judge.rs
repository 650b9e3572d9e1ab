use super::hit_window::{HitWindows, Rating};
use super::lifecycle::NoteStates;
use crate::chart::{Chart, Lane, Note};

#[derive(Debug, Clone, PartialEq)]
pub struct JudgmentResult {
    pub note_index: usize,
    pub rating: Rating,
    /// Song position minus strum time; negative when early.
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissResult {
    pub note_index: usize,
    pub late_by: f64,
}

/// Finds which player note a key-down belongs to, and which player notes
/// have slipped past the widest window.
pub struct JudgeMachine {
    /// Per lane, the chart index scanning starts from. Every player note of
    /// that lane before it is already hit or missed.
    pub next_note_index: [usize; 4],
    windows: HitWindows,
}

impl Default for JudgeMachine {
    fn default() -> Self {
        Self::new(HitWindows::default())
    }
}

impl JudgeMachine {
    pub fn new(windows: HitWindows) -> Self {
        Self {
            next_note_index: [0; 4],
            windows,
        }
    }

    pub fn windows(&self) -> &HitWindows {
        &self.windows
    }

    pub fn reset(&mut self) {
        self.next_note_index = [0; 4];
    }

    /// Nearest unresolved player note in `lane` within the widest window.
    /// Ties go to the note that comes first in the chart.
    pub fn find_note_to_hit(
        &mut self,
        lane: Lane,
        song_position: f64,
        chart: &Chart,
        states: &NoteStates,
    ) -> Option<JudgmentResult> {
        let start = self.advance_cursor(lane, chart, states);
        let widest = self.windows.widest();

        let mut best: Option<(usize, f64)> = None;
        for (idx, note) in chart.notes.iter().enumerate().skip(start) {
            if note.strum_time - song_position > widest {
                break;
            }
            if !in_lane(note, lane) || states.is_resolved(idx) {
                continue;
            }
            let abs_diff = (note.strum_time - song_position).abs();
            if abs_diff > widest {
                continue;
            }
            if best.map_or(true, |(_, d)| abs_diff < d) {
                best = Some((idx, abs_diff));
            }
        }

        let (note_index, _) = best?;
        let delta = song_position - chart.notes[note_index].strum_time;
        let rating = self.windows.classify(delta)?;
        Some(JudgmentResult {
            note_index,
            rating,
            delta,
        })
    }

    /// Unresolved player notes more than the widest window behind
    /// `song_position`, in chart order.
    pub fn check_misses(&mut self, song_position: f64, chart: &Chart, states: &NoteStates) -> Vec<MissResult> {
        let mut results = Vec::new();

        for lane in Lane::ALL {
            let start = self.advance_cursor(lane, chart, states);
            for (idx, note) in chart.notes.iter().enumerate().skip(start) {
                if !in_lane(note, lane) || states.is_resolved(idx) {
                    continue;
                }
                let late_by = song_position - note.strum_time;
                if !self.windows.is_late_miss(late_by) {
                    // Notes are sorted, so nothing later in this lane is late either.
                    break;
                }
                results.push(MissResult {
                    note_index: idx,
                    late_by,
                });
            }
        }

        results.sort_by_key(|r| r.note_index);
        results
    }

    /// Skips the cursor past notes of other lanes and resolved notes of this one.
    fn advance_cursor(&mut self, lane: Lane, chart: &Chart, states: &NoteStates) -> usize {
        let mut idx = self.next_note_index[lane.index()];
        while idx < chart.notes.len() && (!in_lane(&chart.notes[idx], lane) || states.is_resolved(idx)) {
            idx += 1;
        }
        self.next_note_index[lane.index()] = idx;
        idx
    }
}

fn in_lane(note: &Note, lane: Lane) -> bool {
    note.is_player_note && note.lane == lane
}
