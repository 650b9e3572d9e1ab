use super::events::JudgeEvent;
use super::lifecycle::{HoldPhase, NoteStates};
use super::score::ScoreState;
use crate::chart::{Chart, Lane};
use crate::config::{HoldGeometry, JudgeConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Opponent,
}

/// Borrowed engine state a hold transition may touch.
pub(crate) struct HoldContext<'a> {
    pub chart: &'a Chart,
    pub states: &'a mut NoteStates,
    pub score: &'a mut ScoreState,
    pub events: &'a mut Vec<JudgeEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlayerSlot {
    note: usize,
    /// Started by auto-play; released by time, never by key-up.
    bot: bool,
}

/// Per-lane hold slots for both strumlines. A slot holds at most one note,
/// so a lane can never track two holds at once.
pub struct SustainMachine {
    player: [Option<PlayerSlot>; 4],
    opponent: [Option<usize>; 4],
    geometry: HoldGeometry,
    bonus: i64,
    bonus_interval_ms: f64,
}

impl SustainMachine {
    pub fn new(config: &JudgeConfig) -> Self {
        Self {
            player: [None; 4],
            opponent: [None; 4],
            geometry: config.hold,
            bonus: config.sustain_bonus,
            bonus_interval_ms: config.sustain_bonus_interval_ms,
        }
    }

    pub fn active_hold(&self, side: Side, lane: Lane) -> Option<usize> {
        match side {
            Side::Player => self.player[lane.index()].map(|s| s.note),
            Side::Opponent => self.opponent[lane.index()],
        }
    }

    /// Drops every slot without touching note state.
    pub fn clear(&mut self) {
        self.player = [None; 4];
        self.opponent = [None; 4];
    }

    /// Idle -> Holding for a hold note that was just hit.
    pub(crate) fn begin(&mut self, ctx: &mut HoldContext<'_>, side: Side, note: usize, song_position: f64, bot: bool) {
        let lane = ctx.chart.notes[note].lane;

        match side {
            Side::Player => {
                if let Some(previous) = self.player[lane.index()] {
                    self.finish_player(ctx, lane, previous.note, song_position, HoldPhase::Released);
                }
                self.player[lane.index()] = Some(PlayerSlot { note, bot });
            }
            Side::Opponent => {
                if let Some(previous) = self.opponent[lane.index()].take() {
                    expire_opponent(ctx, &self.geometry, previous);
                }
                self.opponent[lane.index()] = Some(note);
            }
        }

        if let Some(state) = ctx.states.get_mut(note) {
            state.hold = HoldPhase::Holding;
            state.sustain_active = true;
            state.sustain_hit_time = Some(song_position);
        }
        log::debug!("hold started: note {note} lane {lane:?} at {song_position}");
        ctx.events.push(JudgeEvent::HoldStarted { note });
    }

    /// Key-down on a lane whose slot is still occupied re-activates a
    /// suspended hold.
    /// Returns whether the lane had a player hold.
    pub(crate) fn reacquire(&mut self, ctx: &mut HoldContext<'_>, lane: Lane) -> bool {
        let Some(slot) = self.player[lane.index()] else {
            return false;
        };
        if let Some(state) = ctx.states.get_mut(slot.note) {
            if !state.sustain_active {
                state.sustain_active = true;
                ctx.events.push(JudgeEvent::HoldResumed { note: slot.note });
            }
        }
        true
    }

    /// Key-up on a held lane. The slot is kept until the end of the tick so a
    /// key-down later in the same batch can pick the hold back up.
    pub(crate) fn suspend(&mut self, ctx: &mut HoldContext<'_>, lane: Lane) {
        let Some(slot) = self.player[lane.index()].filter(|s| !s.bot) else {
            return;
        };
        if let Some(state) = ctx.states.get_mut(slot.note) {
            state.sustain_active = false;
        }
    }

    /// Holding -> Released. Bot holds ignore key-up.
    pub(crate) fn release(&mut self, ctx: &mut HoldContext<'_>, lane: Lane, song_position: f64) -> Option<usize> {
        let slot = self.player[lane.index()]?;
        if slot.bot {
            return None;
        }
        self.finish_player(ctx, lane, slot.note, song_position, HoldPhase::Released);
        Some(slot.note)
    }

    /// Releases every player hold auto-play started.
    pub(crate) fn release_bot_holds(&mut self, ctx: &mut HoldContext<'_>, song_position: f64) {
        for lane in Lane::ALL {
            if let Some(slot) = self.player[lane.index()].filter(|s| s.bot) {
                self.finish_player(ctx, lane, slot.note, song_position, HoldPhase::Released);
            }
        }
    }

    /// Per-tick update of every active hold.
    pub(crate) fn advance(&mut self, ctx: &mut HoldContext<'_>, song_position: f64, keys_held: &[bool; 4]) {
        for lane in Lane::ALL {
            if let Some(slot) = self.player[lane.index()] {
                if !slot.bot && !keys_held[lane.index()] {
                    self.finish_player(ctx, lane, slot.note, song_position, HoldPhase::Released);
                } else if song_position >= ctx.chart.notes[slot.note].end_time() {
                    self.finish_player(ctx, lane, slot.note, song_position, HoldPhase::Expired);
                } else {
                    consume_pieces(ctx, &self.geometry, slot.note, song_position);
                    self.accrue_bonus(ctx, slot.note, song_position);
                }
            }

            if let Some(note) = self.opponent[lane.index()] {
                if song_position >= ctx.chart.notes[note].end_time() {
                    self.opponent[lane.index()] = None;
                    expire_opponent(ctx, &self.geometry, note);
                } else {
                    consume_pieces(ctx, &self.geometry, note, song_position);
                }
            }
        }
    }

    fn finish_player(&mut self, ctx: &mut HoldContext<'_>, lane: Lane, note: usize, song_position: f64, phase: HoldPhase) {
        self.accrue_bonus(ctx, note, song_position);
        self.player[lane.index()] = None;

        let Some(state) = ctx.states.get_mut(note) else {
            return;
        };
        state.sustain_active = false;
        state.hold = phase;

        match phase {
            HoldPhase::Expired => {
                let dismissed = dismiss_pieces(ctx.chart, &self.geometry, note, &mut state.consumed_pieces);
                log::debug!("hold expired: note {note} lane {lane:?}");
                ctx.events.push(JudgeEvent::HoldExpired {
                    note,
                    dismissed_pieces: dismissed,
                });
            }
            _ => {
                log::debug!("hold released: note {note} lane {lane:?} at {song_position}");
                ctx.events.push(JudgeEvent::HoldReleased { note, at: song_position });
            }
        }
    }

    /// Pays `bonus` for each whole interval held since the later of the hit
    /// and the strum time, capped at the hold's end.
    fn accrue_bonus(&self, ctx: &mut HoldContext<'_>, note_index: usize, song_position: f64) {
        let note = &ctx.chart.notes[note_index];
        let Some(state) = ctx.states.get_mut(note_index) else {
            return;
        };
        let Some(hit_time) = state.sustain_hit_time else {
            return;
        };

        let from = hit_time.max(note.strum_time);
        let until = song_position.min(note.end_time());
        if until <= from {
            return;
        }

        let due = ((until - from) / self.bonus_interval_ms).floor() as u64;
        if due <= state.bonus_intervals {
            return;
        }
        let amount = (due - state.bonus_intervals) as i64 * self.bonus;
        state.bonus_intervals = due;
        if amount > 0 {
            ctx.score.on_sustain_tick(amount);
            ctx.events.push(JudgeEvent::SustainBonus {
                note: note_index,
                amount,
            });
        }
    }
}

fn expire_opponent(ctx: &mut HoldContext<'_>, geometry: &HoldGeometry, note: usize) {
    let Some(state) = ctx.states.get_mut(note) else {
        return;
    };
    state.sustain_active = false;
    state.hold = HoldPhase::Expired;
    let dismissed = dismiss_pieces(ctx.chart, geometry, note, &mut state.consumed_pieces);
    ctx.events.push(JudgeEvent::HoldExpired {
        note,
        dismissed_pieces: dismissed,
    });
}

/// Marks every hold piece that has reached the strumline hitbox. Piece `i`
/// sits `i * spacing` px below the head, so pieces arrive in index order and
/// only the ones past the consumed prefix are looked at.
fn consume_pieces(ctx: &mut HoldContext<'_>, geometry: &HoldGeometry, note_index: usize, song_position: f64) {
    let note = &ctx.chart.notes[note_index];
    let Some(state) = ctx.states.get_mut(note_index) else {
        return;
    };

    let speed = ctx.chart.meta.speed;
    let total = geometry.piece_count(note.sustain_length, speed);
    let head_offset = (note.strum_time - song_position) * geometry.scroll_speed(speed);
    while state.consumed_pieces < total {
        let piece = state.consumed_pieces;
        if head_offset + piece as f64 * geometry.piece_spacing() > geometry.hitbox_px {
            break;
        }
        state.consumed_pieces += 1;
        log::trace!("note {note_index} piece {piece} consumed at {song_position}");
        ctx.events.push(JudgeEvent::PieceConsumed {
            note: note_index,
            piece,
        });
    }
}

/// Drops the pieces that never reached the hitbox; returns how many.
fn dismiss_pieces(chart: &Chart, geometry: &HoldGeometry, note: usize, consumed: &mut usize) -> usize {
    let total = geometry.piece_count(chart.notes[note].sustain_length, chart.meta.speed);
    let dismissed = total.saturating_sub(*consumed);
    *consumed = (*consumed).max(total);
    dismissed
}
