use crossbeam_channel::Sender;

use super::bot::BotPlayer;
use super::events::JudgeEvent;
use super::hit_window::{HitWindows, Rating};
use super::judge::JudgeMachine;
use super::lifecycle::{NoteState, NoteStates};
use super::score::{ScoreSnapshot, ScoreState};
use super::sustain::{HoldContext, Side, SustainMachine};
use crate::chart::{Chart, Lane};
use crate::config::{ConfigError, JudgeConfig};
use crate::input::events::{InputEvent, Phase};
use crate::input::InputQueue;
use crate::time::conductor::Conductor;

/// One attempt at one chart.
///
/// Each [`PlaySession::tick`] runs clock advance, queued input, auto-play,
/// miss detection and hold updates, in that order. A press judged in a tick
/// is never also missed in it.
pub struct PlaySession {
    chart: Chart,
    config: JudgeConfig,
    states: NoteStates,
    conductor: Conductor,
    judge: JudgeMachine,
    sustain: SustainMachine,
    bot: BotPlayer,
    score: ScoreState,
    inputs: InputQueue,
    keys_held: [bool; 4],
}

macro_rules! hold_ctx {
    ($self:ident, $events:expr) => {
        HoldContext {
            chart: &$self.chart,
            states: &mut $self.states,
            score: &mut $self.score,
            events: &mut *$events,
        }
    };
}

impl PlaySession {
    pub fn new(chart: Chart, config: JudgeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let windows = HitWindows::from_config(&config);
        Ok(Self {
            states: NoteStates::new(chart.notes.len()),
            conductor: Conductor::new(chart.meta.bpm),
            judge: JudgeMachine::new(windows),
            sustain: SustainMachine::new(&config),
            bot: BotPlayer::new(),
            score: ScoreState::new(&config),
            inputs: InputQueue::new(),
            keys_held: [false; 4],
            chart,
            config,
        })
    }

    pub fn with_conductor(mut self, conductor: Conductor) -> Self {
        self.conductor = conductor;
        self
    }

    pub fn start(&mut self) {
        log::info!(
            "session start: \"{}\" ({} notes) at {}ms",
            self.chart.meta.title,
            self.chart.notes.len(),
            self.conductor.song_position()
        );
        self.conductor.play();
    }

    /// Stops playback and throws away every hold and per-note flag. The score
    /// stays readable until [`PlaySession::reset_score`].
    pub fn stop(&mut self) {
        self.conductor.pause();
        self.sustain.clear();
        self.states.clear();
        self.judge.reset();
        self.bot.reset();
        self.keys_held = [false; 4];
        let dropped = self.inputs.drain().len();
        log::info!("session stopped at {}ms ({dropped} queued inputs dropped)", self.conductor.song_position());
    }

    pub fn reset_score(&mut self) {
        self.score.reset();
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn config(&self) -> &JudgeConfig {
        &self.config
    }

    pub fn conductor(&self) -> &Conductor {
        &self.conductor
    }

    pub fn song_position(&self) -> f64 {
        self.conductor.song_position()
    }

    pub fn note_state(&self, index: usize) -> Option<&NoteState> {
        self.states.get(index)
    }

    pub fn note_states(&self) -> &NoteStates {
        &self.states
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn score_snapshot(&self) -> ScoreSnapshot {
        self.score.snapshot()
    }

    /// Player hold currently tracked on `lane`.
    pub fn active_hold(&self, lane: Lane) -> Option<usize> {
        self.sustain.active_hold(Side::Player, lane)
    }

    pub fn opponent_hold(&self, lane: Lane) -> Option<usize> {
        self.sustain.active_hold(Side::Opponent, lane)
    }

    pub fn is_key_held(&self, lane: Lane) -> bool {
        self.keys_held[lane.index()]
    }

    /// Handle for input sources; events are picked up on the next tick.
    pub fn input_sender(&self) -> Sender<InputEvent> {
        self.inputs.sender()
    }

    pub fn push_input(&self, event: InputEvent) {
        self.inputs.push(event);
    }

    pub fn autoplay(&self) -> bool {
        self.bot.player_enabled()
    }

    /// Turning auto-play off lets go of every hold the bot was keeping.
    pub fn set_autoplay(&mut self, enabled: bool) -> Vec<JudgeEvent> {
        let mut events = Vec::new();
        if !enabled && self.bot.player_enabled() {
            let pos = self.conductor.song_position();
            self.sustain.release_bot_holds(&mut hold_ctx!(self, &mut events), pos);
        }
        self.bot.set_player_enabled(enabled);
        events
    }

    /// True once every note, holds included, is past the widest window.
    pub fn is_finished(&self) -> bool {
        let pos = self.conductor.song_position();
        let holds_done = Lane::ALL
            .iter()
            .all(|&lane| self.active_hold(lane).is_none() && self.opponent_hold(lane).is_none());
        holds_done && pos > self.chart.last_note_end() + self.judge.windows().widest()
    }

    /// One frame. Does nothing while the conductor is paused.
    pub fn tick(&mut self, delta_ms: f64) -> Vec<JudgeEvent> {
        let mut events = Vec::new();
        if !self.conductor.is_playing() {
            return events;
        }

        self.conductor.advance(delta_ms);
        let pos = self.conductor.song_position();

        for input in self.inputs.drain() {
            match input.phase {
                Phase::Down => self.press_at(input.lane, pos, &mut events),
                Phase::Up => self.lift_key(input.lane, &mut events),
            }
        }

        self.run_bot(pos, &mut events);
        self.run_miss_detection(pos, &mut events);
        self.sustain.advance(&mut hold_ctx!(self, &mut events), pos, &self.keys_held);

        events
    }

    /// Key-down resolved immediately at the current song position.
    pub fn press(&mut self, lane: Lane) -> Vec<JudgeEvent> {
        let mut events = Vec::new();
        let pos = self.conductor.song_position();
        self.press_at(lane, pos, &mut events);
        events
    }

    /// Key-up resolved immediately at the current song position.
    pub fn release(&mut self, lane: Lane) -> Vec<JudgeEvent> {
        let mut events = Vec::new();
        let pos = self.conductor.song_position();
        self.lift_key(lane, &mut events);
        self.sustain.release(&mut hold_ctx!(self, &mut events), lane, pos);
        events
    }

    fn press_at(&mut self, lane: Lane, pos: f64, events: &mut Vec<JudgeEvent>) {
        // Auto-repeat and duplicate deliveries of a key that is already down.
        if self.keys_held[lane.index()] {
            self.sustain.reacquire(&mut hold_ctx!(self, events), lane);
            return;
        }
        self.keys_held[lane.index()] = true;

        let holding = self.sustain.reacquire(&mut hold_ctx!(self, events), lane);

        match self.judge.find_note_to_hit(lane, pos, &self.chart, &self.states) {
            Some(result) => self.register_hit(result.note_index, result.rating, result.delta, pos, false, events),
            None if holding => {}
            None if self.config.ghost_tapping => events.push(JudgeEvent::GhostPress { lane }),
            None => {
                log::debug!("ghost miss on {lane:?} at {pos}");
                self.score.on_miss();
                events.push(JudgeEvent::GhostMiss { lane });
            }
        }
    }

    /// A lifted key only suspends its hold; the hold update at the end of the
    /// tick releases it unless the key went down again.
    fn lift_key(&mut self, lane: Lane, events: &mut Vec<JudgeEvent>) {
        self.keys_held[lane.index()] = false;
        self.sustain.suspend(&mut hold_ctx!(self, events), lane);
    }

    fn register_hit(&mut self, note: usize, rating: Rating, delta: f64, pos: f64, bot: bool, events: &mut Vec<JudgeEvent>) {
        if !self.states.mark_hit(note, Some(rating)) {
            return;
        }
        self.score.on_hit(rating);
        log::debug!("hit note {note}: {} ({delta:+.1}ms){}", rating.name(), if bot { " [bot]" } else { "" });
        events.push(JudgeEvent::Hit {
            note,
            rating,
            time_diff: delta,
        });

        if self.chart.notes[note].is_hold() {
            self.sustain.begin(&mut hold_ctx!(self, events), Side::Player, note, pos, bot);
        }
    }

    fn run_bot(&mut self, pos: f64, events: &mut Vec<JudgeEvent>) {
        for idx in self.bot.due_notes(pos, &self.chart, &self.states) {
            if !self.states.mark_bot_processed(idx) {
                continue;
            }

            if self.chart.notes[idx].is_player_note {
                // The bot is exact, so its hits are judged as if dead on time.
                let Some(rating) = self.judge.windows().classify(0.0) else {
                    continue;
                };
                self.register_hit(idx, rating, 0.0, pos, true, events);
            } else if self.states.mark_hit(idx, None) {
                events.push(JudgeEvent::OpponentHit { note: idx });
                if self.chart.notes[idx].is_hold() {
                    self.sustain.begin(&mut hold_ctx!(self, events), Side::Opponent, idx, pos, true);
                }
            }
        }
    }

    fn run_miss_detection(&mut self, pos: f64, events: &mut Vec<JudgeEvent>) {
        for miss in self.judge.check_misses(pos, &self.chart, &self.states) {
            if self.states.mark_missed(miss.note_index) {
                self.score.on_miss();
                log::debug!("missed note {} ({:.1}ms late)", miss.note_index, miss.late_by);
                events.push(JudgeEvent::Miss {
                    note: miss.note_index,
                    late_by: miss.late_by,
                });
            }
        }
    }
}
