use super::lifecycle::NoteStates;
use crate::chart::Chart;

/// Zero-tolerance auto-play. Opponent notes are always bot-played; player
/// notes only while auto-play is on.
#[derive(Debug, Clone)]
pub struct BotPlayer {
    player_enabled: bool,
    /// Every opponent note before this index has been handed out.
    next_opponent: usize,
    /// Every player note before this index has been handed out or resolved.
    next_player: usize,
}

impl Default for BotPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl BotPlayer {
    pub fn new() -> Self {
        Self {
            player_enabled: false,
            next_opponent: 0,
            next_player: 0,
        }
    }

    pub fn player_enabled(&self) -> bool {
        self.player_enabled
    }

    pub fn set_player_enabled(&mut self, enabled: bool) {
        if self.player_enabled != enabled {
            log::info!("player auto-play {}", if enabled { "on" } else { "off" });
        }
        self.player_enabled = enabled;
    }

    pub fn reset(&mut self) {
        self.next_opponent = 0;
        self.next_player = 0;
    }

    /// Notes whose strum time has been reached and that the bot has not
    /// touched yet, in chart order.
    pub fn due_notes(&mut self, song_position: f64, chart: &Chart, states: &NoteStates) -> Vec<usize> {
        let mut due = Vec::new();

        while let Some(note) = chart.notes.get(self.next_opponent) {
            if note.strum_time > song_position {
                break;
            }
            let idx = self.next_opponent;
            if !note.is_player_note && states.get(idx).is_some_and(|s| !s.bot_processed() && !s.hit()) {
                due.push(idx);
            }
            self.next_opponent += 1;
        }

        if self.player_enabled {
            while let Some(note) = chart.notes.get(self.next_player) {
                if note.strum_time > song_position {
                    break;
                }
                let idx = self.next_player;
                if note.is_player_note && states.get(idx).is_some_and(|s| !s.bot_processed() && !s.is_resolved()) {
                    due.push(idx);
                }
                self.next_player += 1;
            }
        }

        due.sort_unstable();
        due
    }
}
