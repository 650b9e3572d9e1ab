mod error;

pub use self::error::{ChartError, ChartErrorKind};

use fnf_schema::{RawNote, Song};
use serde::{Deserialize, Serialize};

/// Number of columns a section may address: 4 per strumline.
pub const RAW_COLUMNS: i64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    Left,
    Down,
    Up,
    Right,
}

impl Lane {
    pub const ALL: [Lane; 4] = [Lane::Left, Lane::Down, Lane::Up, Lane::Right];

    pub fn from_index(index: usize) -> Option<Lane> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    /// Song position (ms) at which the note crosses the strumline.
    pub strum_time: f64,
    pub lane: Lane,
    /// Extra hold time after the head; 0 for taps.
    pub sustain_length: f64,
    pub is_player_note: bool,
    /// Index of the section the note was read from.
    pub section: usize,
}

impl Note {
    pub fn is_hold(&self) -> bool {
        self.sustain_length > 0.0
    }

    pub fn end_time(&self) -> f64 {
        self.strum_time + self.sustain_length
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub title: String,
    pub bpm: f64,
    pub speed: f64,
    pub needs_voices: bool,
    pub player1: Option<String>,
    pub player2: Option<String>,
}

impl Default for ChartMeta {
    fn default() -> Self {
        Self {
            title: String::new(),
            bpm: fnf_schema::DEFAULT_BPM,
            speed: fnf_schema::DEFAULT_SPEED,
            needs_voices: false,
            player1: None,
            player2: None,
        }
    }
}

/// Immutable note data for one attempt, sorted by strum time.
///
/// Per-note runtime flags live in a parallel [`crate::gameplay::NoteStates`]
/// indexed the same way.
#[derive(Debug, Clone, Default)]
pub struct Chart {
    pub meta: ChartMeta,
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSummary {
    pub title: String,
    pub bpm: f64,
    pub speed: f64,
    pub player_notes: usize,
    pub opponent_notes: usize,
    pub holds: usize,
    pub total_sustain_ms: f64,
    pub last_note_end_ms: f64,
}

impl Chart {
    /// Validates and sorts `notes`. Sorting is stable so simultaneous notes
    /// keep their chart order.
    pub fn new(meta: ChartMeta, mut notes: Vec<Note>) -> Result<Self, ChartError> {
        validate_tempo(&meta)?;
        for (i, note) in notes.iter().enumerate() {
            if !note.strum_time.is_finite() || note.strum_time < 0.0 {
                return Err(ChartError::new(
                    "E2001",
                    format!("strum time must be a finite value >= 0, got {}", note.strum_time),
                )
                .with_section(note.section)
                .with_note(i));
            }
            if !note.sustain_length.is_finite() || note.sustain_length < 0.0 {
                return Err(ChartError::new(
                    "E2003",
                    format!("sustain length must be a finite value >= 0, got {}", note.sustain_length),
                )
                .with_section(note.section)
                .with_note(i));
            }
        }
        notes.sort_by(|a, b| a.strum_time.total_cmp(&b.strum_time));
        Ok(Self { meta, notes })
    }

    /// Flattens the sections of an on-disk song into one note list.
    ///
    /// Columns 0-3 belong to whoever owns the section and 4-7 to the other
    /// side. Negative columns are event notes and are skipped.
    pub fn from_song(song: &Song) -> Result<Self, ChartError> {
        let meta = ChartMeta {
            title: song.song.clone(),
            bpm: song.bpm,
            speed: song.speed,
            needs_voices: song.needs_voices,
            player1: song.player1.clone(),
            player2: song.player2.clone(),
        };
        validate_tempo(&meta)?;

        let mut notes = Vec::new();
        for (section_index, section) in song.notes.iter().enumerate() {
            for (note_index, raw) in section.section_notes.iter().enumerate() {
                let located = |e: ChartError| e.with_section(section_index).with_note(note_index);
                let Some(note) = parse_raw_note(raw, section.must_hit_section, section_index).map_err(located)?
                else {
                    log::warn!(
                        "skipping event note in section {section_index} at index {note_index}: {:?}",
                        raw.0
                    );
                    continue;
                };
                notes.push(note);
            }
        }

        log::debug!("flattened {} notes from {} sections", notes.len(), song.notes.len());
        Self::new(meta, notes)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Time at which the last note (including its hold) is over.
    pub fn last_note_end(&self) -> f64 {
        self.notes.iter().map(Note::end_time).fold(0.0, f64::max)
    }

    pub fn summary(&self) -> ChartSummary {
        let player_notes = self.notes.iter().filter(|n| n.is_player_note).count();
        ChartSummary {
            title: self.meta.title.clone(),
            bpm: self.meta.bpm,
            speed: self.meta.speed,
            player_notes,
            opponent_notes: self.notes.len() - player_notes,
            holds: self.notes.iter().filter(|n| n.is_hold()).count(),
            total_sustain_ms: self.notes.iter().map(|n| n.sustain_length).sum(),
            last_note_end_ms: self.last_note_end(),
        }
    }
}

fn validate_tempo(meta: &ChartMeta) -> Result<(), ChartError> {
    if !(meta.bpm.is_finite() && meta.bpm > 0.0) {
        return Err(ChartError::new("E3001", format!("bpm must be > 0, got {}", meta.bpm)));
    }
    if !(meta.speed.is_finite() && meta.speed > 0.0) {
        return Err(ChartError::new("E3002", format!("speed must be > 0, got {}", meta.speed)));
    }
    Ok(())
}

fn parse_raw_note(raw: &RawNote, must_hit_section: bool, section: usize) -> Result<Option<Note>, ChartError> {
    let column = raw
        .column()
        .ok_or_else(|| ChartError::new("E1001", "note column must be an integer"))?;
    if column < 0 {
        return Ok(None);
    }
    if column >= RAW_COLUMNS {
        return Err(ChartError::new(
            "E2002",
            format!("column {column} out of range 0..{RAW_COLUMNS}"),
        ));
    }

    let strum_time = raw
        .time()
        .ok_or_else(|| ChartError::new("E1002", "note time must be a number"))?;
    let sustain_length = raw
        .sustain()
        .ok_or_else(|| ChartError::new("E2003", "sustain length must be a number"))?;
    if !strum_time.is_finite() || strum_time < 0.0 {
        return Err(ChartError::new("E2001", format!("strum time must be >= 0, got {strum_time}")));
    }
    if !sustain_length.is_finite() || sustain_length < 0.0 {
        return Err(ChartError::new(
            "E2003",
            format!("sustain length must be >= 0, got {sustain_length}"),
        ));
    }

    let lane = Lane::from_index((column % 4) as usize)
        .ok_or_else(|| ChartError::new("E2002", format!("column {column} has no lane")))?;
    let is_player_note = (column < 4) == must_hit_section;

    Ok(Some(Note {
        strum_time,
        lane,
        sustain_length,
        is_player_note,
        section,
    }))
}
