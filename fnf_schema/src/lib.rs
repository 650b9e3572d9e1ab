use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type Milliseconds = f64;

pub const DEFAULT_BPM: f64 = 100.0;
pub const DEFAULT_SPEED: f64 = 1.0;

/// Every chart shape the editor and the common community engines write.
///
/// Variants are tried in order: a bare list of sections, the classic
/// `{ "song": { ... } }` wrapper, then a bare song object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ChartDocument {
    Sections(Vec<Section>),
    Wrapped { song: Song },
    Bare(Song),
}

impl ChartDocument {
    pub fn into_song(self) -> Song {
        match self {
            ChartDocument::Sections(notes) => Song {
                notes,
                ..Song::default()
            },
            ChartDocument::Wrapped { song } | ChartDocument::Bare(song) => song,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    #[serde(default)]
    pub song: String,
    pub notes: Vec<Section>,
    #[serde(default = "default_bpm")]
    pub bpm: f64,
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default)]
    pub needs_voices: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player2: Option<String>,
    /// Fields the engine does not read (stage, gfVersion, validScore, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Song {
    fn default() -> Self {
        Self {
            song: String::new(),
            notes: Vec::new(),
            bpm: DEFAULT_BPM,
            speed: DEFAULT_SPEED,
            needs_voices: false,
            player1: None,
            player2: None,
            extra: Map::new(),
        }
    }
}

fn default_bpm() -> f64 {
    DEFAULT_BPM
}

fn default_speed() -> f64 {
    DEFAULT_SPEED
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default)]
    pub section_notes: Vec<RawNote>,
    #[serde(default)]
    pub must_hit_section: bool,
    #[serde(rename = "changeBPM", default, skip_serializing_if = "Option::is_none")]
    pub change_bpm: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One `sectionNotes` entry: `[time, column, sustain, ...]`.
///
/// The original array is kept as-is so re-saving a chart reproduces every
/// element, including note-type strings and event payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RawNote(pub Vec<Value>);

impl RawNote {
    pub fn time(&self) -> Option<Milliseconds> {
        self.0.first().and_then(Value::as_f64)
    }

    /// Integral column index. Negative columns mark event notes.
    pub fn column(&self) -> Option<i64> {
        let v = self.0.get(1)?;
        if let Some(i) = v.as_i64() {
            return Some(i);
        }
        let f = v.as_f64()?;
        (f.fract() == 0.0).then_some(f as i64)
    }

    /// Missing or `null` sustain means a tap note.
    pub fn sustain(&self) -> Option<Milliseconds> {
        match self.0.get(2) {
            None | Some(Value::Null) => Some(0.0),
            Some(v) => v.as_f64(),
        }
    }
}
