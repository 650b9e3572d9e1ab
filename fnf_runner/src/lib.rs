use std::{fs, path::Path};

use anyhow::Context;
use fnf_core::chart::{Chart, ChartSummary, Lane};
use fnf_core::config::JudgeConfig;
use fnf_core::gameplay::{JudgeEvent, PlaySession, ScoreSnapshot};
use fnf_core::input::events::{InputEvent, Phase};
use fnf_core::time::conductor::Conductor;
use fnf_schema::{ChartDocument, Song};
use serde::{Deserialize, Serialize};

pub fn load_song_from_path(path: impl AsRef<Path>) -> anyhow::Result<Song> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("failed to read chart: {}", path.display()))?;
    let doc: ChartDocument = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse chart json: {}", path.display()))?;
    Ok(song_from_document(doc))
}

pub fn load_song_from_str(json: &str) -> anyhow::Result<Song> {
    let doc: ChartDocument = serde_json::from_str(json).context("failed to parse chart json")?;
    Ok(song_from_document(doc))
}

fn song_from_document(doc: ChartDocument) -> Song {
    match &doc {
        ChartDocument::Sections(sections) => log::warn!(
            "chart is a bare section list ({} sections); using default bpm and speed",
            sections.len()
        ),
        ChartDocument::Bare(_) => log::debug!("chart has no song wrapper"),
        ChartDocument::Wrapped { .. } => {}
    }
    doc.into_song()
}

pub fn load_chart_from_path(path: impl AsRef<Path>) -> anyhow::Result<Chart> {
    let path = path.as_ref();
    let song = load_song_from_path(path)?;
    Chart::from_song(&song).with_context(|| format!("invalid chart: {}", path.display()))
}

pub fn load_chart_from_str(json: &str) -> anyhow::Result<Chart> {
    let song = load_song_from_str(json)?;
    Chart::from_song(&song).context("invalid chart")
}

/// Reads a judge config; missing fields fall back to the defaults.
pub fn load_config_from_path(path: impl AsRef<Path>) -> anyhow::Result<JudgeConfig> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("failed to read config: {}", path.display()))?;
    let config: JudgeConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse config json: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config: {}", path.display()))?;
    Ok(config)
}

/// One recorded key event of a replay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedInput {
    /// Song position (ms) at which the key changed.
    pub time: f64,
    pub lane: Lane,
    pub phase: Phase,
}

pub fn load_inputs_from_path(path: impl AsRef<Path>) -> anyhow::Result<Vec<ScriptedInput>> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("failed to read input script: {}", path.display()))?;
    let inputs = parse_inputs(serde_json::from_slice(&bytes))
        .with_context(|| format!("failed to parse input script: {}", path.display()))?;
    Ok(inputs)
}

pub fn load_inputs_from_str(json: &str) -> anyhow::Result<Vec<ScriptedInput>> {
    parse_inputs(serde_json::from_str(json)).context("failed to parse input script")
}

fn parse_inputs(parsed: serde_json::Result<Vec<ScriptedInput>>) -> anyhow::Result<Vec<ScriptedInput>> {
    let mut inputs = parsed?;
    if let Some(bad) = inputs.iter().find(|i| !i.time.is_finite()) {
        anyhow::bail!("input time must be finite, got {}", bad.time);
    }
    inputs.sort_by(|a, b| a.time.total_cmp(&b.time));
    Ok(inputs)
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Fixed frame length the session is ticked with.
    pub frame_ms: f64,
    pub autoplay: bool,
    /// Beats of lead-in before song position 0.
    pub countdown_beats: u32,
    pub inputs: Vec<ScriptedInput>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            frame_ms: 1000.0 / 60.0,
            autoplay: false,
            countdown_beats: 0,
            inputs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimedEvent {
    /// Song position of the tick that produced the event.
    pub at: f64,
    #[serde(flatten)]
    pub event: JudgeEvent,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub chart: ChartSummary,
    pub frames: u64,
    pub result: ScoreSnapshot,
    pub events: Vec<TimedEvent>,
}

/// Plays `chart` start to finish with fixed-length frames.
///
/// Scripted inputs are queued on the frame whose end position reaches their
/// time, so they are judged with frame granularity like live input.
pub fn run(chart: Chart, config: JudgeConfig, options: &RunOptions) -> anyhow::Result<RunReport> {
    if !(options.frame_ms.is_finite() && options.frame_ms > 0.0) {
        anyhow::bail!("frame length must be > 0, got {}", options.frame_ms);
    }

    let summary = chart.summary();
    let conductor = Conductor::with_countdown(chart.meta.bpm, options.countdown_beats);
    let mut session = PlaySession::new(chart, config)
        .context("invalid judge config")?
        .with_conductor(conductor);
    session.set_autoplay(options.autoplay);
    session.start();

    let last_input = options.inputs.last().map_or(0.0, |i| i.time);
    let end = summary.last_note_end_ms.max(last_input) + session.config().shit.window_ms + options.frame_ms;

    let mut pending = options.inputs.iter().peekable();
    let mut events = Vec::new();
    let mut frames = 0u64;

    while session.song_position() <= end && !(session.is_finished() && pending.peek().is_none()) {
        let frame_end = session.song_position() + options.frame_ms;
        while let Some(input) = pending.next_if(|i| i.time <= frame_end) {
            session.push_input(InputEvent {
                lane: input.lane,
                phase: input.phase,
            });
        }

        let tick = session.tick(options.frame_ms);
        let at = session.song_position();
        events.extend(tick.into_iter().map(|event| TimedEvent { at, event }));
        frames += 1;
    }

    session.stop();
    let result = session.score_snapshot();
    log::info!(
        "run finished after {frames} frames: score {} ({} misses)",
        result.score,
        result.misses
    );

    Ok(RunReport {
        chart: summary,
        frames,
        result,
        events,
    })
}
