/// Song-position clock in milliseconds.
///
/// The host loop advances it once per rendered frame; everything else in the
/// engine reads timing from here and never from wall-clock time.
#[derive(Debug, Clone, PartialEq)]
pub struct Conductor {
    song_position: f64,
    playing: bool,
    bpm: f64,
}

impl Conductor {
    pub fn new(bpm: f64) -> Self {
        Self {
            song_position: 0.0,
            playing: false,
            bpm,
        }
    }

    /// Starts `beats` beats before the song so a countdown can play first.
    pub fn with_countdown(bpm: f64, beats: u32) -> Self {
        let mut conductor = Self::new(bpm);
        conductor.song_position = -(beats as f64) * conductor.crochet();
        conductor
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Moves the song position forward by `delta_ms` while playing.
    pub fn advance(&mut self, delta_ms: f64) {
        if !self.playing {
            return;
        }
        if !delta_ms.is_finite() || delta_ms < 0.0 {
            log::trace!("ignoring clock delta {delta_ms}");
            return;
        }
        self.song_position += delta_ms;
    }

    pub fn song_position(&self) -> f64 {
        self.song_position
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Length of one beat in ms.
    pub fn crochet(&self) -> f64 {
        60_000.0 / self.bpm
    }

    pub fn step_crochet(&self) -> f64 {
        self.crochet() / 4.0
    }

    pub fn current_beat(&self) -> i64 {
        (self.song_position / self.crochet()).floor() as i64
    }

    pub fn current_step(&self) -> i64 {
        (self.song_position / self.step_crochet()).floor() as i64
    }
}
