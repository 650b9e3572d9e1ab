//! Note judgment engine for a four-lane rhythm game.
//!
//! The engine is driven by a song-position clock and lane key events and
//! produces score state plus per-note flags for a renderer to read. Audio,
//! sprites and persistence stay outside.

pub mod chart;
pub mod config;
pub mod gameplay;
pub mod input;
pub mod time;

pub use chart::{Chart, ChartError, Lane, Note};
pub use config::JudgeConfig;
pub use gameplay::PlaySession;
