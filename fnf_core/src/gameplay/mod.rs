pub mod bot;
pub mod events;
pub mod hit_window;
pub mod judge;
pub mod lifecycle;
pub mod score;
pub mod session;
pub mod sustain;

pub use self::events::JudgeEvent;
pub use self::hit_window::{HitWindows, Rating};
pub use self::lifecycle::{HoldPhase, NoteState, NoteStates};
pub use self::score::{ClearKind, RatingCounts, ScoreSnapshot, ScoreState};
pub use self::session::PlaySession;
