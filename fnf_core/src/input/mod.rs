pub mod events;

use self::events::InputEvent;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Lane key events waiting for the next session tick.
///
/// Sources push as keys change; the session drains the whole backlog once per
/// tick, right after the clock moves, and judges it at that song position.
pub struct InputQueue {
    sender: Sender<InputEvent>,
    receiver: Receiver<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    pub fn push(&self, event: InputEvent) {
        // The receiver lives as long as the queue, so sending cannot fail.
        let _ = self.sender.send(event);
    }

    /// Everything queued since the last drain, oldest first.
    pub fn drain(&self) -> Vec<InputEvent> {
        self.receiver.try_iter().collect()
    }

    /// Producer handle for a key source running outside the tick loop.
    pub fn sender(&self) -> Sender<InputEvent> {
        self.sender.clone()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
