//! Sink that keeps what the screen should show between frames

use crate::playback::{PlaybackState, PresentationSink};
use crate::viz::Checkpoint;
use tracing::trace;

#[derive(Debug)]
pub struct ScreenSink {
    /// Last presented checkpoint; `None` shows the model at rest
    pub checkpoint: Option<Checkpoint>,
    pub state: PlaybackState,
    pub message: String,
    pub error: Option<String>,
    finished: bool,
}

impl ScreenSink {
    pub fn new() -> Self {
        ScreenSink {
            checkpoint: None,
            state: PlaybackState::Idle,
            message: String::from("Ready!"),
            error: None,
            finished: false,
        }
    }

    /// Forget the presented checkpoint and any error
    pub fn clear(&mut self) {
        self.checkpoint = None;
        self.error = None;
        self.finished = false;
    }

    /// Whether a run finished since the last call
    pub fn take_finished(&mut self) -> bool {
        std::mem::take(&mut self.finished)
    }
}

impl Default for ScreenSink {
    fn default() -> Self {
        Self::new()
    }
}

impl PresentationSink<Checkpoint> for ScreenSink {
    fn present(&mut self, checkpoint: Checkpoint) {
        trace!(caption = %checkpoint.caption, "present");
        self.checkpoint = Some(checkpoint);
    }

    fn on_finished(&mut self) {
        self.finished = true;
        self.message = String::from("Visualization complete");
    }

    fn on_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
        self.message = message.to_string();
    }

    fn state_changed(&mut self, state: PlaybackState) {
        self.state = state;
        match state {
            PlaybackState::Running => self.message = String::from("Playing..."),
            PlaybackState::Paused => self.message = String::from("Paused"),
            PlaybackState::Idle => self.message = String::from("Ready!"),
            PlaybackState::Finished | PlaybackState::Errored => {}
        }
    }
}
