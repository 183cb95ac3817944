//! Playback error taxonomy
//!
//! Only [`PlaybackError::InvalidTransition`] is ever returned to callers; the
//! other two variants are recorded on the session when a run lands in
//! [`Errored`](super::PlaybackState::Errored) and are reported through the
//! presentation sink.

use super::state::{PlaybackState, Trigger};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The requested control is not allowed in the current state
    #[error("cannot {trigger} while {state}: {reason}")]
    InvalidTransition {
        trigger: Trigger,
        state: PlaybackState,
        reason: &'static str,
    },

    /// The algorithm raised an error while computing a checkpoint
    #[error("runtime error: {0}. Please reset.")]
    ProducerFailure(String),

    /// The factory did not yield a usable producer
    #[error("cannot start: {0}")]
    MalformedProducer(String),
}

impl PlaybackError {
    /// Whether this error ended a run (as opposed to a rejected control)
    pub fn is_fatal(&self) -> bool {
        !matches!(self, PlaybackError::InvalidTransition { .. })
    }
}
