//! Playback state machine
//!
//! [`transition`] is the single authority on which trigger is legal in which
//! state. The sequencer consults it before touching the session, so a
//! rejected trigger never has side effects.

use super::errors::PlaybackError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    /// Nothing selected, or fully reset
    Idle,
    /// The sequencer is advancing the producer
    Running,
    /// Producer retained, no timer scheduled
    Paused,
    /// Producer exhausted; retained read-only until the next reset or start
    Finished,
    /// Producer failed; the error is retained for display
    Errored,
}

impl PlaybackState {
    pub const ALL: [PlaybackState; 5] = [
        PlaybackState::Idle,
        PlaybackState::Running,
        PlaybackState::Paused,
        PlaybackState::Finished,
        PlaybackState::Errored,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Running => "running",
            PlaybackState::Paused => "paused",
            PlaybackState::Finished => "finished",
            PlaybackState::Errored => "errored",
        }
    }

    /// Terminal for the current producer
    pub fn is_terminal(self) -> bool {
        matches!(self, PlaybackState::Finished | PlaybackState::Errored)
    }

    /// A run is in progress (possibly paused)
    pub fn is_active(self) -> bool {
        matches!(self, PlaybackState::Running | PlaybackState::Paused)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Start,
    Pause,
    Resume,
    Reset,
    /// Internal: the producer has no more checkpoints
    Exhausted,
    /// Internal: the producer raised an error
    Failed,
}

impl Trigger {
    pub const ALL: [Trigger; 6] = [
        Trigger::Start,
        Trigger::Pause,
        Trigger::Resume,
        Trigger::Reset,
        Trigger::Exhausted,
        Trigger::Failed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Trigger::Start => "start",
            Trigger::Pause => "pause",
            Trigger::Resume => "resume",
            Trigger::Reset => "reset",
            Trigger::Exhausted => "finish",
            Trigger::Failed => "fail",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Look up the target state for `trigger` fired in `from`
pub fn transition(from: PlaybackState, trigger: Trigger) -> Result<PlaybackState, PlaybackError> {
    use PlaybackState::*;

    let reject = |reason: &'static str| {
        Err(PlaybackError::InvalidTransition {
            trigger,
            state: from,
            reason,
        })
    };

    match (trigger, from) {
        (Trigger::Start, Idle | Finished | Errored) => Ok(Running),
        (Trigger::Start, Running) => reject("animation already running"),
        (Trigger::Start, Paused) => reject("animation is paused, resume or reset first"),

        (Trigger::Pause, Running) => Ok(Paused),
        (Trigger::Pause, Paused) => reject("already paused"),
        (Trigger::Resume, Paused) => Ok(Running),
        (Trigger::Resume, Running) => reject("not paused"),
        (Trigger::Pause | Trigger::Resume, Idle | Finished | Errored) => {
            reject("nothing to pause or resume")
        }

        (Trigger::Reset, _) => Ok(Idle),

        (Trigger::Exhausted, Running) => Ok(Finished),
        (Trigger::Failed, Running) => Ok(Errored),
        (Trigger::Exhausted | Trigger::Failed, _) => reject("no run in progress"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PlaybackState::*;

    #[test]
    fn test_start_from_resting_states() {
        for from in [Idle, Finished, Errored] {
            assert_eq!(transition(from, Trigger::Start), Ok(Running));
        }
    }

    #[test]
    fn test_start_rejected_while_active() {
        for from in [Running, Paused] {
            let err = transition(from, Trigger::Start).unwrap_err();
            assert!(matches!(
                err,
                PlaybackError::InvalidTransition { state, .. } if state == from
            ));
        }
        let paused = transition(Paused, Trigger::Start).unwrap_err().to_string();
        assert!(paused.contains("resume or reset"), "{}", paused);
    }

    #[test]
    fn test_pause_resume_toggle() {
        assert_eq!(transition(Running, Trigger::Pause), Ok(Paused));
        assert_eq!(transition(Paused, Trigger::Resume), Ok(Running));
        for from in [Idle, Finished, Errored] {
            assert!(transition(from, Trigger::Pause).is_err());
            assert!(transition(from, Trigger::Resume).is_err());
        }
    }

    #[test]
    fn test_reset_always_lands_idle() {
        for from in PlaybackState::ALL {
            assert_eq!(transition(from, Trigger::Reset), Ok(Idle));
        }
    }

    #[test]
    fn test_internal_events_only_from_running() {
        assert_eq!(transition(Running, Trigger::Exhausted), Ok(Finished));
        assert_eq!(transition(Running, Trigger::Failed), Ok(Errored));
        for from in [Idle, Paused, Finished, Errored] {
            assert!(transition(from, Trigger::Exhausted).is_err());
            assert!(transition(from, Trigger::Failed).is_err());
        }
    }

    #[test]
    fn test_rejections_are_not_fatal() {
        for from in PlaybackState::ALL {
            for trigger in Trigger::ALL {
                if let Err(e) = transition(from, trigger) {
                    assert!(!e.is_fatal());
                }
            }
        }
    }
}
