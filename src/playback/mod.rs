//! Playback control
//!
//! Everything between an algorithm and the screen:
//!
//! - [`state`]: the five-state lifecycle and its transition table
//! - [`delay`]: speed to delay mapping
//! - [`sequencer`]: the session owner and cooperative timer
//! - [`sink`]: the presentation contract and a recording sink
//! - [`errors`]: playback error taxonomy

pub mod delay;
pub mod errors;
pub mod sequencer;
pub mod sink;
pub mod state;

pub use delay::{parse_speed, DelayConfig, DelayPolicy};
pub use errors::PlaybackError;
pub use sequencer::{PendingTimer, PlaybackSession, Sequencer, TimerId};
pub use sink::{Controls, PresentationSink, Recorder, SinkEvent};
pub use state::{transition, PlaybackState, Trigger};
