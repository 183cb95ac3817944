//! Presentation sink contract
//!
//! The sequencer talks to whatever renders checkpoints only through
//! [`PresentationSink`]. The finish and error hooks are optional: their
//! default implementations fall back to [`PresentationSink::restore_idle_controls`].

use super::state::PlaybackState;

pub trait PresentationSink<C> {
    /// A checkpoint is ready; called once per checkpoint, in producer order
    fn present(&mut self, checkpoint: C);

    /// The producer is exhausted. Called exactly once per finished run.
    fn on_finished(&mut self) {
        self.restore_idle_controls();
    }

    /// The run failed. Called exactly once per failed run.
    fn on_error(&mut self, message: &str) {
        let _ = message;
        self.restore_idle_controls();
    }

    /// Generic "controls are usable again" fallback
    fn restore_idle_controls(&mut self) {}

    /// Called after every applied transition
    fn state_changed(&mut self, state: PlaybackState) {
        let _ = state;
    }
}

/// Which controls the UI should offer in a given state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub start: bool,
    pub pause: bool,
    pub pause_label: &'static str,
    pub reset: bool,
    pub speed: bool,
    pub size: bool,
    /// Structure operations, case generators and other per-visualization inputs
    pub operations: bool,
}

impl Controls {
    /// `can_start` is false for visualizations driven only by operations
    pub fn for_state(state: PlaybackState, can_start: bool, size_relevant: bool) -> Self {
        let active = state.is_active();
        Controls {
            start: can_start && !active,
            pause: active,
            pause_label: if state == PlaybackState::Paused {
                "Resume"
            } else {
                "Pause"
            },
            reset: state != PlaybackState::Running,
            speed: true,
            size: size_relevant && !active,
            operations: !active,
        }
    }
}

/// Everything a sink was told, in order
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent<C> {
    Presented(C),
    Finished,
    Error(String),
    State(PlaybackState),
}

/// Sink that records every call; used by headless runs and tests
#[derive(Debug, Clone)]
pub struct Recorder<C> {
    pub events: Vec<SinkEvent<C>>,
}

impl<C> Recorder<C> {
    pub fn new() -> Self {
        Recorder { events: Vec::new() }
    }

    pub fn presented(&self) -> Vec<&C> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Presented(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    pub fn finished_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Finished))
            .count()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Error(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn states(&self) -> Vec<PlaybackState> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::State(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<C> Default for Recorder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> PresentationSink<C> for Recorder<C> {
    fn present(&mut self, checkpoint: C) {
        self.events.push(SinkEvent::Presented(checkpoint));
    }

    fn on_finished(&mut self) {
        self.events.push(SinkEvent::Finished);
    }

    fn on_error(&mut self, message: &str) {
        self.events.push(SinkEvent::Error(message.to_string()));
    }

    fn state_changed(&mut self, state: PlaybackState) {
        self.events.push(SinkEvent::State(state));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Minimal {
        presented: usize,
        restored: usize,
    }

    impl PresentationSink<u8> for Minimal {
        fn present(&mut self, _checkpoint: u8) {
            self.presented += 1;
        }

        fn restore_idle_controls(&mut self) {
            self.restored += 1;
        }
    }

    #[test]
    fn test_missing_hooks_fall_back_to_restore() {
        let mut sink = Minimal::default();
        sink.present(1);
        sink.on_finished();
        sink.on_error("boom");
        assert_eq!(sink.presented, 1);
        assert_eq!(sink.restored, 2);
    }

    #[test]
    fn test_controls_while_running() {
        let c = Controls::for_state(PlaybackState::Running, true, true);
        assert!(!c.start);
        assert!(c.pause);
        assert_eq!(c.pause_label, "Pause");
        assert!(!c.reset);
        assert!(c.speed);
        assert!(!c.size);
        assert!(!c.operations);
    }

    #[test]
    fn test_controls_while_paused() {
        let c = Controls::for_state(PlaybackState::Paused, true, true);
        assert!(!c.start);
        assert!(c.pause);
        assert_eq!(c.pause_label, "Resume");
        assert!(c.reset);
        assert!(c.speed);
    }

    #[test]
    fn test_controls_at_rest() {
        for state in [
            PlaybackState::Idle,
            PlaybackState::Finished,
            PlaybackState::Errored,
        ] {
            let c = Controls::for_state(state, true, false);
            assert!(c.start);
            assert!(!c.pause);
            assert!(c.reset);
            assert!(!c.size);
            assert!(c.operations);
        }
        let ops_only = Controls::for_state(PlaybackState::Idle, false, false);
        assert!(!ops_only.start);
    }
}
