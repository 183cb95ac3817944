//! Step sequencer
//!
//! The [`Sequencer`] owns the single [`PlaybackSession`]: the current state,
//! the active producer and at most one pending timer. It never blocks. The
//! host event loop asks for [`Sequencer::next_deadline`], waits (polling input
//! in the meantime) and then calls [`Sequencer::tick`], which performs one
//! advance if the pending timer is due.
//!
//! # Invariants
//!
//! Between public calls:
//! - a timer is pending if and only if the state is `Running`
//! - a producer is present whenever the state is `Running` or `Paused`, and
//!   absent in `Idle`
//!
//! Every public method leaves these holding; they are checked with
//! `debug_assert!` on the way out.

use super::delay::DelayPolicy;
use super::errors::PlaybackError;
use super::sink::PresentationSink;
use super::state::{transition, PlaybackState, Trigger};
use crate::producer::{BoxedProducer, MalformedProducer, Step};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, trace, warn};

/// Handle of a scheduled advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: TimerId,
    pub due: Instant,
}

struct ActiveProducer<C> {
    producer: BoxedProducer<C>,
    exhausted: bool,
}

/// What is being played right now
pub struct PlaybackSession<C> {
    state: PlaybackState,
    producer: Option<ActiveProducer<C>>,
    pending: Option<PendingTimer>,
    last_error: Option<PlaybackError>,
    /// Checkpoints presented in the current run
    presented: usize,
    /// Number of runs started since creation
    runs: u64,
}

impl<C> PlaybackSession<C> {
    fn new() -> Self {
        PlaybackSession {
            state: PlaybackState::Idle,
            producer: None,
            pending: None,
            last_error: None,
            presented: 0,
            runs: 0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn pending_timer(&self) -> Option<PendingTimer> {
        self.pending
    }

    pub fn has_producer(&self) -> bool {
        self.producer.is_some()
    }

    /// Whether the retained producer has reported exhaustion or failure
    pub fn producer_exhausted(&self) -> bool {
        self.producer.as_ref().is_some_and(|p| p.exhausted)
    }

    pub fn producer_label(&self) -> Option<&str> {
        self.producer.as_ref().map(|p| p.producer.label())
    }

    pub fn last_error(&self) -> Option<&PlaybackError> {
        self.last_error.as_ref()
    }

    pub fn presented(&self) -> usize {
        self.presented
    }

    pub fn runs(&self) -> u64 {
        self.runs
    }
}

pub struct Sequencer<C> {
    session: PlaybackSession<C>,
    policy: DelayPolicy,
    /// UI-owned speed value; `None` means "use the policy default"
    speed: Option<f64>,
    next_timer: u64,
}

impl<C> Sequencer<C> {
    pub fn new(policy: DelayPolicy) -> Self {
        Sequencer {
            session: PlaybackSession::new(),
            policy,
            speed: None,
            next_timer: 0,
        }
    }

    pub fn session(&self) -> &PlaybackSession<C> {
        &self.session
    }

    pub fn state(&self) -> PlaybackState {
        self.session.state
    }

    pub fn policy(&self) -> &DelayPolicy {
        &self.policy
    }

    /// Takes effect on the next scheduled delay; an already pending timer
    /// keeps its due time
    pub fn set_speed(&mut self, speed: Option<f64>) {
        debug!(?speed, delay_ms = self.policy.delay_for(speed).as_millis() as u64, "speed changed");
        self.speed = speed;
    }

    pub fn speed(&self) -> Option<f64> {
        self.speed
    }

    pub fn current_delay(&self) -> Duration {
        self.policy.delay_for(self.speed)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.session.pending.map(|t| t.due)
    }

    /// Begin a new run with a fresh producer from `factory`.
    ///
    /// Rejected (state unchanged) while `Running` or `Paused`. Otherwise the
    /// previous session is torn down, the factory is invoked and the first
    /// checkpoint is requested immediately. A factory error lands the session
    /// in `Errored` before any checkpoint is attempted. Returns the state the
    /// session is in afterwards.
    pub fn start<F, S>(
        &mut self,
        factory: F,
        now: Instant,
        sink: &mut S,
    ) -> Result<PlaybackState, PlaybackError>
    where
        F: FnOnce() -> Result<BoxedProducer<C>, MalformedProducer>,
        S: PresentationSink<C> + ?Sized,
    {
        let next = transition(self.session.state, Trigger::Start).map_err(|e| {
            warn!(state = %self.session.state, "start rejected: {}", e);
            e
        })?;

        self.teardown();
        self.session.runs += 1;
        self.session.state = next;
        sink.state_changed(next);

        match factory() {
            Ok(producer) => {
                info!(run = self.session.runs, producer = producer.label(), "run started");
                self.session.producer = Some(ActiveProducer {
                    producer,
                    exhausted: false,
                });
                self.advance_once(now, sink);
            }
            Err(MalformedProducer(reason)) => {
                self.fail(PlaybackError::MalformedProducer(reason), sink);
            }
        }

        self.check_invariants();
        Ok(self.session.state)
    }

    pub fn pause<S>(&mut self, sink: &mut S) -> Result<PlaybackState, PlaybackError>
    where
        S: PresentationSink<C> + ?Sized,
    {
        let next = self.validated(Trigger::Pause)?;
        self.cancel_scheduled();
        self.session.state = next;
        info!(presented = self.session.presented, "paused");
        sink.state_changed(next);
        self.check_invariants();
        Ok(next)
    }

    /// Continue from the next checkpoint, without waiting a full delay
    pub fn resume<S>(&mut self, now: Instant, sink: &mut S) -> Result<PlaybackState, PlaybackError>
    where
        S: PresentationSink<C> + ?Sized,
    {
        let next = self.validated(Trigger::Resume)?;
        self.session.state = next;
        info!(presented = self.session.presented, "resumed");
        sink.state_changed(next);
        self.advance_once(now, sink);
        self.check_invariants();
        Ok(self.session.state)
    }

    pub fn pause_or_resume<S>(
        &mut self,
        now: Instant,
        sink: &mut S,
    ) -> Result<PlaybackState, PlaybackError>
    where
        S: PresentationSink<C> + ?Sized,
    {
        match self.session.state {
            PlaybackState::Paused => self.resume(now, sink),
            _ => self.pause(sink),
        }
    }

    /// Unconditional return to `Idle`: cancels the timer, drops the producer
    /// and clears the retained error. Idempotent.
    pub fn reset<S>(&mut self, sink: &mut S)
    where
        S: PresentationSink<C> + ?Sized,
    {
        let from = self.session.state;
        self.teardown();
        self.session.state = PlaybackState::Idle;
        info!(from = %from, "reset");
        sink.state_changed(PlaybackState::Idle);
        self.check_invariants();
    }

    /// Cancel the pending timer, if any
    pub fn cancel_scheduled(&mut self) {
        if let Some(timer) = self.session.pending.take() {
            trace!(timer = timer.id.0, "timer cancelled");
        }
    }

    /// Request one checkpoint from the producer and schedule the next advance.
    ///
    /// A no-op unless `Running` with a producer, so a stale advance after a
    /// reset or pause does nothing. Producer failures are converted into the
    /// `Errored` state and reported to the sink, never returned.
    pub fn advance_once<S>(&mut self, now: Instant, sink: &mut S)
    where
        S: PresentationSink<C> + ?Sized,
    {
        if self.session.state != PlaybackState::Running {
            trace!(state = %self.session.state, "advance skipped");
            return;
        }
        self.cancel_scheduled();

        let step = match self.session.producer.as_mut() {
            Some(active) if !active.exhausted => active.producer.next_checkpoint(),
            Some(_) => {
                warn!("advance requested on an exhausted producer");
                return;
            }
            None => {
                warn!("advance requested without a producer");
                return;
            }
        };

        match step {
            Step::Yielded(checkpoint) => {
                self.session.presented += 1;
                debug!(checkpoint = self.session.presented, "checkpoint presented");
                sink.present(checkpoint);
                self.schedule(now);
            }
            Step::Done => {
                self.mark_exhausted();
                self.finish(sink);
            }
            Step::Failed(e) => {
                self.mark_exhausted();
                self.fail(PlaybackError::ProducerFailure(e.to_string()), sink);
            }
        }
    }

    /// Fire the pending advance if it is due. Returns whether it fired.
    pub fn tick<S>(&mut self, now: Instant, sink: &mut S) -> bool
    where
        S: PresentationSink<C> + ?Sized,
    {
        match self.session.pending {
            Some(timer) if now >= timer.due => {
                self.advance_once(now, sink);
                self.check_invariants();
                true
            }
            _ => false,
        }
    }

    /// Fire a specific timer. Handles that are no longer pending are ignored.
    pub fn fire<S>(&mut self, id: TimerId, now: Instant, sink: &mut S) -> bool
    where
        S: PresentationSink<C> + ?Sized,
    {
        match self.session.pending {
            Some(timer) if timer.id == id => {
                self.advance_once(now, sink);
                self.check_invariants();
                true
            }
            _ => {
                trace!(timer = id.0, "stale timer ignored");
                false
            }
        }
    }

    fn validated(&self, trigger: Trigger) -> Result<PlaybackState, PlaybackError> {
        transition(self.session.state, trigger).map_err(|e| {
            warn!(state = %self.session.state, "{} rejected: {}", trigger, e);
            e
        })
    }

    fn schedule(&mut self, now: Instant) {
        let delay = self.current_delay();
        self.next_timer += 1;
        let timer = PendingTimer {
            id: TimerId(self.next_timer),
            due: now + delay,
        };
        trace!(timer = timer.id.0, delay_ms = delay.as_millis() as u64, "advance scheduled");
        self.session.pending = Some(timer);
    }

    fn teardown(&mut self) {
        self.cancel_scheduled();
        self.session.producer = None;
        self.session.last_error = None;
        self.session.presented = 0;
    }

    fn mark_exhausted(&mut self) {
        if let Some(active) = self.session.producer.as_mut() {
            active.exhausted = true;
        }
    }

    fn finish<S>(&mut self, sink: &mut S)
    where
        S: PresentationSink<C> + ?Sized,
    {
        self.cancel_scheduled();
        match transition(self.session.state, Trigger::Exhausted) {
            Ok(next) => {
                self.session.state = next;
                info!(presented = self.session.presented, "algorithm finished");
                sink.state_changed(next);
                sink.on_finished();
            }
            Err(e) => warn!("finish ignored: {}", e),
        }
    }

    fn fail<S>(&mut self, err: PlaybackError, sink: &mut S)
    where
        S: PresentationSink<C> + ?Sized,
    {
        self.cancel_scheduled();
        match transition(self.session.state, Trigger::Failed) {
            Ok(next) => {
                let message = err.to_string();
                error!(presented = self.session.presented, "run failed: {}", message);
                self.session.state = next;
                self.session.last_error = Some(err);
                sink.state_changed(next);
                sink.on_error(&message);
            }
            Err(e) => warn!("failure ignored: {}", e),
        }
    }

    fn check_invariants(&self) {
        debug_assert_eq!(
            self.session.pending.is_some(),
            self.session.state == PlaybackState::Running,
            "timer must be pending exactly while running (state {})",
            self.session.state
        );
        debug_assert!(
            !self.session.state.is_active() || self.session.producer.is_some(),
            "active state {} without a producer",
            self.session.state
        );
        debug_assert!(
            self.session.state != PlaybackState::Idle || self.session.producer.is_none(),
            "idle session still holds a producer"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::delay::DelayConfig;
    use crate::playback::sink::{Recorder, SinkEvent};
    use crate::producer::{boxed, Scripted};

    fn immediate() -> Sequencer<char> {
        Sequencer::new(DelayPolicy::new(DelayConfig::immediate()))
    }

    fn paced(ms: u64) -> Sequencer<char> {
        Sequencer::new(DelayPolicy::new(DelayConfig {
            min_delay_ms: ms,
            max_delay_ms: ms,
            default_speed: 0.0,
        }))
    }

    fn abc() -> Result<BoxedProducer<char>, MalformedProducer> {
        Ok(boxed(Scripted::new(['A', 'B', 'C'])))
    }

    /// Tick until the sequencer stops scheduling, returning the tick count
    fn drain(seq: &mut Sequencer<char>, now: Instant, sink: &mut Recorder<char>) -> usize {
        let mut ticks = 0;
        while let Some(due) = seq.next_deadline() {
            assert!(seq.tick(due.max(now), sink));
            ticks += 1;
            assert!(ticks < 1000, "runaway sequencer");
        }
        ticks
    }

    #[test]
    fn test_abc_end_to_end() {
        let mut seq = immediate();
        let mut sink = Recorder::new();
        let now = Instant::now();

        assert_eq!(seq.start(abc, now, &mut sink), Ok(PlaybackState::Running));
        assert_eq!(sink.presented(), vec![&'A']);
        drain(&mut seq, now, &mut sink);

        assert_eq!(sink.presented(), vec![&'A', &'B', &'C']);
        assert_eq!(sink.finished_count(), 1);
        assert_eq!(seq.state(), PlaybackState::Finished);
        assert!(seq.session().pending_timer().is_none());
        assert!(seq.session().producer_exhausted());
    }

    #[test]
    fn test_first_checkpoint_is_synchronous() {
        let mut seq = paced(500);
        let mut sink = Recorder::new();
        let now = Instant::now();
        seq.start(abc, now, &mut sink).unwrap();
        assert_eq!(sink.presented().len(), 1);
        let timer = seq.session().pending_timer().unwrap();
        assert_eq!(timer.due, now + Duration::from_millis(500));
        assert!(!seq.tick(now + Duration::from_millis(499), &mut sink));
        assert!(seq.tick(now + Duration::from_millis(500), &mut sink));
        assert_eq!(sink.presented().len(), 2);
    }

    #[test]
    fn test_start_rejected_while_running_or_paused() {
        let mut seq = paced(100);
        let mut sink = Recorder::new();
        let now = Instant::now();
        seq.start(abc, now, &mut sink).unwrap();

        let mut called = false;
        let again = seq.start(
            || {
                called = true;
                abc()
            },
            now,
            &mut sink,
        );
        assert!(matches!(again, Err(PlaybackError::InvalidTransition { .. })));
        assert!(!called);

        seq.pause(&mut sink).unwrap();
        assert!(seq.start(abc, now, &mut sink).is_err());
        assert_eq!(seq.state(), PlaybackState::Paused);
        assert_eq!(sink.presented().len(), 1);
    }

    #[test]
    fn test_malformed_factory_errors_before_any_checkpoint() {
        let mut seq = immediate();
        let mut sink = Recorder::new();
        let result = seq.start(
            || Err(MalformedProducer("graph is empty".into())),
            Instant::now(),
            &mut sink,
        );
        assert_eq!(result, Ok(PlaybackState::Errored));
        assert!(sink.presented().is_empty());
        assert_eq!(sink.errors(), vec!["cannot start: graph is empty"]);
        assert!(matches!(
            seq.session().last_error(),
            Some(PlaybackError::MalformedProducer(_))
        ));
        assert!(seq.session().pending_timer().is_none());
    }

    #[test]
    fn test_producer_failure_is_isolated() {
        let mut seq = immediate();
        let mut sink = Recorder::new();
        let now = Instant::now();
        seq.start(
            || Ok(boxed(Scripted::new(['A', 'B', 'C', 'D']).failing_at(3, "disk mismatch"))),
            now,
            &mut sink,
        )
        .unwrap();
        drain(&mut seq, now, &mut sink);

        assert_eq!(sink.presented(), vec![&'A', &'B']);
        assert_eq!(sink.errors().len(), 1);
        assert!(sink.errors()[0].contains("disk mismatch"));
        assert_eq!(sink.finished_count(), 0);
        assert_eq!(seq.state(), PlaybackState::Errored);
        assert!(seq.session().pending_timer().is_none());
    }

    #[test]
    fn test_pause_freezes_and_resume_continues() {
        let mut seq = paced(50);
        let mut sink = Recorder::new();
        let t0 = Instant::now();
        seq.start(abc, t0, &mut sink).unwrap();
        seq.pause(&mut sink).unwrap();
        assert!(seq.session().pending_timer().is_none());

        let later = t0 + Duration::from_secs(3600);
        assert!(!seq.tick(later, &mut sink));
        assert_eq!(sink.presented(), vec![&'A']);

        seq.resume(later, &mut sink).unwrap();
        assert_eq!(sink.presented(), vec![&'A', &'B']);
        assert_eq!(seq.state(), PlaybackState::Running);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut seq = paced(10);
        let mut sink = Recorder::new();
        seq.start(abc, Instant::now(), &mut sink).unwrap();
        seq.reset(&mut sink);
        seq.reset(&mut sink);
        assert_eq!(seq.state(), PlaybackState::Idle);
        assert!(!seq.session().has_producer());
        assert!(seq.session().pending_timer().is_none());
        let tail: Vec<_> = sink.states().into_iter().rev().take(2).collect();
        assert_eq!(tail, vec![PlaybackState::Idle, PlaybackState::Idle]);
    }

    #[test]
    fn test_stale_timer_after_reset_is_ignored() {
        let mut seq = paced(10);
        let mut sink = Recorder::new();
        let now = Instant::now();
        seq.start(abc, now, &mut sink).unwrap();
        let stale = seq.session().pending_timer().unwrap();
        seq.reset(&mut sink);

        assert!(!seq.fire(stale.id, stale.due, &mut sink));
        seq.advance_once(stale.due, &mut sink);
        assert_eq!(sink.presented().len(), 1);
        assert_eq!(seq.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_fire_only_accepts_current_handle() {
        let mut seq = paced(10);
        let mut sink = Recorder::new();
        let now = Instant::now();
        seq.start(abc, now, &mut sink).unwrap();
        let first = seq.session().pending_timer().unwrap();
        assert!(seq.fire(first.id, first.due, &mut sink));
        let second = seq.session().pending_timer().unwrap();
        assert_ne!(first.id, second.id);
        assert!(!seq.fire(first.id, second.due, &mut sink));
        assert_eq!(sink.presented().len(), 2);
    }

    #[test]
    fn test_speed_change_is_not_retroactive() {
        let mut seq: Sequencer<char> = Sequencer::new(DelayPolicy::default());
        let mut sink = Recorder::new();
        let now = Instant::now();
        seq.set_speed(Some(10.0));
        seq.start(abc, now, &mut sink).unwrap();
        let due = seq.next_deadline().unwrap();
        assert_eq!(due, now + Duration::from_millis(1000));

        seq.set_speed(Some(1000.0));
        assert_eq!(seq.next_deadline(), Some(due));
        seq.tick(due, &mut sink);
        assert_eq!(seq.next_deadline(), Some(due + Duration::from_millis(10)));
    }

    #[test]
    fn test_restart_after_finish_uses_fresh_producer() {
        let mut seq = immediate();
        let mut sink = Recorder::new();
        let now = Instant::now();
        seq.start(abc, now, &mut sink).unwrap();
        drain(&mut seq, now, &mut sink);
        sink.clear();

        seq.start(abc, now, &mut sink).unwrap();
        drain(&mut seq, now, &mut sink);
        assert_eq!(sink.presented(), vec![&'A', &'B', &'C']);
        assert_eq!(seq.session().runs(), 2);
        assert_eq!(seq.session().presented(), 3);
    }

    #[test]
    fn test_empty_producer_finishes_during_start() {
        let mut seq = immediate();
        let mut sink = Recorder::new();
        let state = seq
            .start(|| Ok(boxed(Scripted::<char>::new([]))), Instant::now(), &mut sink)
            .unwrap();
        assert_eq!(state, PlaybackState::Finished);
        assert_eq!(
            sink.events,
            vec![
                SinkEvent::State(PlaybackState::Running),
                SinkEvent::State(PlaybackState::Finished),
                SinkEvent::Finished,
            ]
        );
    }

    #[test]
    fn test_no_advance_after_finish() {
        let mut seq = immediate();
        let mut sink = Recorder::new();
        let now = Instant::now();
        seq.start(abc, now, &mut sink).unwrap();
        drain(&mut seq, now, &mut sink);
        let events = sink.events.len();

        seq.advance_once(now + Duration::from_secs(60), &mut sink);
        assert!(!seq.tick(now + Duration::from_secs(60), &mut sink));
        assert_eq!(sink.events.len(), events);
        assert_eq!(sink.finished_count(), 1);
    }

    #[test]
    fn test_pause_resume_rejections_leave_state() {
        let mut seq = immediate();
        let mut sink = Recorder::new();
        assert!(seq.pause(&mut sink).is_err());
        assert!(seq.resume(Instant::now(), &mut sink).is_err());
        assert!(seq.pause_or_resume(Instant::now(), &mut sink).is_err());
        assert_eq!(seq.state(), PlaybackState::Idle);
        assert!(sink.events.is_empty());
    }
}
