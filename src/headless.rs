//! Headless runs: the same sequencer, with captions printed as they are
//! presented

use crate::config::AppConfig;
use crate::playback::{DelayConfig, DelayPolicy, PlaybackState, PresentationSink, Sequencer};
use crate::producer::{BoxedProducer, MalformedProducer};
use crate::viz::{Checkpoint, InputError, OpRequest, Outcome, Visualization, VizKind};
use rand::rngs::StdRng;
use std::io::{self, Write};
use std::thread;
use std::time::Instant;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum HeadlessError {
    #[error("{op}: {source}")]
    Input {
        op: &'static str,
        #[source]
        source: InputError,
    },

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone)]
pub struct HeadlessOptions {
    pub kind: VizKind,
    pub size: Option<usize>,
    pub speed: Option<f64>,
    pub ops: Vec<OpRequest>,
    /// Skip all delays
    pub fast: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// State the last run ended in
    pub state: PlaybackState,
    pub runs: u64,
    pub presented: usize,
}

/// Writes one line per checkpoint
pub struct PrintSink<W: Write> {
    out: W,
    step: usize,
    failed: Option<io::Error>,
}

impl<W: Write> PrintSink<W> {
    pub fn new(out: W) -> Self {
        PrintSink {
            out,
            step: 0,
            failed: None,
        }
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        if self.failed.is_none() {
            if let Err(e) = self.out.write_fmt(text).and_then(|_| self.out.write_all(b"\n")) {
                self.failed = Some(e);
            }
        }
    }

    fn check(&mut self) -> io::Result<()> {
        match self.failed.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<W: Write> PresentationSink<Checkpoint> for PrintSink<W> {
    fn present(&mut self, checkpoint: Checkpoint) {
        self.step += 1;
        let step = self.step;
        self.line(format_args!("{:>4}  {}", step, checkpoint.caption));
    }

    fn on_finished(&mut self) {
        self.line(format_args!("      finished"));
    }

    fn on_error(&mut self, message: &str) {
        self.line(format_args!("      error: {}", message));
    }

    fn state_changed(&mut self, state: PlaybackState) {
        if state == PlaybackState::Running {
            self.step = 0;
        }
    }
}

/// Run every requested operation, then the kind's own algorithm if it has
/// one. Stops at the first run that ends `Errored`.
pub fn run<W: Write>(
    config: &AppConfig,
    options: &HeadlessOptions,
    rng: StdRng,
    out: W,
) -> Result<Summary, HeadlessError> {
    let delays = if options.fast {
        DelayConfig::immediate()
    } else {
        config.playback
    };
    let mut sequencer = Sequencer::new(DelayPolicy::new(delays));
    sequencer.set_speed(options.speed.or(Some(config.speed.initial)));
    let size = options.size.or_else(|| config.sizes.for_kind(options.kind));
    let mut viz = Visualization::new(options.kind, size, rng);
    let mut sink = PrintSink::new(out);
    let mut presented = 0;

    sink.line(format_args!("{} (size {})", options.kind.title(), viz.size()));

    for request in &options.ops {
        let outcome = viz
            .operate(request.op, request.value.as_deref())
            .map_err(|source| HeadlessError::Input {
                op: request.op.cli_name(),
                source,
            })?;
        match outcome {
            Outcome::Animate(launch) => {
                let (state, last) = play(&mut sequencer, launch, &mut sink);
                presented += sequencer.session().presented();
                sink.check()?;
                if state == PlaybackState::Errored {
                    return Ok(summary(&sequencer, presented));
                }
                if let Some(scene) = last {
                    viz.adopt(&scene.scene);
                }
            }
            Outcome::Updated(notice) => sink.line(format_args!("      {}", notice)),
        }
    }

    match viz.launch() {
        Some(launch) => {
            play(&mut sequencer, launch, &mut sink);
            presented += sequencer.session().presented();
        }
        None if options.ops.is_empty() => {
            let resting = viz.resting();
            sink.line(format_args!("      {}", resting.caption));
        }
        None => {}
    }
    sink.check()?;
    let summary = summary(&sequencer, presented);
    info!(state = %summary.state, runs = summary.runs, presented = summary.presented, "headless run done");
    Ok(summary)
}

fn summary(sequencer: &Sequencer<Checkpoint>, presented: usize) -> Summary {
    Summary {
        state: sequencer.state(),
        runs: sequencer.session().runs(),
        presented,
    }
}

/// Drive one run to its end, sleeping until each advance is due. Returns the
/// final state and, for finished runs, the last checkpoint.
fn play<W: Write>(
    sequencer: &mut Sequencer<Checkpoint>,
    launch: Result<BoxedProducer<Checkpoint>, MalformedProducer>,
    sink: &mut PrintSink<W>,
) -> (PlaybackState, Option<Checkpoint>) {
    let mut last = LastCheckpoint { inner: sink, last: None };
    // every earlier run was driven to Finished or Errored, so start is accepted
    let _ = sequencer.start(move || launch, Instant::now(), &mut last);
    while let Some(due) = sequencer.next_deadline() {
        let now = Instant::now();
        if due > now {
            thread::sleep(due - now);
        }
        sequencer.tick(Instant::now(), &mut last);
    }
    let state = sequencer.state();
    let last = last.last.filter(|_| state == PlaybackState::Finished);
    (state, last)
}

/// Forwards to the printing sink and keeps the last checkpoint
struct LastCheckpoint<'a, W: Write> {
    inner: &'a mut PrintSink<W>,
    last: Option<Checkpoint>,
}

impl<W: Write> PresentationSink<Checkpoint> for LastCheckpoint<'_, W> {
    fn present(&mut self, checkpoint: Checkpoint) {
        self.last = Some(checkpoint.clone());
        self.inner.present(checkpoint);
    }

    fn on_finished(&mut self) {
        self.inner.on_finished();
    }

    fn on_error(&mut self, message: &str) {
        self.inner.on_error(message);
    }

    fn state_changed(&mut self, state: PlaybackState) {
        self.inner.state_changed(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn options(kind: VizKind, ops: &[&str]) -> HeadlessOptions {
        HeadlessOptions {
            kind,
            size: None,
            speed: None,
            ops: ops.iter().map(|s| s.parse().unwrap()).collect(),
            fast: true,
        }
    }

    fn run_to_string(opts: &HeadlessOptions) -> (Summary, String) {
        let mut out = Vec::new();
        let summary = run(&AppConfig::default(), opts, StdRng::seed_from_u64(3), &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_sorting_prints_every_checkpoint() {
        let (summary, text) = run_to_string(&options(VizKind::SelectionSort, &[]));
        assert_eq!(summary.state, PlaybackState::Finished);
        assert_eq!(summary.runs, 1);
        assert!(text.contains("Final sorted array."));
        assert!(text.trim_end().ends_with("finished"));
        // header, one line per checkpoint, finished
        assert_eq!(text.lines().count(), summary.presented + 2);
    }

    #[test]
    fn test_structure_ops_chain() {
        let (summary, text) = run_to_string(&options(VizKind::Stack, &["push:1", "push:2", "pop"]));
        assert_eq!(summary.state, PlaybackState::Finished);
        assert_eq!(summary.runs, 3);
        assert!(text.contains("Popping top element 2"));
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let mut out = Vec::new();
        let result = run(
            &AppConfig::default(),
            &options(VizKind::MinHeap, &["insert:lots"]),
            StdRng::seed_from_u64(3),
            &mut out,
        );
        assert!(matches!(result, Err(HeadlessError::Input { op: "insert", .. })));
    }

    #[test]
    fn test_notice_ops_then_run() {
        let (summary, text) = run_to_string(&options(VizKind::StringSearch, &["text:AABAAB", "pattern:AAB"]));
        assert_eq!(summary.state, PlaybackState::Finished);
        assert!(text.contains("Text set to \"AABAAB\""));
        assert!(text.contains("Pattern found at index(es): 0, 3"));
    }
}
