//! Main TUI application state and logic

use super::screen::ScreenSink;
use crate::config::{AppConfig, SizeDefaults, SpeedConfig};
use crate::playback::{Controls, DelayPolicy, PlaybackState, Sequencer};
use crate::viz::{Checkpoint, OperationSpec, Outcome, Visualization, VizKind};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Poll timeout while nothing is scheduled
const IDLE_POLL: Duration = Duration::from_millis(250);
const MAX_PROMPT_LEN: usize = 60;

/// Open value prompt for an operation
#[derive(Debug, Clone)]
pub struct Prompt {
    pub spec: &'static OperationSpec,
    pub buffer: String,
}

/// The main application state
pub struct App {
    pub sequencer: Sequencer<Checkpoint>,
    pub viz: Visualization,
    pub sink: ScreenSink,

    /// Highlighted row in the catalog, indexing [`VizKind::ALL`]
    pub cursor: usize,

    pub speed: f64,
    speed_config: SpeedConfig,
    sizes: SizeDefaults,

    /// Seeds each newly selected visualization
    rng: StdRng,

    pub prompt: Option<Prompt>,

    /// Whether the app should quit
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &AppConfig, kind: VizKind, size: Option<usize>, mut rng: StdRng) -> Self {
        let mut sequencer = Sequencer::new(DelayPolicy::new(config.playback));
        let speed = config.speed.clamp(config.speed.initial);
        sequencer.set_speed(Some(speed));
        let size = size.or_else(|| config.sizes.for_kind(kind));
        let viz = Visualization::new(kind, size, StdRng::seed_from_u64(rng.gen()));
        App {
            sequencer,
            viz,
            sink: ScreenSink::new(),
            cursor: VizKind::ALL.iter().position(|k| *k == kind).unwrap_or(0),
            speed,
            speed_config: config.speed,
            sizes: config.sizes,
            rng,
            prompt: None,
            should_quit: false,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // sleep until the next advance is due, or a key arrives
            let timeout = match self.sequencer.next_deadline() {
                Some(due) => due.saturating_duration_since(Instant::now()).min(IDLE_POLL),
                None => IDLE_POLL,
            };
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key, Instant::now());
                    }
                }
            }

            self.tick(Instant::now());
        }

        Ok(())
    }

    pub fn controls(&self) -> Controls {
        let kind = self.viz.kind();
        Controls::for_state(self.sequencer.state(), kind.can_start(), kind.size_relevant())
    }

    /// Fire the pending advance if it is due
    pub fn tick(&mut self, now: Instant) {
        if self.sequencer.tick(now, &mut self.sink) {
            self.settle();
        }
    }

    /// The checkpoint on screen, or the model at rest
    pub fn checkpoint(&self) -> Checkpoint {
        match &self.sink.checkpoint {
            Some(checkpoint) => checkpoint.clone(),
            None => self.viz.resting(),
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(26), Constraint::Min(0)])
            .split(main_chunks[0]);

        // Right column: info | scene | controls
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(0), Constraint::Length(4)])
            .split(columns[1]);

        let kind = self.viz.kind();
        let checkpoint = self.checkpoint();

        super::panes::render_catalog_pane(frame, columns[0], self.cursor, kind, self.prompt.is_none());
        super::panes::render_info_pane(frame, right_rows[0], kind, &checkpoint.caption, self.sink.error.as_deref());
        super::panes::render_scene_pane(frame, right_rows[1], kind.title(), &checkpoint);
        super::panes::render_controls_pane(
            frame,
            right_rows[2],
            kind,
            self.controls(),
            self.speed,
            self.viz.size(),
        );

        let status = super::panes::StatusRenderData {
            message: &self.sink.message,
            state: self.sequencer.state(),
            step: self.sequencer.session().presented(),
            delay_ms: self.sequencer.current_delay().as_millis(),
            prompt: self
                .prompt
                .as_ref()
                .map(|p| (p.spec.prompt.unwrap_or(p.spec.label), p.buffer.as_str())),
        };
        super::panes::render_status_bar(frame, main_chunks[1], &status);
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent, now: Instant) {
        if self.prompt.is_some() {
            self.handle_prompt_key(key, now);
            return;
        }
        let controls = self.controls();

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Up => {
                self.cursor = self.cursor.checked_sub(1).unwrap_or(VizKind::ALL.len() - 1);
            }
            KeyCode::Down => {
                self.cursor = (self.cursor + 1) % VizKind::ALL.len();
            }
            KeyCode::Enter => {
                if let Some(&kind) = VizKind::ALL.get(self.cursor) {
                    self.select(kind);
                }
            }
            KeyCode::Char('s') => {
                if controls.start {
                    self.start(now);
                } else if !self.viz.kind().can_start() {
                    self.sink.message = String::from("Use the operation keys for this structure");
                }
            }
            KeyCode::Char(' ') => {
                if controls.pause {
                    if let Err(e) = self.sequencer.pause_or_resume(now, &mut self.sink) {
                        self.sink.message = e.to_string();
                    }
                    self.settle();
                }
            }
            KeyCode::Char('r') => {
                if controls.reset {
                    self.reset();
                } else {
                    self.sink.message = String::from("Pause before resetting");
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.set_speed(self.speed_config.faster(self.speed));
            }
            KeyCode::Char('-') => {
                self.set_speed(self.speed_config.slower(self.speed));
            }
            KeyCode::Char(c @ ('[' | ']')) => {
                if controls.size {
                    let size = self.viz.size();
                    let wanted = if c == ']' { size + 1 } else { size.saturating_sub(1) };
                    self.resize(wanted);
                }
            }
            KeyCode::Char(c) => {
                if let Some(spec) = self.viz.kind().operation_for_key(c) {
                    if !controls.operations {
                        self.sink.message = String::from("Wait for the current run to finish");
                    } else if spec.needs_value() {
                        self.prompt = Some(Prompt {
                            spec,
                            buffer: String::new(),
                        });
                    } else {
                        self.operate(spec, None, now);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent, now: Instant) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.prompt = None;
                self.sink.message = String::from("Cancelled");
            }
            KeyCode::Enter => {
                if let Some(Prompt { spec, buffer }) = self.prompt.take() {
                    self.operate(spec, Some(&buffer), now);
                }
            }
            KeyCode::Backspace => {
                prompt.buffer.pop();
            }
            KeyCode::Char(c) => {
                if prompt.buffer.chars().count() < MAX_PROMPT_LEN {
                    prompt.buffer.push(c);
                }
            }
            _ => {}
        }
    }

    /// Load another visualization, tearing down the current session
    pub fn select(&mut self, kind: VizKind) {
        self.prompt = None;
        self.sequencer.reset(&mut self.sink);
        self.sink.clear();
        let seed = self.rng.gen();
        self.viz = Visualization::new(kind, self.sizes.for_kind(kind), StdRng::seed_from_u64(seed));
        if let Some(row) = VizKind::ALL.iter().position(|k| *k == kind) {
            self.cursor = row;
        }
        info!(kind = kind.cli_name(), size = self.viz.size(), "visualization selected");
        self.sink.message = format!("Loaded {}", kind.title());
    }

    pub fn start(&mut self, now: Instant) {
        let Some(launch) = self.viz.launch() else {
            return;
        };
        self.sink.clear();
        if let Err(e) = self.sequencer.start(move || launch, now, &mut self.sink) {
            self.sink.message = e.to_string();
        }
        self.settle();
    }

    pub fn reset(&mut self) {
        self.sequencer.reset(&mut self.sink);
        self.sink.clear();
        self.viz.reset();
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
        self.sequencer.set_speed(Some(speed));
        self.sink.message = format!(
            "Speed {:.0} (delay {} ms)",
            speed,
            self.sequencer.current_delay().as_millis()
        );
    }

    fn resize(&mut self, wanted: usize) {
        let applied = self.viz.set_size(wanted);
        self.sequencer.reset(&mut self.sink);
        self.sink.clear();
        self.sink.message = format!("Size {}", applied);
    }

    fn operate(&mut self, spec: &'static OperationSpec, input: Option<&str>, now: Instant) {
        debug!(op = spec.label, ?input, "operation requested");
        match self.viz.operate(spec.op, input) {
            Ok(Outcome::Animate(launch)) => {
                self.sink.clear();
                if let Err(e) = self.sequencer.start(move || launch, now, &mut self.sink) {
                    self.sink.message = e.to_string();
                }
                self.settle();
            }
            Ok(Outcome::Updated(notice)) => {
                self.sequencer.reset(&mut self.sink);
                self.sink.clear();
                self.sink.message = notice;
            }
            Err(e) => {
                self.sink.message = format!("Invalid input: {}", e);
            }
        }
    }

    /// Commit a finished run's final scene into the model
    fn settle(&mut self) {
        if self.sink.take_finished() && self.sequencer.state() == PlaybackState::Finished {
            if let Some(checkpoint) = &self.sink.checkpoint {
                self.viz.adopt(&checkpoint.scene);
            }
        }
    }
}
