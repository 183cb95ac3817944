// stepviz: step-by-step algorithm visualizer for the terminal

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stepviz::config::AppConfig;
use stepviz::headless::{self, HeadlessOptions};
use stepviz::playback::{parse_speed, PlaybackState};
use stepviz::ui::App;
use stepviz::viz::{OpRequest, VizKind};

const LOG_ENV: &str = "STEPVIZ_LOG";

#[derive(Parser)]
#[command(name = "stepviz")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Step-by-step algorithm visualizer", long_about = None)]
struct Cli {
    /// Visualization to open (see --list)
    #[arg(long, default_value = "bubble")]
    viz: String,

    /// Playback speed; higher is faster
    #[arg(long)]
    speed: Option<String>,

    /// Array length, heap size, disk count or node count
    #[arg(long)]
    size: Option<usize>,

    /// Seed for random data and graphs
    #[arg(long)]
    seed: Option<u64>,

    /// Config file (default: <config dir>/stepviz/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file for the interactive UI
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the catalog and exit
    #[arg(long)]
    list: bool,

    /// Run without the terminal UI, printing each caption
    #[arg(long)]
    headless: bool,

    /// Operation to apply before running, as OP[:VALUE] (headless only)
    #[arg(long = "op", requires = "headless")]
    ops: Vec<OpRequest>,

    /// Skip delays in headless mode
    #[arg(long, requires = "headless")]
    fast: bool,
}

fn init_logging(cli: &Cli) -> Result<()> {
    let fallback = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    if cli.headless {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr))
            .with(filter)
            .init();
    } else {
        // the terminal UI owns stdout and stderr
        let path = cli
            .log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("stepviz.log"));
        let file = File::create(&path).with_context(|| format!("Failed to create log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
            .with(filter)
            .init();
    }
    Ok(())
}

fn print_catalog() {
    let mut category = None;
    for kind in VizKind::ALL {
        if category != Some(kind.category()) {
            category = Some(kind.category());
            println!("{}", kind.category().label());
        }
        let size = match kind.size_range() {
            Some(range) => format!("size {}..={}, default {}", range.start(), range.end(), kind.default_size()),
            None => String::from("operations only"),
        };
        println!("  {:<10} {:<24} {}", kind.cli_name(), kind.title(), size);
        for spec in kind.operations() {
            let value = if spec.needs_value() { ":VALUE" } else { "" };
            println!("  {:<10}   --op {}{}  ({})", "", spec.op.cli_name(), value, spec.label);
        }
    }
}

fn run_tui(config: &AppConfig, kind: VizKind, size: Option<usize>, rng: StdRng) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, kind, size, rng);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("Terminal UI failed")
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.list {
        print_catalog();
        return Ok(ExitCode::SUCCESS);
    }

    init_logging(&cli)?;

    let Some(kind) = VizKind::from_name(&cli.viz) else {
        bail!("Unknown visualization '{}'. Run with --list to see the catalog.", cli.viz);
    };

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(raw) = &cli.speed {
        let speed = parse_speed(raw).with_context(|| format!("Invalid --speed '{}'", raw))?;
        config.speed.initial = config.speed.clamp(speed);
    }
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(kind = kind.cli_name(), seed = ?cli.seed, "starting");

    if cli.headless {
        let options = HeadlessOptions {
            kind,
            size: cli.size,
            speed: Some(config.speed.initial),
            ops: cli.ops,
            fast: cli.fast,
        };
        let summary = headless::run(&config, &options, rng, io::stdout().lock())?;
        if summary.state == PlaybackState::Errored {
            error!("run ended with an error");
            return Ok(ExitCode::FAILURE);
        }
        return Ok(ExitCode::SUCCESS);
    }

    run_tui(&config, kind, cli.size, rng)?;
    Ok(ExitCode::SUCCESS)
}
