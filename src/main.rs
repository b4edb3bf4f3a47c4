//! nicstop: per-interface network throughput monitor, written in Rust.
//!
//! Samples cumulative interface counters every interval and reports:
//!   - read/write KB/s and packets/s
//!   - average packet size
//!   - utilization against link speed
//!   - saturation (drop/overrun events per second)
//!
//! Line mode prints nicstat-style rows to stdout; `--tui` opens a
//! full-screen view. Press F1 or '?' in the TUI for help.

use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, EnvFilter};

use nicstop::app::App;
use nicstop::config::{NicstopConfig, MAX_INTERVAL_MS, MIN_INTERVAL_MS};
use nicstop::report::{ReportStyle, Reporter};
use nicstop::system::collector::Collector;
use nicstop::system::filter::InterfaceFilter;
use nicstop::system::source::{open_source, SourceKind};
use nicstop::{input, ui};

/// Per-interface network throughput, utilization and saturation monitor.
#[derive(Parser, Debug)]
#[command(name = "nicstop", version, about)]
struct Cli {
    /// Seconds between samples (fractions allowed).
    interval: Option<f64>,

    /// Number of reports to print after the baseline sample. Runs forever if omitted.
    count: Option<u64>,

    /// Only report these interfaces (comma-separated).
    #[arg(short, long)]
    interfaces: Option<String>,

    /// Skip rows for interfaces that moved no bytes this interval.
    #[arg(short = 'z', long)]
    skip_zero: bool,

    /// Compact output: only rKB/s and wKB/s.
    #[arg(short = 's', long)]
    compact: bool,

    /// Counter source: auto, procfs or sysinfo.
    #[arg(long)]
    source: Option<SourceKind>,

    /// Don't print column headers (line mode).
    #[arg(long)]
    no_header: bool,

    /// Full-screen interactive view.
    #[arg(long)]
    tui: bool,

    /// Path to the nicstoprc file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Logging filter (trace, debug, info, warn, error, or an EnvFilter directive).
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Layer CLI flags over rc-file settings
fn merge_cli(cli: &Cli, mut cfg: NicstopConfig) -> Result<NicstopConfig> {
    if let Some(secs) = cli.interval {
        if !secs.is_finite() || secs <= 0.0 {
            bail!("interval must be a positive number of seconds, got {}", secs);
        }
        let ms = (secs * 1000.0).round() as u64;
        let clamped = ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS);
        if clamped != ms {
            warn!(requested_ms = ms, using_ms = clamped, "interval out of range, clamped");
        }
        cfg.interval_ms = clamped;
    }
    if let Some(list) = &cli.interfaces {
        cfg.interfaces = Some(
            InterfaceFilter::parse(list)
                .with_context(|| format!("no interface names in --interfaces '{}'", list))?,
        );
    }
    cfg.skip_zero |= cli.skip_zero;
    cfg.compact |= cli.compact;
    if let Some(kind) = cli.source {
        cfg.source = kind;
    }
    Ok(cfg)
}

fn init_logging(level: &str, tui: bool) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .with_context(|| format!("invalid log level: {}", level))?;

    // The TUI owns the terminal; fetch errors are shown in its header instead
    let writer = if tui {
        BoxMakeWriter::new(io::sink)
    } else {
        BoxMakeWriter::new(io::stderr)
    };

    fmt().with_env_filter(filter).with_target(false).with_writer(writer).init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.tui)?;

    let cfg = merge_cli(&cli, NicstopConfig::load(cli.config.as_deref()))?;

    let source = open_source(cfg.source).context("opening counter source")?;
    let collector = Collector::new(source, cfg.interfaces.clone(), cfg.skip_zero);
    info!(
        source = collector.source_name(),
        interval_ms = cfg.interval_ms,
        count = ?cli.count,
        "starting nicstop",
    );

    if cli.tui {
        run_tui(collector, cfg, cli.config)
    } else {
        run_lines(collector, &cfg, cli.count, !cli.no_header)
    }
}

/// Line mode: baseline sample, then `count` (or unlimited) reports
fn run_lines(collector: Collector, cfg: &NicstopConfig, count: Option<u64>, show_header: bool) -> Result<()> {
    let style = if cfg.compact { ReportStyle::Compact } else { ReportStyle::Full };
    let stdout = io::stdout();
    let mut reporter = Reporter::new(stdout.lock(), style, show_header, cfg.header_every);
    let interval = Duration::from_millis(cfg.interval_ms);

    match report_loop(collector, &mut reporter, interval, count) {
        Ok(()) => Ok(()),
        // Output piped into head/less that exited
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(e).context("writing report"),
    }
}

/// Sample every `interval`. `count` only starts running down once a
/// baseline fetch has succeeded, so a failed first fetch costs no report.
fn report_loop<W: Write>(
    mut collector: Collector,
    reporter: &mut Reporter<W>,
    interval: Duration,
    count: Option<u64>,
) -> io::Result<()> {
    let mut baseline = match collector.tick() {
        Ok(_) => true,
        Err(e) => {
            warn!(error = %e, "counter fetch failed, skipping tick");
            false
        }
    };

    let mut remaining = count;
    while remaining != Some(0) {
        thread::sleep(interval);

        match collector.tick() {
            Ok(report) if baseline => reporter.render(Local::now().time(), &report.rows)?,
            Ok(_) => {
                debug!("baseline established");
                baseline = true;
                continue;
            }
            Err(e) => {
                warn!(error = %e, "counter fetch failed, skipping tick");
                if !baseline {
                    continue;
                }
            }
        }

        if let Some(n) = remaining.as_mut() {
            *n -= 1;
        }
    }
    Ok(())
}

fn run_tui(collector: Collector, cfg: NicstopConfig, config_path: Option<PathBuf>) -> Result<()> {
    // Setup terminal
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, collector, cfg, config_path);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    terminal.backend_mut().flush()?;

    result
}

/// Main TUI loop
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut collector: Collector,
    mut cfg: NicstopConfig,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut app = App::new();
    cfg.apply_to(&mut app);
    app.source_name = collector.source_name();
    app.filter_label = collector.filter().map(|f| f.names().join(","));

    let tick_rate = Duration::from_millis(cfg.interval_ms);
    let mut last_tick = Instant::now();

    // Baseline sample
    collector.refresh(&mut app);

    loop {
        let size = terminal.size()?;
        app.visible_rows = ui::table_rows(size.height).max(1);

        terminal.draw(|f| ui::draw(f, &app))?;

        if app.should_quit {
            return Ok(());
        }

        // Short poll timeout keeps key handling responsive
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                // Windows reports both Press and Release
                if key.kind == KeyEventKind::Press {
                    input::handle_input(&mut app, key);
                }
            }
        }

        if app.save_requested {
            app.save_requested = false;
            cfg.update_from_app(&app);
            app.status_message = Some(match cfg.save(config_path.as_deref()) {
                Ok(path) => format!("settings saved to {}", path.display()),
                Err(e) => {
                    warn!(error = %e, "saving settings failed");
                    format!("save failed: {:#}", e)
                }
            });
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            collector.refresh(&mut app);
        }
    }
}
