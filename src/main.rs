//! STORMWATCH - live severe-weather alert dashboard
//!
//! Polls the active alerts feed, keeps a deduplicated list of current
//! warnings, rotates the most relevant one through a top bar and plays a cue
//! when an alert appears or changes.
//!
//! ## Usage
//!
//! ```bash
//! # Start the terminal dashboard
//! stormwatch
//!
//! # Log to the console instead of drawing the dashboard
//! stormwatch --headless -v
//!
//! # Poll a different endpoint every 10 seconds, without sound
//! stormwatch --feed-url http://localhost:8080/alerts --fetch-interval-ms 10000 --mute
//! ```

use std::io::Write;
use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use stormwatch_audio::{CueDispatcher, SoundLibrary};
use stormwatch_config::{AudioConfig, StormwatchConfig};
use stormwatch_core::{LogGuard, init_logging};
use stormwatch_feed::FeedClient;
use stormwatch_tui::{App, AppResult, DashboardSnapshot, MonitorHandle, MonitorOptions};
use tracing::{error, info, warn};

/// STORMWATCH severe-weather dashboard
///
/// Shows active tornado, thunderstorm, flood and winter warnings from the
/// alerts feed, with audio cues for new and upgraded alerts.
#[derive(Parser, Debug)]
#[command(name = "stormwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging (increases log level)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory for log files (defaults to ~/.stormwatch/logs/)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Config file (defaults to ~/.stormwatch/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log alerts to the console instead of drawing the dashboard
    #[arg(long)]
    headless: bool,

    /// Feed polling period in milliseconds
    #[arg(long)]
    fetch_interval_ms: Option<u64>,

    /// Top bar rotation period in milliseconds
    #[arg(long)]
    rotation_interval_ms: Option<u64>,

    /// Alerts endpoint
    #[arg(long)]
    feed_url: Option<String>,

    /// Start with audio cues muted
    #[arg(long)]
    mute: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let _guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::from(1);
        }
    };

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            eprintln!("Error: {}", e);
            if let Some(guidance) = e.guidance() {
                eprintln!("{}", guidance);
            }
            return ExitCode::from(2);
        }
    };

    if !cli.headless {
        // Install panic hook to ensure terminal cleanup
        install_panic_hook();
    }

    info!(headless = cli.headless, "Starting STORMWATCH");

    match run(&cli, config) {
        Ok(()) => {
            info!("STORMWATCH exited normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("STORMWATCH error: {}", e);
            eprintln!("Error: {}", e);
            if let Some(guidance) = e
                .downcast_ref::<stormwatch_core::StormError>()
                .and_then(|e| e.guidance())
            {
                eprintln!("{}", guidance);
            }
            ExitCode::from(1)
        }
    }
}

/// Install a panic hook that restores the terminal before printing the panic message.
fn install_panic_hook() {
    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

/// Restore terminal to its normal state.
fn restore_terminal() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();

    let _ = crossterm::terminal::disable_raw_mode();
    crossterm::execute!(
        stdout,
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    stdout.flush()?;

    Ok(())
}

/// Set up logging based on CLI arguments.
///
/// The console layer is only enabled in headless mode; the dashboard owns the
/// terminal otherwise.
fn setup_logging(cli: &Cli) -> stormwatch_core::Result<LogGuard> {
    let debug = cli.verbose > 0;
    init_logging(cli.log_dir.clone(), debug, cli.headless)
}

/// Load the config file and apply command-line overrides.
fn load_config(cli: &Cli) -> stormwatch_core::Result<StormwatchConfig> {
    let mut config = match &cli.config {
        Some(path) => StormwatchConfig::load_from(path)?,
        None => StormwatchConfig::load()?,
    };

    if let Some(ms) = cli.fetch_interval_ms {
        config = config.with_fetch_interval_ms(ms);
    }
    if let Some(ms) = cli.rotation_interval_ms {
        config = config.with_rotation_interval_ms(ms);
    }
    if let Some(url) = &cli.feed_url {
        config = config.with_feed_url(url.clone());
    }
    if cli.mute {
        config = config.muted();
    }

    config.validate()?;
    Ok(config)
}

/// Start the audio thread. Audio problems never stop the dashboard.
fn start_audio(config: &AudioConfig) -> Option<Arc<CueDispatcher>> {
    let library = SoundLibrary::from_config(config);
    for path in library.missing_files() {
        warn!(path = %path.display(), "sound file missing");
    }

    match CueDispatcher::spawn(library, !config.enabled, stormwatch_audio::default_player) {
        Ok(dispatcher) => Some(Arc::new(dispatcher)),
        Err(e) => {
            warn!(error = %e, "audio cues disabled");
            None
        }
    }
}

/// Start the monitor tasks and run the dashboard or the headless logger.
fn run(cli: &Cli, config: StormwatchConfig) -> AppResult<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("stormwatch-worker")
        .build()?;

    let source = Arc::new(FeedClient::from_config(&config.feed)?);
    let cues = start_audio(&config.audio);
    let options = MonitorOptions::from_config(&config);

    let monitor = runtime.block_on(async {
        stormwatch_tui::spawn_monitor(source, options, cues.clone())
    });

    let result = if cli.headless {
        runtime.block_on(run_headless(&monitor))
    } else {
        let flash = Duration::from_secs(config.display.flash_secs);
        App::from_monitor(&monitor, cues, flash).run()
    };

    // Stop the tasks before the runtime goes away
    drop(monitor);
    runtime.shutdown_timeout(Duration::from_secs(1));
    result
}

/// Log each new snapshot and top bar change until Ctrl+C.
async fn run_headless(monitor: &MonitorHandle) -> AppResult<()> {
    let mut snapshots = monitor.snapshots();
    let mut top_bar = monitor.top_bar();
    let mut logged_cycle = 0;

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Ctrl+C received, shutting down");
                return Ok(());
            }
            Ok(()) = snapshots.changed() => {
                let snapshot = Arc::clone(&snapshots.borrow_and_update());
                if snapshot.cycle != logged_cycle {
                    logged_cycle = snapshot.cycle;
                    log_snapshot(&snapshot);
                }
            }
            Ok(()) = top_bar.changed() => {
                let headline = top_bar.borrow_and_update().headline().to_string();
                info!(headline = %headline, "top bar");
            }
        }
    }
}

fn log_snapshot(snapshot: &DashboardSnapshot) {
    let result = &snapshot.result;
    info!(
        cycle = snapshot.cycle,
        active = result.active,
        tornado = result.counts.tornado,
        thunderstorm = result.counts.thunderstorm,
        flood = result.counts.flood,
        winter = result.counts.winter,
        expired = result.expired.len(),
        "alerts updated"
    );
    for entry in &result.display_list {
        info!(alert_id = %entry.alert.id, "{}", entry.text);
    }
}
