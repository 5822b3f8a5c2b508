//! Facecue - Webcam Presence Observer
//!
//! Main entry point for the CLI application.

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use facecue::{
    config::Config,
    observer::{Observer, ObserverSettings},
    output::{CsvEventLog, Dispatcher, SerialIndicator, Speaker},
    session::{self, RunOptions, StopReason},
    tracking::{subprocess::check_mediapipe_available, LandmarkReceiver, TrackerSubprocess},
};

/// Facecue - greets faces, spots smiles and gestures, logs time in frame
#[derive(Parser, Debug)]
#[command(name = "facecue", version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Serial port of the indicator board (overrides config)
    #[arg(short, long)]
    port: Option<String>,

    /// Run without the serial indicator
    #[arg(long)]
    no_device: bool,

    /// Disable spoken messages
    #[arg(long)]
    no_speech: bool,

    /// Event log path (overrides config)
    #[arg(short, long)]
    log_file: Option<PathBuf>,

    /// Camera index passed to the tracker (overrides config)
    #[arg(long)]
    camera: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting {} v{}", facecue::NAME, facecue::VERSION);

    let config = load_config(&args)?;

    // Single-threaded runtime
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let reason = runtime.block_on(run(config))?;
    info!("Facecue stopped ({:?})", reason);
    Ok(())
}

/// Load configuration and apply CLI overrides
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = if let Some(ref path) = args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    if let Some(ref port) = args.port {
        config.device.port = port.clone();
    }
    if args.no_device {
        config.device.enabled = false;
    }
    if args.no_speech {
        config.speech.enabled = false;
    }
    if let Some(ref path) = args.log_file {
        config.log.path = path.clone();
    }
    if let Some(camera) = args.camera {
        config.tracker.camera_device = camera;
    }

    // Validate configuration
    config.validate()?;

    info!(
        "Tracker: {}:{} (camera {}, auto-launch: {})",
        config.tracker.listen_address,
        config.tracker.port,
        config.tracker.camera_device,
        config.tracker.auto_launch
    );
    info!(
        "Expression: {}, gestures: {}, presence: {}",
        config.expression.enabled, config.gesture.enabled, config.presence.enabled
    );
    info!("Speech: {}", config.speech.enabled);
    info!("Indicator device: {}", config.device.enabled);

    Ok(config)
}

/// Set up collaborators, run the frame loop, and tear everything down
async fn run(config: Config) -> anyhow::Result<StopReason> {
    let event_log = CsvEventLog::create(&config.log.path)?;
    let device = SerialIndicator::connect(&config.device).await;
    let speaker = Speaker::from_config(&config.speech);

    let mut dispatcher = Dispatcher::new(speaker, event_log, device);
    let mut observer = Observer::new(ObserverSettings::from(&config));

    // Bind before launching the helper so its first packets are not lost
    let mut receiver = LandmarkReceiver::new(&config.tracker);
    receiver.start().await?;

    let mut subprocess = if config.tracker.auto_launch {
        if !check_mediapipe_available() {
            warn!("Python packages 'mediapipe' and 'cv2' not found, the tracker will likely fail");
        }
        let mut sp = TrackerSubprocess::new(&config.tracker);
        if let Err(e) = sp.start() {
            error!("Failed to start tracker: {}", e);
        }
        Some(sp)
    } else {
        info!(
            "Waiting for an external tracker on {}:{}",
            config.tracker.listen_address, config.tracker.port
        );
        None
    };

    let reason = session::run(
        &mut receiver,
        &mut observer,
        &mut dispatcher,
        subprocess.as_mut(),
        RunOptions::from(&config.tracker),
        shutdown_signal(),
    )
    .await;

    if reason == StopReason::Signal {
        info!("Shutdown signal received");
    }

    receiver.stop();
    if let Some(ref mut sp) = subprocess {
        sp.stop().await;
    }

    let (_, event_log, _) = dispatcher.shutdown();
    info!(
        "Tracking ended. All events are recorded in '{}'",
        event_log.path().display()
    );

    Ok(reason)
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
