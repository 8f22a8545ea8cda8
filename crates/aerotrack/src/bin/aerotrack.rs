//! `aerotrack` command-line front end.

use std::f64::consts::TAU;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use aerotrack::vision::{FrameSource, SyntheticPairSource};
use aerotrack::{
    run_sender, ImageSequenceSource, JsonConfig, RelayConfig, Resolution, RunLimits,
    SenderConfig, TelemetryRelay,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

/// Frames in one synthetic sweep.
const SWEEP_STEPS: usize = 240;
/// Peak synthetic tilt, radians.
const SWEEP_AMPLITUDE: f64 = 0.5;

#[derive(Parser)]
#[command(name = "aerotrack")]
#[command(about = "Track a two-marker bar and stream its rotation angle over UDP")]
#[command(version)]
struct Cli {
    /// Log verbosity.
    #[arg(long, global = true, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Emit JSON log lines.
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct InputArgs {
    /// Directory of image files to play back in name order.
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Render a synthetic bar sweeping back and forth.
    #[arg(long)]
    synthetic: bool,

    /// Capture from a camera; INDEX overrides `camera_index` from the config.
    #[arg(long, value_name = "INDEX", num_args = 0..=1)]
    camera: Option<Option<i32>>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the vision loop and publish the angle.
    Send {
        /// Sender JSON config; defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the datagram destination.
        #[arg(long)]
        dest: Option<SocketAddr>,

        #[command(flatten)]
        input: InputArgs,

        /// Restart the image sequence after the last file.
        #[arg(long = "loop")]
        repeat: bool,

        /// Stop after this many processed frames.
        #[arg(long)]
        max_frames: Option<u64>,
    },
    /// Receive angle datagrams, log them and forward them unchanged.
    Relay {
        /// Relay JSON config; defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the listen address.
        #[arg(long)]
        listen: Option<SocketAddr>,

        /// Override the forward destination.
        #[arg(long)]
        forward: Option<SocketAddr>,
    },
    /// Write a default config file.
    InitConfig {
        #[arg(value_enum)]
        kind: ConfigKind,

        /// Output path.
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ConfigKind {
    Sender,
    Relay,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    match cli.command {
        Commands::Send {
            config,
            dest,
            input,
            repeat,
            max_frames,
        } => run_send(config.as_deref(), dest, input, repeat, max_frames),
        Commands::Relay {
            config,
            listen,
            forward,
        } => run_relay(config.as_deref(), listen, forward),
        Commands::InitConfig { kind, out } => run_init_config(kind, &out),
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) -> CliResult<()> {
    aerotrack::core::init_with_level(cli.log_level.into())?;
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) -> CliResult<()> {
    tracing_log::LogTracer::init()?;
    log::set_max_level(cli.log_level.into());
    aerotrack::core::init_tracing(cli.log_level.into(), cli.json_logs);
    Ok(())
}

fn shutdown_flag() -> CliResult<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;
    Ok(running)
}

fn synthetic_sweep(config: &SenderConfig) -> SyntheticPairSource {
    let angles = (0..SWEEP_STEPS)
        .map(|i| SWEEP_AMPLITUDE * (i as f64 * TAU / SWEEP_STEPS as f64).sin())
        .collect();
    SyntheticPairSource::new(
        config.resolution.width as usize,
        config.resolution.height as usize,
        angles,
    )
    .repeating()
}

fn run_send(
    config_path: Option<&Path>,
    dest: Option<SocketAddr>,
    input: InputArgs,
    repeat: bool,
    max_frames: Option<u64>,
) -> CliResult<()> {
    let mut config = match config_path {
        Some(path) => SenderConfig::load_json(path)?,
        None => SenderConfig::default(),
    };
    if let Some(dest) = dest {
        config.destination = dest;
    }
    config.validate()?;

    let mut source: Box<dyn FrameSource> = if input.synthetic {
        Box::new(synthetic_sweep(&config))
    } else if let Some(dir) = input.frames {
        let seq = ImageSequenceSource::open(&dir)?.with_resolution(config.resolution);
        if repeat {
            Box::new(seq.repeating())
        } else {
            Box::new(seq)
        }
    } else if let Some(index) = input.camera {
        open_camera(index.unwrap_or(config.camera_index), config.resolution)?
    } else {
        return Err("one of --frames, --synthetic or --camera is required".into());
    };

    let running = shutdown_flag()?;
    let report = run_sender(&config, &mut source, RunLimits { max_frames }, &running)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(feature = "camera")]
fn open_camera(index: i32, resolution: Resolution) -> CliResult<Box<dyn FrameSource>> {
    Ok(Box::new(aerotrack::CameraSource::open(index, resolution)?))
}

#[cfg(not(feature = "camera"))]
fn open_camera(index: i32, _resolution: Resolution) -> CliResult<Box<dyn FrameSource>> {
    Err(format!("camera {index} requested, but this build has no camera support").into())
}

fn run_relay(
    config_path: Option<&Path>,
    listen: Option<SocketAddr>,
    forward: Option<SocketAddr>,
) -> CliResult<()> {
    let mut config = match config_path {
        Some(path) => RelayConfig::load_json(path)?,
        None => RelayConfig::default(),
    };
    if let Some(listen) = listen {
        config.listen = listen;
    }
    if let Some(forward) = forward {
        config.forward = forward;
    }

    let relay = TelemetryRelay::bind(config)?;
    let running = shutdown_flag()?;
    let stats = relay.run(&running);

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn run_init_config(kind: ConfigKind, out: &Path) -> CliResult<()> {
    match kind {
        ConfigKind::Sender => SenderConfig::default().write_json(out)?,
        ConfigKind::Relay => RelayConfig::default().write_json(out)?,
    }
    println!("wrote default config to {}", out.display());
    Ok(())
}
