//! windmouse - human-like pointer path generator
//!
//! Entry point for the command-line tool. Paths and recorded events go to
//! stdout; logs go to stderr.

use std::io::Write;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use windmouse::config::{Config, ConfigOverrides};
use windmouse::controller::{BackendEvent, HoldMouseButton, MotionController, RecordingBackend};
use windmouse::trajectory::{Point, WindMouse};
use windmouse::utils::format_user_error;

/// Output format for paths and events
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// JSON array
    Json,
    /// Comma-separated rows with header
    Csv,
    /// One human-readable line per entry
    Pretty,
}

/// Command-line arguments for windmouse
#[derive(Parser, Debug)]
#[command(name = "windmouse")]
#[command(version, about = "Generate human-like pointer trajectories", long_about = None)]
struct Args {
    /// Start point as x,y
    #[arg(long, allow_hyphen_values = true)]
    from: Point,

    /// Destination point as x,y
    #[arg(long, allow_hyphen_values = true)]
    to: Point,

    /// RNG seed for a reproducible path
    #[arg(short, long, env = "WINDMOUSE_SEED")]
    seed: Option<u64>,

    /// Configuration file path
    #[arg(short, long, env = "WINDMOUSE_CONFIG")]
    config: Option<String>,

    /// Gravity magnitude
    #[arg(long)]
    gravity: Option<f64>,

    /// Wind magnitude
    #[arg(long)]
    wind: Option<f64>,

    /// Maximum step in pixels
    #[arg(long)]
    max_step: Option<f64>,

    /// Distance at which wind is damped
    #[arg(long)]
    damped_distance: Option<f64>,

    /// Simulation step bound
    #[arg(long)]
    max_steps: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Drive a recording backend through the motion controller and print its events
    #[arg(long)]
    replay: bool,

    /// Hold this button while replaying (left|right|middle)
    #[arg(long, requires = "replay")]
    drag: Option<HoldMouseButton>,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log format (json|pretty|compact)
    #[arg(long)]
    log_format: Option<String>,

    /// Write logs to file (in addition to stderr)
    #[arg(long)]
    log_file: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            gravity: self.gravity,
            wind: self.wind,
            max_step: self.max_step,
            damped_distance: self.damped_distance,
            max_steps: self.max_steps,
            seed: self.seed,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_user_error(&e));
            return Err(e);
        }
    };

    init_logging(&args, &config)?;

    info!("windmouse v{}", env!("CARGO_PKG_VERSION"));
    debug!("Config: {:?}", config);

    let result = if args.replay {
        replay(&args, &config).await
    } else {
        generate(&args, &config)
    };

    if let Err(e) = result {
        eprintln!("{}", format_user_error(&e));
        return Err(e);
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default_config(),
    };

    let config = config.with_overrides(args.overrides());
    config.validate()?;
    Ok(config)
}

fn generate(args: &Args, config: &Config) -> Result<()> {
    let generator = match config.motion.seed {
        Some(seed) => WindMouse::seeded(args.from, args.to, config.physics.params, seed),
        None => WindMouse::new(args.from, args.to, config.physics.params),
    }?
    .with_max_steps(config.physics.max_steps)?;

    let path: Vec<Point> = generator.collect();
    info!(
        "Generated {} points from {} to {}",
        path.len(),
        args.from,
        args.to
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &path)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            writeln!(out, "x,y")?;
            for point in &path {
                writeln!(out, "{},{}", point.x, point.y)?;
            }
        }
        OutputFormat::Pretty => {
            for (i, point) in path.iter().enumerate() {
                writeln!(out, "{:>5}  {}", i, point)?;
            }
        }
    }

    Ok(())
}

async fn replay(args: &Args, config: &Config) -> Result<()> {
    let builder = MotionController::builder(RecordingBackend::at(args.from)).target(args.to);
    let mut controller = config
        .configure(builder)
        .build()
        .context("Failed to build motion controller")?;

    let delay = config.motion.tick_delay();
    let speed = config.motion.step_duration();

    if let Some(button) = args.drag {
        controller.hold(button)?;
        controller.move_to_target_async(delay, speed).await?;
        controller.release(button)?;
    } else {
        controller.move_to_target_async(delay, speed).await?;
    }

    let events = controller.into_backend().take_events();
    info!("Replayed {} backend events", events.len());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &events)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            writeln!(out, "event,x,y,duration_ms,button")?;
            for event in &events {
                match event {
                    BackendEvent::Move { x, y, duration_ms } => {
                        writeln!(out, "move,{},{},{},", x, y, duration_ms)?
                    }
                    BackendEvent::Press { button } => writeln!(out, "press,,,,{}", button)?,
                    BackendEvent::Release { button } => writeln!(out, "release,,,,{}", button)?,
                }
            }
        }
        OutputFormat::Pretty => {
            for event in &events {
                match event {
                    BackendEvent::Move { x, y, duration_ms } => {
                        writeln!(out, "move    ({}, {}) over {}ms", x, y, duration_ms)?
                    }
                    BackendEvent::Press { button } => writeln!(out, "press   {}", button)?,
                    BackendEvent::Release { button } => writeln!(out, "release {}", button)?,
                }
            }
        }
    }

    Ok(())
}

/// Initialize logging to stderr, optionally mirrored to a file
fn init_logging(args: &Args, config: &Config) -> Result<()> {
    use std::fs::File;

    let log_level = match args.verbose {
        0 => config.logging.level.to_lowercase(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let log_format = args
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("windmouse={},warn", log_level))
    });

    if let Some(log_file_path) = &args.log_file {
        let file = File::create(log_file_path)
            .context(format!("Failed to create log file: {}", log_file_path))?;

        match log_format.as_str() {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(std::io::stderr),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
            "compact" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(std::io::stderr),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_writer(std::io::stderr),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
        }
        info!("Logging to file: {}", log_file_path);
    } else {
        match log_format.as_str() {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(std::io::stderr),
                    )
                    .init();
            }
            "compact" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(std::io::stderr),
                    )
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_writer(std::io::stderr),
                    )
                    .init();
            }
        }
    }

    Ok(())
}
