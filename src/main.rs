//! xinput-joystick - poll a game controller and print deadzone-normalized state

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod report;

use xinput_joystick::config::{AppConfig, Backend, ConfigWatcher, OutputFormat};
use xinput_joystick::input::gamepad::{GamepadSource, Joystick};
use xinput_joystick::JoystickError;

use crate::report::Reporter;

/// Read an XInput controller with stick and trigger deadzones applied
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults are used if it doesn't exist)
    #[arg(short, long, env = "JOYSTICK_CONFIG", default_value = "joystick.yaml")]
    config: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Controller slot to read (0-3), overrides the config file
    #[arg(short, long, env = "JOYSTICK_INDEX")]
    index: Option<i32>,

    /// Print states as JSON lines on stdout
    #[arg(long)]
    json: bool,

    /// Also report the raw readings next to the normalized state
    #[arg(long)]
    raw: bool,

    /// Read a single state and exit
    #[arg(long)]
    once: bool,
}

impl Args {
    /// Apply command-line overrides on top of a loaded config
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(index) = self.index {
            config.controller.index = index;
        }
        if self.json {
            config.output.format = OutputFormat::Json;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level)?;

    info!("Starting xinput-joystick...");
    info!("Configuration file: {}", args.config);

    let (watcher, mut config) = load_config(&args.config).await?;
    args.apply_overrides(&mut config);
    config.validate()?;

    let source = open_source(config.controller.backend)?;
    let mut joystick = Joystick::open(config.controller.index, source, config.deadzone_profile()?)?;

    info!(
        "Reading \"{}\" via {} ({} axes, {} buttons)",
        joystick.name(),
        joystick.backend_name(),
        joystick.axis_count(),
        joystick.button_count()
    );

    if args.once {
        let raw = joystick.read_raw()?;
        let state = joystick.profile().normalize(&raw);
        Reporter::new(&config.output, args.raw).emit(&raw, &state)?;
        joystick.close();
        return Ok(());
    }

    run_loop(&args, joystick, config, watcher).await?;

    info!("xinput-joystick shutdown complete");
    Ok(())
}

/// Poll at the configured rate until Ctrl-C, applying config reloads as they arrive
async fn run_loop<S: GamepadSource>(
    args: &Args,
    mut joystick: Joystick<S>,
    mut config: AppConfig,
    mut watcher: Option<ConfigWatcher>,
) -> Result<()> {
    let mut reporter = Reporter::new(&config.output, args.raw);
    let mut ticker = tokio::time::interval(Duration::from_millis(config.poll_interval_ms));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    info!("Polling every {} ms (Ctrl+C to stop)", config.poll_interval_ms);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,

            Some(new_config) = next_config(&mut watcher) => {
                config = apply_reload(args, &mut joystick, &config, new_config, &mut reporter);
                ticker = tokio::time::interval(Duration::from_millis(config.poll_interval_ms));
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            }

            _ = ticker.tick() => {
                match joystick.read_raw() {
                    Ok(raw) => {
                        reporter.connected(&joystick.name());
                        let state = joystick.profile().normalize(&raw);
                        reporter.emit(&raw, &state)?;
                    }
                    Err(JoystickError::NotConnected(_)) => {
                        reporter.disconnected(&joystick.name());
                    }
                    Err(e) => {
                        error!("Failed to read {}: {}", joystick.name(), e);
                    }
                }
            }
        }
    }

    joystick.close();
    Ok(())
}

/// Swap in a reloaded config, keeping the previous one if the result is unusable
fn apply_reload<S: GamepadSource>(
    args: &Args,
    joystick: &mut Joystick<S>,
    current: &AppConfig,
    mut new_config: AppConfig,
    reporter: &mut Reporter,
) -> AppConfig {
    args.apply_overrides(&mut new_config);

    let profile = match new_config.deadzone_profile() {
        Ok(profile) => profile,
        Err(e) => {
            warn!("Ignoring reloaded config: {:#}", e);
            return current.clone();
        }
    };

    if new_config.controller != current.controller {
        warn!("Controller index/backend changes take effect on restart");
    }

    joystick.set_profile(profile);
    reporter.update(&new_config.output);

    debug!(
        "Applied deadzones: left={}, right={}, trigger={}",
        profile.left_stick(),
        profile.right_stick(),
        profile.trigger()
    );

    new_config
}

/// Load the config file with hot reload, or fall back to defaults if it's missing
async fn load_config(path: &str) -> Result<(Option<ConfigWatcher>, AppConfig)> {
    if !Path::new(path).exists() {
        info!("No config file at {}, using XInput defaults", path);
        return Ok((None, AppConfig::default()));
    }

    let (watcher, initial_config) = ConfigWatcher::new(path).await?;
    info!("Configuration loaded successfully with hot-reload enabled");

    Ok((Some(watcher), (*initial_config).clone()))
}

async fn next_config(watcher: &mut Option<ConfigWatcher>) -> Option<AppConfig> {
    match watcher {
        Some(watcher) => watcher.next_config().await,
        None => std::future::pending().await,
    }
}

/// Create the input backend selected in the config
fn open_source(backend: Backend) -> Result<Box<dyn GamepadSource>> {
    match backend {
        Backend::Xinput => open_xinput(),
        Backend::Gilrs => open_gilrs(),
    }
}

#[cfg(windows)]
fn open_xinput() -> Result<Box<dyn GamepadSource>> {
    use xinput_joystick::input::gamepad::XInputSource;

    let source = XInputSource::load().context("Failed to initialize XInput")?;
    Ok(Box::new(source))
}

#[cfg(not(windows))]
fn open_xinput() -> Result<Box<dyn GamepadSource>> {
    anyhow::bail!("XInput is only available on Windows; set controller.backend to gilrs")
}

#[cfg(feature = "gilrs")]
fn open_gilrs() -> Result<Box<dyn GamepadSource>> {
    use xinput_joystick::input::gamepad::GilrsSource;

    let source = GilrsSource::new().context("Failed to initialize gilrs")?;
    Ok(Box::new(source))
}

#[cfg(not(feature = "gilrs"))]
fn open_gilrs() -> Result<Box<dyn GamepadSource>> {
    anyhow::bail!("gilrs backend not compiled in; rebuild with --features gilrs")
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Logs go to stderr so JSON output on stdout stays machine-readable
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
