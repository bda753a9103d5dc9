//! # Piper Boot Binary
//!
//! One-shot initialization of a Piper arm at boot: open the CAN link,
//! clear errors, enable the motors and home the joints, then exit with a
//! code the service supervisor can act on.
//!
//! # Usage
//!
//! ```bash
//! # Built-in defaults, simulation backend
//! piper_boot
//!
//! # Config file with a CAN interface override
//! piper_boot --config /etc/piper/boot.toml --can-interface can1
//!
//! # Custom homing target [mdeg], verbose logging
//! piper_boot --target-joints=-90000,0,0,0,0,0 -v
//! ```

use clap::Parser;
use piper_boot::{BootSequencer, DeviceRegistry};
use piper_common::config::{BootConfig, ConfigError, load_boot_config};
use piper_common::consts::DEFAULT_CONFIG_PATH;
use piper_common::error::{EXIT_CONFIG_INVALID, exit_code};
use piper_common::shutdown::ShutdownSignal;
use std::path::{Path, PathBuf};
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Piper Boot - one-shot arm initialization
#[derive(Parser, Debug)]
#[command(name = "piper_boot")]
#[command(version)]
#[command(about = "One-shot Piper arm initialization: connect, enable, home")]
#[command(long_about = None)]
struct Args {
    /// Path to the boot configuration file (TOML).
    /// Falls back to /etc/piper/boot.toml if present, else built-in defaults.
    #[arg(short, long, env = "PIPER_BOOT_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// CAN interface name, overrides the config file
    #[arg(long, env = "PIPER_CAN_INTERFACE", value_name = "IFACE")]
    can_interface: Option<String>,

    /// Homing target per joint [mdeg], comma-separated, overrides the config file
    #[arg(
        long,
        env = "PIPER_TARGET_JOINTS",
        value_delimiter = ',',
        allow_hyphen_values = true,
        value_name = "J1,..,J6"
    )]
    target_joints: Option<Vec<i32>>,

    /// Device backend to drive
    #[arg(short, long, default_value = "simulation")]
    device: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("Piper Boot v{} starting...", env!("CARGO_PKG_VERSION"));

    let code = run(&args);
    info!("Exit code: {}", code);
    std::process::exit(code);
}

fn run(args: &Args) -> i32 {
    let config = match resolve_config(args) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return EXIT_CONFIG_INVALID;
        }
    };

    let shutdown = ShutdownSignal::new();
    let sequencer = match BootSequencer::new(config, shutdown.clone()) {
        Ok(sequencer) => sequencer,
        Err(e) => {
            error!("Configuration error: {}", e);
            return EXIT_CONFIG_INVALID;
        }
    };

    let handler_signal = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        warn!("Received shutdown signal");
        handler_signal.request_shutdown();
    }) {
        warn!("Failed to install signal handler: {}", e);
    }

    let registry = DeviceRegistry::with_builtin_devices();
    info!(
        "Device backend: {} (available: {:?})",
        args.device,
        registry.list_devices()
    );

    let outcome = sequencer.run(|config| registry.create_device(&args.device, config));
    match &outcome {
        Ok(()) => info!("Piper arm initialized"),
        Err(e) => error!("Initialization failed: {}", e),
    }
    exit_code(&outcome)
}

/// Defaults, then the config file, then CLI/environment overrides.
fn resolve_config(args: &Args) -> Result<BootConfig, ConfigError> {
    let fallback = Path::new(DEFAULT_CONFIG_PATH);
    let path = match &args.config {
        Some(path) => Some(path.as_path()),
        None if fallback.is_file() => Some(fallback),
        None => None,
    };

    let mut config = match path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            load_boot_config(path)?
        }
        None => {
            info!("No config file found, using built-in defaults");
            BootConfig::default()
        }
    };

    if let Some(interface) = &args.can_interface {
        config.can_interface = interface.clone();
    }
    if let Some(targets) = &args.target_joints {
        config.target_joints = targets.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
