//! Prelude module for common re-exports.
//!
//! ```rust
//! use piper_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{BootConfig, ConfigError, ConfigLoader, SequenceTuning, load_boot_config};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{ALL_MOTORS, JOINT_COUNT};

// ─── Device ─────────────────────────────────────────────────────────
pub use crate::device::{
    ArmDevice, ArmStatus, ConnectOptions, ConnectStatus, DeviceError, DeviceFactory,
    MotionModeCommand,
};

// ─── Outcome ────────────────────────────────────────────────────────
pub use crate::error::{EXIT_CONFIG_INVALID, EXIT_OK, InitError, RunOutcome, exit_code};

// ─── Cancellation ───────────────────────────────────────────────────
pub use crate::shutdown::ShutdownSignal;
