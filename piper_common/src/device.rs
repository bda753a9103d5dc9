//! Arm device trait and error types.
//!
//! This module defines:
//! - `ArmDevice` trait - Interface the boot sequencer drives
//! - `DeviceError` enum - Error types for device operations
//! - `DeviceFactory` type alias - Factory function type
//! - `ConnectStatus` / `ArmStatus` - Snapshots read from the device
//! - `ConnectOptions` / `MotionModeCommand` - Command parameters

use crate::config::BootConfig;
use crate::consts::{CTRL_MODE_CAN_COMMAND, FEEDBACK_POLL_INTERVAL_MS, JOINT_COUNT, MOVE_MODE_JOINT};
use std::time::Duration;
use thiserror::Error;

/// Error types for device operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// The link to the arm is not up.
    #[error("Device not connected")]
    NotConnected,

    /// Bus or transport failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The arm refused the command.
    #[error("Command rejected: {0}")]
    Rejected(String),

    /// No backend registered under this name.
    #[error("Unknown device backend: {0}")]
    UnknownDevice(String),
}

/// Factory function type for creating device instances bound to a config.
pub type DeviceFactory = fn(&BootConfig) -> Result<Box<dyn ArmDevice>, DeviceError>;

/// Handshake parameters passed to [`ArmDevice::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    /// How often the device's reader polls for feedback frames.
    pub feedback_poll: Duration,
    /// Run the arm's init handshake as part of connecting.
    pub init_handshake: bool,
    /// Start the background feedback reader.
    pub start_reader: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            feedback_poll: Duration::from_millis(FEEDBACK_POLL_INTERVAL_MS),
            init_handshake: true,
            start_reader: true,
        }
    }
}

/// Link state reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectStatus {
    /// Link was established.
    pub connected: bool,
    /// No feedback received recently.
    pub stale: bool,
}

impl ConnectStatus {
    /// Connected and receiving fresh feedback.
    #[inline]
    pub const fn is_live(&self) -> bool {
        self.connected && !self.stale
    }
}

/// Snapshot of the arm state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArmStatus {
    /// Arm error code (0 = no error)
    pub error_code: u16,
    /// Motors enabled
    pub enabled: bool,
    /// Active control mode
    pub control_mode: u8,
    /// Joint positions [mdeg]
    pub joint_positions: [i32; JOINT_COUNT],
}

impl ArmStatus {
    /// Returns true if the arm reports an error.
    #[inline]
    pub const fn has_error(&self) -> bool {
        self.error_code != 0
    }
}

/// Motion mode command: control mode, move mode, speed and reserved bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionModeCommand {
    /// Control mode (0x01 = CAN command control)
    pub ctrl_mode: u8,
    /// Move mode (0x01 = joint move)
    pub move_mode: u8,
    /// Speed [%]
    pub speed_percent: u8,
    /// Reserved fields, sent as zero
    pub reserved: [u8; 3],
}

impl MotionModeCommand {
    /// Joint-space move under CAN command control at `speed_percent`.
    pub const fn joint_move(speed_percent: u8) -> Self {
        Self {
            ctrl_mode: CTRL_MODE_CAN_COMMAND,
            move_mode: MOVE_MODE_JOINT,
            speed_percent,
            reserved: [0; 3],
        }
    }
}

/// Interface of the arm as seen by the boot sequencer.
///
/// Every call must return within a bounded time: the sequencer only
/// observes cancellation between calls.
///
/// # Lifecycle
///
/// 1. Created by a [`DeviceFactory`] bound to the CAN interface
/// 2. `connect()` once, then polled via `connect_status()`
/// 3. Status, enable and motion commands until the sequence ends
/// 4. Dropped when the process exits
pub trait ArmDevice: Send {
    /// Returns the backend's identifier (e.g., "simulation").
    fn name(&self) -> &'static str;

    /// Open the port and start the handshake.
    fn connect(&mut self, options: &ConnectOptions) -> Result<(), DeviceError>;

    /// Current link state.
    fn connect_status(&self) -> ConnectStatus;

    /// Ask the arm for its firmware version. The answer is cached.
    fn request_firmware_version(&mut self);

    /// Cached firmware version, if one has arrived.
    fn firmware_version(&self) -> Option<String>;

    /// Latest arm status, if available.
    fn arm_status(&self) -> Option<ArmStatus>;

    /// Send a reset command. No acknowledgement.
    fn reset(&mut self);

    /// Send the motor enable command for `motors`.
    fn enable(&mut self, motors: u8) -> Result<(), DeviceError>;

    /// Returns true once every motor reports enabled.
    fn is_enabled(&self) -> bool;

    /// Set control mode, move mode and speed.
    fn set_motion_mode(&mut self, command: &MotionModeCommand) -> Result<(), DeviceError>;

    /// Command a joint-space move to `targets` [mdeg].
    fn move_joints(&mut self, targets: &[i32]) -> Result<(), DeviceError>;
}
