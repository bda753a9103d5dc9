//! Simulation settings parsed from `[driver_config.simulation]`.

use piper_common::config::BootConfig;
use piper_common::consts::JOINT_COUNT;
use piper_common::device::DeviceError;
use serde::Deserialize;
use std::time::Duration;

use super::DEVICE_NAME;

/// Behaviour of the simulated arm.
///
/// # TOML Example
///
/// ```toml
/// [driver_config.simulation]
/// link_delay_ms = 100
/// enable_delay_ms = 300
/// max_joint_speed_mdeg_s = 180000
/// initial_joints = [0, 0, 0, 0, 0, 0]
/// fault_code = 0
/// fault_survives_reset = false
/// firmware_version = "S-V1.6-3"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSettings {
    /// Time from connect until feedback is fresh [ms].
    pub link_delay_ms: u64,
    /// Time from the enable command until motors report enabled [ms].
    pub enable_delay_ms: u64,
    /// Joint speed at 100 % [mdeg/s].
    pub max_joint_speed_mdeg_s: u32,
    /// Joint positions at power-on [mdeg].
    pub initial_joints: [i32; JOINT_COUNT],
    /// Error code reported from power-on (0 = healthy).
    pub fault_code: u16,
    /// Keep reporting `fault_code` after a reset.
    pub fault_survives_reset: bool,
    /// Firmware version string returned on request.
    pub firmware_version: String,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            link_delay_ms: 100,
            enable_delay_ms: 300,
            max_joint_speed_mdeg_s: 180_000,
            initial_joints: [0; JOINT_COUNT],
            fault_code: 0,
            fault_survives_reset: false,
            firmware_version: "S-V1.6-3".to_string(),
        }
    }
}

impl SimulationSettings {
    /// Read the simulation section of `config`, defaults if absent.
    ///
    /// # Errors
    /// Returns `DeviceError::Transport` if the section does not parse.
    pub fn from_config(config: &BootConfig) -> Result<Self, DeviceError> {
        match config.driver_section(DEVICE_NAME) {
            Some(section) => section.clone().try_into().map_err(|e| {
                DeviceError::Transport(format!("invalid [driver_config.{DEVICE_NAME}]: {e}"))
            }),
            None => Ok(Self::default()),
        }
    }

    /// Link delay as Duration.
    pub fn link_delay(&self) -> Duration {
        Duration::from_millis(self.link_delay_ms)
    }

    /// Enable delay as Duration.
    pub fn enable_delay(&self) -> Duration {
        Duration::from_millis(self.enable_delay_ms)
    }
}
