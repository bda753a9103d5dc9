//! Simulation backend.
//!
//! Models link bring-up, motor enable and joint motion in software so the
//! full boot sequence can run without a CAN bus.

mod device;
mod motion;
mod settings;

pub use device::SimulatedArm;
pub use motion::JointMotion;
pub use settings::SimulationSettings;

use piper_common::config::BootConfig;
use piper_common::device::{ArmDevice, DeviceError};

/// Registry name of the simulation backend.
pub const DEVICE_NAME: &str = "simulation";

/// Factory function to create a simulated arm from `[driver_config.simulation]`.
pub fn create_device(config: &BootConfig) -> Result<Box<dyn ArmDevice>, DeviceError> {
    let settings = SimulationSettings::from_config(config)?;
    Ok(Box::new(SimulatedArm::new(&config.can_interface, settings)))
}
