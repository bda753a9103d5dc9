//! Arm device backend implementations.
//!
//! - [`simulation`] - Software model of the arm for bench runs and tests
//!
//! # Adding New Backends
//!
//! 1. Create a new submodule under `devices/`
//! 2. Implement the `ArmDevice` trait from `piper_common::device`
//! 3. Register the backend in [`register_all_devices`]

pub mod simulation;

use crate::device_registry::DeviceRegistry;

/// Register every built-in backend with `registry`.
pub fn register_all_devices(registry: &mut DeviceRegistry) {
    registry.register(simulation::DEVICE_NAME, simulation::create_device);
}
