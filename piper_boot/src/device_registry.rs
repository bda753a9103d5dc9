//! Registry of arm device backends.
//!
//! Provides a `DeviceRegistry` struct for registering and retrieving device
//! factories by name. Constructed at startup and passed by reference; no
//! global state.

use crate::devices::register_all_devices;
use piper_common::config::BootConfig;
use piper_common::device::{ArmDevice, DeviceError, DeviceFactory};
use std::collections::HashMap;

/// Registry of available device backends.
pub struct DeviceRegistry {
    factories: HashMap<&'static str, DeviceFactory>,
}

impl DeviceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry holding every backend built into this crate.
    pub fn with_builtin_devices() -> Self {
        let mut registry = Self::new();
        register_all_devices(&mut registry);
        registry
    }

    /// Register a device factory.
    ///
    /// # Panics
    /// Panics if a device with the same name is already registered.
    pub fn register(&mut self, name: &'static str, factory: DeviceFactory) {
        if self.factories.contains_key(name) {
            panic!("Device '{name}' is already registered");
        }
        self.factories.insert(name, factory);
    }

    /// Get a device factory by name.
    pub fn get_factory(&self, name: &str) -> Option<DeviceFactory> {
        self.factories.get(name).copied()
    }

    /// Create a device instance by name, bound to `config`.
    ///
    /// # Errors
    /// Returns `DeviceError::UnknownDevice` if no device with the given name
    /// is registered, or the factory's own error.
    pub fn create_device(
        &self,
        name: &str,
        config: &BootConfig,
    ) -> Result<Box<dyn ArmDevice>, DeviceError> {
        let factory = self
            .get_factory(name)
            .ok_or_else(|| DeviceError::UnknownDevice(name.to_string()))?;
        factory(config)
    }

    /// List all registered device names, sorted.
    pub fn list_devices(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
