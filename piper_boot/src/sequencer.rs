//! Boot sequencer: step ordering and the first two steps.
//!
//! `BootSequencer` owns the configuration and the shutdown flag for one
//! run. `run()` creates the device through the supplied factory and then
//! drives the steps strictly in order:
//!
//! 1. Create - transport and device interface
//! 2. Connect - open the port, settle
//! 3. Await link - poll until connected and fresh ([`crate::steps::link`])
//! 4. Check status - reset once on arm error ([`crate::steps::status`])
//! 5. Enable - fast then long confirmation loop ([`crate::steps::enable`])
//! 6. Home - move to target with retries ([`crate::steps::homing`])
//!
//! The first failing step ends the run; its outcome is returned unchanged.

use crate::poll::Poller;
use piper_common::config::{BootConfig, ConfigError};
use piper_common::device::{ArmDevice, ConnectOptions, DeviceError};
use piper_common::error::{InitError, RunOutcome};
use piper_common::shutdown::ShutdownSignal;
use std::thread;
use std::time::Duration;
use tracing::{error, info, warn};

/// Drives one boot run.
pub struct BootSequencer {
    /// Validated configuration
    pub(crate) config: BootConfig,
    /// Cancellation flag shared with the signal handler
    pub(crate) shutdown: ShutdownSignal,
}

impl BootSequencer {
    /// Create a sequencer for `config`.
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` if the configuration is invalid.
    pub fn new(config: BootConfig, shutdown: ShutdownSignal) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, shutdown })
    }

    /// Configuration of this run.
    pub fn config(&self) -> &BootConfig {
        &self.config
    }

    /// Run the boot sequence once.
    ///
    /// `create` builds the device interface bound to the configured CAN
    /// interface; a factory error is reported as `CanOpenFailed`.
    pub fn run<F>(&self, create: F) -> RunOutcome
    where
        F: FnOnce(&BootConfig) -> Result<Box<dyn ArmDevice>, DeviceError>,
    {
        info!("Piper arm init started, CAN: {}", self.config.can_interface);

        let mut device = self.create_interface(create)?;
        let device = device.as_mut();

        self.connect_port(device)?;
        self.await_link(device)?;
        self.check_arm_status(device)?;
        self.enable_motors(device)?;
        self.perform_homing(device)?;

        info!("Piper arm init completed");
        Ok(())
    }

    /// Step 1: build the transport and device interface.
    fn create_interface<F>(&self, create: F) -> Result<Box<dyn ArmDevice>, InitError>
    where
        F: FnOnce(&BootConfig) -> Result<Box<dyn ArmDevice>, DeviceError>,
    {
        info!(
            "[1/6] Creating CAN transport on {}...",
            self.config.can_interface
        );

        let device = create(&self.config).map_err(|e| {
            error!("Failed to create interface: {}", e);
            InitError::CanOpenFailed(e.to_string())
        })?;

        info!("Created device interface: {}", device.name());
        Ok(device)
    }

    /// Step 2: open the port and let the link settle.
    fn connect_port(&self, device: &mut dyn ArmDevice) -> RunOutcome {
        info!("[2/6] Connecting CAN port...");

        let options = ConnectOptions {
            feedback_poll: self.config.tuning.feedback_poll_interval(),
            ..ConnectOptions::default()
        };

        device.connect(&options).map_err(|e| {
            error!("Failed to connect port: {}", e);
            InitError::ConnectFailed(e.to_string())
        })?;

        self.pause(self.config.tuning.settle_after_connect())
    }

    /// Poller over this run's shutdown flag.
    pub(crate) fn poller(&self, interval: Duration) -> Poller<'_> {
        Poller::new(&self.shutdown, interval)
    }

    /// Fixed settle delay, followed by a cancellation check.
    pub(crate) fn pause(&self, duration: Duration) -> RunOutcome {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
        if self.shutdown.is_shutdown_requested() {
            return Err(self.interrupted("settling"));
        }
        Ok(())
    }

    /// Log and build the cancellation outcome.
    pub(crate) fn interrupted(&self, during: &str) -> InitError {
        warn!("Interrupted while {}", during);
        InitError::SignalInterrupted
    }
}

/// Validate `config` and run the boot sequence once with `create`.
///
/// An invalid configuration never reaches the device; it is reported as
/// `CanOpenFailed` because no transport could be bound to it.
pub fn run_boot<F>(config: BootConfig, shutdown: ShutdownSignal, create: F) -> RunOutcome
where
    F: FnOnce(&BootConfig) -> Result<Box<dyn ArmDevice>, DeviceError>,
{
    let sequencer = BootSequencer::new(config, shutdown).map_err(|e| {
        error!("{}", e);
        InitError::CanOpenFailed(e.to_string())
    })?;
    sequencer.run(create)
}
