//! Step 4: check the arm error code.

use crate::sequencer::BootSequencer;
use piper_common::device::ArmDevice;
use piper_common::error::{InitError, RunOutcome};
use tracing::{error, info, warn};

impl BootSequencer {
    /// Read the arm status once and clear a reported error with one reset.
    ///
    /// An unavailable status read does not block initialization, neither
    /// before nor after the reset. An error that survives the reset ends
    /// the run with `ArmError`.
    pub(crate) fn check_arm_status(&self, device: &mut dyn ArmDevice) -> RunOutcome {
        info!("[4/6] Checking arm status...");

        let Some(mut status) = device.arm_status() else {
            warn!("Cannot get arm status, continuing...");
            return Ok(());
        };

        if status.has_error() {
            error!("Arm error code: {}", status.error_code);

            info!("Trying to reset...");
            device.reset();
            self.pause(self.config.tuning.reset_settle())?;

            match device.arm_status() {
                Some(after) if after.has_error() => {
                    error!("Reset failed, arm error code: {}", after.error_code);
                    return Err(InitError::ArmError(after.error_code));
                }
                Some(after) => {
                    info!("Arm error cleared");
                    status = after;
                }
                None => {
                    warn!("Cannot get arm status after reset, continuing...");
                    return Ok(());
                }
            }
        }

        info!(
            "Arm enabled: {}, control mode: {:#04x}",
            if status.enabled { "yes" } else { "no" },
            status.control_mode
        );
        Ok(())
    }
}
