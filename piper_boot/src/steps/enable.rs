//! Step 5: enable the joint motors.

use crate::poll::PollOutcome;
use crate::sequencer::BootSequencer;
use piper_common::consts::ALL_MOTORS;
use piper_common::device::ArmDevice;
use piper_common::error::{InitError, RunOutcome};
use tracing::{error, info, warn};

impl BootSequencer {
    /// Send the enable command and wait for confirmation.
    ///
    /// A failed command acknowledgement is only logged: the arm may still
    /// come up enabled. Confirmation is polled in two tiers: a fast loop of
    /// `enable_fast_poll_attempts` iterations, then a loop bounded by
    /// `enable_timeout` at the status poll interval.
    pub(crate) fn enable_motors(&self, device: &mut dyn ArmDevice) -> RunOutcome {
        info!("[5/6] Enabling arm...");

        if let Err(e) = device.enable(ALL_MOTORS) {
            warn!("Enable command failed: {}", e);
        }

        let tuning = &self.config.tuning;
        let fast = self.poller(tuning.enable_fast_poll_interval());
        match fast.for_attempts(tuning.enable_fast_poll_attempts, || {
            device.is_enabled().then_some(())
        }) {
            PollOutcome::Ready(()) => {
                info!("Arm enabled");
                return Ok(());
            }
            PollOutcome::Cancelled => return Err(self.interrupted("waiting for enable")),
            PollOutcome::Exhausted => warn!(
                "Enable not confirmed after {} fast polls, waiting up to {:?}",
                tuning.enable_fast_poll_attempts,
                self.config.enable_timeout()
            ),
        }

        let timeout = self.config.enable_timeout();
        let slow = self.poller(self.config.status_poll_interval());
        match slow.until_deadline(timeout, || device.is_enabled().then_some(())) {
            PollOutcome::Ready(()) => {
                info!("Arm enabled");
                Ok(())
            }
            PollOutcome::Cancelled => Err(self.interrupted("waiting for enable")),
            PollOutcome::Exhausted => {
                error!("Enable timeout");
                Err(InitError::EnableTimeout(timeout))
            }
        }
    }
}
