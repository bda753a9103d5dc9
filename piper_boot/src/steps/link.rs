//! Step 3: wait for the link to come up.

use crate::poll::PollOutcome;
use crate::sequencer::BootSequencer;
use piper_common::device::ArmDevice;
use piper_common::error::{InitError, RunOutcome};
use std::thread;
use tracing::{debug, error, info};

impl BootSequencer {
    /// Poll the link state until it is connected and fresh.
    ///
    /// On success the firmware version is queried for the log; a missing
    /// answer is not an error.
    pub(crate) fn await_link(&self, device: &mut dyn ArmDevice) -> RunOutcome {
        info!("[3/6] Waiting for communication...");

        let timeout = self.config.connect_timeout();
        let poller = self.poller(self.config.status_poll_interval());

        match poller.until_deadline(timeout, || device.connect_status().is_live().then_some(())) {
            PollOutcome::Ready(()) => info!("Communication established"),
            PollOutcome::Cancelled => return Err(self.interrupted("waiting for communication")),
            PollOutcome::Exhausted => {
                error!("Connection timeout after {:?}", timeout);
                return Err(InitError::ConnectFailed(format!(
                    "no live link within {:?}",
                    timeout
                )));
            }
        }

        device.request_firmware_version();
        thread::sleep(self.config.tuning.firmware_query_delay());
        match device.firmware_version() {
            Some(version) => info!("Firmware: {}", version),
            None => debug!("Firmware version not available"),
        }

        Ok(())
    }
}
