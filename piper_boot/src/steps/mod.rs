//! Boot steps 3-6.
//!
//! Each step is an `impl BootSequencer` block taking the device handle and
//! returning a `RunOutcome`. Steps 1-2 live in [`crate::sequencer`].
//!
//! - [`link`] - Await a live link, log firmware version
//! - [`status`] - Check arm error code, reset once
//! - [`enable`] - Enable motors, two-tier confirmation
//! - [`homing`] - Move to target with retries and convergence wait

pub mod enable;
pub mod homing;
pub mod link;
pub mod status;
