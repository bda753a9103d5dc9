//! # Piper Boot Library
//!
//! One-shot bring-up of the Piper arm: connect, check status, enable
//! motors, home, then exit so a higher-level controller can take over.
//!
//! # Module Structure
//!
//! - [`sequencer`] - `BootSequencer`, step ordering and short-circuiting
//! - [`steps`] - Link wait, status check, enable and homing steps
//! - [`poll`] - Deadline-bounded, cancellable polling
//! - [`device_registry`] - Device backend factory registration
//! - [`devices`] - Device backend implementations
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     piper_boot (single crate)                    │
//! │  ┌──────────────┐   ┌───────────────┐   ┌─────────────────────┐  │
//! │  │ShutdownSignal│──►│ BootSequencer │◄──│  Device Registry    │  │
//! │  │ (ctrlc)      │   │ (steps 1..6)  │   │                     │  │
//! │  └──────────────┘   └───────┬───────┘   └─────────────────────┘  │
//! │                             │ Poller                             │
//! │                             ▼                                    │
//! │                    ┌────────────────┐                            │
//! │                    │  ArmDevice     │ (trait object)             │
//! │                    │  trait         │                            │
//! │                    └────────────────┘                            │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]

pub mod device_registry;
pub mod devices;
pub mod poll;
pub mod sequencer;
pub mod steps;

// Re-export key types for convenience
pub use crate::device_registry::DeviceRegistry;
pub use crate::poll::{Deadline, PollOutcome, Poller};
pub use crate::sequencer::{BootSequencer, run_boot};
pub use crate::steps::homing::at_target;
