//! Piper Common Library
//!
//! Shared types for the Piper arm boot sequencer and its device backends.
//!
//! # Module Structure
//!
//! - [`config`] - Boot configuration, TOML loading and validation
//! - [`consts`] - Joint count, timing and tolerance constants
//! - [`device`] - `ArmDevice` trait and device data types
//! - [`error`] - Closed `InitError` taxonomy and process exit codes
//! - [`shutdown`] - Cooperative cancellation flag
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use piper_common::prelude::*;
//!
//! let config = BootConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.home_attempts(), 3);
//! ```

pub mod config;
pub mod consts;
pub mod device;
pub mod error;
pub mod prelude;
pub mod shutdown;
