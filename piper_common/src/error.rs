//! Boot outcome taxonomy and process exit codes.
//!
//! Each `InitError` kind maps to exactly one exit code. The codes are read
//! by the process supervisor to decide whether to restart the boot run, so
//! they must never be renumbered.
//!
//! | Code | Outcome             |
//! |------|---------------------|
//! | 0    | success             |
//! | 1    | `CanOpenFailed`     |
//! | 2    | `ConnectFailed`     |
//! | 3    | `EnableFailed`      |
//! | 4    | `EnableTimeout`     |
//! | 5    | `HomeFailed`        |
//! | 6    | `HomeTimeout`       |
//! | 7    | `SignalInterrupted` |
//! | 8    | `StatusCheckFailed` |
//! | 9    | `ArmError`          |
//! | 78   | invalid configuration (before the sequence starts) |

use std::time::Duration;
use thiserror::Error;

/// Exit code of a successful run.
pub const EXIT_OK: i32 = 0;

/// Exit code when the configuration cannot be loaded or validated (EX_CONFIG).
pub const EXIT_CONFIG_INVALID: i32 = 78;

/// Terminal failure of a boot run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    /// Transport or device interface could not be created.
    #[error("CAN transport open failed: {0}")]
    CanOpenFailed(String),

    /// Port connect failed or the link never came up.
    #[error("Connect failed: {0}")]
    ConnectFailed(String),

    /// Motor enable was refused.
    #[error("Enable failed: {0}")]
    EnableFailed(String),

    /// Motors did not confirm enable in time.
    #[error("Enable not confirmed within {0:?}")]
    EnableTimeout(Duration),

    /// Every homing attempt failed.
    #[error("Homing failed after {attempts} attempt(s)")]
    HomeFailed {
        /// Attempts made.
        attempts: u32,
    },

    /// A homing move did not converge in time.
    #[error("Homing did not reach target within {0:?}")]
    HomeTimeout(Duration),

    /// A termination signal was received.
    #[error("Interrupted by termination signal")]
    SignalInterrupted,

    /// Arm status could not be checked.
    #[error("Status check failed: {0}")]
    StatusCheckFailed(String),

    /// The arm reported an error that was not cleared.
    #[error("Arm error code {0}")]
    ArmError(u16),
}

impl InitError {
    /// Process exit code for this outcome.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::CanOpenFailed(_) => 1,
            Self::ConnectFailed(_) => 2,
            Self::EnableFailed(_) => 3,
            Self::EnableTimeout(_) => 4,
            Self::HomeFailed { .. } => 5,
            Self::HomeTimeout(_) => 6,
            Self::SignalInterrupted => 7,
            Self::StatusCheckFailed(_) => 8,
            Self::ArmError(_) => 9,
        }
    }
}

/// Outcome of one boot run, produced exactly once.
pub type RunOutcome = Result<(), InitError>;

/// Process exit code for a run outcome.
pub fn exit_code(outcome: &RunOutcome) -> i32 {
    match outcome {
        Ok(()) => EXIT_OK,
        Err(e) => e.exit_code(),
    }
}
