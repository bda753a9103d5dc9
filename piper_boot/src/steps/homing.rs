//! Step 6: move every joint to the configured target.
//!
//! Homing runs up to `home_retry_count + 1` attempts. One attempt sets the
//! motion mode, waits for it to settle, sends the move and then polls the
//! arm until all joints are within tolerance of the target.
//!
//! | Failure inside an attempt        | Effect                         |
//! |----------------------------------|--------------------------------|
//! | motion mode or move rejected     | next attempt                   |
//! | no convergence in `home_timeout` | next attempt                   |
//! | arm reports an error code        | run ends with `ArmError`       |
//! | shutdown requested               | run ends with `SignalInterrupted` |

use crate::poll::PollOutcome;
use crate::sequencer::BootSequencer;
use piper_common::device::{ArmDevice, MotionModeCommand};
use piper_common::error::{InitError, RunOutcome};
use tracing::{error, info, trace, warn};

/// Returns true if every joint is within `tolerance` of its target.
///
/// Compares pairwise up to the shorter of the two slices. Differences are
/// taken in `i64` so extreme values cannot overflow.
pub fn at_target(positions: &[i32], targets: &[i32], tolerance: i32) -> bool {
    positions
        .iter()
        .zip(targets)
        .all(|(&pos, &target)| (i64::from(pos) - i64::from(target)).abs() <= i64::from(tolerance))
}

/// Why a single homing attempt ended without reaching the target.
enum AttemptError {
    /// The attempt failed; another one may follow.
    Retryable(String),
    /// The run ends with this outcome.
    Fatal(InitError),
}

impl From<InitError> for AttemptError {
    fn from(err: InitError) -> Self {
        match err {
            InitError::HomeTimeout(_) => Self::Retryable(err.to_string()),
            other => Self::Fatal(other),
        }
    }
}

impl BootSequencer {
    /// Home the arm, retrying failed attempts.
    pub(crate) fn perform_homing(&self, device: &mut dyn ArmDevice) -> RunOutcome {
        info!(
            "[6/6] Performing homing to {:?} mdeg...",
            self.config.target_joints
        );

        let attempts = self.config.home_attempts();
        for attempt in 1..=attempts {
            if self.shutdown.is_shutdown_requested() {
                return Err(self.interrupted("homing"));
            }

            if attempt > 1 {
                warn!("Homing retry #{}", attempt - 1);
                self.pause(self.config.tuning.home_retry_backoff())?;
            }

            match self.home_attempt(device) {
                Ok(()) => {
                    info!("Homing complete");
                    return Ok(());
                }
                Err(AttemptError::Fatal(err)) => return Err(err),
                Err(AttemptError::Retryable(reason)) => {
                    warn!("Homing attempt {}/{} failed: {}", attempt, attempts, reason);
                }
            }
        }

        error!("Homing failed after {} attempt(s)", attempts);
        Err(InitError::HomeFailed { attempts })
    }

    fn home_attempt(&self, device: &mut dyn ArmDevice) -> Result<(), AttemptError> {
        let mode = MotionModeCommand::joint_move(self.config.motion_speed_percent);
        device
            .set_motion_mode(&mode)
            .map_err(|e| AttemptError::Retryable(format!("set motion mode failed: {e}")))?;

        self.pause(self.config.tuning.mode_settle())?;

        device
            .move_joints(&self.config.target_joints)
            .map_err(|e| AttemptError::Retryable(format!("homing command failed: {e}")))?;

        info!("Homing command sent, waiting...");
        self.wait_for_target(device)?;
        Ok(())
    }

    /// Poll the arm until all joints are at target.
    ///
    /// A status read that is unavailable counts as "not yet at target".
    /// Any non-zero error code ends the wait with `ArmError` at once.
    pub(crate) fn wait_for_target(&self, device: &dyn ArmDevice) -> RunOutcome {
        let targets = &self.config.target_joints;
        let tolerance = self.config.tuning.position_tolerance_mdeg;
        let timeout = self.config.home_timeout();
        let poller = self.poller(self.config.status_poll_interval());

        let outcome = poller.until_deadline(timeout, || {
            let status = device.arm_status()?;
            if status.has_error() {
                return Some(Err(InitError::ArmError(status.error_code)));
            }
            trace!("Joint positions: {:?}", status.joint_positions);
            at_target(&status.joint_positions, targets, tolerance).then_some(Ok(()))
        });

        match outcome {
            PollOutcome::Ready(Ok(())) => {
                info!("Target position reached");
                Ok(())
            }
            PollOutcome::Ready(Err(err)) => {
                error!("Arm error during homing: {}", err);
                Err(err)
            }
            PollOutcome::Cancelled => Err(self.interrupted("waiting for target position")),
            PollOutcome::Exhausted => {
                error!("Move to target timeout after {:?}", timeout);
                Err(InitError::HomeTimeout(timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use piper_common::consts::POSITION_TOLERANCE_MDEG;
    use proptest::prelude::*;

    #[test]
    fn test_at_target_exact() {
        let target = [-90_000, 0, 0, 0, 0, 0];
        assert!(at_target(&target, &target, POSITION_TOLERANCE_MDEG));
    }

    #[test]
    fn test_at_target_boundary_is_inclusive() {
        let target = [0; 6];
        assert!(at_target(&[1_000, -1_000, 0, 0, 0, 0], &target, 1_000));
        assert!(!at_target(&[1_001, 0, 0, 0, 0, 0], &target, 1_000));
        assert!(!at_target(&[0, 0, 0, 0, 0, -1_001], &target, 1_000));
    }

    #[test]
    fn test_at_target_extremes_do_not_overflow() {
        assert!(!at_target(&[i32::MAX], &[i32::MIN], 1_000));
        assert!(at_target(&[i32::MIN], &[i32::MIN + 1_000], 1_000));
    }

    #[test]
    fn test_attempt_error_from_init_error() {
        let err = AttemptError::from(InitError::HomeTimeout(std::time::Duration::ZERO));
        assert!(matches!(err, AttemptError::Retryable(_)));

        let err = AttemptError::from(InitError::ArmError(5));
        assert!(matches!(err, AttemptError::Fatal(InitError::ArmError(5))));

        let err = AttemptError::from(InitError::SignalInterrupted);
        assert!(matches!(err, AttemptError::Fatal(InitError::SignalInterrupted)));
    }

    proptest! {
        #[test]
        fn prop_within_tolerance_converges(
            targets in prop::array::uniform6(-180_000i32..=180_000),
            offsets in prop::array::uniform6(-POSITION_TOLERANCE_MDEG..=POSITION_TOLERANCE_MDEG),
        ) {
            let positions: Vec<i32> = targets.iter().zip(offsets).map(|(t, o)| t + o).collect();
            prop_assert!(at_target(&positions, &targets, POSITION_TOLERANCE_MDEG));
        }

        #[test]
        fn prop_one_joint_outside_tolerance_does_not_converge(
            targets in prop::array::uniform6(-180_000i32..=180_000),
            joint in 0usize..6,
            excess in 1i32..=90_000,
            negative in any::<bool>(),
        ) {
            let mut positions = targets;
            let offset = POSITION_TOLERANCE_MDEG + excess;
            positions[joint] += if negative { -offset } else { offset };
            prop_assert!(!at_target(&positions, &targets, POSITION_TOLERANCE_MDEG));
        }
    }
}
