//! Numeric limits, defaults and protocol constants for the boot sequence.
//!
//! Single source of truth for every fixed delay, retry bound and tolerance.
//! Durations are in milliseconds, joint positions in millidegrees (mdeg).

/// Number of joints on the Piper arm.
pub const JOINT_COUNT: usize = 6;

/// Motor selector that addresses every joint motor at once.
pub const ALL_MOTORS: u8 = 7;

/// Upper bound of the motion speed percentage.
pub const MAX_SPEED_PERCENT: u8 = 100;

/// Control mode: motion commands arrive over CAN.
pub const CTRL_MODE_CAN_COMMAND: u8 = 0x01;

/// Move mode: joint-space move (MOVE J).
pub const MOVE_MODE_JOINT: u8 = 0x01;

// ─── Configuration defaults ─────────────────────────────────────────

/// Default CAN interface name.
pub const DEFAULT_CAN_INTERFACE: &str = "can0";

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/piper/boot.toml";

/// Default bound for the link to come up [ms].
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Default bound for the long enable-confirmation loop [ms].
pub const DEFAULT_ENABLE_TIMEOUT_MS: u64 = 10_000;

/// Default bound for one homing move to converge [ms].
pub const DEFAULT_HOME_TIMEOUT_MS: u64 = 60_000;

/// Default spacing of status polls [ms].
pub const DEFAULT_STATUS_POLL_INTERVAL_MS: u64 = 50;

/// Default number of homing retries after the first attempt.
pub const DEFAULT_HOME_RETRY_COUNT: u32 = 2;

/// Default homing speed [%].
pub const DEFAULT_MOTION_SPEED_PERCENT: u8 = 30;

// ─── Sequence tuning defaults ───────────────────────────────────────

/// Settle delay after a successful port connect [ms].
pub const SETTLE_AFTER_CONNECT_MS: u64 = 200;

/// Delay between requesting and reading the firmware version [ms].
pub const FIRMWARE_QUERY_DELAY_MS: u64 = 100;

/// Settle delay after a reset command [ms].
pub const RESET_SETTLE_MS: u64 = 500;

/// Spacing of the fast enable-confirmation loop [ms].
pub const ENABLE_FAST_POLL_INTERVAL_MS: u64 = 10;

/// Iteration cap of the fast enable-confirmation loop (200 x 10 ms = 2 s).
pub const ENABLE_FAST_POLL_ATTEMPTS: u32 = 200;

/// Settle delay between setting the motion mode and moving [ms].
pub const MODE_SETTLE_MS: u64 = 100;

/// Backoff before each homing retry [ms].
pub const HOME_RETRY_BACKOFF_MS: u64 = 1_000;

/// Feedback poll interval handed to the device on connect [ms].
pub const FEEDBACK_POLL_INTERVAL_MS: u64 = 10;

/// A joint is at target when within this distance [mdeg] (1 degree).
pub const POSITION_TOLERANCE_MDEG: i32 = 1_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_consistent() {
        assert!(JOINT_COUNT > 0);
        assert!(DEFAULT_MOTION_SPEED_PERCENT <= MAX_SPEED_PERCENT);
        assert!(DEFAULT_STATUS_POLL_INTERVAL_MS > 0);
        assert!(ENABLE_FAST_POLL_INTERVAL_MS > 0);
        assert!(POSITION_TOLERANCE_MDEG >= 0);
    }

    #[test]
    fn fast_enable_loop_spans_two_seconds() {
        assert_eq!(
            ENABLE_FAST_POLL_ATTEMPTS as u64 * ENABLE_FAST_POLL_INTERVAL_MS,
            2_000
        );
    }
}
