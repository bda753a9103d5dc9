//! Boot configuration types and TOML loading.
//!
//! `BootConfig` is constructed once before the sequencer starts and is
//! read-only afterwards. It can be built from defaults, loaded from a TOML
//! file via [`ConfigLoader`], or both (file values override defaults).
//!
//! # TOML Example
//!
//! ```toml
//! can_interface = "can0"
//! connect_timeout_ms = 5000
//! enable_timeout_ms = 10000
//! home_timeout_ms = 60000
//! status_poll_interval_ms = 50
//! home_retry_count = 2
//! motion_speed_percent = 30
//! target_joints = [-90000, 0, 0, 0, 0, 0]
//!
//! [tuning]
//! reset_settle_ms = 500
//!
//! [driver_config.simulation]
//! link_delay_ms = 100
//! ```

use crate::consts::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

fn default_can_interface() -> String {
    DEFAULT_CAN_INTERFACE.to_string()
}

fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

fn default_enable_timeout_ms() -> u64 {
    DEFAULT_ENABLE_TIMEOUT_MS
}

fn default_home_timeout_ms() -> u64 {
    DEFAULT_HOME_TIMEOUT_MS
}

fn default_status_poll_interval_ms() -> u64 {
    DEFAULT_STATUS_POLL_INTERVAL_MS
}

fn default_home_retry_count() -> u32 {
    DEFAULT_HOME_RETRY_COUNT
}

fn default_motion_speed_percent() -> u8 {
    DEFAULT_MOTION_SPEED_PERCENT
}

fn default_target_joints() -> Vec<i32> {
    vec![0; JOINT_COUNT]
}

/// Configuration of one boot run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BootConfig {
    /// CAN interface the transport binds to (e.g. "can0").
    #[serde(default = "default_can_interface")]
    pub can_interface: String,

    /// Bound for the link to report connected and fresh [ms].
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Bound for the long enable-confirmation loop [ms].
    #[serde(default = "default_enable_timeout_ms")]
    pub enable_timeout_ms: u64,

    /// Bound for one homing move to converge [ms].
    #[serde(default = "default_home_timeout_ms")]
    pub home_timeout_ms: u64,

    /// Spacing of link, enable and homing status polls [ms].
    #[serde(default = "default_status_poll_interval_ms")]
    pub status_poll_interval_ms: u64,

    /// Homing retries after the first attempt.
    #[serde(default = "default_home_retry_count")]
    pub home_retry_count: u32,

    /// Homing speed [%], 0-100.
    #[serde(default = "default_motion_speed_percent")]
    pub motion_speed_percent: u8,

    /// Homing target, one entry per joint [mdeg].
    #[serde(default = "default_target_joints")]
    pub target_joints: Vec<i32>,

    /// Fixed delays, retry bounds and tolerance of the sequence.
    #[serde(default)]
    pub tuning: SequenceTuning,

    /// Per-backend configuration sections.
    /// Key = backend name, Value = backend-specific TOML table.
    #[serde(default)]
    pub driver_config: HashMap<String, toml::Value>,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            can_interface: default_can_interface(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            enable_timeout_ms: DEFAULT_ENABLE_TIMEOUT_MS,
            home_timeout_ms: DEFAULT_HOME_TIMEOUT_MS,
            status_poll_interval_ms: DEFAULT_STATUS_POLL_INTERVAL_MS,
            home_retry_count: DEFAULT_HOME_RETRY_COUNT,
            motion_speed_percent: DEFAULT_MOTION_SPEED_PERCENT,
            target_joints: default_target_joints(),
            tuning: SequenceTuning::default(),
            driver_config: HashMap::new(),
        }
    }
}

impl BootConfig {
    /// Validate the configuration.
    ///
    /// # Validation Rules
    /// 1. `can_interface` is not empty
    /// 2. `target_joints.len()` == `JOINT_COUNT`
    /// 3. `motion_speed_percent` <= `MAX_SPEED_PERCENT`
    /// 4. `status_poll_interval_ms` > 0 and `tuning.enable_fast_poll_interval_ms` > 0
    /// 5. `tuning.position_tolerance_mdeg` >= 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.can_interface.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "can_interface cannot be empty".to_string(),
            ));
        }

        if self.target_joints.len() != JOINT_COUNT {
            return Err(ConfigError::ValidationError(format!(
                "target_joints must have {} entries, got {}",
                JOINT_COUNT,
                self.target_joints.len()
            )));
        }

        if self.motion_speed_percent > MAX_SPEED_PERCENT {
            return Err(ConfigError::ValidationError(format!(
                "motion_speed_percent must be within 0..={}, got {}",
                MAX_SPEED_PERCENT, self.motion_speed_percent
            )));
        }

        if self.status_poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "status_poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        if self.tuning.enable_fast_poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "tuning.enable_fast_poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        if self.tuning.position_tolerance_mdeg < 0 {
            return Err(ConfigError::ValidationError(format!(
                "tuning.position_tolerance_mdeg must not be negative, got {}",
                self.tuning.position_tolerance_mdeg
            )));
        }

        Ok(())
    }

    /// Connect timeout as Duration.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Enable timeout as Duration.
    pub fn enable_timeout(&self) -> Duration {
        Duration::from_millis(self.enable_timeout_ms)
    }

    /// Home timeout as Duration.
    pub fn home_timeout(&self) -> Duration {
        Duration::from_millis(self.home_timeout_ms)
    }

    /// Status poll interval as Duration.
    pub fn status_poll_interval(&self) -> Duration {
        Duration::from_millis(self.status_poll_interval_ms)
    }

    /// Total homing attempts: the first one plus `home_retry_count` retries.
    pub fn home_attempts(&self) -> u32 {
        self.home_retry_count.saturating_add(1)
    }

    /// Backend-specific configuration table, if present.
    pub fn driver_section(&self, name: &str) -> Option<&toml::Value> {
        self.driver_config.get(name)
    }
}

/// Fixed delays and bounds of the boot sequence.
///
/// Defaults match the values the arm firmware is known to need; tests
/// shrink them to keep runs short.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SequenceTuning {
    /// Settle delay after a successful port connect [ms].
    pub settle_after_connect_ms: u64,
    /// Delay between requesting and reading the firmware version [ms].
    pub firmware_query_delay_ms: u64,
    /// Settle delay after a reset command [ms].
    pub reset_settle_ms: u64,
    /// Spacing of the fast enable-confirmation loop [ms].
    pub enable_fast_poll_interval_ms: u64,
    /// Iteration cap of the fast enable-confirmation loop.
    pub enable_fast_poll_attempts: u32,
    /// Settle delay between setting the motion mode and moving [ms].
    pub mode_settle_ms: u64,
    /// Backoff before each homing retry [ms].
    pub home_retry_backoff_ms: u64,
    /// Feedback poll interval handed to the device on connect [ms].
    pub feedback_poll_interval_ms: u64,
    /// Per-joint convergence window [mdeg].
    pub position_tolerance_mdeg: i32,
}

impl Default for SequenceTuning {
    fn default() -> Self {
        Self {
            settle_after_connect_ms: SETTLE_AFTER_CONNECT_MS,
            firmware_query_delay_ms: FIRMWARE_QUERY_DELAY_MS,
            reset_settle_ms: RESET_SETTLE_MS,
            enable_fast_poll_interval_ms: ENABLE_FAST_POLL_INTERVAL_MS,
            enable_fast_poll_attempts: ENABLE_FAST_POLL_ATTEMPTS,
            mode_settle_ms: MODE_SETTLE_MS,
            home_retry_backoff_ms: HOME_RETRY_BACKOFF_MS,
            feedback_poll_interval_ms: FEEDBACK_POLL_INTERVAL_MS,
            position_tolerance_mdeg: POSITION_TOLERANCE_MDEG,
        }
    }
}

impl SequenceTuning {
    /// Settle delay after connect as Duration.
    pub fn settle_after_connect(&self) -> Duration {
        Duration::from_millis(self.settle_after_connect_ms)
    }

    /// Firmware query delay as Duration.
    pub fn firmware_query_delay(&self) -> Duration {
        Duration::from_millis(self.firmware_query_delay_ms)
    }

    /// Reset settle delay as Duration.
    pub fn reset_settle(&self) -> Duration {
        Duration::from_millis(self.reset_settle_ms)
    }

    /// Fast enable poll spacing as Duration.
    pub fn enable_fast_poll_interval(&self) -> Duration {
        Duration::from_millis(self.enable_fast_poll_interval_ms)
    }

    /// Mode settle delay as Duration.
    pub fn mode_settle(&self) -> Duration {
        Duration::from_millis(self.mode_settle_ms)
    }

    /// Homing retry backoff as Duration.
    pub fn home_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.home_retry_backoff_ms)
    }

    /// Device feedback poll interval as Duration.
    pub fn feedback_poll_interval(&self) -> Duration {
        Duration::from_millis(self.feedback_poll_interval_ms)
    }
}

/// Trait for loading configuration from TOML files.
///
/// Blanket-implemented for every `serde::de::DeserializeOwned` type.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax or types are invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

/// Load a `BootConfig` from `path` and validate it.
pub fn load_boot_config(path: &Path) -> Result<BootConfig, ConfigError> {
    let config = BootConfig::load(path)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = BootConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.can_interface, "can0");
        assert_eq!(config.target_joints, vec![0; JOINT_COUNT]);
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
        assert_eq!(config.enable_timeout(), Duration::from_secs(10));
        assert_eq!(config.home_timeout(), Duration::from_secs(60));
        assert_eq!(config.status_poll_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_home_attempts_includes_first_try() {
        let mut config = BootConfig::default();
        config.home_retry_count = 0;
        assert_eq!(config.home_attempts(), 1);
        config.home_retry_count = 2;
        assert_eq!(config.home_attempts(), 3);
        config.home_retry_count = u32::MAX;
        assert_eq!(config.home_attempts(), u32::MAX);
    }

    #[test]
    fn test_validation_rejects_wrong_joint_count() {
        let mut config = BootConfig::default();
        config.target_joints = vec![0; 5];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(msg)) if msg.contains("target_joints")
        ));

        config.target_joints = vec![0; 7];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_interface() {
        let mut config = BootConfig::default();
        config.can_interface = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validation_rejects_speed_above_100() {
        let mut config = BootConfig::default();
        config.motion_speed_percent = 100;
        assert!(config.validate().is_ok());
        config.motion_speed_percent = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_poll_intervals() {
        let mut config = BootConfig::default();
        config.status_poll_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = BootConfig::default();
        config.tuning.enable_fast_poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_negative_tolerance() {
        let mut config = BootConfig::default();
        config.tuning.position_tolerance_mdeg = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tuning_defaults_match_constants() {
        let tuning = SequenceTuning::default();
        assert_eq!(tuning.settle_after_connect(), Duration::from_millis(200));
        assert_eq!(tuning.firmware_query_delay(), Duration::from_millis(100));
        assert_eq!(tuning.reset_settle(), Duration::from_millis(500));
        assert_eq!(tuning.enable_fast_poll_interval(), Duration::from_millis(10));
        assert_eq!(tuning.enable_fast_poll_attempts, 200);
        assert_eq!(tuning.mode_settle(), Duration::from_millis(100));
        assert_eq!(tuning.home_retry_backoff(), Duration::from_secs(1));
        assert_eq!(tuning.feedback_poll_interval(), Duration::from_millis(10));
        assert_eq!(tuning.position_tolerance_mdeg, 1000);
    }

    #[test]
    fn test_config_loader_file_not_found() {
        let result = BootConfig::load(Path::new("/nonexistent/path/boot.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound)));
    }

    #[test]
    fn test_config_loader_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "invalid toml {{{{").unwrap();

        let result = BootConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_config_loader_rejects_unknown_fields() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "can_iface = \"can1\"").unwrap();

        let result = BootConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"can_interface = "can1"
target_joints = [-90000, 0, 0, 0, 0, 0]

[tuning]
reset_settle_ms = 250
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = load_boot_config(file.path()).unwrap();
        assert_eq!(config.can_interface, "can1");
        assert_eq!(config.target_joints[0], -90000);
        assert_eq!(config.tuning.reset_settle_ms, 250);
        assert_eq!(config.tuning.mode_settle_ms, MODE_SETTLE_MS);
        assert_eq!(config.home_retry_count, DEFAULT_HOME_RETRY_COUNT);
    }

    #[test]
    fn test_load_boot_config_validates() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "target_joints = [1, 2, 3]").unwrap();

        let result = load_boot_config(file.path());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_driver_section_lookup() {
        let config: BootConfig = toml::from_str(
            r#"
[driver_config.simulation]
link_delay_ms = 5
"#,
        )
        .unwrap();

        let section = config.driver_section("simulation").unwrap();
        assert_eq!(
            section.get("link_delay_ms").and_then(|v| v.as_integer()),
            Some(5)
        );
        assert!(config.driver_section("piper").is_none());
    }
}
