//! # Simulation Backend Tests
//!
//! Full boot runs through `DeviceRegistry` against the simulated arm.

use piper_boot::{BootSequencer, DeviceRegistry};
use piper_common::prelude::*;
use std::time::Duration;

// ─── Helpers ────────────────────────────────────────────────────────

/// Fast simulation: short delays, fast joints, short sequence timings.
fn sim_config(simulation: &str) -> BootConfig {
    let text = format!(
        r#"
connect_timeout_ms = 1000
enable_timeout_ms = 1000
home_timeout_ms = 2000
status_poll_interval_ms = 5
motion_speed_percent = 100
target_joints = [-90000, 0, 0, 0, 0, 0]

[tuning]
settle_after_connect_ms = 0
firmware_query_delay_ms = 0
reset_settle_ms = 0
enable_fast_poll_interval_ms = 1
enable_fast_poll_attempts = 5
mode_settle_ms = 0
home_retry_backoff_ms = 0

[driver_config.simulation]
link_delay_ms = 10
enable_delay_ms = 10
max_joint_speed_mdeg_s = 1800000
{simulation}
"#
    );
    toml::from_str(&text).expect("valid test config")
}

/// Replacement `[driver_config.simulation]` table.
fn sim_section(text: &str) -> toml::Value {
    toml::Value::Table(text.parse::<toml::Table>().expect("valid table"))
}

fn run_simulated(config: BootConfig, shutdown: ShutdownSignal) -> RunOutcome {
    let registry = DeviceRegistry::with_builtin_devices();
    let sequencer = BootSequencer::new(config, shutdown).expect("valid config");
    sequencer.run(|config| registry.create_device("simulation", config))
}

// ─── Runs ───────────────────────────────────────────────────────────

#[test]
fn test_simulated_boot_succeeds() {
    let outcome = run_simulated(sim_config(""), ShutdownSignal::new());
    assert_eq!(outcome, Ok(()));
    assert_eq!(exit_code(&outcome), 0);
}

#[test]
fn test_simulated_fault_cleared_by_reset() {
    let outcome = run_simulated(sim_config("fault_code = 4"), ShutdownSignal::new());
    assert_eq!(outcome, Ok(()));
}

#[test]
fn test_simulated_persistent_fault() {
    let outcome = run_simulated(
        sim_config("fault_code = 4\nfault_survives_reset = true"),
        ShutdownSignal::new(),
    );
    assert_eq!(outcome, Err(InitError::ArmError(4)));
    assert_eq!(exit_code(&outcome), 9);
}

#[test]
fn test_simulated_link_too_slow() {
    let mut config = sim_config("");
    config.connect_timeout_ms = 20;
    config.driver_config.insert(
        "simulation".to_string(),
        sim_section("link_delay_ms = 60000"),
    );

    let outcome = run_simulated(config, ShutdownSignal::new());
    assert!(matches!(outcome, Err(InitError::ConnectFailed(_))));
}

#[test]
fn test_simulated_slow_arm_fails_homing() {
    let mut config = sim_config("");
    config.home_timeout_ms = 20;
    config.home_retry_count = 1;
    config.driver_config.insert(
        "simulation".to_string(),
        sim_section("link_delay_ms = 0\nenable_delay_ms = 0\nmax_joint_speed_mdeg_s = 1000"),
    );

    let outcome = run_simulated(config, ShutdownSignal::new());
    assert_eq!(outcome, Err(InitError::HomeFailed { attempts: 2 }));
}

#[test]
fn test_simulated_start_near_target() {
    let outcome = run_simulated(
        sim_config("initial_joints = [-89500, 300, 0, 0, 0, 0]"),
        ShutdownSignal::new(),
    );
    assert_eq!(outcome, Ok(()));
}

#[test]
fn test_simulated_interrupted() {
    let mut config = sim_config("");
    config.enable_timeout_ms = 60_000;
    config.driver_config.insert(
        "simulation".to_string(),
        sim_section("link_delay_ms = 0\nenable_delay_ms = 60000"),
    );

    let shutdown = ShutdownSignal::new();
    let handle = shutdown.clone();
    let trigger = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        handle.request_shutdown();
    });

    let outcome = run_simulated(config, shutdown);
    trigger.join().expect("trigger thread");
    assert_eq!(outcome, Err(InitError::SignalInterrupted));
    assert_eq!(exit_code(&outcome), 7);
}

#[test]
fn test_unknown_backend_is_can_open_failed() {
    let registry = DeviceRegistry::with_builtin_devices();
    let sequencer = BootSequencer::new(sim_config(""), ShutdownSignal::new()).unwrap();
    let outcome = sequencer.run(|config| registry.create_device("piper_can", config));

    assert!(matches!(&outcome, Err(InitError::CanOpenFailed(msg)) if msg.contains("piper_can")));
    assert_eq!(exit_code(&outcome), 1);
}

#[test]
fn test_bad_simulation_section_is_can_open_failed() {
    let outcome = run_simulated(sim_config("warp_drive = true"), ShutdownSignal::new());
    assert!(matches!(outcome, Err(InitError::CanOpenFailed(_))));
}
