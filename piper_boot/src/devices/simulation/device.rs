//! Simulated Piper arm.
//!
//! `SimulatedArm` implements `ArmDevice` without hardware. State is derived
//! from timestamps taken when commands arrive:
//!
//! - The link turns live `link_delay_ms` after `connect()`
//! - Motors report enabled `enable_delay_ms` after `enable()`
//! - Joints travel at `max_joint_speed_mdeg_s` scaled by the motion speed
//!
//! A configured fault blocks enable and motion until a reset clears it.

use super::motion::JointMotion;
use super::settings::SimulationSettings;
use piper_common::consts::{CTRL_MODE_CAN_COMMAND, JOINT_COUNT, MAX_SPEED_PERCENT};
use piper_common::device::{
    ArmDevice, ArmStatus, ConnectOptions, ConnectStatus, DeviceError, MotionModeCommand,
};
use std::time::Instant;
use tracing::{debug, info};

/// Software model of the arm behind one CAN interface.
pub struct SimulatedArm {
    /// CAN interface name the arm is bound to
    interface: String,
    /// Behaviour settings
    settings: SimulationSettings,
    /// Time `connect()` succeeded
    connected_at: Option<Instant>,
    /// Time the enable command was accepted
    enable_requested_at: Option<Instant>,
    /// Active error code
    error_code: u16,
    /// Active control mode (0 = standby)
    control_mode: u8,
    /// Speed of the next move [%]
    speed_percent: u8,
    /// Firmware version was requested
    firmware_requested: bool,
    /// Current joint motion
    motion: JointMotion,
}

impl SimulatedArm {
    /// Create a disconnected arm on `interface`.
    pub fn new(interface: &str, settings: SimulationSettings) -> Self {
        let motion = JointMotion::hold(settings.initial_joints, Instant::now());
        Self {
            interface: interface.to_string(),
            error_code: settings.fault_code,
            settings,
            connected_at: None,
            enable_requested_at: None,
            control_mode: 0,
            speed_percent: 0,
            firmware_requested: false,
            motion,
        }
    }

    /// CAN interface name.
    pub fn interface(&self) -> &str {
        &self.interface
    }

    fn link_live(&self) -> bool {
        self.connect_status().is_live()
    }

    fn require_link(&self) -> Result<(), DeviceError> {
        if self.link_live() {
            Ok(())
        } else {
            Err(DeviceError::NotConnected)
        }
    }

    fn positions_now(&self) -> [i32; JOINT_COUNT] {
        self.motion.positions_at(Instant::now())
    }

    fn hold_position(&mut self) {
        let now = Instant::now();
        self.motion = JointMotion::hold(self.motion.positions_at(now), now);
    }

    fn joint_speed_mdeg_s(&self) -> u32 {
        let scaled =
            u64::from(self.settings.max_joint_speed_mdeg_s) * u64::from(self.speed_percent) / 100;
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }
}

impl ArmDevice for SimulatedArm {
    fn name(&self) -> &'static str {
        super::DEVICE_NAME
    }

    fn connect(&mut self, options: &ConnectOptions) -> Result<(), DeviceError> {
        if self.interface.is_empty() {
            return Err(DeviceError::Transport("no CAN interface given".to_string()));
        }
        if self.connected_at.is_none() {
            self.connected_at = Some(Instant::now());
        }
        debug!(
            "Simulated arm on {} connecting (feedback poll {:?}, handshake: {}, reader: {})",
            self.interface, options.feedback_poll, options.init_handshake, options.start_reader
        );
        Ok(())
    }

    fn connect_status(&self) -> ConnectStatus {
        match self.connected_at {
            Some(at) => ConnectStatus {
                connected: true,
                stale: at.elapsed() < self.settings.link_delay(),
            },
            None => ConnectStatus::default(),
        }
    }

    fn request_firmware_version(&mut self) {
        if self.link_live() {
            self.firmware_requested = true;
        }
    }

    fn firmware_version(&self) -> Option<String> {
        (self.firmware_requested && self.link_live()).then(|| self.settings.firmware_version.clone())
    }

    fn arm_status(&self) -> Option<ArmStatus> {
        if !self.link_live() {
            return None;
        }
        Some(ArmStatus {
            error_code: self.error_code,
            enabled: self.is_enabled(),
            control_mode: self.control_mode,
            joint_positions: self.positions_now(),
        })
    }

    fn reset(&mut self) {
        if !self.link_live() {
            return;
        }
        if !self.settings.fault_survives_reset {
            self.error_code = 0;
        }
        self.enable_requested_at = None;
        self.control_mode = 0;
        self.hold_position();
        info!("Simulated arm reset, error code now {}", self.error_code);
    }

    fn enable(&mut self, motors: u8) -> Result<(), DeviceError> {
        self.require_link()?;
        if self.error_code != 0 {
            return Err(DeviceError::Rejected(format!(
                "arm in error {}",
                self.error_code
            )));
        }
        if self.enable_requested_at.is_none() {
            self.enable_requested_at = Some(Instant::now());
        }
        debug!("Simulated enable for motors {:#04x}", motors);
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.error_code == 0
            && self.link_live()
            && self
                .enable_requested_at
                .is_some_and(|at| at.elapsed() >= self.settings.enable_delay())
    }

    fn set_motion_mode(&mut self, command: &MotionModeCommand) -> Result<(), DeviceError> {
        self.require_link()?;
        if command.speed_percent == 0 || command.speed_percent > MAX_SPEED_PERCENT {
            return Err(DeviceError::Rejected(format!(
                "speed {}% out of range",
                command.speed_percent
            )));
        }
        self.control_mode = command.ctrl_mode;
        self.speed_percent = command.speed_percent;
        Ok(())
    }

    fn move_joints(&mut self, targets: &[i32]) -> Result<(), DeviceError> {
        self.require_link()?;
        let target: [i32; JOINT_COUNT] = targets.try_into().map_err(|_| {
            DeviceError::Rejected(format!(
                "expected {JOINT_COUNT} joint targets, got {}",
                targets.len()
            ))
        })?;
        if !self.is_enabled() {
            return Err(DeviceError::Rejected("motors not enabled".to_string()));
        }
        if self.control_mode != CTRL_MODE_CAN_COMMAND {
            return Err(DeviceError::Rejected(format!(
                "control mode {:#04x} does not accept CAN motion",
                self.control_mode
            )));
        }

        let now = Instant::now();
        let start = self.motion.positions_at(now);
        self.motion = JointMotion::toward(start, target, self.joint_speed_mdeg_s(), now);
        debug!("Simulated move from {:?} to {:?}", start, target);
        Ok(())
    }
}
