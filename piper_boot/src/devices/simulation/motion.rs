//! Joint motion model.
//!
//! Every joint travels toward its target at the same constant speed and
//! stops on arrival. Positions are derived from the elapsed time, so the
//! model needs no update loop.

use piper_common::consts::JOINT_COUNT;
use std::time::{Duration, Instant};

/// A joint-space move in progress (or a hold, when start equals target).
#[derive(Debug, Clone, Copy)]
pub struct JointMotion {
    /// Positions at `started_at` [mdeg]
    start: [i32; JOINT_COUNT],
    /// Target positions [mdeg]
    target: [i32; JOINT_COUNT],
    /// Per-joint speed [mdeg/s]
    speed_mdeg_s: u32,
    /// Time the move began
    started_at: Instant,
}

impl JointMotion {
    /// Hold `positions` without moving.
    pub fn hold(positions: [i32; JOINT_COUNT], now: Instant) -> Self {
        Self {
            start: positions,
            target: positions,
            speed_mdeg_s: 0,
            started_at: now,
        }
    }

    /// Start a move from `start` toward `target` at `speed_mdeg_s`.
    pub fn toward(
        start: [i32; JOINT_COUNT],
        target: [i32; JOINT_COUNT],
        speed_mdeg_s: u32,
        now: Instant,
    ) -> Self {
        Self {
            start,
            target,
            speed_mdeg_s,
            started_at: now,
        }
    }

    /// Target positions [mdeg].
    pub fn target(&self) -> [i32; JOINT_COUNT] {
        self.target
    }

    /// Joint positions at `now` [mdeg].
    pub fn positions_at(&self, now: Instant) -> [i32; JOINT_COUNT] {
        let elapsed = now.saturating_duration_since(self.started_at);
        let travel = travel_mdeg(self.speed_mdeg_s, elapsed);

        let mut positions = self.start;
        for (pos, (&start, &target)) in positions.iter_mut().zip(self.start.iter().zip(&self.target)) {
            let delta = i64::from(target) - i64::from(start);
            let step = delta.clamp(-travel, travel);
            // |step| <= |delta|, so start + step stays between start and target.
            *pos = (i64::from(start) + step) as i32;
        }
        positions
    }

    /// Returns true once every joint has reached its target at `now`.
    pub fn is_settled_at(&self, now: Instant) -> bool {
        self.positions_at(now) == self.target
    }
}

fn travel_mdeg(speed_mdeg_s: u32, elapsed: Duration) -> i64 {
    let travel = u128::from(speed_mdeg_s) * elapsed.as_millis() / 1_000;
    i64::try_from(travel).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: [i32; JOINT_COUNT] = [0; JOINT_COUNT];

    #[test]
    fn test_hold_never_moves() {
        let now = Instant::now();
        let motion = JointMotion::hold([100, -200, 0, 0, 0, 0], now);
        assert_eq!(
            motion.positions_at(now + Duration::from_secs(60)),
            [100, -200, 0, 0, 0, 0]
        );
        assert!(motion.is_settled_at(now));
    }

    #[test]
    fn test_constant_speed_travel() {
        let now = Instant::now();
        let target = [-90_000, 10_000, 0, 0, 0, 0];
        let motion = JointMotion::toward(T0, target, 20_000, now);

        assert_eq!(motion.positions_at(now), T0);
        assert_eq!(
            motion.positions_at(now + Duration::from_millis(250)),
            [-5_000, 5_000, 0, 0, 0, 0]
        );
        assert_eq!(
            motion.positions_at(now + Duration::from_secs(1)),
            [-20_000, 10_000, 0, 0, 0, 0]
        );
        assert!(!motion.is_settled_at(now + Duration::from_secs(1)));
    }

    #[test]
    fn test_stops_at_target() {
        let now = Instant::now();
        let target = [-90_000, 0, 0, 0, 0, 0];
        let motion = JointMotion::toward(T0, target, 30_000, now);

        assert_eq!(motion.positions_at(now + Duration::from_secs(3)), target);
        assert_eq!(motion.positions_at(now + Duration::from_secs(100)), target);
        assert!(motion.is_settled_at(now + Duration::from_secs(3)));
    }

    #[test]
    fn test_time_before_start_is_start() {
        let now = Instant::now();
        let later = now + Duration::from_secs(1);
        let motion = JointMotion::toward(T0, [1_000; JOINT_COUNT], 1_000, later);
        assert_eq!(motion.positions_at(now), T0);
    }

    #[test]
    fn test_extreme_span_does_not_overflow() {
        let now = Instant::now();
        let start = [i32::MIN; JOINT_COUNT];
        let target = [i32::MAX; JOINT_COUNT];
        let motion = JointMotion::toward(start, target, u32::MAX, now);
        assert_eq!(motion.positions_at(now + Duration::from_secs(2)), target);
    }
}
