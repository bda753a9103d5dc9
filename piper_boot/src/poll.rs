//! Deadline-bounded, cancellable polling.
//!
//! Every wait in the boot sequence is a sleep-then-repoll loop: the
//! deadline is computed once on entry from the monotonic clock, the
//! shutdown flag is checked on every iteration, and the loop never blocks
//! longer than one poll interval.

use piper_common::shutdown::ShutdownSignal;
use std::thread;
use std::time::{Duration, Instant};

/// Absolute point in monotonic time after which a wait gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
        }
    }

    /// Returns true once the deadline has passed.
    pub fn expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Time left, zero once expired.
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }
}

/// Result of a poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// The probe produced a value.
    Ready(T),
    /// Deadline passed or attempts ran out.
    Exhausted,
    /// Shutdown was requested.
    Cancelled,
}

/// Sleep-then-repoll loop with a fixed interval.
#[derive(Debug, Clone, Copy)]
pub struct Poller<'a> {
    shutdown: &'a ShutdownSignal,
    interval: Duration,
}

impl<'a> Poller<'a> {
    /// Create a poller that sleeps `interval` between probes.
    pub fn new(shutdown: &'a ShutdownSignal, interval: Duration) -> Self {
        Self { shutdown, interval }
    }

    /// Probe until it returns `Some`, `timeout` elapses, or shutdown is requested.
    ///
    /// Each iteration checks the shutdown flag first, then the probe, then
    /// sleeps the interval (clamped to the time left). A shutdown that
    /// arrives during the last sleep still wins over `Exhausted`.
    pub fn until_deadline<T>(
        &self,
        timeout: Duration,
        mut probe: impl FnMut() -> Option<T>,
    ) -> PollOutcome<T> {
        let deadline = Deadline::after(timeout);

        while !deadline.expired() {
            if self.shutdown.is_shutdown_requested() {
                return PollOutcome::Cancelled;
            }
            if let Some(value) = probe() {
                return PollOutcome::Ready(value);
            }
            thread::sleep(self.interval.min(deadline.remaining()));
        }

        self.exhausted()
    }

    /// Probe at most `attempts` times, sleeping the interval after each miss.
    pub fn for_attempts<T>(
        &self,
        attempts: u32,
        mut probe: impl FnMut() -> Option<T>,
    ) -> PollOutcome<T> {
        for _ in 0..attempts {
            if self.shutdown.is_shutdown_requested() {
                return PollOutcome::Cancelled;
            }
            if let Some(value) = probe() {
                return PollOutcome::Ready(value);
            }
            thread::sleep(self.interval);
        }

        self.exhausted()
    }

    fn exhausted<T>(&self) -> PollOutcome<T> {
        if self.shutdown.is_shutdown_requested() {
            PollOutcome::Cancelled
        } else {
            PollOutcome::Exhausted
        }
    }
}
