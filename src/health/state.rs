//! Volume health state machine.
//!
//! # States
//! - Unknown: no probe has concluded yet, treated as healthy
//! - Healthy: IO on the volume works
//! - Unhealthy: IO on the volume fails, requests are refused
//!
//! # State Transitions
//! ```text
//! {Unknown, Healthy} → Unhealthy: consecutive failures >= unhealthy_threshold
//! {Unknown, Unhealthy} → Healthy: consecutive successes >= healthy_threshold
//! ```

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use crate::health::HealthCheck;

/// Health State enum.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Unknown = 0,
    Healthy = 1,
    Unhealthy = 2,
}

impl From<u8> for HealthState {
    fn from(val: u8) -> Self {
        match val {
            1 => HealthState::Healthy,
            2 => HealthState::Unhealthy,
            _ => HealthState::Unknown,
        }
    }
}

/// IO health of the node's volume, shared between the probe and handlers.
#[derive(Debug)]
pub struct IoHealth {
    state: AtomicU8,
    consecutive_failures: AtomicUsize,
    consecutive_successes: AtomicUsize,
    healthy_threshold: usize,
    unhealthy_threshold: usize,
}

impl IoHealth {
    pub fn new(healthy_threshold: u32, unhealthy_threshold: u32) -> Self {
        Self {
            state: AtomicU8::new(HealthState::Unknown as u8),
            consecutive_failures: AtomicUsize::new(0),
            consecutive_successes: AtomicUsize::new(0),
            healthy_threshold: healthy_threshold.max(1) as usize,
            unhealthy_threshold: unhealthy_threshold.max(1) as usize,
        }
    }

    pub fn state(&self) -> HealthState {
        HealthState::from(self.state.load(Ordering::Relaxed))
    }

    /// Report a successful probe. Returns true on a transition to Healthy.
    pub fn mark_success(&self) -> bool {
        self.consecutive_failures.store(0, Ordering::Relaxed);

        if self.state() == HealthState::Healthy {
            return false;
        }

        let successes = self.consecutive_successes.fetch_add(1, Ordering::Relaxed) + 1;
        if successes >= self.healthy_threshold {
            self.state.store(HealthState::Healthy as u8, Ordering::Relaxed);
            self.consecutive_successes.store(0, Ordering::Relaxed);
            return true;
        }
        false
    }

    /// Report a failed probe. Returns true on a transition to Unhealthy.
    pub fn mark_failure(&self) -> bool {
        self.consecutive_successes.store(0, Ordering::Relaxed);

        if self.state() == HealthState::Unhealthy {
            return false;
        }

        let failures = self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
        if failures >= self.unhealthy_threshold {
            self.state.store(HealthState::Unhealthy as u8, Ordering::Relaxed);
            self.consecutive_failures.store(0, Ordering::Relaxed);
            return true;
        }
        false
    }
}

impl HealthCheck for IoHealth {
    fn is_io_ok(&self) -> bool {
        self.state() != HealthState::Unhealthy
    }
}
