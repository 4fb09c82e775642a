//! Bench configuration parameters
//!
//! Fixed constants for one pressure-step run. The firmware builds the default
//! configuration once at boot; nothing changes it afterwards.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Core bench configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigConfig {
    // --- Range ---
    /// Number of pressure steps in one run
    pub step_count: u8,
    /// Highest pressure level the operator may dial in
    pub max_level: u8,
    /// Pressure level that maps to a full-scale (1.0) command
    pub command_full_scale: f32,

    // --- Timing ---
    /// Hold after registering an increment/decrement press (milliseconds)
    pub debounce_ms: u32,
    /// Valve-open hold before sampling (milliseconds)
    pub actuation_dwell_ms: u32,
    /// Vent hold before the next step (milliseconds)
    pub vent_dwell_ms: u32,
    /// How long the startup banner stays on the display (milliseconds)
    pub banner_hold_ms: u32,
    /// Yield between polls while waiting for the operator (milliseconds)
    pub idle_poll_ms: u32,

    // --- Storage ---
    /// Result log for sensor channel A
    pub log_path_a: String,
    /// Result log for sensor channel B
    pub log_path_b: String,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            // Range
            step_count: 26,
            max_level: 26,
            command_full_scale: 33.0, // 3.3 V output span, 10 psi per volt

            // Timing
            debounce_ms: 200,
            actuation_dwell_ms: 10_000,
            vent_dwell_ms: 2_000,
            banner_hold_ms: 1_000,
            idle_poll_ms: 10,

            // Storage
            log_path_a: String::from("/local/test1_.txt"),
            log_path_b: String::from("/local/test2_.txt"),
        }
    }
}

impl RigConfig {
    /// Reject combinations the sequencer cannot run with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.step_count == 0 {
            return Err(Error::Config("step_count must be at least 1"));
        }
        if self.command_full_scale <= 0.0 || !self.command_full_scale.is_finite() {
            return Err(Error::Config("command_full_scale must be positive"));
        }
        if f32::from(self.max_level) > self.command_full_scale {
            return Err(Error::Config("max_level exceeds command full-scale"));
        }
        if self.log_path_a == self.log_path_b {
            return Err(Error::Config("channel logs must use distinct paths"));
        }
        Ok(())
    }

    /// Config with every hold shortened to zero, for simulation runs.
    pub fn without_dwells(mut self) -> Self {
        self.debounce_ms = 0;
        self.actuation_dwell_ms = 0;
        self.vent_dwell_ms = 0;
        self.banner_hold_ms = 0;
        self.idle_poll_ms = 0;
        self
    }
}
