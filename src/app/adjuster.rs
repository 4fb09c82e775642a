//! Debounced step adjuster.
//!
//! While the sequencer waits for the advance button, it calls
//! [`StepAdjuster::poll`] once per loop iteration. Each poll refreshes the
//! pending-pressure display and samples the increment and decrement buttons;
//! an active button moves the level one step and then blocks for the
//! debounce hold so a single press is not counted twice.
//!
//! The level saturates silently at `0` and at the configured ceiling.

use embedded_hal::delay::DelayNs;

use crate::config::RigConfig;
use crate::error::HwError;

use super::ports::{OperatorPanel, StatusPort};
use super::pressure::PressureLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepAdjuster {
    debounce_ms: u32,
    ceiling: u8,
}

impl StepAdjuster {
    pub const fn new(debounce_ms: u32, ceiling: u8) -> Self {
        Self {
            debounce_ms,
            ceiling,
        }
    }

    pub fn from_config(config: &RigConfig) -> Self {
        Self::new(config.debounce_ms, config.max_level)
    }

    pub const fn ceiling(&self) -> u8 {
        self.ceiling
    }

    /// One poll iteration: refresh the display, then apply the increment and
    /// decrement buttons independently (both may fire in the same poll).
    ///
    /// A failed button read aborts the rest of this poll; the next poll
    /// samples again.
    pub fn poll(
        &self,
        level: &mut PressureLevel,
        panel: &mut impl OperatorPanel,
        status: &mut impl StatusPort,
        delay: &mut impl DelayNs,
    ) -> Result<(), HwError> {
        status.show_pending_pressure(*level);

        if panel.increment_active()? {
            *level = level.raised(self.ceiling);
            delay.delay_ms(self.debounce_ms);
        }

        if panel.decrement_active()? {
            *level = level.lowered();
            delay.delay_ms(self.debounce_ms);
        }

        Ok(())
    }
}

impl Default for StepAdjuster {
    fn default() -> Self {
        Self::from_config(&RigConfig::default())
    }
}
