//! Pressure levels and the linear level → command mapping.
//!
//! A [`PressureLevel`] is the operator-facing integer step (nominally psi).
//! The proportional regulator takes a normalised [`CommandValue`]; one level
//! unit is 0.1 V on a 3.3 V output span, so `command = level / 33`.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Nominal top of the test range.
pub const NOMINAL_MAX_LEVEL: u8 = 25;
/// Highest level the adjuster will saturate at (one beyond nominal).
pub const LEVEL_CEILING: u8 = 26;
/// Level that maps to a full-scale command of 1.0.
pub const FULL_SCALE_LEVEL: f32 = 33.0;

/// Operator-adjustable pressure step, saturating in `[0, ceiling]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct PressureLevel(u8);

impl PressureLevel {
    pub const ZERO: Self = Self(0);

    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// One step up, saturating at `ceiling`.
    #[must_use]
    pub fn raised(self, ceiling: u8) -> Self {
        Self(self.0.saturating_add(1).min(ceiling))
    }

    /// One step down, saturating at zero.
    #[must_use]
    pub fn lowered(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl fmt::Display for PressureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u8> for PressureLevel {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

/// Normalised regulator command in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct CommandValue(f32);

impl CommandValue {
    pub const OFF: Self = Self(0.0);

    /// Clamps into the valid output range; NaN becomes off.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::OFF;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub const fn get(self) -> f32 {
        self.0
    }
}

impl fmt::Display for CommandValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// Linear pressure mapper with a configurable full-scale level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureMapper {
    full_scale: f32,
}

impl PressureMapper {
    pub const fn new(full_scale: f32) -> Self {
        Self { full_scale }
    }

    /// `level / full_scale`. Total over `[0, full_scale]`; inputs above that
    /// are prevented upstream by the adjuster's ceiling.
    pub fn map(&self, level: PressureLevel) -> CommandValue {
        CommandValue::new(f32::from(level.get()) / self.full_scale)
    }
}

impl Default for PressureMapper {
    fn default() -> Self {
        Self::new(FULL_SCALE_LEVEL)
    }
}

/// Maps with the standard 33-unit full scale.
pub fn map(level: PressureLevel) -> CommandValue {
    PressureMapper::default().map(level)
}
