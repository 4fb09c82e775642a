//! Analog I/O drivers: ADC1 sensor channels and the regulator DAC.
//!
//! Both sides work in normalised units. Sensors report `[0.0, 1.0]` of the
//! ADC's 12-bit span; the DAC takes `[0.0, 1.0]` of its 8-bit span.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: oneshot conversions via hw_init helpers.
//! On host/test: the hw_init simulation register file.

use crate::drivers::hw_init;
use crate::error::HwError;
use crate::pins;

/// Normalised analog input.
pub trait AnalogIn {
    fn read_normalized(&mut self) -> Result<f32, HwError>;
}

/// Normalised analog output.
pub trait AnalogOut {
    fn write_normalized(&mut self, value: f32) -> Result<(), HwError>;
}

/// Raw 12-bit reading → `[0.0, 1.0]`.
pub fn raw_to_unit(raw: u16) -> f32 {
    f32::from(raw.min(pins::ADC_FULL_SCALE)) / f32::from(pins::ADC_FULL_SCALE)
}

/// `[0.0, 1.0]` → nearest 8-bit DAC code. Out-of-range input is clamped.
pub fn unit_to_dac(value: f32) -> u8 {
    let clamped = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    (clamped * f32::from(pins::DAC_FULL_SCALE)).round() as u8
}

// ── ADC ───────────────────────────────────────────────────────

/// One ADC1 oneshot channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdcChannel {
    channel: u32,
}

impl AdcChannel {
    pub const fn new(channel: u32) -> Self {
        Self { channel }
    }

    pub const fn sensor_a() -> Self {
        Self::new(pins::SENSOR_A_ADC_CHANNEL)
    }

    pub const fn sensor_b() -> Self {
        Self::new(pins::SENSOR_B_ADC_CHANNEL)
    }

    pub const fn channel(&self) -> u32 {
        self.channel
    }
}

impl AnalogIn for AdcChannel {
    fn read_normalized(&mut self) -> Result<f32, HwError> {
        hw_init::adc1_read(self.channel).map(raw_to_unit)
    }
}

// ── DAC ───────────────────────────────────────────────────────

/// The regulator command output on DAC channel 0.
#[derive(Debug, Default)]
pub struct DacChannel {
    code: u8,
}

impl DacChannel {
    pub const fn new() -> Self {
        Self { code: 0 }
    }

    /// Last code successfully written.
    pub fn code(&self) -> u8 {
        self.code
    }
}

impl AnalogOut for DacChannel {
    fn write_normalized(&mut self, value: f32) -> Result<(), HwError> {
        let code = unit_to_dac(value);
        hw_init::dac_write(code)?;
        self.code = code;
        Ok(())
    }
}
