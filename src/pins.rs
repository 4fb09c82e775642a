//! GPIO / peripheral pin assignments for the finger bench controller.
//!
//! Single source of truth. Every driver references this module rather than
//! hard-coding pin numbers. Targets the classic ESP32, which carries the
//! on-chip DAC the pressure regulator is driven from.

// ---------------------------------------------------------------------------
// Pressure regulator command (DAC)
// ---------------------------------------------------------------------------

/// DAC channel 0 is hard-wired to GPIO 25 on the ESP32.
pub const REGULATOR_DAC_GPIO: i32 = 25;
/// 8-bit DAC output: 255 = full-scale (≈3.3 V).
pub const DAC_FULL_SCALE: u8 = 255;

// ---------------------------------------------------------------------------
// Flex sensors (ADC1)
// ---------------------------------------------------------------------------

/// Sensor A, ADC1 channel 0 (GPIO 36 / SENSOR_VP).
pub const SENSOR_A_GPIO: i32 = 36;
pub const SENSOR_A_ADC_CHANNEL: u32 = 0;
/// Sensor B, ADC1 channel 3 (GPIO 39 / SENSOR_VN).
pub const SENSOR_B_GPIO: i32 = 39;
pub const SENSOR_B_ADC_CHANNEL: u32 = 3;
/// 12-bit conversion: full-scale raw reading.
pub const ADC_FULL_SCALE: u16 = 4095;

// ---------------------------------------------------------------------------
// Actuation
// ---------------------------------------------------------------------------

/// Solenoid valve driver (active HIGH through a MOSFET).
pub const VALVE_GPIO: i32 = 27;

// ---------------------------------------------------------------------------
// Operator panel (buttons active HIGH with external pull-downs)
// ---------------------------------------------------------------------------

/// Raise the pending pressure level.
pub const INCREMENT_GPIO: i32 = 32;
/// Lower the pending pressure level.
pub const DECREMENT_GPIO: i32 = 33;
/// Advance to the next step. Input-only pin, rising-edge interrupt.
pub const ADVANCE_GPIO: i32 = 34;
/// "Ready for next step" lamp.
pub const READY_LED_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// 16x2 character LCD (HD44780, 4-bit bus, write-only)
// ---------------------------------------------------------------------------

pub const LCD_RS_GPIO: i32 = 19;
pub const LCD_EN_GPIO: i32 = 18;
pub const LCD_D4_GPIO: i32 = 5;
pub const LCD_D5_GPIO: i32 = 17;
pub const LCD_D6_GPIO: i32 = 16;
pub const LCD_D7_GPIO: i32 = 4;
