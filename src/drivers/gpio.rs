//! Plain GPIO pins behind the `embedded-hal` digital traits.
//!
//! The pins are configured once by [`hw_init`](super::hw_init); these
//! wrappers only carry the pin number and drive or sample it.

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::drivers::hw_init;
use crate::error::HwError;

/// Push-pull output configured in `hw_init`.
#[derive(Debug)]
pub struct GpioOutput {
    pin: i32,
}

impl GpioOutput {
    pub const fn new(pin: i32) -> Self {
        Self { pin }
    }

    pub const fn pin(&self) -> i32 {
        self.pin
    }
}

impl ErrorType for GpioOutput {
    type Error = HwError;
}

impl OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), HwError> {
        hw_init::gpio_write(self.pin, false)
    }

    fn set_high(&mut self) -> Result<(), HwError> {
        hw_init::gpio_write(self.pin, true)
    }
}

/// Input configured in `hw_init`. Active HIGH.
#[derive(Debug)]
pub struct GpioInput {
    pin: i32,
}

impl GpioInput {
    pub const fn new(pin: i32) -> Self {
        Self { pin }
    }

    pub const fn pin(&self) -> i32 {
        self.pin
    }
}

impl ErrorType for GpioInput {
    type Error = HwError;
}

impl InputPin for GpioInput {
    fn is_high(&mut self) -> Result<bool, HwError> {
        Ok(hw_init::gpio_read(self.pin))
    }

    fn is_low(&mut self) -> Result<bool, HwError> {
        Ok(!hw_init::gpio_read(self.pin))
    }
}
