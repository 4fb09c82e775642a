//! Hardware adapter: bridges bench peripherals to domain port traits.
//!
//! Owns the regulator output, both sensor inputs, the valve, the operator
//! buttons and the ready lamp, exposing them through [`CommandOutput`],
//! [`SensorInput`], [`ValveOutput`] and [`OperatorPanel`]. Generic over the
//! driver traits so the same adapter runs on the ESP32 drivers, the host
//! simulation, or test doubles.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{CommandOutput, OperatorPanel, SensorChannel, SensorInput, ValveOutput};
use crate::app::pressure::CommandValue;
use crate::drivers::analog::{AdcChannel, AnalogIn, AnalogOut, DacChannel};
use crate::drivers::gpio::{GpioInput, GpioOutput};
use crate::error::HwError;
use crate::pins;

/// Concrete adapter that combines all bench I/O behind port traits.
pub struct BenchHardware<A, S, O, I> {
    command: A,
    sensor_a: S,
    sensor_b: S,
    valve: O,
    ready: O,
    increment: I,
    decrement: I,
}

/// The ESP32 wiring from [`pins`].
pub type Esp32Bench = BenchHardware<DacChannel, AdcChannel, GpioOutput, GpioInput>;

impl<A, S, O, I> BenchHardware<A, S, O, I> {
    pub fn new(
        command: A,
        sensors: (S, S),
        valve: O,
        ready: O,
        buttons: (I, I),
    ) -> Self {
        Self {
            command,
            sensor_a: sensors.0,
            sensor_b: sensors.1,
            valve,
            ready,
            increment: buttons.0,
            decrement: buttons.1,
        }
    }

    pub fn command_output(&self) -> &A {
        &self.command
    }
}

impl Esp32Bench {
    /// Adapter over the pins configured by `hw_init::init_peripherals`.
    pub fn esp32() -> Self {
        Self::new(
            DacChannel::new(),
            (AdcChannel::sensor_a(), AdcChannel::sensor_b()),
            GpioOutput::new(pins::VALVE_GPIO),
            GpioOutput::new(pins::READY_LED_GPIO),
            (
                GpioInput::new(pins::INCREMENT_GPIO),
                GpioInput::new(pins::DECREMENT_GPIO),
            ),
        )
    }
}

// ── CommandOutput / SensorInput ───────────────────────────────

impl<A: AnalogOut, S, O, I> CommandOutput for BenchHardware<A, S, O, I> {
    fn write_command(&mut self, value: CommandValue) -> Result<(), HwError> {
        self.command.write_normalized(value.get())
    }
}

impl<A, S: AnalogIn, O, I> SensorInput for BenchHardware<A, S, O, I> {
    fn read_sensor(&mut self, channel: SensorChannel) -> Result<f32, HwError> {
        match channel {
            SensorChannel::A => self.sensor_a.read_normalized(),
            SensorChannel::B => self.sensor_b.read_normalized(),
        }
    }
}

// ── ValveOutput / OperatorPanel ───────────────────────────────

impl<A, S, O: OutputPin, I> ValveOutput for BenchHardware<A, S, O, I> {
    fn set_valve(&mut self, open: bool) -> Result<(), HwError> {
        self.valve
            .set_state(open.into())
            .map_err(|_| HwError::GpioWriteFailed)
    }
}

impl<A, S, O: OutputPin, I: InputPin> OperatorPanel for BenchHardware<A, S, O, I> {
    fn increment_active(&mut self) -> Result<bool, HwError> {
        self.increment.is_high().map_err(|_| HwError::GpioReadFailed)
    }

    fn decrement_active(&mut self) -> Result<bool, HwError> {
        self.decrement.is_high().map_err(|_| HwError::GpioReadFailed)
    }

    fn set_ready_indicator(&mut self, on: bool) -> Result<(), HwError> {
        self.ready
            .set_state(on.into())
            .map_err(|_| HwError::GpioWriteFailed)
    }
}
