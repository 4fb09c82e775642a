//! Port traits: the hexagonal boundary between domain logic and the bench.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ TestSequencer (domain)
//! ```
//!
//! Driven adapters (analog I/O, valve, operator panel, display, result files,
//! event sinks) implement these traits. The
//! [`TestSequencer`](super::sequencer::TestSequencer) consumes them via
//! generics, so the domain core never touches hardware directly.
//!
//! Hardware and storage ports are fallible so tests can inject failures;
//! the sequencer decides what a failure means (see `sequencer`). The status
//! port is fire-and-forget.

use crate::error::{HwError, StorageError};

use super::events::RigEvent;
use super::pressure::{CommandValue, PressureLevel};

// ───────────────────────────────────────────────────────────────
// Sensor channels
// ───────────────────────────────────────────────────────────────

/// The two flex-sensor inputs sampled at every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorChannel {
    A,
    B,
}

impl SensorChannel {
    pub const ALL: [SensorChannel; 2] = [SensorChannel::A, SensorChannel::B];

    /// 1-based channel number used in log file names and display labels.
    pub const fn number(self) -> u8 {
        match self {
            SensorChannel::A => 1,
            SensorChannel::B => 2,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Hardware ports (driven adapters: domain ↔ bench I/O)
// ───────────────────────────────────────────────────────────────

/// Analog output feeding the proportional pressure regulator.
pub trait CommandOutput {
    fn write_command(&mut self, value: CommandValue) -> Result<(), HwError>;
}

/// Analog sensor inputs, normalised to the ADC's native `[0, 1]` range.
pub trait SensorInput {
    fn read_sensor(&mut self, channel: SensorChannel) -> Result<f32, HwError>;
}

/// Solenoid valve that pressurises the actuator while open.
pub trait ValveOutput {
    fn set_valve(&mut self, open: bool) -> Result<(), HwError>;
}

/// Operator buttons (level-sampled) and the "ready for next step" lamp.
///
/// The advance button is edge-triggered and does not go through this port:
/// its ISR feeds the [`AdvanceLatch`](super::latch::AdvanceLatch).
pub trait OperatorPanel {
    fn increment_active(&mut self) -> Result<bool, HwError>;

    fn decrement_active(&mut self) -> Result<bool, HwError>;

    fn set_ready_indicator(&mut self, on: bool) -> Result<(), HwError>;
}

/// Everything the sequencer drives on the bench itself.
pub trait BenchPort: CommandOutput + SensorInput + ValveOutput + OperatorPanel {}

impl<T> BenchPort for T where T: CommandOutput + SensorInput + ValveOutput + OperatorPanel {}

// ───────────────────────────────────────────────────────────────
// Status presenter (driven adapter: domain → operator display)
// ───────────────────────────────────────────────────────────────

/// Operator-facing status display. Fire-and-forget: adapters log and
/// swallow their own failures.
pub trait StatusPort {
    fn show_startup_banner(&mut self);

    fn show_pending_pressure(&mut self, level: PressureLevel);

    fn show_results_pending(&mut self);

    fn show_results(&mut self, sample_a: f32, sample_b: f32);
}

// ───────────────────────────────────────────────────────────────
// Result log (driven adapter: domain → persistent storage)
// ───────────────────────────────────────────────────────────────

/// Two append-only result logs, one per sensor channel.
///
/// Implementations create their targets fresh for each run. `close` is
/// called exactly once, at the end of the run; appends after that fail
/// with [`StorageError::Closed`].
pub trait ResultLog {
    fn append(
        &mut self,
        channel: SensorChannel,
        level: PressureLevel,
        sample: f32,
    ) -> Result<(), StorageError>;

    fn close(&mut self) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`RigEvent`]s through this port. Adapters
/// decide where they go (serial log, test recorder, ...).
pub trait EventSink {
    fn emit(&mut self, event: &RigEvent);
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &RigEvent) {}
}
