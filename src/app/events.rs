//! Outbound rig events.
//!
//! The [`TestSequencer`](super::sequencer::TestSequencer) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them.

use crate::error::{HwError, StorageError};

use super::pressure::{CommandValue, PressureLevel};
use super::sequencer::StepPhase;

/// One completed step as written to the result logs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRecord {
    /// Zero-based step index within the run.
    pub step: u8,
    /// Level frozen at advance time and used for commanding and logging.
    pub level: PressureLevel,
    pub command: CommandValue,
    pub sample_a: f32,
    pub sample_b: f32,
}

/// Summary returned when a run finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunReport {
    pub steps_completed: u8,
    pub hardware_faults: u32,
    pub storage_faults: u32,
}

impl RunReport {
    /// Whether the run finished without any I/O failure.
    pub fn is_clean(&self) -> bool {
        self.hardware_faults == 0 && self.storage_faults == 0
    }
}

/// Structured events emitted by the sequencer.
#[derive(Debug, Clone, PartialEq)]
pub enum RigEvent {
    /// The run has started (carries the configured step count).
    Started { steps: u8 },

    /// The step state machine moved between phases.
    PhaseChanged {
        step: u8,
        from: StepPhase,
        to: StepPhase,
    },

    /// The operator changed the pending pressure level.
    LevelAdjusted { level: PressureLevel },

    /// The advance latch was consumed; `level` is frozen for this step.
    AdvanceConsumed { step: u8, level: PressureLevel },

    /// Both channels were sampled and appended.
    StepLogged(StepRecord),

    /// A peripheral read or write failed; the run continued.
    HardwareFault {
        step: u8,
        phase: StepPhase,
        error: HwError,
    },

    /// A result-log operation failed; the run continued.
    StorageFault { step: u8, error: StorageError },

    /// Logs are closed and the run is over.
    RunComplete(RunReport),
}
