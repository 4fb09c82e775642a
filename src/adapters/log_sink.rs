//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured rig events to the
//! logger (UART console in production).

use log::{debug, info, warn};

use crate::app::events::RigEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`RigEvent`] as one line.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &RigEvent) {
        match event {
            RigEvent::Started { steps } => {
                info!("START | steps={}", steps);
            }
            RigEvent::PhaseChanged { step, from, to } => {
                debug!("PHASE | step={} | {} -> {}", step, from.name(), to.name());
            }
            RigEvent::LevelAdjusted { level } => {
                info!("LEVEL | pending={}", level);
            }
            RigEvent::AdvanceConsumed { step, level } => {
                info!("ADVANCE | step={} | level={}", step, level);
            }
            RigEvent::StepLogged(r) => {
                info!(
                    "STEP | step={} | level={} | cmd={} | s1={:.6} s2={:.6}",
                    r.step, r.level, r.command, r.sample_a, r.sample_b,
                );
            }
            RigEvent::HardwareFault { step, phase, error } => {
                warn!("FAULT | step={} | phase={} | {}", step, phase.name(), error);
            }
            RigEvent::StorageFault { step, error } => {
                warn!("FAULT | step={} | result log: {}", step, error);
            }
            RigEvent::RunComplete(report) => {
                info!(
                    "DONE | steps={} | hw_faults={} storage_faults={}",
                    report.steps_completed, report.hardware_faults, report.storage_faults,
                );
            }
        }
    }
}
