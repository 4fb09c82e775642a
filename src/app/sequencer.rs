//! Test step sequencer: the pressure-stepping state machine.
//!
//! [`TestSequencer`] owns every bench peripheral for the lifetime of a run
//! and drives one step at a time through:
//!
//! ```text
//!  AWAIT_ADVANCE ──[latch taken]──▶ COMMANDING ──▶ ACTUATING ──[10 s]──▶ SAMPLING
//!        ▲                                                                  │
//!        │                                                                  ▼
//!        └──[steps remain]── VENTING ◀──[2 s]────────────────────────── LOGGING
//!                               │
//!                        [last step]──▶ DONE (logs closed)
//! ```
//!
//! The step counter and the commanded pressure level are separate: a run is
//! always `step_count` steps long, the level starts at zero and is bumped by
//! one after every completed step, and the operator may move it up or down
//! while the sequencer waits for the advance button. Whatever level is
//! pending when the advance is consumed is frozen for that step.
//!
//! I/O failures never stop a run. Each one is logged, emitted as an event
//! and counted in the [`RunReport`]; a failed sensor read is recorded as
//! `0.0`.

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::config::RigConfig;
use crate::error::{HwError, StorageError};

use super::adjuster::StepAdjuster;
use super::events::{RigEvent, RunReport, StepRecord};
use super::latch::AdvanceLatch;
use super::ports::{BenchPort, EventSink, ResultLog, SensorChannel, StatusPort};
use super::pressure::{CommandValue, PressureLevel, PressureMapper};

// ---------------------------------------------------------------------------
// Phase identity
// ---------------------------------------------------------------------------

/// Phases of a single test step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepPhase {
    AwaitAdvance,
    Commanding,
    Actuating,
    Sampling,
    Logging,
    Venting,
    Done,
}

impl StepPhase {
    pub const fn name(self) -> &'static str {
        match self {
            Self::AwaitAdvance => "await-advance",
            Self::Commanding => "commanding",
            Self::Actuating => "actuating",
            Self::Sampling => "sampling",
            Self::Logging => "logging",
            Self::Venting => "venting",
            Self::Done => "done",
        }
    }
}

// ---------------------------------------------------------------------------
// Sequencer
// ---------------------------------------------------------------------------

/// Drives a full pressure-step run over injected peripherals.
pub struct TestSequencer<'a, H, S, L, D> {
    config: RigConfig,
    latch: &'a AdvanceLatch,
    hw: H,
    status: S,
    log: L,
    delay: D,
    adjuster: StepAdjuster,
    mapper: PressureMapper,
    phase: StepPhase,
    step: u8,
    level: PressureLevel,
    report: RunReport,
    /// Suppresses repeated fault events while a button input stays broken.
    poll_failing: bool,
}

impl<'a, H, S, L, D> TestSequencer<'a, H, S, L, D>
where
    H: BenchPort,
    S: StatusPort,
    L: ResultLog,
    D: DelayNs,
{
    /// Build the sequencer. Peripherals are moved in and owned until
    /// [`into_parts`](Self::into_parts).
    pub fn new(config: RigConfig, latch: &'a AdvanceLatch, hw: H, status: S, log: L, delay: D) -> Self {
        let adjuster = StepAdjuster::from_config(&config);
        let mapper = PressureMapper::new(config.command_full_scale);
        Self {
            config,
            latch,
            hw,
            status,
            log,
            delay,
            adjuster,
            mapper,
            phase: StepPhase::AwaitAdvance,
            step: 0,
            level: PressureLevel::ZERO,
            report: RunReport::default(),
            poll_failing: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Show the startup banner and hold it before the first step.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.status.show_startup_banner();
        self.delay.delay_ms(self.config.banner_hold_ms);
        sink.emit(&RigEvent::Started {
            steps: self.config.step_count,
        });
        info!(
            "Run started: {} steps, level ceiling {}",
            self.config.step_count, self.config.max_level
        );
    }

    /// Start, then run every step until the logs are closed.
    pub fn run(&mut self, sink: &mut impl EventSink) -> RunReport {
        self.start(sink);
        while self.run_step(sink).is_some() {}
        self.report
    }

    /// Run one complete step. Returns `None` once the run is done.
    ///
    /// Blocks in `AWAIT_ADVANCE` until the advance latch is set.
    pub fn run_step(&mut self, sink: &mut impl EventSink) -> Option<StepRecord> {
        if self.phase == StepPhase::Done {
            return None;
        }

        self.await_advance(sink);
        let command = self.command(sink);
        self.actuate(sink);
        let (sample_a, sample_b) = self.sample(sink);

        let record = StepRecord {
            step: self.step,
            level: self.level,
            command,
            sample_a,
            sample_b,
        };
        self.record(&record, sink);
        self.vent(sink);

        if self.step.saturating_add(1) >= self.config.step_count {
            self.finish(sink);
        } else {
            self.step += 1;
            self.level = self.level.raised(self.adjuster.ceiling());
            self.enter(StepPhase::AwaitAdvance, sink);
        }

        Some(record)
    }

    // ── Phases ────────────────────────────────────────────────

    fn await_advance(&mut self, sink: &mut impl EventSink) {
        self.enter(StepPhase::AwaitAdvance, sink);
        self.set_ready_indicator(true, sink);

        let adjuster = self.adjuster;
        while !self.latch.take() {
            let before = self.level;
            match adjuster.poll(&mut self.level, &mut self.hw, &mut self.status, &mut self.delay) {
                Ok(()) => self.poll_failing = false,
                Err(e) => {
                    if !self.poll_failing {
                        self.hw_fault(e, sink);
                    }
                    self.poll_failing = true;
                }
            }
            if self.level != before {
                debug!("Pressure level adjusted: {} -> {}", before, self.level);
                sink.emit(&RigEvent::LevelAdjusted { level: self.level });
            }
            self.delay.delay_ms(self.config.idle_poll_ms);
        }

        self.set_ready_indicator(false, sink);
        sink.emit(&RigEvent::AdvanceConsumed {
            step: self.step,
            level: self.level,
        });
    }

    fn command(&mut self, sink: &mut impl EventSink) -> CommandValue {
        self.enter(StepPhase::Commanding, sink);
        let command = self.mapper.map(self.level);
        self.status.show_results_pending();

        info!("Pressure value: {}", self.level);
        info!("Control value used: {}", command);
        if let Err(e) = self.hw.write_command(command) {
            self.hw_fault(e, sink);
        }
        command
    }

    fn actuate(&mut self, sink: &mut impl EventSink) {
        self.enter(StepPhase::Actuating, sink);
        if let Err(e) = self.hw.set_valve(true) {
            self.hw_fault(e, sink);
        }
        info!("Finger filled.");
        self.delay.delay_ms(self.config.actuation_dwell_ms);
    }

    fn sample(&mut self, sink: &mut impl EventSink) -> (f32, f32) {
        self.enter(StepPhase::Sampling, sink);
        let a = self.read_sensor(SensorChannel::A, sink);
        let b = self.read_sensor(SensorChannel::B, sink);
        (a, b)
    }

    fn record(&mut self, record: &StepRecord, sink: &mut impl EventSink) {
        self.enter(StepPhase::Logging, sink);
        for (channel, sample) in [
            (SensorChannel::A, record.sample_a),
            (SensorChannel::B, record.sample_b),
        ] {
            if let Err(e) = self.log.append(channel, record.level, sample) {
                self.storage_fault(e, sink);
            }
        }
        self.status.show_results(record.sample_a, record.sample_b);
        sink.emit(&RigEvent::StepLogged(*record));
    }

    fn vent(&mut self, sink: &mut impl EventSink) {
        self.enter(StepPhase::Venting, sink);
        if let Err(e) = self.hw.set_valve(false) {
            self.hw_fault(e, sink);
        }
        if let Err(e) = self.hw.write_command(CommandValue::OFF) {
            self.hw_fault(e, sink);
        }
        self.delay.delay_ms(self.config.vent_dwell_ms);
    }

    fn finish(&mut self, sink: &mut impl EventSink) {
        self.report.steps_completed = self.step.saturating_add(1);
        match self.log.close() {
            Ok(()) => {
                info!("Test file 1 closed.");
                info!("Test file 2 closed.");
            }
            Err(e) => self.storage_fault(e, sink),
        }
        self.enter(StepPhase::Done, sink);
        info!(
            "Run complete: {} steps, {} hardware faults, {} storage faults",
            self.report.steps_completed, self.report.hardware_faults, self.report.storage_faults
        );
        sink.emit(&RigEvent::RunComplete(self.report));
    }

    // ── Internal ──────────────────────────────────────────────

    fn enter(&mut self, to: StepPhase, sink: &mut impl EventSink) {
        if self.phase == to {
            return;
        }
        let from = self.phase;
        self.phase = to;
        debug!("step {}: {} -> {}", self.step, from.name(), to.name());
        sink.emit(&RigEvent::PhaseChanged {
            step: self.step,
            from,
            to,
        });
    }

    fn read_sensor(&mut self, channel: SensorChannel, sink: &mut impl EventSink) -> f32 {
        match self.hw.read_sensor(channel) {
            Ok(value) => value,
            Err(e) => {
                self.hw_fault(e, sink);
                0.0
            }
        }
    }

    fn set_ready_indicator(&mut self, on: bool, sink: &mut impl EventSink) {
        if let Err(e) = self.hw.set_ready_indicator(on) {
            self.hw_fault(e, sink);
        }
    }

    fn hw_fault(&mut self, error: HwError, sink: &mut impl EventSink) {
        warn!("step {} ({}): {}", self.step, self.phase.name(), error);
        self.report.hardware_faults = self.report.hardware_faults.saturating_add(1);
        sink.emit(&RigEvent::HardwareFault {
            step: self.step,
            phase: self.phase,
            error,
        });
    }

    fn storage_fault(&mut self, error: StorageError, sink: &mut impl EventSink) {
        warn!("step {}: result log: {}", self.step, error);
        self.report.storage_faults = self.report.storage_faults.saturating_add(1);
        sink.emit(&RigEvent::StorageFault {
            step: self.step,
            error,
        });
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    /// Zero-based index of the current (or last) step.
    pub fn step(&self) -> u8 {
        self.step
    }

    /// Pending pressure level.
    pub fn level(&self) -> PressureLevel {
        self.level
    }

    pub fn report(&self) -> RunReport {
        self.report
    }

    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }

    pub fn status(&self) -> &S {
        &self.status
    }

    pub fn result_log(&self) -> &L {
        &self.log
    }

    /// Hand the peripherals back to the caller.
    pub fn into_parts(self) -> (H, S, L, D) {
        (self.hw, self.status, self.log, self.delay)
    }
}
