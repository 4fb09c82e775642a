//! Mock bench for integration tests.
//!
//! Every port call is recorded, stamped with a shared virtual clock, into one
//! trace so tests can assert on the full ordering of commands, holds,
//! samples and display updates without touching real peripherals.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use fingerbench::app::events::RigEvent;
use fingerbench::app::latch::AdvanceLatch;
use fingerbench::app::ports::{
    CommandOutput, EventSink, OperatorPanel, ResultLog, SensorChannel, SensorInput, StatusPort,
    ValveOutput,
};
use fingerbench::app::pressure::{CommandValue, PressureLevel};
use fingerbench::error::{HwError, StorageError};

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum BenchCall {
    Command(f32),
    Valve(bool),
    Ready(bool),
    Sample(SensorChannel),
    Delay(u32),
    Banner,
    ShowPending(u8),
    ShowResultsPending,
    ShowResults(f32, f32),
    Append {
        channel: SensorChannel,
        level: u8,
        sample: f32,
    },
    Close,
}

/// Shared virtual clock plus the time-stamped call trace.
#[derive(Clone, Default)]
pub struct Trace {
    now_ms: Rc<Cell<u64>>,
    calls: Rc<RefCell<Vec<(u64, BenchCall)>>>,
}

#[allow(dead_code)]
impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: BenchCall) {
        self.calls.borrow_mut().push((self.now_ms.get(), call));
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }

    pub fn calls(&self) -> Vec<(u64, BenchCall)> {
        self.calls.borrow().clone()
    }

    /// Calls without timestamps or delays.
    pub fn actions(&self) -> Vec<BenchCall> {
        self.calls
            .borrow()
            .iter()
            .map(|(_, c)| c.clone())
            .filter(|c| !matches!(c, BenchCall::Delay(_)))
            .collect()
    }

    /// Timestamp of the `nth` (0-based) call matching `pred`.
    pub fn time_of(&self, nth: usize, pred: impl Fn(&BenchCall) -> bool) -> Option<u64> {
        self.calls
            .borrow()
            .iter()
            .filter(|(_, c)| pred(c))
            .nth(nth)
            .map(|(t, _)| *t)
    }

    pub fn count(&self, pred: impl Fn(&BenchCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|(_, c)| pred(c)).count()
    }

    pub fn commands(&self) -> Vec<f32> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|(_, c)| match c {
                BenchCall::Command(v) => Some(*v),
                _ => None,
            })
            .collect()
    }
}

// ── Operator script ───────────────────────────────────────────

/// What the operator does during one adjuster poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Idle,
    Up,
    Down,
    Advance,
}

// ── MockBench ─────────────────────────────────────────────────

pub struct MockBench<'a> {
    trace: Trace,
    latch: &'a AdvanceLatch,
    script: VecDeque<Operator>,
    current: Operator,
    last_command: f32,
    pub fail_channel: Option<SensorChannel>,
    pub fail_valve: bool,
    /// Simulate an advance edge arriving while the valve is open.
    pub press_while_actuating: bool,
    pub polls: u32,
}

#[allow(dead_code)]
impl<'a> MockBench<'a> {
    pub fn new(trace: &Trace, latch: &'a AdvanceLatch) -> Self {
        Self {
            trace: trace.clone(),
            latch,
            script: VecDeque::new(),
            current: Operator::Idle,
            last_command: 0.0,
            fail_channel: None,
            fail_valve: false,
            press_while_actuating: false,
            polls: 0,
        }
    }

    /// Queue operator actions. Once the script runs dry the operator
    /// presses advance at the next poll.
    pub fn script(mut self, actions: &[Operator]) -> Self {
        self.script.extend(actions.iter().copied());
        self
    }
}

impl CommandOutput for MockBench<'_> {
    fn write_command(&mut self, value: CommandValue) -> Result<(), HwError> {
        self.trace.record(BenchCall::Command(value.get()));
        self.last_command = value.get();
        Ok(())
    }
}

impl SensorInput for MockBench<'_> {
    /// Sensor A follows the command, sensor B mirrors it.
    fn read_sensor(&mut self, channel: SensorChannel) -> Result<f32, HwError> {
        self.trace.record(BenchCall::Sample(channel));
        if self.fail_channel == Some(channel) {
            return Err(HwError::AdcReadFailed);
        }
        Ok(match channel {
            SensorChannel::A => self.last_command,
            SensorChannel::B => 1.0 - self.last_command,
        })
    }
}

impl ValveOutput for MockBench<'_> {
    fn set_valve(&mut self, open: bool) -> Result<(), HwError> {
        self.trace.record(BenchCall::Valve(open));
        if open && self.press_while_actuating {
            self.latch.signal();
        }
        if self.fail_valve {
            return Err(HwError::GpioWriteFailed);
        }
        Ok(())
    }
}

impl OperatorPanel for MockBench<'_> {
    fn increment_active(&mut self) -> Result<bool, HwError> {
        self.polls += 1;
        self.current = self.script.pop_front().unwrap_or(Operator::Advance);
        if self.current == Operator::Advance {
            self.latch.signal();
        }
        Ok(self.current == Operator::Up)
    }

    fn decrement_active(&mut self) -> Result<bool, HwError> {
        Ok(self.current == Operator::Down)
    }

    fn set_ready_indicator(&mut self, on: bool) -> Result<(), HwError> {
        self.trace.record(BenchCall::Ready(on));
        Ok(())
    }
}

// ── MockStatus ────────────────────────────────────────────────

pub struct MockStatus {
    trace: Trace,
}

impl MockStatus {
    pub fn new(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
        }
    }
}

impl StatusPort for MockStatus {
    fn show_startup_banner(&mut self) {
        self.trace.record(BenchCall::Banner);
    }

    fn show_pending_pressure(&mut self, level: PressureLevel) {
        self.trace.record(BenchCall::ShowPending(level.get()));
    }

    fn show_results_pending(&mut self) {
        self.trace.record(BenchCall::ShowResultsPending);
    }

    fn show_results(&mut self, sample_a: f32, sample_b: f32) {
        self.trace.record(BenchCall::ShowResults(sample_a, sample_b));
    }
}

// ── MockLog ───────────────────────────────────────────────────

pub struct MockLog {
    trace: Trace,
    closed: bool,
    pub fail_appends: bool,
}

#[allow(dead_code)]
impl MockLog {
    pub fn new(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
            closed: false,
            fail_appends: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl ResultLog for MockLog {
    fn append(
        &mut self,
        channel: SensorChannel,
        level: PressureLevel,
        sample: f32,
    ) -> Result<(), StorageError> {
        if self.closed {
            return Err(StorageError::Closed);
        }
        if self.fail_appends {
            return Err(StorageError::Io(std::io::ErrorKind::StorageFull));
        }
        self.trace.record(BenchCall::Append {
            channel,
            level: level.get(),
            sample,
        });
        Ok(())
    }

    fn close(&mut self) -> Result<(), StorageError> {
        self.trace.record(BenchCall::Close);
        self.closed = true;
        Ok(())
    }
}

// ── MockDelay ─────────────────────────────────────────────────

/// Advances the shared virtual clock instead of sleeping.
pub struct MockDelay {
    trace: Trace,
}

impl MockDelay {
    pub fn new(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
        }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        let ms = ns / 1_000_000;
        self.delay_ms(ms);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.trace.record(BenchCall::Delay(ms));
        self.trace.now_ms.set(self.trace.now_ms.get() + u64::from(ms));
    }
}

// ── Event recorder ────────────────────────────────────────────

#[derive(Default)]
pub struct Recorder {
    pub events: Vec<RigEvent>,
}

#[allow(dead_code)]
impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&RigEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for Recorder {
    fn emit(&mut self, event: &RigEvent) {
        self.events.push(event.clone());
    }
}
