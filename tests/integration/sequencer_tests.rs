//! Integration tests for the full TestSequencer run against the mock bench.
//!
//! The mocks share one virtual clock, so the real timing configuration is
//! used and every dwell shows up as elapsed virtual time.

use fingerbench::app::events::{RigEvent, RunReport};
use fingerbench::app::latch::AdvanceLatch;
use fingerbench::app::ports::SensorChannel;
use fingerbench::app::sequencer::{StepPhase, TestSequencer};
use fingerbench::config::RigConfig;

use crate::mock_hw::{
    BenchCall, MockBench, MockDelay, MockLog, MockStatus, Operator, Recorder, Trace,
};

type Rig<'a> = TestSequencer<'a, MockBench<'a>, MockStatus, MockLog, MockDelay>;

fn rig<'a>(trace: &Trace, latch: &'a AdvanceLatch, bench: MockBench<'a>, steps: u8) -> Rig<'a> {
    let config = RigConfig {
        step_count: steps,
        ..RigConfig::default()
    };
    TestSequencer::new(
        config,
        latch,
        bench,
        MockStatus::new(trace),
        MockLog::new(trace),
        MockDelay::new(trace),
    )
}

fn appended_levels(trace: &Trace, channel: SensorChannel) -> Vec<u8> {
    trace
        .actions()
        .into_iter()
        .filter_map(|c| match c {
            BenchCall::Append { channel: ch, level, .. } if ch == channel => Some(level),
            _ => None,
        })
        .collect()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-6
}

// ── Full run ──────────────────────────────────────────────────

#[test]
fn untouched_run_steps_levels_zero_through_twenty_five() {
    let trace = Trace::new();
    let latch = AdvanceLatch::new();
    let mut seq = rig(&trace, &latch, MockBench::new(&trace, &latch), 26);
    let mut sink = Recorder::new();

    let report = seq.run(&mut sink);

    assert_eq!(
        report,
        RunReport {
            steps_completed: 26,
            hardware_faults: 0,
            storage_faults: 0,
        }
    );
    assert_eq!(seq.phase(), StepPhase::Done);
    assert!(seq.result_log().is_closed());

    // command per step, then zero at vent
    let commands = trace.commands();
    assert_eq!(commands.len(), 52);
    for (k, pair) in commands.chunks(2).enumerate() {
        assert!(approx(pair[0], k as f32 / 33.0), "step {k}: {}", pair[0]);
        assert_eq!(pair[1], 0.0);
    }

    let expected: Vec<u8> = (0..26).collect();
    assert_eq!(appended_levels(&trace, SensorChannel::A), expected);
    assert_eq!(appended_levels(&trace, SensorChannel::B), expected);
    assert_eq!(trace.count(|c| *c == BenchCall::Valve(true)), 26);
    assert_eq!(trace.count(|c| *c == BenchCall::Close), 1);
    assert_eq!(trace.actions().last(), Some(&BenchCall::Close));
}

#[test]
fn single_step_call_order() {
    let trace = Trace::new();
    let latch = AdvanceLatch::new();
    let mut seq = rig(&trace, &latch, MockBench::new(&trace, &latch), 1);

    seq.run(&mut Recorder::new());

    use BenchCall::*;
    assert_eq!(
        trace.actions(),
        vec![
            Banner,
            Ready(true),
            ShowPending(0),
            Ready(false),
            ShowResultsPending,
            Command(0.0),
            Valve(true),
            Sample(SensorChannel::A),
            Sample(SensorChannel::B),
            Append {
                channel: SensorChannel::A,
                level: 0,
                sample: 0.0,
            },
            Append {
                channel: SensorChannel::B,
                level: 0,
                sample: 1.0,
            },
            ShowResults(0.0, 1.0),
            Valve(false),
            Command(0.0),
            Close,
        ]
    );
}

#[test]
fn dwells_separate_fill_sample_and_next_fill() {
    let trace = Trace::new();
    let latch = AdvanceLatch::new();
    let mut seq = rig(&trace, &latch, MockBench::new(&trace, &latch), 2);

    seq.run(&mut Recorder::new());

    let first_wait = trace.time_of(0, |c| *c == BenchCall::Ready(true)).unwrap();
    assert_eq!(first_wait, 1_000, "banner must be held before the first wait");

    let filled = trace.time_of(0, |c| *c == BenchCall::Valve(true)).unwrap();
    let sampled = trace
        .time_of(0, |c| *c == BenchCall::Sample(SensorChannel::A))
        .unwrap();
    assert_eq!(sampled - filled, 10_000);

    let vented = trace.time_of(0, |c| *c == BenchCall::Valve(false)).unwrap();
    let refilled = trace.time_of(1, |c| *c == BenchCall::Valve(true)).unwrap();
    assert!(refilled - vented >= 2_000);
}

#[test]
fn events_bracket_the_run() {
    let trace = Trace::new();
    let latch = AdvanceLatch::new();
    let mut seq = rig(&trace, &latch, MockBench::new(&trace, &latch), 26);
    let mut sink = Recorder::new();

    seq.run(&mut sink);

    assert_eq!(sink.events.first(), Some(&RigEvent::Started { steps: 26 }));
    assert!(matches!(sink.events.last(), Some(RigEvent::RunComplete(_))));
    assert_eq!(sink.count(|e| matches!(e, RigEvent::StepLogged(_))), 26);
    assert_eq!(sink.count(|e| matches!(e, RigEvent::AdvanceConsumed { .. })), 26);
}

// ── Operator adjustment ───────────────────────────────────────

#[test]
fn operator_adjustment_sets_commanded_level() {
    use Operator::*;
    let trace = Trace::new();
    let latch = AdvanceLatch::new();
    let bench = MockBench::new(&trace, &latch).script(&[Up, Idle, Up, Up, Down]);
    let mut seq = rig(&trace, &latch, bench, 3);
    let mut sink = Recorder::new();

    seq.run(&mut sink);

    // 0 +3 -1 = 2, then one per completed step
    assert_eq!(appended_levels(&trace, SensorChannel::A), vec![2, 3, 4]);
    assert!(approx(trace.commands()[0], 2.0 / 33.0));
    assert_eq!(sink.count(|e| matches!(e, RigEvent::LevelAdjusted { .. })), 4);
}

#[test]
fn each_press_is_debounced() {
    use Operator::*;
    let trace = Trace::new();
    let latch = AdvanceLatch::new();
    let bench = MockBench::new(&trace, &latch).script(&[Up, Up]);
    let mut seq = rig(&trace, &latch, bench, 1);

    seq.run(&mut Recorder::new());

    assert_eq!(trace.count(|c| *c == BenchCall::Delay(200)), 2);
}

#[test]
fn level_saturates_at_ceiling() {
    let trace = Trace::new();
    let latch = AdvanceLatch::new();
    let bench = MockBench::new(&trace, &latch).script(&[Operator::Up; 40]);
    let mut seq = rig(&trace, &latch, bench, 3);

    seq.run(&mut Recorder::new());

    assert_eq!(appended_levels(&trace, SensorChannel::A), vec![26, 26, 26]);
    assert!(approx(trace.commands()[0], 26.0 / 33.0));
}

#[test]
fn level_saturates_at_zero() {
    let trace = Trace::new();
    let latch = AdvanceLatch::new();
    let bench = MockBench::new(&trace, &latch).script(&[Operator::Down; 3]);
    let mut seq = rig(&trace, &latch, bench, 1);

    seq.run(&mut Recorder::new());

    assert_eq!(appended_levels(&trace, SensorChannel::A), vec![0]);
}

#[test]
fn pending_display_tracks_adjustment() {
    use Operator::*;
    let trace = Trace::new();
    let latch = AdvanceLatch::new();
    let bench = MockBench::new(&trace, &latch).script(&[Up, Up]);
    let mut seq = rig(&trace, &latch, bench, 1);

    seq.run(&mut Recorder::new());

    let shown: Vec<u8> = trace
        .actions()
        .into_iter()
        .filter_map(|c| match c {
            BenchCall::ShowPending(l) => Some(l),
            _ => None,
        })
        .collect();
    assert_eq!(shown, vec![0, 1, 2]);
}

// ── Advance latch ─────────────────────────────────────────────

#[test]
fn press_during_actuation_advances_next_step_immediately() {
    let trace = Trace::new();
    let latch = AdvanceLatch::new();
    let mut bench = MockBench::new(&trace, &latch);
    bench.press_while_actuating = true;
    let mut seq = rig(&trace, &latch, bench, 2);

    seq.run(&mut Recorder::new());

    // only the very first step needed a poll
    assert_eq!(seq.hardware().polls, 1);
    assert_eq!(trace.count(|c| matches!(c, BenchCall::ShowPending(_))), 1);
    // the last step's edge is still latched
    assert!(latch.is_pending());
}

#[test]
fn repeated_edges_advance_one_step() {
    let trace = Trace::new();
    let latch = AdvanceLatch::new();
    let mut seq = rig(&trace, &latch, MockBench::new(&trace, &latch), 3);
    let mut sink = Recorder::new();

    latch.signal();
    latch.signal();
    latch.signal();
    seq.start(&mut sink);
    seq.run_step(&mut sink).unwrap();
    assert_eq!(seq.hardware().polls, 0);

    seq.run_step(&mut sink).unwrap();
    assert_eq!(seq.hardware().polls, 1, "second step must wait for a new edge");
}

#[test]
fn no_step_after_done() {
    let trace = Trace::new();
    let latch = AdvanceLatch::new();
    let mut seq = rig(&trace, &latch, MockBench::new(&trace, &latch), 1);
    let mut sink = Recorder::new();

    seq.run(&mut sink);
    let calls = trace.calls().len();

    latch.signal();
    assert!(seq.run_step(&mut sink).is_none());
    assert_eq!(trace.calls().len(), calls);
}

// ── Faults ────────────────────────────────────────────────────

#[test]
fn failed_sample_is_logged_as_zero_and_run_continues() {
    let trace = Trace::new();
    let latch = AdvanceLatch::new();
    let mut bench = MockBench::new(&trace, &latch);
    bench.fail_channel = Some(SensorChannel::B);
    let mut seq = rig(&trace, &latch, bench, 2);
    let mut sink = Recorder::new();

    let report = seq.run(&mut sink);

    assert_eq!(report.steps_completed, 2);
    assert_eq!(report.hardware_faults, 2);
    assert!(!report.is_clean());
    let b_samples: Vec<f32> = trace
        .actions()
        .into_iter()
        .filter_map(|c| match c {
            BenchCall::Append {
                channel: SensorChannel::B,
                sample,
                ..
            } => Some(sample),
            _ => None,
        })
        .collect();
    assert_eq!(b_samples, vec![0.0, 0.0]);
    assert_eq!(
        sink.count(|e| matches!(
            e,
            RigEvent::HardwareFault {
                phase: StepPhase::Sampling,
                ..
            }
        )),
        2
    );
}

#[test]
fn valve_fault_does_not_skip_the_dwell() {
    let trace = Trace::new();
    let latch = AdvanceLatch::new();
    let mut bench = MockBench::new(&trace, &latch);
    bench.fail_valve = true;
    let mut seq = rig(&trace, &latch, bench, 1);

    let report = seq.run(&mut Recorder::new());

    // open and close both failed
    assert_eq!(report.hardware_faults, 2);
    assert_eq!(trace.count(|c| *c == BenchCall::Delay(10_000)), 1);
    assert!(seq.result_log().is_closed());
}

#[test]
fn storage_faults_are_counted_and_display_still_updates() {
    let trace = Trace::new();
    let latch = AdvanceLatch::new();
    let mut seq = TestSequencer::new(
        RigConfig {
            step_count: 3,
            ..RigConfig::default()
        },
        &latch,
        MockBench::new(&trace, &latch),
        MockStatus::new(&trace),
        {
            let mut log = MockLog::new(&trace);
            log.fail_appends = true;
            log
        },
        MockDelay::new(&trace),
    );
    let mut sink = Recorder::new();

    let report = seq.run(&mut sink);

    assert_eq!(report.storage_faults, 6);
    assert_eq!(report.steps_completed, 3);
    assert_eq!(trace.count(|c| matches!(c, BenchCall::ShowResults(..))), 3);
    assert_eq!(sink.count(|e| matches!(e, RigEvent::StorageFault { .. })), 6);
}
