//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the rules of a pressure-step run: the step
//! sequencer, the advance latch, the debounced level adjuster and the
//! level-to-command mapping. All interaction with the bench happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod adjuster;
pub mod events;
pub mod latch;
pub mod ports;
pub mod pressure;
pub mod sequencer;
