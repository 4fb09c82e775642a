//! LCD status presenter adapter.
//!
//! Implements [`StatusPort`] on any [`CharDisplay`]. Layouts for the 16x2
//! panel:
//!
//! | Screen          | Row 0              | Row 1                 |
//! |-----------------|--------------------|-----------------------|
//! | startup banner  | `Hello! Ready`     | `to test?`            |
//! | pending level   | `P Value:`         | level, width 2        |
//! | results pending | `Results Pending.` |                       |
//! | results         | `S1   ,    S2`     | ` 0.42 ,  0.37 `      |
//!
//! Display failures are logged and counted, never propagated.

use core::fmt::{self, Write};

use heapless::String;
use log::warn;

use crate::app::ports::StatusPort;
use crate::app::pressure::PressureLevel;
use crate::drivers::hd44780::{CharDisplay, COLUMNS};
use crate::error::HwError;

/// One display row, truncated to the panel width.
pub type Row = String<{ COLUMNS as usize }>;

/// What is currently painted, so an unchanged screen is not redrawn on
/// every poll.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Screen {
    Banner,
    Pending(PressureLevel),
    ResultsPending,
    Results,
}

pub struct LcdStatus<D> {
    display: D,
    shown: Option<Screen>,
    faults: u32,
}

impl<D: CharDisplay> LcdStatus<D> {
    pub fn new(display: D) -> Self {
        Self {
            display,
            shown: None,
            faults: 0,
        }
    }

    /// Number of screens that failed to paint.
    pub fn faults(&self) -> u32 {
        self.faults
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn into_inner(self) -> D {
        self.display
    }

    fn paint(
        &mut self,
        screen: Screen,
        draw: impl FnOnce(&mut D) -> Result<(), HwError>,
    ) {
        if self.shown == Some(screen) {
            return;
        }
        match draw(&mut self.display) {
            Ok(()) => self.shown = Some(screen),
            Err(e) => {
                warn!("lcd: {:?} screen not shown: {}", screen, e);
                self.faults = self.faults.saturating_add(1);
                self.shown = None;
            }
        }
    }
}

impl<D: CharDisplay> StatusPort for LcdStatus<D> {
    fn show_startup_banner(&mut self) {
        self.paint(Screen::Banner, |d| {
            d.clear()?;
            d.write_str("Hello! Ready")?;
            d.set_cursor(0, 1)?;
            d.write_str("to test?")
        });
    }

    fn show_pending_pressure(&mut self, level: PressureLevel) {
        let label = row(format_args!("P Value:"));
        let value = row(format_args!("{:2}", level.get()));
        self.paint(Screen::Pending(level), |d| {
            d.set_cursor(0, 0)?;
            d.write_str(&label)?;
            d.set_cursor(0, 1)?;
            d.write_str(&value)
        });
    }

    fn show_results_pending(&mut self) {
        self.paint(Screen::ResultsPending, |d| {
            d.clear()?;
            d.write_str("Results Pending.")
        });
    }

    fn show_results(&mut self, sample_a: f32, sample_b: f32) {
        let values = results_row(sample_a, sample_b);
        // Always repaint: the values differ from step to step.
        self.shown = None;
        self.paint(Screen::Results, |d| {
            d.clear()?;
            d.set_cursor(0, 0)?;
            d.write_str("S1")?;
            d.set_cursor(5, 0)?;
            d.write_str(",")?;
            d.set_cursor(10, 0)?;
            d.write_str("S2")?;
            d.set_cursor(0, 1)?;
            d.write_str(&values)
        });
    }
}

/// Second row of the results screen.
pub fn results_row(sample_a: f32, sample_b: f32) -> Row {
    let mut r = Row::new();
    let _ = write!(Truncating(&mut r), " {:.2} ,  {:.2} ", sample_a, sample_b);
    r
}

/// Format into a full-width row, padding with blanks so stale characters
/// from the previous screen are overwritten.
fn row(args: fmt::Arguments<'_>) -> Row {
    let mut r = Row::new();
    let _ = Truncating(&mut r).write_fmt(args);
    while r.push(' ').is_ok() {}
    r
}

/// Writer that silently drops whatever does not fit.
struct Truncating<'a>(&'a mut Row);

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}
