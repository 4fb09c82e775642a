//! Finger bench firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  BenchHardware      LcdStatus       FileResultLog            │
//! │  (DAC/ADC/GPIO)     (StatusPort)    (ResultLog)              │
//! │  LogEventSink       ADVANCE_LATCH ◀── advance GPIO ISR       │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │           TestSequencer (pure logic)               │      │
//! │  │  step FSM · StepAdjuster · PressureMapper          │      │
//! │  └────────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::{info, warn};

use fingerbench::adapters::file_log::FileResultLog;
use fingerbench::adapters::hardware::Esp32Bench;
use fingerbench::adapters::lcd_status::LcdStatus;
use fingerbench::adapters::log_sink::LogEventSink;
use fingerbench::app::latch::ADVANCE_LATCH;
use fingerbench::app::sequencer::TestSequencer;
use fingerbench::config::RigConfig;
use fingerbench::drivers::delay::BlockingDelay;
use fingerbench::drivers::gpio::GpioOutput;
use fingerbench::drivers::hd44780::Hd44780;
use fingerbench::drivers::{hw_init, storage};
use fingerbench::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Finger bench v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = RigConfig::default();
    config.validate().context("invalid bench configuration")?;
    info!("Config: {}", serde_json::to_string(&config)?);

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals().context("peripheral init")?;
    hw_init::init_isr_service().context("advance button ISR")?;
    storage::mount().context("result log storage")?;

    let mut lcd = Hd44780::new(
        GpioOutput::new(pins::LCD_RS_GPIO),
        GpioOutput::new(pins::LCD_EN_GPIO),
        [
            GpioOutput::new(pins::LCD_D4_GPIO),
            GpioOutput::new(pins::LCD_D5_GPIO),
            GpioOutput::new(pins::LCD_D6_GPIO),
            GpioOutput::new(pins::LCD_D7_GPIO),
        ],
        BlockingDelay::new(),
    );
    lcd.init().context("LCD init")?;

    // ── 4. Adapters ───────────────────────────────────────────
    let results = FileResultLog::create(&config.log_path_a, &config.log_path_b)
        .context("creating result logs")?;
    let status = LcdStatus::new(lcd);
    let hw = Esp32Bench::esp32();
    let mut sink = LogEventSink::new();

    // Presses before boot completed do not count.
    ADVANCE_LATCH.clear();

    // ── 5. Run ────────────────────────────────────────────────
    let mut sequencer = TestSequencer::new(
        config,
        &ADVANCE_LATCH,
        hw,
        status,
        results,
        BlockingDelay::new(),
    );
    let report = sequencer.run(&mut sink);

    if report.is_clean() {
        info!("Run finished cleanly after {} steps", report.steps_completed);
    } else {
        warn!(
            "Run finished with faults: {} hardware, {} storage, {} display",
            report.hardware_faults,
            report.storage_faults,
            sequencer.status().faults()
        );
    }
    Ok(())
}
