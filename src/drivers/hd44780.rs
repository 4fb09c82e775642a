//! HD44780 character LCD driver (4-bit parallel bus, write-only).
//!
//! ## Hardware
//!
//! 16x2 module with RW strapped to ground, so the busy flag cannot be read;
//! every command is followed by a fixed settle delay instead.
//!
//! ## Bus protocol
//!
//! Each byte goes out as two nibbles (high first) on D4..D7, latched on the
//! falling edge of EN. RS selects command (low) or character data (high).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::error::HwError;

/// Text display with a character cursor.
pub trait CharDisplay {
    fn clear(&mut self) -> Result<(), HwError>;

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), HwError>;

    fn write_str(&mut self, text: &str) -> Result<(), HwError>;
}

pub const COLUMNS: u8 = 16;
pub const ROWS: u8 = 2;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE_INC: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;
const ROW_OFFSET: u8 = 0x40;

/// Settle time for ordinary commands and data writes.
const SETTLE_US: u32 = 50;
/// Clear and home need considerably longer.
const CLEAR_US: u32 = 2_000;

pub struct Hd44780<P, D> {
    rs: P,
    en: P,
    data: [P; 4],
    delay: D,
}

impl<P, D> Hd44780<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    /// `data` is D4..D7 in order.
    pub fn new(rs: P, en: P, data: [P; 4], delay: D) -> Self {
        Self { rs, en, data, delay }
    }

    /// Power-on initialisation by instruction, then a blank display.
    pub fn init(&mut self) -> Result<(), HwError> {
        self.delay.delay_ms(50);
        self.rs.set_low().map_err(write_failed)?;
        self.en.set_low().map_err(write_failed)?;

        // Three 8-bit function sets force a known state, then switch to 4-bit.
        self.write_nibble(0x3)?;
        self.delay.delay_us(4_500);
        self.write_nibble(0x3)?;
        self.delay.delay_us(150);
        self.write_nibble(0x3)?;
        self.delay.delay_us(150);
        self.write_nibble(0x2)?;
        self.delay.delay_us(150);

        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.clear()?;
        self.command(CMD_ENTRY_MODE_INC)?;
        log::debug!("hd44780: initialised ({}x{})", COLUMNS, ROWS);
        Ok(())
    }

    /// Hand the pins back.
    pub fn release(self) -> (P, P, [P; 4], D) {
        (self.rs, self.en, self.data, self.delay)
    }

    fn command(&mut self, cmd: u8) -> Result<(), HwError> {
        self.send(cmd, false)
    }

    fn send(&mut self, byte: u8, is_data: bool) -> Result<(), HwError> {
        self.rs.set_state(is_data.into()).map_err(write_failed)?;
        self.write_nibble(byte >> 4)?;
        self.write_nibble(byte & 0x0F)?;
        self.delay.delay_us(SETTLE_US);
        Ok(())
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), HwError> {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            pin.set_state(((nibble >> bit) & 1 == 1).into())
                .map_err(write_failed)?;
        }
        self.en.set_high().map_err(write_failed)?;
        self.delay.delay_us(1);
        self.en.set_low().map_err(write_failed)?;
        self.delay.delay_us(1);
        Ok(())
    }
}

impl<P, D> CharDisplay for Hd44780<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    fn clear(&mut self) -> Result<(), HwError> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_us(CLEAR_US);
        Ok(())
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), HwError> {
        let col = col.min(COLUMNS - 1);
        let row = row.min(ROWS - 1);
        self.command(CMD_SET_DDRAM | (col + row * ROW_OFFSET))
    }

    fn write_str(&mut self, text: &str) -> Result<(), HwError> {
        for ch in text.chars() {
            let byte = if ch.is_ascii() { ch as u8 } else { b'?' };
            self.send(byte, true)?;
        }
        Ok(())
    }
}

fn write_failed<E>(_: E) -> HwError {
    HwError::GpioWriteFailed
}
