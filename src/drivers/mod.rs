//! Peripheral drivers, hardware initialisation, and the host simulation.

pub mod analog;
pub mod delay;
pub mod gpio;
pub mod hd44780;
pub mod hw_init;
pub mod storage;

