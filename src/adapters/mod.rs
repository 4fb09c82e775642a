//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements                     | Connects to              |
//! |--------------|--------------------------------|--------------------------|
//! | `hardware`   | CommandOutput, SensorInput     | ESP32 DAC, ADC1          |
//! |              | ValveOutput, OperatorPanel     | ESP32 GPIO               |
//! | `lcd_status` | StatusPort                     | HD44780 16x2 LCD         |
//! | `file_log`   | ResultLog                      | SPIFFS text files        |
//! | `log_sink`   | EventSink                      | Serial log output        |

pub mod file_log;
pub mod hardware;
pub mod lcd_status;
pub mod log_sink;
