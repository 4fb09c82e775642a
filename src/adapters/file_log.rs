//! File-backed result log adapter.
//!
//! One text file per sensor channel, created fresh (truncated) at boot.
//! Each step appends one record per file:
//!
//! ```text
//! 12 , 0.431502
//! ```
//!
//! Records are formatted into a fixed buffer and written through a
//! `BufWriter`; `close` flushes and drops both files.

use core::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use heapless::String;
use log::info;

use crate::app::ports::{ResultLog, SensorChannel};
use crate::app::pressure::PressureLevel;
use crate::error::StorageError;

/// Longer records (absurd sample magnitudes) fail with `RecordOverflow`.
pub const RECORD_CAPACITY: usize = 48;

/// Format one result line: `"{level} , {sample:.6}\n"`.
pub fn format_record(
    level: PressureLevel,
    sample: f32,
) -> Result<String<RECORD_CAPACITY>, StorageError> {
    let mut line = String::new();
    writeln!(line, "{} , {:.6}", level, sample).map_err(|_| StorageError::RecordOverflow)?;
    Ok(line)
}

pub struct FileResultLog {
    files: Option<[BufWriter<File>; 2]>,
}

impl FileResultLog {
    /// Create (or truncate) both log files.
    pub fn create(path_a: impl AsRef<Path>, path_b: impl AsRef<Path>) -> Result<Self, StorageError> {
        let a = File::create(path_a.as_ref())?;
        let b = File::create(path_b.as_ref())?;
        info!(
            "result log: writing {} and {}",
            path_a.as_ref().display(),
            path_b.as_ref().display()
        );
        Ok(Self {
            files: Some([BufWriter::new(a), BufWriter::new(b)]),
        })
    }

    pub fn is_open(&self) -> bool {
        self.files.is_some()
    }
}

impl ResultLog for FileResultLog {
    fn append(
        &mut self,
        channel: SensorChannel,
        level: PressureLevel,
        sample: f32,
    ) -> Result<(), StorageError> {
        let files = self.files.as_mut().ok_or(StorageError::Closed)?;
        let line = format_record(level, sample)?;
        let file = match channel {
            SensorChannel::A => &mut files[0],
            SensorChannel::B => &mut files[1],
        };
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), StorageError> {
        let Some(files) = self.files.take() else {
            return Ok(());
        };
        // Flush both even if the first fails; report the first error.
        let mut result = Ok(());
        for mut file in files {
            if let Err(e) = file.flush() {
                result = result.and(Err(StorageError::from(e)));
            }
        }
        result
    }
}

impl Drop for FileResultLog {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
