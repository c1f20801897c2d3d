//! File appender implementation

use crate::core::{Appender, LogEntry, Result, TimestampFormat};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends text records to a file opened in create+append mode.
///
/// Shared by every logger node that declares the same path; writes are
/// serialized by an internal lock so records never interleave.
pub struct FileAppender {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
    timestamp_format: TimestampFormat,
}

impl FileAppender {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
            timestamp_format: TimestampFormat::default(),
        })
    }

    /// Set the timestamp format for this appender
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rust_logger_hierarchy::appenders::FileAppender;
    /// use rust_logger_hierarchy::TimestampFormat;
    ///
    /// let appender = FileAppender::new("/var/log/app.log")
    ///     .unwrap()
    ///     .with_timestamp_format(TimestampFormat::Rfc3339);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Appender for FileAppender {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        let mut line = entry.to_text(&self.timestamp_format);
        line.push('\n');

        self.writer.lock().write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        let _ = self.writer.get_mut().flush();
    }
}
