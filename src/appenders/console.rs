//! Console appender implementation

use crate::core::{Appender, LogEntry, Result, TimestampFormat};
use std::io::Write;

/// Which process stream a console appender writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

pub struct ConsoleAppender {
    stream: ConsoleStream,
    #[cfg_attr(not(feature = "console"), allow(dead_code))]
    use_colors: bool,
    timestamp_format: TimestampFormat,
}

impl ConsoleAppender {
    pub fn new(stream: ConsoleStream) -> Self {
        Self {
            stream,
            use_colors: cfg!(feature = "console"),
            timestamp_format: TimestampFormat::default(),
        }
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleStream::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleStream::Stderr)
    }

    /// Enable or disable ANSI level colouring (needs the `console` feature)
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Set the timestamp format for this appender
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_logger_hierarchy::appenders::ConsoleAppender;
    /// use rust_logger_hierarchy::TimestampFormat;
    ///
    /// let appender = ConsoleAppender::stdout()
    ///     .with_timestamp_format(TimestampFormat::Rfc3339);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }

    fn render(&self, entry: &LogEntry) -> String {
        #[cfg(feature = "console")]
        if self.use_colors {
            use colored::Colorize;

            return format!(
                "[{}] [{}] [{}] {}",
                self.timestamp_format.format(&entry.timestamp),
                format!("{:5}", entry.level.to_str()).color(entry.level.color_code()),
                entry.logger_label(),
                entry.message
            );
        }

        entry.to_text(&self.timestamp_format)
    }
}

impl Appender for ConsoleAppender {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        let line = self.render(entry);
        match self.stream {
            ConsoleStream::Stdout => writeln!(std::io::stdout().lock(), "{}", line)?,
            ConsoleStream::Stderr => writeln!(std::io::stderr().lock(), "{}", line)?,
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        match self.stream {
            ConsoleStream::Stdout => std::io::stdout().flush()?,
            ConsoleStream::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.stream {
            ConsoleStream::Stdout => "stdout",
            ConsoleStream::Stderr => "stderr",
        }
    }
}
