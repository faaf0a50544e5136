//! Append-only line sinks for scheduled job output.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

/// Destination for the line-oriented output of scheduled jobs.
pub trait LogSink: Send + Sync {
    /// Append one line, adding the trailing newline.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if the line cannot be written.
    fn append(&self, line: &str) -> io::Result<()>;
}

/// Sink that appends to a file, creating it on first write.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Sink writing to the given path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl LogSink for FileSink {
    fn append(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}

/// In-memory sink that records appended lines, for tests.
#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines appended so far, in order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl LogSink for MemorySink {
    fn append(&self, line: &str) -> io::Result<()> {
        let mut guard = match self.lines.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(line.to_string());
        Ok(())
    }
}
