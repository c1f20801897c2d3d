//! Output writer registry
//!
//! Resolves an output declaration (kind + options) to a shared sink. Every
//! distinct file path gets exactly one open [`FileAppender`]; the registry
//! counts how many node attachments reference it and evicts it when that
//! count drops to zero. Standard streams are fixed process-wide handles and
//! are not counted.

use super::console::ConsoleAppender;
use super::file::FileAppender;
use crate::core::{LoggerError, OutputHandle, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

/// Option key naming the target path of a `file` output
pub const FILE_OPTION: &str = "file";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    File,
    Stdout,
    Stderr,
}

impl OutputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputKind::File => "file",
            OutputKind::Stdout => "stdout",
            OutputKind::Stderr => "stderr",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputKind {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(OutputKind::File),
            "stdout" => Ok(OutputKind::Stdout),
            "stderr" => Ok(OutputKind::Stderr),
            _ => Err(LoggerError::output_options(s, "unknown output kind")),
        }
    }
}

/// Process-wide stdout sink
pub fn stdout_handle() -> OutputHandle {
    static STDOUT: OnceLock<OutputHandle> = OnceLock::new();
    STDOUT
        .get_or_init(|| OutputHandle::new(ConsoleAppender::stdout().with_colors(false)))
        .clone()
}

/// Process-wide stderr sink
pub fn stderr_handle() -> OutputHandle {
    static STDERR: OnceLock<OutputHandle> = OnceLock::new();
    STDERR
        .get_or_init(|| OutputHandle::new(ConsoleAppender::stderr().with_colors(false)))
        .clone()
}

/// Registry key for a file path: repeated separators and inner `.`
/// components are dropped, so spellings of one target share a handle.
/// Symlinks and `..` are left as written.
fn file_key(path: &Path) -> PathBuf {
    path.components().collect()
}

struct FileEntry {
    handle: OutputHandle,
    refs: usize,
}

#[derive(Default)]
pub struct OutputRegistry {
    files: Mutex<HashMap<PathBuf, FileEntry>>,
}

impl OutputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by every hierarchy that does not bring its own
    pub fn global() -> Arc<OutputRegistry> {
        static GLOBAL: OnceLock<Arc<OutputRegistry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(OutputRegistry::new())))
    }

    /// Resolve an output declaration to a sink.
    ///
    /// File outputs need a `file` option; the returned handle is counted as
    /// one more reference and must be given back with [`release`](Self::release)
    /// once the node holding it drops it.
    pub fn acquire(&self, kind: OutputKind, options: &HashMap<String, String>) -> Result<OutputHandle> {
        match kind {
            OutputKind::Stdout => Ok(stdout_handle()),
            OutputKind::Stderr => Ok(stderr_handle()),
            OutputKind::File => {
                let path = options
                    .get(FILE_OPTION)
                    .filter(|path| !path.trim().is_empty())
                    .ok_or_else(|| {
                        LoggerError::output_options(kind.as_str(), "missing required 'file' option")
                    })?;
                self.acquire_file(file_key(Path::new(path)))
            }
        }
    }

    fn acquire_file(&self, path: PathBuf) -> Result<OutputHandle> {
        let mut files = self.files.lock();
        if let Some(entry) = files.get_mut(&path) {
            entry.refs += 1;
            return Ok(entry.handle.clone());
        }

        let handle = OutputHandle::new(FileAppender::new(&path)?);
        files.insert(
            path,
            FileEntry {
                handle: handle.clone(),
                refs: 1,
            },
        );
        Ok(handle)
    }

    /// Give back one reference to `handle`.
    ///
    /// Handles this registry did not open (std streams, custom sinks) are
    /// ignored. The file itself closes when the last clone of the handle is
    /// dropped, which may be a reader still writing through an old snapshot.
    pub fn release(&self, handle: &OutputHandle) {
        let mut files = self.files.lock();
        let Some(path) = files
            .iter()
            .find(|(_, entry)| entry.handle.same_sink(handle))
            .map(|(path, _)| path.clone())
        else {
            return;
        };

        let Some(entry) = files.get_mut(&path) else {
            return;
        };
        entry.refs = entry.refs.saturating_sub(1);
        if entry.refs == 0 {
            if let Some(entry) = files.remove(&path) {
                if let Err(e) = entry.handle.flush() {
                    eprintln!(
                        "[LOGGER WARNING] Failed to flush '{}' on release: {}",
                        path.display(),
                        e
                    );
                }
            }
        }
    }

    /// References currently held on the file at `path`
    pub fn ref_count(&self, path: impl AsRef<Path>) -> usize {
        self.files
            .lock()
            .get(&file_key(path.as_ref()))
            .map_or(0, |entry| entry.refs)
    }

    pub fn open_files(&self) -> usize {
        self.files.lock().len()
    }
}
