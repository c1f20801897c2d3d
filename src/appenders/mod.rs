//! Appender implementations and the output registry

pub mod console;
pub mod file;
pub mod memory;
pub mod registry;

pub use console::{ConsoleAppender, ConsoleStream};
pub use file::FileAppender;
pub use memory::MemoryAppender;
pub use registry::{stderr_handle, stdout_handle, OutputKind, OutputRegistry, FILE_OPTION};

pub use crate::core::{Appender, OutputHandle};
