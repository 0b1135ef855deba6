//! Log writer module
//!
//! Thread-safe log output to files or stdout/stderr, set up once at startup.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File(File),
}

impl LogTarget {
    fn open(path: Option<&str>, fallback: Self) -> io::Result<Self> {
        match path {
            Some(p) => open_log_file(p).map(Self::File),
            None => Ok(fallback),
        }
    }

    fn write_line(&mut self, message: &str) {
        match self {
            Self::Stdout => println!("{message}"),
            Self::Stderr => eprintln!("{message}"),
            Self::File(f) => {
                let _ = writeln!(f, "{message}");
            }
        }
    }
}

/// Thread-safe log writer
pub struct LogWriter {
    /// Access and info messages
    access: Mutex<LogTarget>,
    /// Errors and warnings
    error: Mutex<LogTarget>,
    debug: bool,
}

impl LogWriter {
    fn new(
        access_log_file: Option<&str>,
        error_log_file: Option<&str>,
        debug: bool,
    ) -> io::Result<Self> {
        Ok(Self {
            access: Mutex::new(LogTarget::open(access_log_file, LogTarget::Stdout)?),
            error: Mutex::new(LogTarget::open(error_log_file, LogTarget::Stderr)?),
            debug,
        })
    }

    pub fn write_access(&self, message: &str) {
        write_locked(&self.access, message);
    }

    pub fn write_error(&self, message: &str) {
        write_locked(&self.error, message);
    }

    /// Info messages share the access log target
    pub fn write_info(&self, message: &str) {
        write_locked(&self.access, message);
    }

    pub const fn debug_enabled(&self) -> bool {
        self.debug
    }
}

/// A poisoned lock still holds a usable target
fn write_locked(target: &Mutex<LogTarget>, message: &str) {
    let mut guard = target
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    guard.write_line(message);
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize the global log writer
///
/// Returns error if log files cannot be opened or the writer is already set.
pub fn init(
    access_log_file: Option<&str>,
    error_log_file: Option<&str>,
    debug: bool,
) -> io::Result<()> {
    let writer = LogWriter::new(access_log_file, error_log_file, debug)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, if `init()` has run
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_targets_append() {
        let dir = tempfile::tempdir().unwrap();
        let access = dir.path().join("logs").join("access.log");
        let error = dir.path().join("logs").join("error.log");
        let access_str = access.to_str().unwrap();
        let error_str = error.to_str().unwrap();

        let writer = LogWriter::new(Some(access_str), Some(error_str), true).unwrap();
        writer.write_access("GET /app1 200");
        writer.write_info("started");
        writer.write_error("[ERROR] boom");
        assert!(writer.debug_enabled());

        let access_log = std::fs::read_to_string(&access).unwrap();
        assert_eq!(access_log, "GET /app1 200\nstarted\n");
        let error_log = std::fs::read_to_string(&error).unwrap();
        assert_eq!(error_log, "[ERROR] boom\n");
    }
}
