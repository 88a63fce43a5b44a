//! Run logging for the `log` facade.
//!
//! Every record goes to stderr. Once a session is started, records are also
//! appended to a dedicated log file so a run can be audited after the
//! terminal is gone:
//!
//! ```text
//! log::info!() ──> [LogCollector] ──> stderr
//!                        └──────────> <logs_dir>/<timestamp>_<label>.log
//! ```
//!
//! Records with target `"parsed"` are milestones and are marked with `==>`.
//! Logging never fails the run: file errors are reported once and the
//! collector keeps writing to stderr.

use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Log target for high-level milestones.
pub const PARSED_TARGET: &str = "parsed";

#[derive(Debug, Default)]
struct SessionState {
    file: Option<File>,
}

/// `log::Log` implementation writing to stderr and an optional session file
#[derive(Debug, Clone)]
pub struct LogCollector {
    level: LevelFilter,
    session: Arc<Mutex<SessionState>>,
}

impl LogCollector {
    pub fn new(level: LevelFilter) -> Self {
        LogCollector {
            level,
            session: Arc::new(Mutex::new(SessionState::default())),
        }
    }

    /// Register a clone of this collector as the global logger.
    pub fn install(&self) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(self.clone()))?;
        log::set_max_level(self.level);
        Ok(())
    }

    /// Start a session log file `<log_dir>/<timestamp>_<label>.log`.
    pub fn start_session(&self, log_dir: &Path, label: &str) -> Result<PathBuf, String> {
        std::fs::create_dir_all(log_dir)
            .map_err(|e| format!("Failed to create logs directory: {}", e))?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = log_dir.join(format!("{}_{}.log", timestamp, label));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| format!("Failed to open log file {}: {}", path.display(), e))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("Failed to lock session state: {}", e))?;
        session.file = Some(file);
        Ok(path)
    }

    fn format_record(record: &Record) -> String {
        let marker = if record.target() == PARSED_TARGET {
            "==> "
        } else {
            ""
        };
        format!(
            "[{}] [{}] {}{}",
            Local::now().format("%H:%M:%S%.3f"),
            record.level(),
            marker,
            record.args()
        )
    }

    fn write_to_session(&self, line: &str) {
        let Ok(mut session) = self.session.lock() else {
            return;
        };
        let failed = match session.file.as_mut() {
            Some(file) => writeln!(file, "{}", line).is_err(),
            None => false,
        };
        if failed {
            eprintln!("[Log] WARNING: session log write failed, continuing on stderr only");
            session.file = None;
        }
    }
}

impl Log for LogCollector {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = Self::format_record(record);
        eprintln!("{}", line);
        self.write_to_session(&line);
    }

    fn flush(&self) {
        if let Ok(mut session) = self.session.lock() {
            if let Some(file) = session.file.as_mut() {
                let _ = file.flush();
            }
        }
    }
}
