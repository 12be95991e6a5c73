use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

/// Environment variable holding the log level (`error` .. `trace`, `off`).
pub const LOG_ENV: &str = "TYPE_WAR_LOG";
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::Warn;

/// Appends timestamped lines to a file. The terminal belongs to the TUI,
/// so nothing goes to stdout or stderr.
pub struct FileLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

impl FileLogger {
    pub fn open<P: AsRef<Path>>(path: P, level: LevelFilter) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            level,
            file: Mutex::new(file),
        })
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(
                file,
                "{} {:<5} {}: {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Parse a level name; unknown or missing values fall back to `warn`.
pub fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| LevelFilter::from_str(v.trim()).ok())
        .unwrap_or(DEFAULT_LEVEL)
}

/// Install the file logger as the global logger. Returns false when a
/// logger was already set or the file cannot be opened.
pub fn init<P: AsRef<Path>>(path: P) -> bool {
    let level = level_from(std::env::var(LOG_ENV).ok().as_deref());
    if level == LevelFilter::Off {
        return false;
    }
    let Ok(logger) = FileLogger::open(path, level) else {
        return false;
    };
    if log::set_boxed_logger(Box::new(logger)).is_err() {
        return false;
    }
    log::set_max_level(level);
    true
}
