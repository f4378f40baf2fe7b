//! Log file plus optional stderr echo
//!
//! One file per day (`papersum-YYYY-MM-DD.log`) under the data directory.
//! Stdout belongs to the interactive session, so diagnostics only reach the
//! terminal (on stderr) in verbose mode.

use chrono::{Datelike, Local, NaiveDate, Timelike};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

static LOG_FILE: Mutex<Option<File>> = Mutex::new(None);
static VERBOSE: AtomicBool = AtomicBool::new(false);

const LOG_PREFIX: &str = "papersum-";
const LOG_SUFFIX: &str = ".log";

/// Default log directory (`<data_dir>/papersum/logs`)
pub fn default_log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("papersum").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Initialize logging - creates today's log file and cleans old logs
pub fn init_logging(log_dir: &Path, retention_days: i64) -> Option<PathBuf> {
    if fs::create_dir_all(log_dir).is_err() {
        return None;
    }

    let today = Local::now().date_naive();
    remove_old_logs(log_dir, today, retention_days);

    let log_filename = format!(
        "{}{:04}-{:02}-{:02}{}",
        LOG_PREFIX,
        today.year(),
        today.month(),
        today.day(),
        LOG_SUFFIX
    );
    let log_path = log_dir.join(log_filename);

    let file = OpenOptions::new().create(true).append(true).open(&log_path).ok()?;
    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = Some(file);
    }
    Some(log_path)
}

/// Delete `papersum-YYYY-MM-DD.log` files older than the retention window
fn remove_old_logs(log_dir: &Path, today: NaiveDate, retention_days: i64) {
    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };
    let cutoff = today - chrono::Duration::days(retention_days);

    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let date = name
            .strip_prefix(LOG_PREFIX)
            .and_then(|s| s.strip_suffix(LOG_SUFFIX))
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
        if let Some(date) = date {
            if date < cutoff {
                let _ = fs::remove_file(&path);
            }
        }
    }
}

pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

fn write_line(level: Option<&str>, msg: &str) {
    let now = Local::now();
    let timestamp = format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second());

    if is_verbose() {
        eprintln!("{}", msg);
    }

    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(ref mut file) = *guard {
            let _ = match level {
                Some(level) => writeln!(file, "{} [{}] {}", timestamp, level, msg),
                None => writeln!(file, "{} {}", timestamp, msg),
            };
        }
    }
}

/// Log to file (and stderr when verbose)
pub fn log_both(msg: &str) {
    write_line(None, msg);
}

/// Log error to file (and stderr when verbose)
pub fn elog_both(msg: &str) {
    write_line(Some("ERROR"), msg);
}

/// Macro for logging to file and, in verbose mode, stderr
#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logging::log_both(&format!($($arg)*))
    };
}

/// Macro for error logging to file and, in verbose mode, stderr
#[macro_export]
macro_rules! elog {
    ($($arg:tt)*) => {
        $crate::logging::elog_both(&format!($($arg)*))
    };
}
