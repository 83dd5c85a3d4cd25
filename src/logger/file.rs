/// File persistence for log lines
///
/// One file per day under the logs directory: `skrybot_YYYY-MM-DD.log`.
use super::config::get_logger_config;
use chrono::Local;
use once_cell::sync::Lazy;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::sync::Mutex;

struct LogFile {
    day: String,
    writer: BufWriter<File>,
}

static LOG_FILE: Lazy<Mutex<Option<LogFile>>> = Lazy::new(|| Mutex::new(None));

fn open_for_day(day: &str) -> Option<LogFile> {
    let dir = crate::paths::get_logs_directory();
    if std::fs::create_dir_all(&dir).is_err() {
        return None;
    }
    let path = dir.join(format!("skrybot_{}.log", day));
    let file = OpenOptions::new().create(true).append(true).open(path).ok()?;
    Some(LogFile {
        day: day.to_string(),
        writer: BufWriter::new(file),
    })
}

/// Open today's log file (no-op when file logging is disabled)
pub fn init_file_logging() {
    if !get_logger_config().file_logging {
        return;
    }
    let day = Local::now().format("%Y-%m-%d").to_string();
    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = open_for_day(&day);
    }
}

/// Append one line, rotating to a new file when the day changes
pub fn write_to_file(line: &str) {
    let Ok(mut guard) = LOG_FILE.lock() else {
        return;
    };
    let Some(current) = guard.as_ref() else {
        return;
    };

    let today = Local::now().format("%Y-%m-%d").to_string();
    if current.day != today {
        if let Some(mut old) = guard.take() {
            let _ = old.writer.flush();
        }
        *guard = open_for_day(&today);
    }

    if let Some(file) = guard.as_mut() {
        let _ = writeln!(file.writer, "{}", line);
    }
}

pub fn flush_file_logging() {
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(file) = guard.as_mut() {
            let _ = file.writer.flush();
        }
    }
}
