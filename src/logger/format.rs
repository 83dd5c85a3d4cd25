//! Console/file line formatting
//!
//! Console lines carry a dimmed clock, a colored tag column and a level
//! column; long messages wrap under the message column. File lines are plain.

use super::file::write_to_file;
use super::levels::LogLevel;
use super::tags::LogTag;
use chrono::Local;
use colored::*;
use std::io::{stdout, ErrorKind, Write};

const TAG_WIDTH: usize = 10;
const LEVEL_WIDTH: usize = 7;

/// Maximum console line length before wrapping
const MAX_LINE_LENGTH: usize = 140;

/// Format and output a log message
pub fn format_and_log(tag: LogTag, level: LogLevel, message: &str) {
    let now = Local::now();
    let clock = now.format("%H:%M:%S").to_string();

    let head = format!(
        "{} [{}] [{}] ",
        clock.dimmed(),
        format_tag(&tag),
        format_level(level)
    );
    // "HH:MM:SS [tag] [level] " without color codes
    let head_width = clock.len() + TAG_WIDTH + LEVEL_WIDTH + 7;
    let body_width = MAX_LINE_LENGTH.saturating_sub(head_width).max(40);

    let lines = wrap_text(message, body_width);
    let stamp = now.format("%Y-%m-%d %H:%M:%S").to_string();
    let plain_tag = tag.to_plain_string();

    for (i, line) in lines.iter().enumerate() {
        let console = if i == 0 {
            format!("{}{}", head, colorize_body(level, line))
        } else {
            format!("{}{}", " ".repeat(head_width), colorize_body(level, line))
        };
        print_stdout_safe(&console);
        write_to_file(&format!("{} [{}] [{}] {}", stamp, plain_tag, level, line));
    }
}

fn format_tag(tag: &LogTag) -> ColoredString {
    let label = format!("{:<width$}", tag.to_plain_string(), width = TAG_WIDTH);
    match tag {
        LogTag::System => label.bright_yellow().bold(),
        LogTag::Config => label.bright_white().bold(),
        LogTag::Trader => label.bright_green().bold(),
        LogTag::Strategy => label.bright_cyan().bold(),
        LogTag::Positions => label.bright_blue().bold(),
        LogTag::Discovery => label.white().bold(),
        LogTag::Security => label.bright_red().bold(),
        LogTag::Swap => label.yellow().bold(),
        LogTag::Wallet => label.bright_magenta().bold(),
        LogTag::Treasury => label.magenta().bold(),
        LogTag::Notifications => label.cyan().bold(),
        LogTag::Telegram => label.blue().bold(),
        LogTag::Webserver => label.bright_purple().bold(),
    }
}

fn format_level(level: LogLevel) -> ColoredString {
    let label = format!("{:<width$}", level.as_str(), width = LEVEL_WIDTH);
    match level {
        LogLevel::Error => label.bright_red().bold(),
        LogLevel::Warning => label.bright_yellow().bold(),
        LogLevel::Info => label.white().bold(),
        LogLevel::Debug | LogLevel::Verbose => label.dimmed(),
    }
}

fn colorize_body(level: LogLevel, text: &str) -> ColoredString {
    match level {
        LogLevel::Error => text.red(),
        LogLevel::Warning => text.yellow(),
        LogLevel::Debug | LogLevel::Verbose => text.dimmed(),
        LogLevel::Info => text.normal(),
    }
}

/// Print to stdout but ignore broken pipe errors
fn print_stdout_safe(message: &str) {
    let mut out = stdout().lock();
    if let Err(e) = writeln!(out, "{}", message).and_then(|_| out.flush()) {
        if e.kind() == ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        let _ = writeln!(std::io::stderr(), "Logger stdout error: {}", e);
    }
}

/// Wrap text at word boundaries, respecting existing newlines
///
/// Words longer than `max_width` are split on char boundaries.
pub(crate) fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();

    for raw in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in raw.split_whitespace() {
            let word_len = word.chars().count();

            if word_len > max_width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let chars: Vec<char> = word.chars().collect();
                let mut chunks = chars.chunks(max_width).peekable();
                while let Some(chunk) = chunks.next() {
                    if chunks.peek().is_some() {
                        lines.push(chunk.iter().collect());
                    } else {
                        // Tail chunk stays open so following words can join it
                        current = chunk.iter().collect();
                        current_len = chunk.len();
                    }
                }
                continue;
            }

            let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
            if needed > max_width {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_len = word_len;
            } else {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                current_len = needed;
            }
        }

        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
