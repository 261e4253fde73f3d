// Fri Jan 23 2026 - Alex

use colored::*;
use log::{Level, LevelFilter};
use std::io::Write;
use std::time::Instant;

pub struct LoggingUtils;

impl LoggingUtils {
    pub fn init_logger(level: LevelFilter, use_color: bool) {
        env_logger::Builder::new()
            .filter_level(level)
            .format_timestamp(None)
            .format(move |buf, record| {
                let tag = if use_color {
                    Self::format_level(record.level()).to_string()
                } else {
                    format!("{:5}", record.level())
                };
                writeln!(buf, "{} {}", tag, record.args())
            })
            .try_init()
            .ok();
    }

    pub fn level_from_str(s: &str) -> LevelFilter {
        match s.to_lowercase().as_str() {
            "error" => LevelFilter::Error,
            "warn" | "warning" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Warn,
        }
    }

    fn format_level(level: Level) -> ColoredString {
        match level {
            Level::Error => "ERROR".red().bold(),
            Level::Warn => "WARN ".yellow().bold(),
            Level::Info => "INFO ".green().bold(),
            Level::Debug => "DEBUG".blue().bold(),
            Level::Trace => "TRACE".magenta().bold(),
        }
    }
}

/// Logs `Finished <phase> in <n>ms.` when dropped.
pub struct ScopedTimer {
    phase: String,
    start: Instant,
}

impl ScopedTimer {
    pub fn new(phase: &str) -> Self {
        log::debug!("Started {}", phase);
        Self {
            phase: phase.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        log::info!("Finished {} in {}ms.", self.phase, self.elapsed_ms());
    }
}
