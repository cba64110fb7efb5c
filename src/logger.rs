// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Error;

use log::{Level, Metadata, Record};

/// Log an error and terminate the process.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
        log::Log::flush(log::logger());
        std::process::exit(1);
    }};
}

pub struct Logger {
    label: Option<&'static str>,
    level: Level,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    pub fn new() -> Self {
        Self {
            label: None,
            level: Level::Info,
        }
    }

    /// Target shown for info and more severe records.
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn init(self) -> Result<(), Error> {
        let filter = self.level.to_level_filter();
        log::set_boxed_logger(Box::new(SimpleLogger {
            label: self.label,
            level: self.level,
        }))?;
        log::set_max_level(filter);
        Ok(())
    }
}

struct SimpleLogger {
    label: Option<&'static str>,
    level: Level,
}

impl SimpleLogger {
    fn format(&self, record: &Record) -> String {
        let target = match self.label {
            Some(label) if record.level() < Level::Debug => label,
            _ => record.target(),
        };
        format!(
            "{} {:<5} [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            target,
            record.args()
        )
    }
}

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{}", self.format(record));
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn label_replaces_target_above_debug() {
        let logger = SimpleLogger {
            label: Some("speedup_graphs"),
            level: Level::Debug,
        };
        let info = logger.format(
            &Record::builder()
                .args(format_args!("wrote chart"))
                .level(Level::Info)
                .target("speedup_graphs::export")
                .build(),
        );
        assert!(info.ends_with("INFO  [speedup_graphs] wrote chart"));

        let debug = logger.format(
            &Record::builder()
                .args(format_args!("peak"))
                .level(Level::Debug)
                .target("speedup_graphs::chart")
                .build(),
        );
        assert!(debug.ends_with("DEBUG [speedup_graphs::chart] peak"));
    }

    #[test]
    fn level_filter() {
        let logger = SimpleLogger {
            label: None,
            level: Level::Info,
        };
        let warn = Metadata::builder().level(Level::Warn).build();
        let trace = Metadata::builder().level(Level::Trace).build();
        assert!(logger.enabled(&warn));
        assert!(!logger.enabled(&trace));
    }
}
