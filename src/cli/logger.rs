//! Console logger for the `log` facade
//!
//! Warnings keep the `Warning : ` prefix of the build tool output so build
//! pipelines can match on them.

use std::io::Write;

use log::{Level, Metadata, Record};

pub struct ConsoleLogger;

impl ConsoleLogger {
    fn prefix(level: Level) -> &'static str {
        match level {
            Level::Error => "Error : ",
            Level::Warn => "Warning : ",
            _ => "",
        }
    }
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format!("{}{}", Self::prefix(record.level()), record.args());
        if record.level() == Level::Error {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}
