//! Floppy builder - programme en ligne de commande

use std::io::{self, Write};

use floppy_builder::cli::{self, ConsoleLogger, Output};

static LOGGER: ConsoleLogger = ConsoleLogger;

struct ConsoleOutput;

impl Output for ConsoleOutput {
    fn write_str(&mut self, s: &str) {
        print!("{}", s);
        let _ = io::stdout().flush();
    }

    fn write_line(&mut self, s: &str) {
        println!("{}", s);
    }
}

fn main() {
    if log::set_logger(&LOGGER).is_err() {
        eprintln!("Error : logger already installed");
    }
    log::set_max_level(log::LevelFilter::Warn);

    let status = cli::run(std::env::args().skip(1), &mut ConsoleOutput);
    std::process::exit(status);
}
