//! Command-line front end
//!
//! Parses the arguments, runs one build and maps the outcome to an exit
//! status:
//! - `0` image written
//! - `1` build failed, nothing written
//! - `2` bad command line

pub mod logger;
pub mod parser;

pub use logger::ConsoleLogger;
pub use parser::{parse_args, CommandLine, Invocation, UsageError};

extern crate alloc;
use alloc::format;

use crate::builder;

/// Exit status of a successful build
pub const EXIT_OK: i32 = 0;
/// Exit status when the build fails
pub const EXIT_FAILURE: i32 = 1;
/// Exit status for a rejected command line
pub const EXIT_USAGE: i32 = 2;

/// Destination du texte affiché (usage, erreurs de ligne de commande)
pub trait Output {
    fn write_str(&mut self, s: &str);

    fn write_line(&mut self, s: &str) {
        self.write_str(s);
        self.write_str("\n");
    }
}

#[cfg(test)]
pub struct StringOutput {
    pub buffer: alloc::string::String,
}

#[cfg(test)]
impl StringOutput {
    pub fn new() -> Self {
        StringOutput {
            buffer: alloc::string::String::new(),
        }
    }
}

#[cfg(test)]
impl Output for StringOutput {
    fn write_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }
}

/// Print the option summary
pub fn print_usage<O: Output>(out: &mut O) {
    out.write_line(&format!("floppy-builder {}", crate::VERSION));
    out.write_line("");
    out.write_line("Options:");
    out.write_line("-boot:<path>        Path to the boot sector image.");
    out.write_line("-in:<path>          Path to a directory whose contents to place on the floppy.");
    out.write_line("-out:<path>         Path to the output image file.");
    out.write_line("-verbose            Report every file placed on the floppy.");
    out.write_line("-help               Show this message.");
    out.write_line("");
    out.write_line("Additional unnamed arguments refer to individual files to include in the image.");
}

/// Run the builder for `args` (program name excluded) and return the exit status
pub fn run<O, I, S>(args: I, out: &mut O) -> i32
where
    O: Output,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let cmd = match parse_args(args) {
        Ok(Invocation::Build(cmd)) => cmd,
        Ok(Invocation::Help) => {
            print_usage(out);
            return EXIT_OK;
        }
        Err(e) => {
            out.write_line(&format!("Error : {}", e));
            print_usage(out);
            return EXIT_USAGE;
        }
    };

    log::set_max_level(if cmd.verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    });

    match builder::run(&cmd.options) {
        Ok(()) => EXIT_OK,
        Err(e) => {
            log::error!("{}", e);
            EXIT_FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_prints_usage() {
        let mut out = StringOutput::new();
        assert_eq!(run(["-help"], &mut out), EXIT_OK);
        assert!(out.buffer.contains("-out:<path>"));
    }

    #[test]
    fn test_bad_command_line() {
        let mut out = StringOutput::new();
        assert_eq!(run(["kernel.sys"], &mut out), EXIT_USAGE);
        assert!(out.buffer.starts_with("Error : no output file given"));
        assert!(out.buffer.contains("Options:"));
    }

    #[test]
    fn test_failed_build_writes_nothing() {
        let dir = std::env::temp_dir().join(format!("floppy-builder-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let output = dir.join("out.img");
        let _ = std::fs::remove_file(&output);

        let boot = format!("-boot:{}", dir.join("no-such-boot.bin").display());
        let out_arg = format!("-out:{}", output.display());

        let mut out = StringOutput::new();
        assert_eq!(run([boot.as_str(), out_arg.as_str()], &mut out), EXIT_FAILURE);
        assert!(!output.exists());
    }
}
