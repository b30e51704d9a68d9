//! Command line parser for the floppy builder
//!
//! Switches start with `-` or `/` and carry their value after a colon, for
//! example `-boot:boot.bin` or `/o:floppy.img`. Every other argument names a
//! source file.

use core::fmt;
use std::path::PathBuf;

use crate::builder::BuildOptions;

/// Parsed invocation
#[derive(Debug, PartialEq)]
pub enum Invocation {
    Build(CommandLine),
    Help,
}

/// Options of a build run
#[derive(Debug, Default, PartialEq)]
pub struct CommandLine {
    pub options: BuildOptions,
    pub verbose: bool,
}

/// Reasons a command line is rejected
#[derive(Debug, PartialEq, Eq)]
pub enum UsageError {
    /// The same switch was given twice
    Duplicate(String),
    /// The switch is not known
    Unknown(String),
    /// The switch needs a `:value`
    MissingValue(String),
    /// No `-out:` switch
    MissingOutput,
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate(name) => write!(f, "option '{}' given more than once", name),
            Self::Unknown(name) => write!(f, "unknown option '{}'", name),
            Self::MissingValue(name) => {
                write!(f, "option '{}' needs a value (-{}:<path>)", name, name)
            }
            Self::MissingOutput => write!(f, "no output file given (-out:<path>)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Switch {
    Boot,
    In,
    Out,
    Verbose,
    Help,
}

impl Switch {
    fn from_name(name: &str) -> Option<Self> {
        const NAMES: [(&str, Switch); 9] = [
            ("boot", Switch::Boot),
            ("b", Switch::Boot),
            ("in", Switch::In),
            ("i", Switch::In),
            ("out", Switch::Out),
            ("o", Switch::Out),
            ("verbose", Switch::Verbose),
            ("v", Switch::Verbose),
            ("help", Switch::Help),
        ];

        if name == "h" || name == "?" {
            return Some(Switch::Help);
        }

        NAMES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
            .map(|&(_, switch)| switch)
    }
}

/// Split `-name:value` into its name and optional value.
///
/// A `/` prefix only marks a switch when the name is known, so absolute
/// paths pass through as source files.
fn split_switch(arg: &str) -> Option<(&str, Option<&str>)> {
    let prefix = arg.chars().next()?;
    if arg.len() < 2 || (prefix != '-' && prefix != '/') {
        return None;
    }

    let body = &arg[1..];
    let (name, value) = match body.split_once(':') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    };

    if prefix == '/' && Switch::from_name(name).is_none() {
        return None;
    }

    Some((name, value))
}

fn set_once(slot: &mut Option<PathBuf>, name: &str, value: Option<&str>) -> Result<(), UsageError> {
    if slot.is_some() {
        return Err(UsageError::Duplicate(name.to_ascii_lowercase()));
    }

    match value {
        Some(v) if !v.is_empty() => {
            *slot = Some(PathBuf::from(v));
            Ok(())
        }
        _ => Err(UsageError::MissingValue(name.to_ascii_lowercase())),
    }
}

/// Parse the arguments that follow the program name
pub fn parse_args<I, S>(args: I) -> Result<Invocation, UsageError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut boot = None;
    let mut source_dir = None;
    let mut output = None;
    let mut sources = Vec::new();
    let mut verbose = false;

    for arg in args {
        let arg = arg.as_ref();

        let Some((name, value)) = split_switch(arg) else {
            sources.push(PathBuf::from(arg));
            continue;
        };

        match Switch::from_name(name) {
            Some(Switch::Boot) => set_once(&mut boot, name, value)?,
            Some(Switch::In) => set_once(&mut source_dir, name, value)?,
            Some(Switch::Out) => set_once(&mut output, name, value)?,
            Some(Switch::Verbose) => verbose = true,
            Some(Switch::Help) => return Ok(Invocation::Help),
            None => return Err(UsageError::Unknown(name.into())),
        }
    }

    let output = output.ok_or(UsageError::MissingOutput)?;

    Ok(Invocation::Build(CommandLine {
        options: BuildOptions {
            boot_sector: boot,
            source_dir,
            sources,
            output,
        },
        verbose,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(args: &[&str]) -> CommandLine {
        match parse_args(args) {
            Ok(Invocation::Build(cmd)) => cmd,
            other => panic!("expected a build, got {:?}", other),
        }
    }

    #[test]
    fn test_full_command_line() {
        let cmd = build(&[
            "-b:boot.bin",
            "kernel.sys",
            "/O:floppy.img",
            "-in:content",
            "readme.txt",
        ]);

        assert_eq!(cmd.options.boot_sector, Some(PathBuf::from("boot.bin")));
        assert_eq!(cmd.options.source_dir, Some(PathBuf::from("content")));
        assert_eq!(cmd.options.output, PathBuf::from("floppy.img"));
        assert_eq!(
            cmd.options.sources,
            vec![PathBuf::from("kernel.sys"), PathBuf::from("readme.txt")]
        );
        assert!(!cmd.verbose);
    }

    #[test]
    fn test_absolute_paths_are_sources() {
        let cmd = build(&["/home/user/kernel.sys", "-out:/tmp/floppy.img", "-V"]);
        assert_eq!(cmd.options.sources, vec![PathBuf::from("/home/user/kernel.sys")]);
        assert_eq!(cmd.options.output, PathBuf::from("/tmp/floppy.img"));
        assert!(cmd.verbose);
    }

    #[test]
    fn test_help() {
        assert_eq!(parse_args(["-?"]), Ok(Invocation::Help));
        assert_eq!(parse_args(["/help", "-o:x.img"]), Ok(Invocation::Help));
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            parse_args(["-o:a.img", "-out:b.img"]),
            Err(UsageError::Duplicate("out".into()))
        );
        assert_eq!(parse_args(["-x:1", "-o:a.img"]), Err(UsageError::Unknown("x".into())));
        assert_eq!(parse_args(["-boot", "-o:a.img"]), Err(UsageError::MissingValue("boot".into())));
        assert_eq!(parse_args(["kernel.sys"]), Err(UsageError::MissingOutput));
    }
}
