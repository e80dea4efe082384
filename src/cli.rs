//! Pieces shared by the `cjpeg` and `djpeg` binaries: logging setup, stream
//! opening and exit handling.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::process::exit;

use log::{Level, error};

use crate::error::ToolError;

/// Exit status for usage errors and files that cannot be opened.
pub const EXIT_USAGE: i32 = 2;
/// Exit status for fatal errors during a pass.
pub const EXIT_FAILURE: i32 = 1;

/// Log level for a `-d` count.
pub fn log_level(trace_level: u8) -> Level {
    match trace_level {
        0 => Level::Warn,
        1 => Level::Info,
        2 => Level::Debug,
        _ => Level::Trace,
    }
}

/// One program's view of the terminal.
#[derive(Debug)]
pub struct Frontend {
    program: &'static str,
    logging: bool,
}

impl Frontend {
    /// Install the logger for `trace_level` and print the version banner
    /// when `-d` was given.
    pub fn new(program: &'static str, trace_level: u8) -> Self {
        let logging = match simple_logger::init_with_level(log_level(trace_level)) {
            Ok(()) => true,
            Err(e) => {
                eprintln!("{program}: could not set up logging: {e}");
                false
            }
        };
        if trace_level > 0 {
            eprintln!(
                "{program} (zenjpeg-tools) version {}",
                env!("CARGO_PKG_VERSION")
            );
        }
        Self { program, logging }
    }

    /// A frontend that reports straight to stderr.
    pub fn without_logger(program: &'static str) -> Self {
        Self {
            program,
            logging: false,
        }
    }

    pub fn program(&self) -> &'static str {
        self.program
    }

    /// Print `message` and exit with [`EXIT_USAGE`].
    pub fn usage_exit(&self, message: &str) -> ! {
        eprintln!("{}: {message}", self.program);
        exit(EXIT_USAGE);
    }

    /// The text reported for a fatal error.
    pub fn fatal_message(&self, err: &ToolError) -> String {
        format!("{}: {err}", self.program)
    }

    /// Report `err` and exit with [`EXIT_FAILURE`]. Goes to stderr when no
    /// logger could be installed.
    pub fn fatal(&self, err: &ToolError) -> ! {
        let message = self.fatal_message(err);
        if self.logging {
            error!("{message}");
        } else {
            eprintln!("{message}");
        }
        exit(EXIT_FAILURE);
    }

    /// Open `path` for reading, or stdin. An unopenable file is a usage exit.
    pub fn open_input(&self, path: Option<&Path>) -> Box<dyn Read> {
        match path {
            Some(path) => match File::open(path) {
                Ok(file) => Box::new(BufReader::new(file)),
                Err(e) => self.usage_exit(&format!("can't open {}: {e}", path.display())),
            },
            None => Box::new(BufReader::new(io::stdin())),
        }
    }

    /// Create `path` for writing, or stdout. An uncreatable file is a usage exit.
    pub fn open_output(&self, path: Option<&Path>) -> Box<dyn Write> {
        match path {
            Some(path) => match File::create(path) {
                Ok(file) => Box::new(BufWriter::new(file)),
                Err(e) => self.usage_exit(&format!("can't open {}: {e}", path.display())),
            },
            None => Box::new(BufWriter::new(io::stdout())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_count_raises_level() {
        assert_eq!(log_level(0), Level::Warn);
        assert_eq!(log_level(1), Level::Info);
        assert_eq!(log_level(2), Level::Debug);
        assert_eq!(log_level(3), Level::Trace);
        assert_eq!(log_level(9), Level::Trace);
    }

    #[test]
    fn fatal_message_names_program() {
        let frontend = Frontend::without_logger("cjpeg");
        assert_eq!(
            frontend.fatal_message(&ToolError::EmptyInput),
            "cjpeg: empty input file"
        );
        assert_eq!(frontend.program(), "cjpeg");
    }
}
