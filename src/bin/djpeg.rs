//! djpeg: decompress a JPEG file to PPM (color) or PGM (grayscale).
//!
//! ```text
//! djpeg [--grayscale] [-d] [inputfile [outputfile]]
//! ```

use std::io::Read;
use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use zenjpeg_tools::cli::Frontend;
use zenjpeg_tools::engine::ZuneJpegDecompressor;
use zenjpeg_tools::{Decompressor, PpmWriter, ToolError, jpeg_decompress};

const PROGRAM: &str = "djpeg";

#[rustfmt::skip]
fn create_cmd_args() -> Command {
    Command::new(PROGRAM)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Decompress a JPEG file to PPM/PGM")
        .arg(Arg::new("grayscale")
            .long("grayscale")
            .action(ArgAction::SetTrue)
            .help("Force grayscale (PGM) output"))
        .arg(Arg::new("debug")
            .short('d')
            .action(ArgAction::Count)
            .help_heading("LOGGING")
            .help("Print version banner; repeat for more verbose logging"))
        .arg(Arg::new("input")
            .value_parser(value_parser!(PathBuf))
            .help("Input file, stdin when absent"))
        .arg(Arg::new("output")
            .value_parser(value_parser!(PathBuf))
            .help("Output file, stdout when absent"))
}

fn run(frontend: &Frontend, options: &ArgMatches) -> Result<(), ToolError> {
    // the engine needs the whole file up front
    let mut data = Vec::new();
    frontend
        .open_input(options.get_one::<PathBuf>("input").map(PathBuf::as_path))
        .read_to_end(&mut data)?;
    if data.is_empty() {
        return Err(ToolError::EmptyInput);
    }
    let output = frontend.open_output(options.get_one::<PathBuf>("output").map(PathBuf::as_path));

    let mut engine = ZuneJpegDecompressor::new(data);
    engine.set_grayscale(options.get_flag("grayscale"));
    let info = engine.start_decompress()?;

    let mut dest = PpmWriter::new(output, &info)?;
    jpeg_decompress(&mut engine, &info, &mut dest)
}

fn main() {
    let options = create_cmd_args().get_matches();
    let frontend = Frontend::new(PROGRAM, options.get_count("debug"));

    if let Err(e) = run(&frontend, &options) {
        frontend.fatal(&e);
    }
}
