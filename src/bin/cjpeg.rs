//! cjpeg: compress a PPM/PGM or Targa image to JPEG.
//!
//! ```text
//! cjpeg [-Q quality] [-o] [-T] [-I] [-a] [-d] [inputfile [outputfile]]
//! ```
//!
//! Input defaults to stdin and output to stdout.

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use log::info;
use zenjpeg_tools::cli::Frontend;
use zenjpeg_tools::engine::JpegEncoderCompressor;
use zenjpeg_tools::{
    Capabilities, CompressParams, DEFAULT_QUALITY, PushbackReader, ToolError, jpeg_compress,
    open_source, select_file_type,
};

const PROGRAM: &str = "cjpeg";

#[rustfmt::skip]
fn create_cmd_args() -> Command {
    Command::new(PROGRAM)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compress a PPM/PGM or Targa image to a JPEG file")
        .arg(Arg::new("quality")
            .short('Q')
            .value_name("0..100")
            .help("Compression quality")
            .value_parser(value_parser!(u32).range(0..=100)))
        .arg(Arg::new("optimize")
            .short('o')
            .action(ArgAction::SetTrue)
            .help("Optimize entropy coding parameters"))
        .arg(Arg::new("targa")
            .short('T')
            .action(ArgAction::SetTrue)
            .help("Input file is Targa format"))
        .arg(Arg::new("noninterleaved")
            .short('I')
            .action(ArgAction::SetTrue)
            .help("Create a non-interleaved (multiple-scan) file"))
        .arg(Arg::new("arithmetic")
            .short('a')
            .action(ArgAction::SetTrue)
            .help("Use arithmetic coding"))
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

/// Turn the command line into compression parameters, rejecting options
/// this build has no support for.
fn parse_options(frontend: &Frontend, options: &ArgMatches, caps: &Capabilities) -> CompressParams {
    let mut params = CompressParams::default();
    params.trace_level = options.get_count("debug");

    let quality = options
        .get_one::<u32>("quality")
        .copied()
        .unwrap_or(u32::from(DEFAULT_QUALITY));
    params.set_quality(quality);

    if options.get_flag("noninterleaved") {
        if !caps.multiscan {
            frontend.usage_exit("sorry, multiple-scan support was not compiled");
        }
        params.interleave = false;
    }
    if options.get_flag("arithmetic") {
        if !caps.arith_coding {
            frontend.usage_exit("sorry, arithmetic coding not supported");
        }
        params.arith_code = true;
    }
    if options.get_flag("optimize") {
        if !caps.optimize_coding {
            frontend.usage_exit("sorry, entropy optimization was not compiled");
        }
        params.optimize_coding = true;
    }
    params
}

fn run(
    frontend: &Frontend,
    options: &ArgMatches,
    mut params: CompressParams,
    caps: &Capabilities,
) -> Result<(), ToolError> {
    let input = frontend.open_input(options.get_one::<PathBuf>("input").map(PathBuf::as_path));
    let mut output = frontend.open_output(options.get_one::<PathBuf>("output").map(PathBuf::as_path));

    let mut input = PushbackReader::new(input);
    let format = select_file_type(&mut input, options.get_flag("targa"), caps)?;
    info!("Reading {format} input");

    let mut source = open_source(format, input, caps, None)?;
    let mut engine = JpegEncoderCompressor::new();
    jpeg_compress(&mut engine, &mut params, source.as_mut(), &mut output)
}

fn main() {
    let options = create_cmd_args().get_matches();
    let caps = Capabilities::default();

    let frontend = Frontend::new(PROGRAM, options.get_count("debug"));
    let params = parse_options(&frontend, &options, &caps);

    if let Err(e) = run(&frontend, &options, params, &caps) {
        frontend.fatal(&e);
    }
}
