#![deny(missing_docs)]
#![warn(clippy::unwrap_used)]
//! `mandelbmp` renders the Mandelbrot set over a window of the complex plane into a bitmap file
//! and reports how the production kernel compares with the reference kernel.
//!
//! Use `mandelbmp --help` or `mandelbmp -h` at the command line to see the command line options,
//! or `mandelbmp test` to run the checks that invalid parameters are rejected.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::exit;
use std::str::FromStr;

use clap::{Arg, ArgMatches, Command};
use env_logger::Builder;
use log::{debug, info, LevelFilter};

use mandelbmp::comparison::ComparisonOutcome;
use mandelbmp::geometry::PlaneWindow;
use mandelbmp::info as mandelbmp_info;
use mandelbmp::render::{render, RenderParams, DEFAULT_DESTINATION};
use mandelbmp::validation_suite::run_suite;

use crate::errors::*;

/// We'll put our errors in an `errors` module, and other modules in this crate will
/// `use crate::errors::*;` to get access to everything `error_chain` creates.
pub mod errors;

const USAGE: &str = "Please use the format '[FILE] R_START R_END I_START I_END RESOLUTION MAX_ITERATIONS'";

/// What the command line asks for
#[derive(Debug, PartialEq)]
enum Invocation {
    /// Run the validation scenarios
    Suite,
    /// Render a bitmap
    Render(RenderParams),
}

/// Main for mandelbmp binary - call `run()` and print any error that results or exit silently if OK
fn main() {
    match run() {
        Err(ref e) => {
            eprintln!("{}", e);
            for e in e.iter().skip(1) {
                eprintln!("caused by: {}", e);
            }
            let _ = io::stderr().flush();
            exit(1);
        }
        Ok(_) => exit(0),
    }
}

fn run() -> Result<()> {
    let matches = get_matches();

    let default = String::from("error");
    let verbosity = matches.get_one::<String>("verbosity").unwrap_or(&default);
    let level = LevelFilter::from_str(verbosity).unwrap_or(LevelFilter::Error);
    let mut builder = Builder::from_default_env();
    builder.filter_level(level).init();

    info!("'{}' version {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    info!("'mandelbmp' library version {} rendering with the '{}' kernel",
          mandelbmp_info::version(), mandelbmp_info::production_kernel());

    let values: Vec<String> = matches
        .get_many::<String>("parameters")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    match parse_invocation(&values)? {
        Invocation::Suite => {
            println!("Starting tests...");
            run_suite(Path::new(DEFAULT_DESTINATION), &mut io::stdout())?;
        }
        Invocation::Render(params) => render_bitmap(&params)?,
    }

    Ok(())
}

// Render the bitmap and tell the user how it went
fn render_bitmap(params: &RenderParams) -> Result<()> {
    let summary = render(params)?;

    println!("   Rendering took {:.6} seconds.", summary.render_time.as_secs_f64());
    match summary.comparison {
        ComparisonOutcome::Compared(report) => {
            for line in report.to_string().lines() {
                println!("   {}", line);
            }
        }
        ComparisonOutcome::Skipped => {
            eprintln!("   The comparison with the reference kernel was skipped for lack of memory.");
        }
    }
    println!("   Image '{}' was created successfully.", params.destination.display());
    io::stdout().flush()?;

    Ok(())
}

// Turn the positional values into what to do:
//  - none: render with the default parameters
//  - "test": run the validation suite
//  - six numbers: render them to the default file
//  - a file name and six numbers: render them to that file
fn parse_invocation(values: &[String]) -> Result<Invocation> {
    let mut params = RenderParams::default();

    let numbers = match values.len() {
        0 => return Ok(Invocation::Render(params)),
        1 if values[0] == "test" => return Ok(Invocation::Suite),
        6 => values,
        7 => {
            params.destination = destination(&values[0]);
            &values[1..]
        }
        _ => bail!(USAGE),
    };

    let number = |index: usize| -> Result<f32> {
        numbers[index]
            .trim()
            .parse::<f32>()
            .chain_err(|| format!("Could not parse '{}' as a number. {}", numbers[index], USAGE))
    };

    params.window = PlaneWindow::new(number(0)?, number(1)?, number(2)?, number(3)?);
    params.resolution = number(4)?;
    // the iteration count may be given as a real number, the fraction is dropped
    params.max_iterations = number(5)? as i16;
    debug!("Parsed parameters {:?}", params);

    Ok(Invocation::Render(params))
}

// Give a destination without an extension the `.bmp` extension
fn destination(name: &str) -> PathBuf {
    let path = PathBuf::from(name);
    if path.extension().is_some() {
        path
    } else {
        path.with_extension("bmp")
    }
}

// Parse the command line arguments using clap
fn get_matches() -> ArgMatches {
    let app = Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render the Mandelbrot set to a bitmap and compare the kernel with the reference one");

    let app = app
        .arg(Arg::new("verbosity")
            .short('v')
            .long("verbosity")
            .number_of_values(1)
            .value_name("VERBOSITY_LEVEL")
            .help("Set verbosity level for output (trace, debug, info, warn, default: error)"))
        .arg(Arg::new("parameters")
            .num_args(0..=7)
            .allow_negative_numbers(true)
            .value_name("PARAMETER")
            .help("'test', or [FILE] R_START R_END I_START I_END RESOLUTION MAX_ITERATIONS"));

    app.get_matches()
}
