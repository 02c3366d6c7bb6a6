use std::io::Write;
use std::mem::discriminant;
use std::path::Path;

use log::{debug, error};

use crate::errors::*;
use crate::geometry::{validate, PlaneWindow};
use crate::render::{render, RenderParams};

/// Invocations with valid parameters worth trying out by hand after the suite passes
pub const RECOMMENDED_INVOCATIONS: [&str; 4] = [
    "mandelbmp -2 1 -1 1 0.001 510",
    "mandelbmp 0.25 0.5 0.25 0.5 0.0005 510",
    "mandelbmp -2 -1 -1 0 0.05 127",
    "mandelbmp -2 1 -1 1 0.005 5000",
];

/// A set of invalid parameters and the error they must be rejected with
pub struct Scenario {
    /// The command line that passes these parameters
    pub command_line: &'static str,
    /// The part of the complex plane to render
    pub window: PlaneWindow,
    /// Distance between pixels
    pub resolution: f32,
    /// Maximum number of iterations
    pub max_iterations: i16,
    /// The error validation must fail with
    pub expected: ErrorKind,
}

impl Scenario {
    fn new(command_line: &'static str, bounds: [f32; 4], resolution: f32, max_iterations: i16,
           expected: ErrorKind) -> Self {
        Scenario {
            command_line,
            window: PlaneWindow::new(bounds[0], bounds[1], bounds[2], bounds[3]),
            resolution,
            max_iterations,
            expected,
        }
    }

    // Run the scenario, writing what was expected and what happened to `out`.
    // Validation has to fail with the expected error, and so does the full render.
    fn run(&self, destination: &Path, out: &mut dyn Write) -> Result<bool> {
        writeln!(out, "Input: {}", self.command_line)?;
        writeln!(out, "Expected:\n   {}", self.expected)?;

        let matches = match validate(&self.window, self.resolution, self.max_iterations) {
            Ok(grid) => {
                writeln!(out, "Actual:\n   parameters accepted, grid {}", grid)?;
                false
            }
            Err(e) => {
                writeln!(out, "Actual:\n   {}", e)?;
                discriminant(e.kind()) == discriminant(&self.expected)
            }
        };

        let params = RenderParams {
            destination: destination.to_path_buf(),
            window: self.window,
            resolution: self.resolution,
            max_iterations: self.max_iterations,
        };

        Ok(matches && render(&params).is_err())
    }
}

/// The fixed, ordered table of invalid inputs the suite checks
pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("mandelbmp -2.5 1 -1 1 0.005 255", [-2.5, 1.0, -1.0, 1.0], 0.005, 255,
                      ErrorKind::InvalidRealStart),
        Scenario::new("mandelbmp -2 2 -1 1 0.005 255", [-2.0, 2.0, -1.0, 1.0], 0.005, 255,
                      ErrorKind::InvalidRealEnd),
        Scenario::new("mandelbmp -2 1 -1.75 1 0.005 255", [-2.0, 1.0, -1.75, 1.0], 0.005, 255,
                      ErrorKind::InvalidImaginaryStart),
        Scenario::new("mandelbmp -2 1 -1 1000 0.005 255", [-2.0, 1.0, -1.0, 1000.0], 0.005, 255,
                      ErrorKind::InvalidImaginaryEnd),
        Scenario::new("mandelbmp -2 1 -1 1 -0.878 255", [-2.0, 1.0, -1.0, 1.0], -0.878, 255,
                      ErrorKind::InvalidResolution),
        Scenario::new("mandelbmp -2 1 -1 1 0 255", [-2.0, 1.0, -1.0, 1.0], 0.0, 255,
                      ErrorKind::InvalidResolution),
        Scenario::new("mandelbmp -2 1 -1 1 0.005 -107", [-2.0, 1.0, -1.0, 1.0], 0.005, -107,
                      ErrorKind::InvalidIterationCount),
        Scenario::new("mandelbmp -2 1 -1 1 0.0000001 255", [-2.0, 1.0, -1.0, 1.0], 0.000_000_1, 255,
                      ErrorKind::DimensionOverflow),
        Scenario::new("mandelbmp -2 -2 -1 1 0.005 255", [-2.0, -2.0, -1.0, 1.0], 0.005, 255,
                      ErrorKind::DimensionOverflow),
        Scenario::new("mandelbmp -2 1 -1 -1 0.005 255", [-2.0, 1.0, -1.0, -1.0], 0.005, 255,
                      ErrorKind::DimensionOverflow),
        Scenario::new("mandelbmp 0 0 0 0 0 0", [0.0, 0.0, 0.0, 0.0], 0.0, 0,
                      ErrorKind::InvalidResolution),
    ]
}

/// Run `scenarios` in order, reporting on each to `out`, and stop at the first that does not
/// behave as expected with a `ScenarioFailed` error naming it (numbered from 1).
///
/// `destination` is where a scenario's render would write its bitmap, none should get that far.
pub fn run_scenarios(scenarios: &[Scenario], destination: &Path, out: &mut dyn Write) -> Result<()> {
    for (index, scenario) in scenarios.iter().enumerate().map(|(i, s)| (i + 1, s)) {
        writeln!(out, "{}) Test", index)?;
        if !scenario.run(destination, out)? {
            error!("Validation scenario {} '{}' failed", index, scenario.command_line);
            writeln!(out, "Test {}) failed! Aborting...", index)?;
            out.flush()?;
            bail!(ErrorKind::ScenarioFailed(index));
        }
        writeln!(out, "Test {}) succeeded!\n", index)?;
        debug!("Validation scenario {} passed", index);
    }

    writeln!(out, "The following are recommended for checking valid parameters:")?;
    for invocation in RECOMMENDED_INVOCATIONS {
        writeln!(out, "   {}", invocation)?;
    }
    writeln!(out, "They are compared with the reference kernel automatically.")?;
    out.flush()?;

    Ok(())
}

/// Run the fixed table of validation scenarios, reporting to `out`
pub fn run_suite(destination: &Path, out: &mut dyn Write) -> Result<()> {
    run_scenarios(&scenarios(), destination, out)
}
