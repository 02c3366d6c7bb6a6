use std::fmt;
use std::time::Duration;

use log::{info, warn};

use crate::errors::*;
use crate::geometry::{validate, PlaneWindow, BYTES_PER_PIXEL};
use crate::kernel::{timed_render, EscapeKernel, ProductionKernel, ReferenceKernel};
use crate::pixel_buffer::PixelBuffer;

/// Which kernel was faster, and by how much
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
    /// The kernel under test beat the reference kernel by the given time
    KernelFaster(Duration),
    /// The reference kernel beat the kernel under test by the given time
    ReferenceFaster(Duration),
    /// Both took exactly the same time
    Equal,
}

/// The agreement and relative speed of a kernel and the reference kernel over the same window
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    /// Name of the kernel compared with the reference kernel
    pub kernel: &'static str,
    /// Number of pixels whose first byte differs between the two renders
    pub mismatches: usize,
    /// Number of pixels compared
    pub pixel_count: usize,
    /// Time the kernel under test took to render
    pub kernel_time: Duration,
    /// Time the reference kernel took to render
    pub reference_time: Duration,
}

impl ComparisonReport {
    /// Percentage of pixels that agree
    pub fn similarity(&self) -> f64 {
        if self.pixel_count == 0 {
            return 100.0;
        }
        100.0 - (self.mismatches as f64 / self.pixel_count as f64) * 100.0
    }

    /// Which kernel was faster
    pub fn speed(&self) -> Speed {
        if self.reference_time > self.kernel_time {
            Speed::KernelFaster(self.reference_time - self.kernel_time)
        } else if self.kernel_time > self.reference_time {
            Speed::ReferenceFaster(self.kernel_time - self.reference_time)
        } else {
            Speed::Equal
        }
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Similarity to the reference kernel is {:.4} percent.", self.similarity())?;
        if self.kernel == ReferenceKernel::NAME {
            return write!(
                f,
                "Both runs used the reference kernel, taking {:.6} and {:.6} seconds.",
                self.kernel_time.as_secs_f64(),
                self.reference_time.as_secs_f64()
            );
        }

        match self.speed() {
            Speed::KernelFaster(by) => write!(
                f,
                "The {} kernel is {:.6} seconds faster than the reference kernel.",
                self.kernel,
                by.as_secs_f64()
            ),
            Speed::ReferenceFaster(by) => write!(
                f,
                "The reference kernel is {:.6} seconds faster than the {} kernel.",
                by.as_secs_f64(),
                self.kernel
            ),
            Speed::Equal => write!(f, "Both kernels are equally fast."),
        }
    }
}

/// The result of trying to compare a render with the reference kernel
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonOutcome {
    /// Both renders were made and compared
    Compared(ComparisonReport),
    /// There was not enough memory for the comparison buffer, so no comparison was made
    Skipped,
}

/// Count the pixels whose first byte differs between `rendered` and `expected`.
/// Only the blue channel of each triplet is compared.
pub fn count_mismatches(rendered: &[u8], expected: &[u8]) -> usize {
    let pixel_size = BYTES_PER_PIXEL as usize;
    rendered
        .chunks_exact(pixel_size)
        .zip(expected.chunks_exact(pixel_size))
        .filter(|(left, right)| left[0] != right[0])
        .count()
}

/// Render the same window with the reference kernel and compare it with `rendered`, which
/// kernel `K` produced in `kernel_time`.
///
/// Failing to allocate the comparison buffer is not an error, the outcome is just `Skipped`.
pub fn compare_with_reference<K: EscapeKernel>(
    window: &PlaneWindow,
    resolution: f32,
    max_iterations: i16,
    rendered: &PixelBuffer,
    kernel_time: Duration,
) -> ComparisonOutcome {
    let comparison = PixelBuffer::allocate(*rendered.grid(), AllocationTarget::Comparison);
    compare_into::<K>(window, resolution, max_iterations, rendered, kernel_time, comparison)
}

pub(crate) fn compare_into<K: EscapeKernel>(
    window: &PlaneWindow,
    resolution: f32,
    max_iterations: i16,
    rendered: &PixelBuffer,
    kernel_time: Duration,
    comparison: Result<PixelBuffer>,
) -> ComparisonOutcome {
    let mut comparison = match comparison {
        Ok(buffer) => buffer,
        Err(e) => {
            warn!("{} The comparison with the reference kernel is skipped.", e);
            return ComparisonOutcome::Skipped;
        }
    };

    let reference_time = timed_render::<ReferenceKernel>(
        window,
        resolution,
        max_iterations,
        comparison.as_mut_bytes(),
    );

    let report = ComparisonReport {
        kernel: K::NAME,
        mismatches: count_mismatches(rendered.as_bytes(), comparison.as_bytes()),
        pixel_count: rendered.grid().pixel_count(),
        kernel_time,
        reference_time,
    };
    info!(
        "{} of {} pixels differ between the '{}' and reference kernels",
        report.mismatches, report.pixel_count, report.kernel
    );

    ComparisonOutcome::Compared(report)
}

/// Render a window with kernel `K` and with the reference kernel and compare the two.
///
/// Invalid parameters and failing to allocate the buffer for `K` are errors, failing to
/// allocate the comparison buffer gives a `Skipped` outcome.
pub fn compare_kernels<K: EscapeKernel>(
    window: &PlaneWindow,
    resolution: f32,
    max_iterations: i16,
) -> Result<ComparisonOutcome> {
    let grid = validate(window, resolution, max_iterations)?;
    let mut rendered = PixelBuffer::allocate(grid, AllocationTarget::Primary)?;
    let kernel_time = timed_render::<K>(window, resolution, max_iterations, rendered.as_mut_bytes());

    Ok(compare_with_reference::<K>(
        window,
        resolution,
        max_iterations,
        &rendered,
        kernel_time,
    ))
}

/// Compare the production kernel with the reference kernel over a window
pub fn compare(window: &PlaneWindow, resolution: f32, max_iterations: i16) -> Result<ComparisonOutcome> {
    compare_kernels::<ProductionKernel>(window, resolution, max_iterations)
}
