use std::time::{Duration, Instant};

use log::trace;
use num::Complex;

use crate::geometry::{aligned_steps, PlaneWindow, BYTES_PER_PIXEL};

/// `reference` is the canonical escape-time kernel that defines correct output
pub mod reference;

/// `accelerated` renders four columns at a time and must match `reference` exactly
pub mod accelerated;

pub use accelerated::AcceleratedKernel;
pub use reference::ReferenceKernel;

/// The kernel the production render is done with, chosen by the `accelerated` feature
#[cfg(feature = "accelerated")]
pub type ProductionKernel = AcceleratedKernel;

/// The kernel the production render is done with, chosen by the `accelerated` feature
#[cfg(not(feature = "accelerated"))]
pub type ProductionKernel = ReferenceKernel;

/// A point has escaped once the square of its magnitude reaches this
pub const ESCAPE_RADIUS_SQUARED: f32 = 4.0;

/// Number of palette entries reachable from an iteration count
pub const PALETTE_BUCKETS: u16 = 10;

/// Colors as (blue, green, red) indexed by iteration count bucket. The table has twelve
/// entries but only the first [PALETTE_BUCKETS] can be selected.
pub const PALETTE: [[u8; 3]; 12] = [
    [205, 116, 24],
    [238, 134, 28],
    [255, 144, 30],
    [34, 180, 238],
    [37, 193, 255],
    [0, 215, 255],
    [0, 102, 205],
    [0, 118, 238],
    [0, 127, 255],
    [44, 44, 238],
    [0, 0, 0],
    [0, 0, 0],
];

/// An escape-time renderer of a window of the complex plane.
///
/// `render` fills `pixels`, which must be exactly `width * height * 3` bytes for the grid
/// that `window` and `resolution` validate to, in row-major order: one row per imaginary
/// step from `i_start` and one column per real step from `r_start`. Pixels that do not
/// escape within `max_iterations` are left as they were, so callers pass a zeroed buffer
/// to get them black.
pub trait EscapeKernel {
    /// Name used when reporting on this kernel
    const NAME: &'static str;

    /// Render `window` at `resolution` into `pixels`
    fn render(window: &PlaneWindow, resolution: f32, max_iterations: i16, pixels: &mut [u8]);
}

/// Run kernel `K` and return how long it took, measured on a monotonic clock
pub fn timed_render<K: EscapeKernel>(
    window: &PlaneWindow,
    resolution: f32,
    max_iterations: i16,
    pixels: &mut [u8],
) -> Duration {
    let start = Instant::now();
    K::render(window, resolution, max_iterations, pixels);
    let elapsed = start.elapsed();
    trace!("'{}' kernel rendered in {:?}", K::NAME, elapsed);
    elapsed
}

/// Given the column and row of a pixel, return the point on the complex plane it samples
pub fn pixel_to_point(window: &PlaneWindow, resolution: f32, column: u32, row: u32) -> Complex<f32> {
    Complex {
        re: window.r_start + column as f32 * resolution,
        im: window.i_start + row as f32 * resolution,
    }
}

/// Return the color for a point that escaped after `iterations`, with `max_iterations > 0`
pub fn palette_color(iterations: u16, max_iterations: u16) -> [u8; 3] {
    PALETTE[usize::from((iterations % max_iterations) % PALETTE_BUCKETS)]
}

// Rows of `pixels`, each one `width` pixels wide, for the grid `window` spans
fn rows<'a>(
    window: &PlaneWindow,
    resolution: f32,
    pixels: &'a mut [u8],
) -> (u32, impl Iterator<Item = (u32, &'a mut [u8])>) {
    let width = aligned_steps(window.r_start, window.r_end, resolution);
    let height = aligned_steps(window.i_start, window.i_end, resolution);
    let row_bytes = (width as usize * BYTES_PER_PIXEL as usize).max(1);

    let rows = pixels
        .chunks_exact_mut(row_bytes)
        .take(height as usize)
        .enumerate()
        .map(|(row, bytes)| (row as u32, bytes));

    (width, rows)
}
