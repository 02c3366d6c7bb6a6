use num::Complex;

use crate::geometry::{PlaneWindow, BYTES_PER_PIXEL};

use super::{palette_color, pixel_to_point, rows, EscapeKernel, ESCAPE_RADIUS_SQUARED};

/// The reference escape-time kernel, one pixel at a time in single precision
pub struct ReferenceKernel;

/// Try to determine if `c` is in the Mandelbrot set, using at most `limit` iterations of
/// `z = z * z + c` from `z = 0` to decide.
///
/// If `c` escapes, return `Some(i)` where `i` is the number of iterations that stayed within
/// the radius two circle before it left. If the limit is reached without escaping return `None`.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub fn escape_time(c: Complex<f32>, limit: u16) -> Option<u16> {
    let mut z = Complex { re: 0.0, im: 0.0 };

    for i in 0..limit {
        z = z * z + c;
        // NaN counts as escaped
        if !(z.norm_sqr() < ESCAPE_RADIUS_SQUARED) {
            return Some(i);
        }
    }

    None
}

impl EscapeKernel for ReferenceKernel {
    const NAME: &'static str = "reference";

    fn render(window: &PlaneWindow, resolution: f32, max_iterations: i16, pixels: &mut [u8]) {
        let limit = u16::try_from(max_iterations).unwrap_or(0);
        let (width, rows) = rows(window, resolution, pixels);

        for (row, bytes) in rows {
            for (column, pixel) in (0..width).zip(bytes.chunks_exact_mut(BYTES_PER_PIXEL as usize)) {
                let point = pixel_to_point(window, resolution, column, row);
                if let Some(iterations) = escape_time(point, limit) {
                    pixel.copy_from_slice(&palette_color(iterations, limit));
                }
            }
        }
    }
}
