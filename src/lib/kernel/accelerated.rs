use crate::geometry::{PlaneWindow, ALIGNMENT, BYTES_PER_PIXEL};

use super::{palette_color, pixel_to_point, rows, EscapeKernel, ESCAPE_RADIUS_SQUARED};

const LANES: usize = ALIGNMENT as usize;

/// Escape-time kernel that iterates [LANES] horizontally adjacent pixels together.
///
/// Grid widths are always a multiple of the lane count, so a row splits into whole groups.
/// Every lane does the same single precision operations in the same order as the reference
/// kernel, so the two produce identical images.
pub struct AcceleratedKernel;

// Iterate a group of points together, returning the escape count of each or `None`
#[allow(clippy::neg_cmp_op_on_partial_ord)]
fn escape_times(re: [f32; LANES], im: [f32; LANES], limit: u16) -> [Option<u16>; LANES] {
    let mut z_re = [0.0f32; LANES];
    let mut z_im = [0.0f32; LANES];
    let mut escaped = [None; LANES];
    let mut active = LANES;

    for i in 0..limit {
        for lane in 0..LANES {
            let next_re = z_re[lane] * z_re[lane] - z_im[lane] * z_im[lane] + re[lane];
            let next_im = z_re[lane] * z_im[lane] + z_im[lane] * z_re[lane] + im[lane];

            if escaped[lane].is_none() {
                z_re[lane] = next_re;
                z_im[lane] = next_im;
                // NaN counts as escaped
                if !(next_re * next_re + next_im * next_im < ESCAPE_RADIUS_SQUARED) {
                    escaped[lane] = Some(i);
                    active -= 1;
                }
            }
        }

        if active == 0 {
            break;
        }
    }

    escaped
}

impl EscapeKernel for AcceleratedKernel {
    const NAME: &'static str = "accelerated";

    fn render(window: &PlaneWindow, resolution: f32, max_iterations: i16, pixels: &mut [u8]) {
        let limit = u16::try_from(max_iterations).unwrap_or(0);
        let (width, rows) = rows(window, resolution, pixels);
        let group_bytes = LANES * BYTES_PER_PIXEL as usize;

        for (row, bytes) in rows {
            let im = pixel_to_point(window, resolution, 0, row).im;

            for (group, group_pixels) in (0..width / LANES as u32).zip(bytes.chunks_exact_mut(group_bytes)) {
                let first_column = group * LANES as u32;
                let mut re = [0.0f32; LANES];
                for (lane, value) in re.iter_mut().enumerate() {
                    *value = pixel_to_point(window, resolution, first_column + lane as u32, row).re;
                }

                let escaped = escape_times(re, [im; LANES], limit);

                for (pixel, iterations) in group_pixels.chunks_exact_mut(BYTES_PER_PIXEL as usize).zip(escaped) {
                    if let Some(iterations) = iterations {
                        pixel.copy_from_slice(&palette_color(iterations, limit));
                    }
                }
            }
        }
    }
}
