use std::fmt;
use std::ops::RangeInclusive;

use log::debug;

use crate::errors::*;

/// Legal values for the real-axis bounds of a `PlaneWindow`
pub const REAL_RANGE: RangeInclusive<f32> = -2.0..=1.0;
/// Legal values for the imaginary-axis bounds of a `PlaneWindow`
pub const IMAGINARY_RANGE: RangeInclusive<f32> = -1.0..=1.0;
/// Width and height are truncated down to a multiple of this
pub const ALIGNMENT: u32 = 4;
/// Bytes per pixel: one blue, one green and one red byte
pub const BYTES_PER_PIXEL: u32 = 3;
/// Upper bound on the size of the pixel data of an image
pub const MAX_IMAGE_BYTES: u32 = 1_500_000_000;

/// The rectangular region of the complex plane to render.
///
/// Row 0 of the rendered image is at `i_start` and column 0 is at `r_start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneWindow {
    /// Real value of the first column
    pub r_start: f32,
    /// Real value the columns step towards
    pub r_end: f32,
    /// Imaginary value of the first row
    pub i_start: f32,
    /// Imaginary value the rows step towards
    pub i_end: f32,
}

impl PlaneWindow {
    /// Create a new `PlaneWindow` from its four bounds
    pub fn new(r_start: f32, r_end: f32, i_start: f32, i_end: f32) -> Self {
        PlaneWindow {
            r_start,
            r_end,
            i_start,
            i_end,
        }
    }
}

impl Default for PlaneWindow {
    fn default() -> Self {
        PlaneWindow::new(-2.0, 1.0, -1.0, 1.0)
    }
}

impl fmt::Display for PlaneWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}, {}] x [{}i, {}i]",
            self.r_start, self.r_end, self.i_start, self.i_end
        )
    }
}

/// The integral image size derived from a `PlaneWindow` and a resolution.
///
/// A `PixelGrid` can only be obtained through [validate], so both sides are non-zero
/// multiples of [ALIGNMENT] and the pixel data size fits in a `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
}

impl PixelGrid {
    /// Number of columns
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels in the image
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Number of bytes in one unpadded row of pixels
    pub fn row_bytes(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL as usize
    }

    /// Number of bytes needed to hold every pixel of the image
    pub fn byte_count(&self) -> usize {
        self.pixel_count() * BYTES_PER_PIXEL as usize
    }

    // Build a grid without any checks, so tests can ask for buffers that cannot exist
    #[cfg(test)]
    pub(crate) fn unchecked(width: u32, height: u32) -> Self {
        PixelGrid { width, height }
    }
}

impl fmt::Display for PixelGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Number of whole `resolution` steps from `start` to `end`, truncated down to a multiple
/// of [ALIGNMENT]. A negative or NaN span gives zero steps.
pub fn aligned_steps(start: f32, end: f32, resolution: f32) -> u32 {
    let steps = ((end - start) / resolution) as u32;
    steps - steps % ALIGNMENT
}

/// Validate the rendering parameters and derive the `PixelGrid` for them.
///
/// The checks run in a fixed order and the first one violated decides the error:
/// resolution, iteration count, `r_start`, `r_end`, `i_start`, `i_end`, then the
/// derived dimensions and finally the size of the image.
pub fn validate(window: &PlaneWindow, resolution: f32, max_iterations: i16) -> Result<PixelGrid> {
    // written so that NaN fails too
    if !(resolution > 0.0) {
        bail!(ErrorKind::InvalidResolution);
    }

    if max_iterations < 0 {
        bail!(ErrorKind::InvalidIterationCount);
    }

    if !REAL_RANGE.contains(&window.r_start) {
        bail!(ErrorKind::InvalidRealStart);
    }

    if !REAL_RANGE.contains(&window.r_end) {
        bail!(ErrorKind::InvalidRealEnd);
    }

    if !IMAGINARY_RANGE.contains(&window.i_start) {
        bail!(ErrorKind::InvalidImaginaryStart);
    }

    if !IMAGINARY_RANGE.contains(&window.i_end) {
        bail!(ErrorKind::InvalidImaginaryEnd);
    }

    let width = aligned_steps(window.r_start, window.r_end, resolution);
    let height = aligned_steps(window.i_start, window.i_end, resolution);
    debug!("Window {} at resolution {} spans {}x{} pixels", window, resolution, width, height);

    if width == 0 || height == 0 {
        bail!(ErrorKind::DimensionOverflow);
    }

    // the byte count wraps on overflow, dividing back out detects it
    let image_bytes = width.wrapping_mul(height).wrapping_mul(BYTES_PER_PIXEL);
    if image_bytes / height != width.wrapping_mul(BYTES_PER_PIXEL) {
        bail!(ErrorKind::DimensionOverflow);
    }

    if image_bytes > MAX_IMAGE_BYTES {
        bail!(ErrorKind::ImageTooLarge(u64::from(image_bytes)));
    }

    Ok(PixelGrid { width, height })
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use crate::errors::ErrorKind;

    use super::{aligned_steps, validate, PlaneWindow, ALIGNMENT};

    fn kind(window: PlaneWindow, resolution: f32, max_iterations: i16) -> ErrorKind {
        match validate(&window, resolution, max_iterations) {
            Ok(grid) => panic!("Expected validation to fail but got grid {}", grid),
            Err(e) => e.0,
        }
    }

    #[test]
    fn full_legal_window_is_valid() {
        let grid = validate(&PlaneWindow::default(), 0.005, 255).expect("Could not validate");
        assert_eq!(grid.width(), 600);
        assert_eq!(grid.height(), 400);
        assert_eq!(grid.byte_count(), 600 * 400 * 3);
    }

    #[test]
    fn width_truncated_to_alignment() {
        let window = PlaneWindow::new(-0.5, -0.2, 0.0, 0.5);
        let grid = validate(&window, 0.01, 10).expect("Could not validate");
        assert_eq!(grid.width(), 28);
        assert_eq!(grid.height(), 48);
    }

    #[test]
    fn zero_iterations_is_valid() {
        assert!(validate(&PlaneWindow::default(), 0.01, 0).is_ok());
    }

    #[test]
    fn real_start_out_of_range() {
        let window = PlaneWindow::new(-2.5, 1.0, -1.0, 1.0);
        assert!(matches!(kind(window, 0.005, 255), ErrorKind::InvalidRealStart));
    }

    #[test]
    fn real_end_out_of_range() {
        let window = PlaneWindow::new(-2.0, 2.0, -1.0, 1.0);
        assert!(matches!(kind(window, 0.005, 255), ErrorKind::InvalidRealEnd));
    }

    #[test]
    fn imaginary_start_out_of_range() {
        let window = PlaneWindow::new(-2.0, 1.0, -1.75, 1.0);
        assert!(matches!(kind(window, 0.005, 255), ErrorKind::InvalidImaginaryStart));
    }

    #[test]
    fn imaginary_end_out_of_range() {
        let window = PlaneWindow::new(-2.0, 1.0, -1.0, 1000.0);
        assert!(matches!(kind(window, 0.005, 255), ErrorKind::InvalidImaginaryEnd));
    }

    #[test]
    fn nan_bound_is_out_of_range() {
        let window = PlaneWindow::new(f32::NAN, 1.0, -1.0, 1.0);
        assert!(matches!(kind(window, 0.005, 255), ErrorKind::InvalidRealStart));
    }

    #[test]
    fn nan_resolution_is_invalid() {
        assert!(matches!(kind(PlaneWindow::default(), f32::NAN, 255), ErrorKind::InvalidResolution));
    }

    #[test]
    fn resolution_checked_before_iterations() {
        assert!(matches!(kind(PlaneWindow::default(), 0.0, -1), ErrorKind::InvalidResolution));
    }

    #[test]
    fn iterations_checked_before_bounds() {
        let window = PlaneWindow::new(-5.0, 5.0, -5.0, 5.0);
        assert!(matches!(kind(window, 0.01, -1), ErrorKind::InvalidIterationCount));
    }

    #[test]
    fn too_fine_resolution_overflows() {
        assert!(matches!(kind(PlaneWindow::default(), 0.000_000_1, 255), ErrorKind::DimensionOverflow));
    }

    #[test]
    fn zero_width_window_overflows() {
        let window = PlaneWindow::new(-2.0, -2.0, -1.0, 1.0);
        assert!(matches!(kind(window, 0.005, 255), ErrorKind::DimensionOverflow));
    }

    #[test]
    fn zero_height_window_overflows() {
        let window = PlaneWindow::new(-2.0, 1.0, -1.0, -1.0);
        assert!(matches!(kind(window, 0.005, 255), ErrorKind::DimensionOverflow));
    }

    #[test]
    fn reversed_window_overflows() {
        let window = PlaneWindow::new(1.0, -2.0, -1.0, 1.0);
        assert!(matches!(kind(window, 0.005, 255), ErrorKind::DimensionOverflow));
    }

    #[test]
    fn narrower_than_alignment_overflows() {
        let window = PlaneWindow::new(0.0, 0.03, 0.0, 1.0);
        assert!(matches!(kind(window, 0.01, 255), ErrorKind::DimensionOverflow));
    }

    #[test]
    fn oversized_image_rejected() {
        // 37500 x 25000 pixels is 2.8 GB, countable in a u32 but over the limit
        assert!(matches!(kind(PlaneWindow::default(), 0.00008, 255), ErrorKind::ImageTooLarge(_)));
    }

    #[test]
    fn negative_span_has_no_steps() {
        assert_eq!(aligned_steps(1.0, -2.0, 0.01), 0);
    }

    proptest! {
        #[test]
        fn non_positive_resolution_always_rejected(
            resolution in -10.0f32..=0.0,
            max_iterations in any::<i16>(),
            r_start in -10.0f32..10.0,
            i_start in -10.0f32..10.0) {
            let window = PlaneWindow::new(r_start, 1.0, i_start, 1.0);
            prop_assert!(matches!(kind(window, resolution, max_iterations), ErrorKind::InvalidResolution));
        }

        #[test]
        fn negative_iterations_always_rejected(
            resolution in 0.0001f32..1.0,
            max_iterations in i16::MIN..0,
            r_start in -10.0f32..10.0) {
            let window = PlaneWindow::new(r_start, 1.0, -1.0, 1.0);
            prop_assert!(matches!(kind(window, resolution, max_iterations), ErrorKind::InvalidIterationCount));
        }

        #[test]
        fn valid_grids_are_aligned(
            r_start in -2.0f32..=1.0,
            r_end in -2.0f32..=1.0,
            i_start in -1.0f32..=1.0,
            i_end in -1.0f32..=1.0,
            resolution in 0.0005f32..0.5) {
            let window = PlaneWindow::new(r_start, r_end, i_start, i_end);
            if let Ok(grid) = validate(&window, resolution, 100) {
                prop_assert!(grid.width() > 0);
                prop_assert!(grid.height() > 0);
                prop_assert_eq!(grid.width() % ALIGNMENT, 0);
                prop_assert_eq!(grid.height() % ALIGNMENT, 0);
            }
        }
    }
}
