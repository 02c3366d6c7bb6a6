use std::path::PathBuf;
use std::time::Duration;

use log::{debug, info};

use crate::bitmap::write_bitmap;
use crate::comparison::{compare_into, ComparisonOutcome};
use crate::errors::*;
use crate::geometry::{validate, PixelGrid, PlaneWindow};
use crate::kernel::{timed_render, EscapeKernel, ProductionKernel};
use crate::pixel_buffer::PixelBuffer;

/// Default name of the bitmap file to write
pub const DEFAULT_DESTINATION: &str = "mandelbrot.bmp";
/// Default distance on the complex plane between neighbouring pixels
pub const DEFAULT_RESOLUTION: f32 = 0.001;
/// Default maximum number of iterations before a point is taken to be in the set
pub const DEFAULT_MAX_ITERATIONS: i16 = 255;

/// Everything needed to render one bitmap
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    /// Where to write the bitmap file
    pub destination: PathBuf,
    /// The part of the complex plane to render
    pub window: PlaneWindow,
    /// Distance on the complex plane between neighbouring pixels
    pub resolution: f32,
    /// Maximum number of iterations before a point is taken to be in the set
    pub max_iterations: i16,
}

impl Default for RenderParams {
    fn default() -> Self {
        RenderParams {
            destination: PathBuf::from(DEFAULT_DESTINATION),
            window: PlaneWindow::default(),
            resolution: DEFAULT_RESOLUTION,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// What a successful render produced
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    /// Size of the image written
    pub grid: PixelGrid,
    /// Time the production kernel took to render the image
    pub render_time: Duration,
    /// How the image compared with the reference kernel's
    pub comparison: ComparisonOutcome,
}

/// Validate `params`, render them with the production kernel, write the bitmap and then
/// check the image against the reference kernel
pub fn render(params: &RenderParams) -> Result<RenderSummary> {
    render_with::<ProductionKernel>(params)
}

/// Validate `params`, render them with kernel `K`, write the bitmap and then check the image
/// against the reference kernel.
///
/// Nothing is allocated or written if validation fails. The pixel buffer is dropped on
/// every return path, and a partially written file is left behind only if writing it failed.
pub fn render_with<K: EscapeKernel>(params: &RenderParams) -> Result<RenderSummary> {
    render_into::<K, _>(params, |grid| PixelBuffer::allocate(grid, AllocationTarget::Comparison))
}

// Render as `render_with`, getting the comparison buffer from `allocate_comparison` once the
// bitmap has been written
fn render_into<K, A>(params: &RenderParams, allocate_comparison: A) -> Result<RenderSummary>
where
    K: EscapeKernel,
    A: FnOnce(PixelGrid) -> Result<PixelBuffer>,
{
    let grid = validate(&params.window, params.resolution, params.max_iterations)?;
    debug!(
        "Rendering {} at resolution {} with up to {} iterations into a {} image",
        params.window, params.resolution, params.max_iterations, grid
    );

    let mut pixels = PixelBuffer::allocate(grid, AllocationTarget::Primary)?;

    let render_time = timed_render::<K>(
        &params.window,
        params.resolution,
        params.max_iterations,
        pixels.as_mut_bytes(),
    );
    info!("'{}' kernel took {:.6} seconds", K::NAME, render_time.as_secs_f64());

    write_bitmap(&params.destination, &pixels)?;

    let comparison = compare_into::<K>(
        &params.window,
        params.resolution,
        params.max_iterations,
        &pixels,
        render_time,
        allocate_comparison(grid),
    );

    Ok(RenderSummary {
        grid,
        render_time,
        comparison,
    })
}

#[cfg(test)]
mod test {
    use crate::comparison::ComparisonOutcome;
    use crate::errors::{AllocationTarget, ErrorKind, IoStage};
    use crate::geometry::PlaneWindow;
    use crate::kernel::{ProductionKernel, ReferenceKernel};
    use crate::pixel_buffer::PixelBuffer;

    use super::{render, render_into, render_with, RenderParams};

    fn params(dir: &tempfile::TempDir, window: PlaneWindow, resolution: f32) -> RenderParams {
        RenderParams {
            destination: dir.path().join("render.bmp"),
            window,
            resolution,
            max_iterations: 100,
        }
    }

    #[test]
    fn default_params() {
        let params = RenderParams::default();
        assert_eq!(params.destination.to_string_lossy(), "mandelbrot.bmp");
        assert_eq!(params.window, PlaneWindow::new(-2.0, 1.0, -1.0, 1.0));
        assert_eq!(params.resolution, 0.001);
        assert_eq!(params.max_iterations, 255);
    }

    #[test]
    fn renders_and_compares() {
        let dir = tempfile::tempdir().expect("Could not create temp dir");
        let params = params(&dir, PlaneWindow::default(), 0.02);
        let summary = render(&params).expect("Could not render");
        assert_eq!(summary.grid.width(), 148);
        assert_eq!(summary.grid.height(), 100);
        assert!(params.destination.exists());
        match summary.comparison {
            ComparisonOutcome::Compared(report) => assert_eq!(report.mismatches, 0),
            ComparisonOutcome::Skipped => panic!("Comparison was skipped"),
        }
    }

    #[test]
    fn reference_render_agrees_with_itself() {
        let dir = tempfile::tempdir().expect("Could not create temp dir");
        let summary = render_with::<ReferenceKernel>(&params(&dir, PlaneWindow::default(), 0.05))
            .expect("Could not render");
        match summary.comparison {
            ComparisonOutcome::Compared(report) => assert_eq!(report.similarity(), 100.0),
            ComparisonOutcome::Skipped => panic!("Comparison was skipped"),
        }
    }

    #[test]
    fn invalid_params_write_nothing() {
        let dir = tempfile::tempdir().expect("Could not create temp dir");
        let params = params(&dir, PlaneWindow::new(-2.5, 1.0, -1.0, 1.0), 0.005);
        match render(&params) {
            Err(e) => assert!(matches!(e.kind(), ErrorKind::InvalidRealStart)),
            Ok(_) => panic!("Render should have failed"),
        }
        assert!(!params.destination.exists());
    }

    #[test]
    fn unwritable_destination_fails() {
        let dir = tempfile::tempdir().expect("Could not create temp dir");
        let mut params = params(&dir, PlaneWindow::default(), 0.05);
        params.destination = dir.path().join("missing").join("render.bmp");
        match render(&params) {
            Err(e) => assert!(matches!(e.kind(), ErrorKind::IoFailure(..))),
            Ok(_) => panic!("Render should have failed"),
        }
    }

    #[test]
    fn comparison_skipped_without_memory() {
        let dir = tempfile::tempdir().expect("Could not create temp dir");
        let params = params(&dir, PlaneWindow::default(), 0.05);
        let summary = render_into::<ProductionKernel, _>(&params, |_| -> crate::errors::Result<PixelBuffer> {
            Err(ErrorKind::AllocationFailure(AllocationTarget::Comparison).into())
        })
        .expect("Render should succeed without a comparison");

        assert_eq!(summary.comparison, ComparisonOutcome::Skipped);
        assert!(params.destination.exists());
        let written = std::fs::read(&params.destination).expect("Could not read bitmap");
        assert_eq!(written.len(), 54 + summary.grid.byte_count());
    }

    #[cfg(unix)]
    #[test]
    fn renders_to_device() {
        let params = RenderParams {
            destination: "/dev/null".into(),
            resolution: 0.05,
            max_iterations: 10,
            ..RenderParams::default()
        };
        let summary = render(&params).expect("Could not render to '/dev/null'");
        assert!(matches!(summary.comparison, ComparisonOutcome::Compared(_)));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn full_device_fails_render() {
        let params = RenderParams {
            destination: "/dev/full".into(),
            resolution: 0.05,
            ..RenderParams::default()
        };
        match render(&params) {
            Err(e) => assert!(matches!(e.kind(), ErrorKind::IoFailure(IoStage::Write, _))),
            Ok(_) => panic!("Render should have failed"),
        }
    }
}
