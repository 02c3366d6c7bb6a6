use crate::kernel::{EscapeKernel, ProductionKernel};

/// Return the version number of the `mandelbmp` library
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Name of the kernel this build renders bitmaps with, set by the `accelerated` feature
pub fn production_kernel() -> &'static str {
    ProductionKernel::NAME
}
