#![deny(missing_docs)]
#![warn(clippy::unwrap_used)]
//! Library for rendering the Mandelbrot set over a window of the complex plane into a 24-bit
//! bitmap file, and for checking an accelerated escape-time kernel against a reference one.
//!
//! Rendering parameters are validated into a `PixelGrid`, the production kernel renders into a
//! zeroed `PixelBuffer`, the buffer is written as a bitmap and then the same window is rendered
//! by the reference kernel so the two can be compared for agreement and speed.

/// `bitmap` encodes a `PixelBuffer` as an uncompressed bitmap file
pub mod bitmap;
/// `comparison` compares the output and speed of a kernel with the reference kernel
pub mod comparison;
/// `geometry` validates rendering parameters and derives the image size from them
pub mod geometry;
/// `info` offers methods to get information about this library
pub mod info;
/// `kernel` defines the escape-time kernel interface and its two implementations
pub mod kernel;
/// `pixel_buffer` holds the rendered pixels of an image
pub mod pixel_buffer;
/// `render` validates, renders, writes and checks a bitmap
pub mod render;
/// `validation_suite` checks that invalid parameters are rejected with the right errors
pub mod validation_suite;

/// We'll put our errors in an `errors` module, and other modules in this crate will `use errors::*;`
/// to get access to everything `error_chain!` creates.
pub mod errors;
