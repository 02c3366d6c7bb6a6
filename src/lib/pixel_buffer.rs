use log::debug;

use crate::errors::*;
use crate::geometry::{PixelGrid, BYTES_PER_PIXEL};

/// A zero-initialised buffer of (blue, green, red) triplets for every pixel of a `PixelGrid`,
/// in row-major order with no padding between rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    grid: PixelGrid,
    bytes: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a black buffer for `grid`. Running out of memory is reported as an
    /// `AllocationFailure` for `target` instead of aborting the process.
    pub fn allocate(grid: PixelGrid, target: AllocationTarget) -> Result<Self> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(grid.byte_count())
            .map_err(|_| ErrorKind::AllocationFailure(target))?;
        bytes.resize(grid.byte_count(), 0);
        debug!("Allocated {} bytes for the {} buffer", bytes.len(), target);

        Ok(PixelBuffer { grid, bytes })
    }

    /// The grid this buffer holds pixels for
    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    /// All the pixel bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// All the pixel bytes, for a kernel to render into
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// The pixel data of each row in turn, starting with row 0
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.bytes.chunks_exact(self.grid.row_bytes())
    }

    /// The (blue, green, red) triplet at `column` and `row`, if it is in the grid
    pub fn pixel(&self, column: u32, row: u32) -> Option<[u8; 3]> {
        if column >= self.grid.width() || row >= self.grid.height() {
            return None;
        }

        let pixel_size = BYTES_PER_PIXEL as usize;
        let offset = row as usize * self.grid.row_bytes() + column as usize * pixel_size;
        let mut triplet = [0; 3];
        triplet.copy_from_slice(&self.bytes[offset..offset + pixel_size]);
        Some(triplet)
    }
}
