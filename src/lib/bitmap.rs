use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, info};

use crate::errors::*;
use crate::geometry::{PixelGrid, BYTES_PER_PIXEL};
use crate::pixel_buffer::PixelBuffer;

/// "BM" read as a little-endian `u16`
pub const BITMAP_MAGIC: u16 = 0x4d42;
/// Size in bytes of the file header
pub const FILE_HEADER_SIZE: u32 = 14;
/// Size in bytes of the info header
pub const INFO_HEADER_SIZE: u32 = 40;
/// Offset of the pixel data from the start of the file
pub const PIXEL_DATA_OFFSET: u32 = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
/// Three 8-bit channels and no alpha
pub const BITS_PER_PIXEL: u16 = 24;
/// Compression code for uncompressed RGB data
pub const COMPRESSION_NONE: u32 = 0;
/// Rows of pixel data in the file start on a multiple of this many bytes
pub const ROW_ALIGNMENT: u32 = 4;

/// Number of padding bytes that follow each row of `width` pixels in the file
pub fn row_padding(width: u32) -> u32 {
    (ROW_ALIGNMENT - (width * BYTES_PER_PIXEL) % ROW_ALIGNMENT) % ROW_ALIGNMENT
}

/// The 14 byte header at the start of a bitmap file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    /// Size of the whole file in bytes
    pub file_size: u32,
    /// Offset of the pixel data from the start of the file
    pub pixel_data_offset: u32,
}

/// The 40 byte info header that follows the `FileHeader`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoHeader {
    /// Width in pixels
    pub width: i32,
    /// Height in pixels, positive as the first row stored is the bottom one
    pub height: i32,
    /// Number of color planes
    pub planes: u16,
    /// Bits per pixel
    pub bit_count: u16,
    /// Size of the pixel data in bytes, including row padding
    pub image_size: u32,
}

impl FileHeader {
    /// Write the header packed, with all fields little-endian
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&BITMAP_MAGIC.to_le_bytes())?;
        writer.write_all(&self.file_size.to_le_bytes())?;
        writer.write_all(&0u16.to_le_bytes())?; // reserved
        writer.write_all(&0u16.to_le_bytes())?; // reserved
        writer.write_all(&self.pixel_data_offset.to_le_bytes())
    }
}

impl InfoHeader {
    /// Write the header packed, with all fields little-endian
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&INFO_HEADER_SIZE.to_le_bytes())?;
        writer.write_all(&self.width.to_le_bytes())?;
        writer.write_all(&self.height.to_le_bytes())?;
        writer.write_all(&self.planes.to_le_bytes())?;
        writer.write_all(&self.bit_count.to_le_bytes())?;
        writer.write_all(&COMPRESSION_NONE.to_le_bytes())?;
        writer.write_all(&self.image_size.to_le_bytes())?;
        writer.write_all(&0i32.to_le_bytes())?; // horizontal resolution
        writer.write_all(&0i32.to_le_bytes())?; // vertical resolution
        writer.write_all(&0u32.to_le_bytes())?; // colors used
        writer.write_all(&0u32.to_le_bytes()) // important colors
    }
}

/// Build the two headers describing a bitmap of `grid`
pub fn headers(grid: &PixelGrid) -> Result<(FileHeader, InfoHeader)> {
    let padded_row = u64::from(grid.width()) * u64::from(BYTES_PER_PIXEL) + u64::from(row_padding(grid.width()));
    let image_size = u32::try_from(padded_row * u64::from(grid.height()))
        .chain_err(|| ErrorKind::ImageTooLarge(padded_row * u64::from(grid.height())))?;
    let file_size = image_size
        .checked_add(PIXEL_DATA_OFFSET)
        .ok_or(ErrorKind::ImageTooLarge(u64::from(image_size) + u64::from(PIXEL_DATA_OFFSET)))?;

    let file_header = FileHeader {
        file_size,
        pixel_data_offset: PIXEL_DATA_OFFSET,
    };

    let info_header = InfoHeader {
        width: i32::try_from(grid.width()).chain_err(|| ErrorKind::DimensionOverflow)?,
        height: i32::try_from(grid.height()).chain_err(|| ErrorKind::DimensionOverflow)?,
        planes: 1,
        bit_count: BITS_PER_PIXEL,
        image_size,
    };

    Ok((file_header, info_header))
}

/// Encode `pixels` as a complete bitmap into `writer`: file header, info header, then each
/// row of pixels followed by its padding
pub fn encode<W: Write>(pixels: &PixelBuffer, writer: &mut W) -> Result<()> {
    let (file_header, info_header) = headers(pixels.grid())?;
    let padding = vec![0u8; row_padding(pixels.grid().width()) as usize];

    file_header.write_to(writer)?;
    info_header.write_to(writer)?;
    for row in pixels.rows() {
        writer.write_all(row)?;
        writer.write_all(&padding)?;
    }

    Ok(())
}

/// Write `pixels` as a bitmap to a new file at `path`, replacing any file already there
pub fn write_bitmap(path: &Path, pixels: &PixelBuffer) -> Result<()> {
    debug!("Creating bitmap file '{}'", path.display());
    let file = File::create(path).chain_err(|| ErrorKind::IoFailure(IoStage::Create, path.to_path_buf()))?;

    let mut writer = BufWriter::new(file);
    encode(pixels, &mut writer).chain_err(|| ErrorKind::IoFailure(IoStage::Write, path.to_path_buf()))?;

    let file = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .chain_err(|| ErrorKind::IoFailure(IoStage::Write, path.to_path_buf()))?;

    // devices and pipes cannot be synced, dropping the file closes them
    let metadata = file.metadata().chain_err(|| ErrorKind::IoFailure(IoStage::Close, path.to_path_buf()))?;
    if metadata.is_file() {
        file.sync_all().chain_err(|| ErrorKind::IoFailure(IoStage::Close, path.to_path_buf()))?;
    }

    info!("Bitmap of {} pixels written to '{}'", pixels.grid(), path.display());
    Ok(())
}
