//! MNIST IDX file reader
//!
//! Image files start with magic 2051 followed by count, rows and cols as
//! big-endian u32, then one byte per pixel. Label files start with magic
//! 2049 and the count, then one byte per label.

use std::fs;
use std::path::Path;

use crate::error::{NetworkError, Result};

pub const IMAGE_MAGIC: u32 = 2051;
pub const LABEL_MAGIC: u32 = 2049;

/// Raw images as stored in an IDX file.
#[derive(Debug, Clone)]
pub struct IdxImages {
    pub count: usize,
    pub rows: usize,
    pub cols: usize,
    /// `count * rows * cols` bytes, one image after another.
    pub pixels: Vec<u8>,
}

impl IdxImages {
    /// Pixels per image.
    pub fn image_size(&self) -> usize {
        self.rows * self.cols
    }
}

fn read_be_u32(data: &[u8], offset: &mut usize) -> Result<u32> {
    let bytes = data
        .get(*offset..*offset + 4)
        .ok_or_else(|| NetworkError::InvalidData("IDX header is truncated".to_string()))?;
    *offset += 4;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn check_magic(found: u32, expected: u32) -> Result<()> {
    if found != expected {
        return Err(NetworkError::InvalidData(format!(
            "bad IDX magic number {} (expected {})",
            found, expected
        )));
    }
    Ok(())
}

/// Parse an in-memory IDX image file.
pub fn parse_images(data: &[u8]) -> Result<IdxImages> {
    let mut offset = 0usize;
    check_magic(read_be_u32(data, &mut offset)?, IMAGE_MAGIC)?;
    let count = read_be_u32(data, &mut offset)? as usize;
    let rows = read_be_u32(data, &mut offset)? as usize;
    let cols = read_be_u32(data, &mut offset)? as usize;

    let (total_bytes, end) = count
        .checked_mul(rows)
        .and_then(|n| n.checked_mul(cols))
        .and_then(|total| Some((total, offset.checked_add(total)?)))
        .ok_or_else(|| NetworkError::InvalidData("IDX header dimensions overflow".to_string()))?;
    if data.len() < end {
        return Err(NetworkError::InvalidData(format!(
            "IDX image file is truncated: {} pixel bytes expected, {} present",
            total_bytes,
            data.len() - offset
        )));
    }

    Ok(IdxImages {
        count,
        rows,
        cols,
        pixels: data[offset..end].to_vec(),
    })
}

/// Parse an in-memory IDX label file.
pub fn parse_labels(data: &[u8]) -> Result<Vec<u8>> {
    let mut offset = 0usize;
    check_magic(read_be_u32(data, &mut offset)?, LABEL_MAGIC)?;
    let count = read_be_u32(data, &mut offset)? as usize;

    let end = offset
        .checked_add(count)
        .ok_or_else(|| NetworkError::InvalidData("IDX header dimensions overflow".to_string()))?;
    if data.len() < end {
        return Err(NetworkError::InvalidData(format!(
            "IDX label file is truncated: {} labels expected, {} present",
            count,
            data.len() - offset
        )));
    }

    Ok(data[offset..end].to_vec())
}

/// Read an IDX image file from disk.
pub fn read_images<P: AsRef<Path>>(path: P) -> Result<IdxImages> {
    parse_images(&fs::read(path)?)
}

/// Read an IDX label file from disk.
pub fn read_labels<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    parse_labels(&fs::read(path)?)
}

/// Serialize images in IDX format.
pub fn encode_images(images: &IdxImages) -> Vec<u8> {
    let mut out = Vec::with_capacity(16 + images.pixels.len());
    out.extend_from_slice(&IMAGE_MAGIC.to_be_bytes());
    out.extend_from_slice(&(images.count as u32).to_be_bytes());
    out.extend_from_slice(&(images.rows as u32).to_be_bytes());
    out.extend_from_slice(&(images.cols as u32).to_be_bytes());
    out.extend_from_slice(&images.pixels);
    out
}

/// Serialize labels in IDX format.
pub fn encode_labels(labels: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + labels.len());
    out.extend_from_slice(&LABEL_MAGIC.to_be_bytes());
    out.extend_from_slice(&(labels.len() as u32).to_be_bytes());
    out.extend_from_slice(labels);
    out
}
