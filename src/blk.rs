//! The blk map format: `width * height` metatile ids, row-major, no header.
//!
//! The file carries no dimensions, so a map must already have its size set
//! before a blk file is read into it.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::BlkError;
use crate::types::Map;

impl Map {
    /// Build a map from blk bytes of a known size.
    pub fn from_blk(width: usize, height: usize, bytes: &[u8]) -> Result<Self, BlkError> {
        let expected = width * height;
        if bytes.len() < expected {
            return Err(BlkError::TooShort);
        }
        if bytes.len() > expected {
            return Err(BlkError::TooLong);
        }
        Map::from_blocks(width, height, bytes.to_vec()).ok_or(BlkError::TooShort)
    }

    /// Replace the map's blocks with the contents of a blk file.
    pub fn read_blk(&mut self, path: &Path) -> Result<(), BlkError> {
        if path.as_os_str().is_empty() {
            return Err(BlkError::NoFileChosen);
        }
        log::info!("Loading map from {}", path.display());
        let file = File::open(path).map_err(|_| BlkError::CannotOpenFile)?;
        self.read_blk_from(&mut BufReader::new(file))
    }

    /// Replace the map's blocks with exactly `width * height` bytes.
    /// On error the map is left unchanged.
    pub fn read_blk_from<R: Read>(&mut self, reader: &mut R) -> Result<(), BlkError> {
        let expected = self.width() * self.height();
        let mut blocks = Vec::with_capacity(expected);
        // One byte past the expected size is enough to detect a long file
        reader
            .take(expected as u64 + 1)
            .read_to_end(&mut blocks)
            .map_err(|_| BlkError::CannotOpenFile)?;

        if blocks.len() < expected {
            return Err(BlkError::TooShort);
        }
        if blocks.len() > expected {
            return Err(BlkError::TooLong);
        }
        self.replace_blocks(blocks);
        self.set_modified(false);
        Ok(())
    }

    /// Write the map to a blk file and clear the modified flag.
    pub fn write_blk(&mut self, path: &Path) -> Result<(), BlkError> {
        if path.as_os_str().is_empty() {
            return Err(BlkError::NoFileChosen);
        }
        log::info!("Saving map to {}", path.display());
        let file = File::create(path).map_err(|_| BlkError::CannotOpenFile)?;
        let mut writer = BufWriter::new(file);
        self.write_blk_to(&mut writer)?;
        writer.flush().map_err(|_| BlkError::CannotOpenFile)?;
        self.set_modified(false);
        Ok(())
    }

    pub fn write_blk_to<W: Write>(&self, writer: &mut W) -> Result<(), BlkError> {
        writer
            .write_all(self.blocks())
            .map_err(|_| BlkError::CannotOpenFile)
    }
}
