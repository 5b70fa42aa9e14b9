//! Readers and writers for the four headerless metatileset files:
//! tile grids (`*_metatiles.bin`), attributes (`*_attributes.bin`), text
//! collisions (`*_collision.asm`) and binary collisions (`*_collision.bin`).
//!
//! Every reader needs graphics loaded first. Path-taking variants map open
//! failures to `CannotOpenFile`; the `_from`/`_to` variants work on any
//! reader or writer.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::CodecError;
use crate::types::{Attributes, Quadrant, MAX_METATILES, METATILE_CELLS, METATILE_SIZE, NUM_QUADRANTS};

use super::{Collisions, Metatileset, QuadrantLabels};

const TILECOLL: &str = "tilecoll";

type CodecResult<T> = std::result::Result<T, CodecError>;

impl Metatileset {
    /// Read a tile-grid file. Replaces every metatile and restarts the count.
    pub fn read_metatiles(&mut self, path: &Path) -> CodecResult<()> {
        log::info!("Loading metatiles from {}", path.display());
        let mut reader = self.open_for_read(path)?;
        self.read_metatiles_from(&mut reader)
    }

    pub fn read_metatiles_from<R: Read>(&mut self, reader: &mut R) -> CodecResult<()> {
        self.require_graphics()?;
        for metatile in self.metatiles.iter_mut() {
            metatile.clear();
        }
        self.count = 0;

        let mut record = [0; METATILE_CELLS];
        loop {
            let n = read_record(reader, &mut record)?;
            if n == 0 {
                break;
            }
            if self.count == MAX_METATILES {
                return Err(CodecError::TooManyBlocks);
            }
            if n < record.len() {
                return Err(CodecError::LastBlockIncomplete);
            }
            let metatile = &mut self.metatiles[self.count];
            for (i, &id) in record.iter().enumerate() {
                metatile.set_tile_id(i % METATILE_SIZE, i / METATILE_SIZE, id);
            }
            self.count += 1;
        }
        log::debug!("{} metatiles read", self.count);
        Ok(())
    }

    pub fn write_metatiles(&self, path: &Path) -> CodecResult<()> {
        log::info!("Saving metatiles to {}", path.display());
        let mut writer = create(path)?;
        self.write_metatiles_to(&mut writer)?;
        writer.flush().map_err(|_| CodecError::CannotOpenFile)
    }

    pub fn write_metatiles_to<W: Write>(&self, writer: &mut W) -> CodecResult<()> {
        for metatile in self.metatiles() {
            writer
                .write_all(&metatile.tile_ids())
                .map_err(|_| CodecError::CannotOpenFile)?;
        }
        Ok(())
    }

    /// Read an attribute file over the metatiles already loaded.
    pub fn read_attributes(&mut self, path: &Path) -> CodecResult<()> {
        log::info!("Loading attributes from {}", path.display());
        let mut reader = self.open_for_read(path)?;
        self.read_attributes_from(&mut reader)
    }

    pub fn read_attributes_from<R: Read>(&mut self, reader: &mut R) -> CodecResult<()> {
        self.require_graphics()?;

        let mut record = [0; METATILE_CELLS];
        let mut index = 0;
        loop {
            let n = read_record(reader, &mut record)?;
            if n == 0 {
                break;
            }
            if index >= self.count {
                return Err(CodecError::TooManyBlocks);
            }
            if n < record.len() {
                return Err(CodecError::LastBlockIncomplete);
            }
            let metatile = &mut self.metatiles[index];
            for (i, &byte) in record.iter().enumerate() {
                metatile
                    .cell_mut(i % METATILE_SIZE, i / METATILE_SIZE)
                    .set_attributes(Attributes::from_byte(byte));
            }
            index += 1;
        }
        Ok(())
    }

    pub fn write_attributes(&self, path: &Path) -> CodecResult<()> {
        log::info!("Saving attributes to {}", path.display());
        let mut writer = create(path)?;
        self.write_attributes_to(&mut writer)?;
        writer.flush().map_err(|_| CodecError::CannotOpenFile)
    }

    pub fn write_attributes_to<W: Write>(&self, writer: &mut W) -> CodecResult<()> {
        for metatile in self.metatiles() {
            writer
                .write_all(&metatile.attribute_bytes())
                .map_err(|_| CodecError::CannotOpenFile)?;
        }
        Ok(())
    }

    /// Read a collision file, binary for `.bin` and text otherwise.
    pub fn read_collisions(&mut self, path: &Path) -> CodecResult<()> {
        if is_binary_collision_path(path) {
            self.read_bin_collisions(path)
        } else {
            self.read_text_collisions(path)
        }
    }

    /// Write collisions in the representation last loaded.
    pub fn write_collisions(&self, path: &Path) -> CodecResult<()> {
        match self.collisions {
            Collisions::Text(_) => self.write_text_collisions(path),
            Collisions::Binary(_) => self.write_bin_collisions(path),
        }
    }

    pub fn read_text_collisions(&mut self, path: &Path) -> CodecResult<()> {
        log::info!("Loading collisions from {}", path.display());
        let mut reader = self.open_for_read(path)?;
        self.read_text_collisions_from(&mut reader)
    }

    /// Read `tilecoll` lines into metatiles 0.. until `size()` are filled.
    /// Other lines are skipped.
    pub fn read_text_collisions_from<R: Read>(&mut self, reader: &mut R) -> CodecResult<()> {
        self.require_graphics()?;

        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|_| CodecError::CannotOpenFile)?;
        let source = String::from_utf8_lossy(&bytes);

        let mut labels = vec![QuadrantLabels::default(); MAX_METATILES];
        let mut filled = 0;
        for line in source.lines() {
            if filled >= self.count {
                break;
            }
            let line = line.trim();
            if !line.starts_with(TILECOLL) {
                continue;
            }
            labels[filled] = parse_tilecoll(line);
            filled += 1;
        }

        self.collisions = Collisions::Text(labels);
        Ok(())
    }

    pub fn write_text_collisions(&self, path: &Path) -> CodecResult<()> {
        log::info!("Saving collisions to {}", path.display());
        let mut writer = create(path)?;
        self.write_text_collisions_to(&mut writer)?;
        writer.flush().map_err(|_| CodecError::CannotOpenFile)
    }

    pub fn write_text_collisions_to<W: Write>(&self, writer: &mut W) -> CodecResult<()> {
        for id in 0..self.count {
            let id = id as u8;
            let [a, b, c, d] = Quadrant::ALL.map(|q| self.collisions.label(id, q));
            writeln!(writer, "\t{TILECOLL} {a}, {b}, {c}, {d} ; {id:02x}")
                .map_err(|_| CodecError::CannotOpenFile)?;
        }
        Ok(())
    }

    pub fn read_bin_collisions(&mut self, path: &Path) -> CodecResult<()> {
        log::info!("Loading collisions from {}", path.display());
        let mut reader = self.open_for_read(path)?;
        self.read_bin_collisions_from(&mut reader)
    }

    /// Read 4-byte records into metatiles 0.. until `size()` are filled.
    /// Trailing records are ignored.
    pub fn read_bin_collisions_from<R: Read>(&mut self, reader: &mut R) -> CodecResult<()> {
        self.require_graphics()?;

        let mut bytes = vec![[0; NUM_QUADRANTS]; MAX_METATILES];
        let mut record = [0; NUM_QUADRANTS];
        let mut index = 0;
        while index < self.count {
            let n = read_record(reader, &mut record)?;
            if n == 0 {
                break;
            }
            if n < record.len() {
                return Err(CodecError::LastBlockIncomplete);
            }
            bytes[index] = record;
            index += 1;
        }

        self.collisions = Collisions::Binary(bytes);
        Ok(())
    }

    pub fn write_bin_collisions(&self, path: &Path) -> CodecResult<()> {
        log::info!("Saving collisions to {}", path.display());
        let mut writer = create(path)?;
        self.write_bin_collisions_to(&mut writer)?;
        writer.flush().map_err(|_| CodecError::CannotOpenFile)
    }

    pub fn write_bin_collisions_to<W: Write>(&self, writer: &mut W) -> CodecResult<()> {
        for id in 0..self.count {
            let record = Quadrant::ALL.map(|q| self.collisions.byte(id as u8, q));
            writer
                .write_all(&record)
                .map_err(|_| CodecError::CannotOpenFile)?;
        }
        Ok(())
    }

    fn require_graphics(&self) -> CodecResult<()> {
        if self.tileset.num_tiles() == 0 {
            return Err(CodecError::NoGraphicsLoaded);
        }
        Ok(())
    }

    fn open_for_read(&self, path: &Path) -> CodecResult<BufReader<File>> {
        if path.as_os_str().is_empty() {
            return Err(CodecError::NoFileChosen);
        }
        self.require_graphics()?;
        File::open(path)
            .map(BufReader::new)
            .map_err(|_| CodecError::CannotOpenFile)
    }
}

/// Whether a collision file holds raw bytes rather than `tilecoll` lines.
pub fn is_binary_collision_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bin"))
}

/// Check that `path` names a file that could be created or overwritten.
pub(super) fn check_writable(path: &Path) -> CodecResult<()> {
    if path.as_os_str().is_empty() {
        return Err(CodecError::NoFileChosen);
    }
    let parent_missing = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .is_some_and(|dir| !dir.is_dir());
    if parent_missing || path.is_dir() {
        return Err(CodecError::CannotOpenFile);
    }
    Ok(())
}

fn create(path: &Path) -> CodecResult<BufWriter<File>> {
    if path.as_os_str().is_empty() {
        return Err(CodecError::NoFileChosen);
    }
    File::create(path)
        .map(BufWriter::new)
        .map_err(|_| CodecError::CannotOpenFile)
}

/// Fill `buf` from `reader`, returning fewer bytes only at end of input.
fn read_record<R: Read>(reader: &mut R, buf: &mut [u8]) -> CodecResult<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => return Err(CodecError::CannotOpenFile),
        }
    }
    Ok(filled)
}

/// Parse `tilecoll A, B, C, D ; comment` into its four labels. Missing
/// labels are left empty so the line still accounts for one metatile.
fn parse_tilecoll(line: &str) -> QuadrantLabels {
    let rest = line.strip_prefix(TILECOLL).unwrap_or(line);
    let rest = rest.split_once(';').map_or(rest, |(fields, _)| fields);

    let mut labels = QuadrantLabels::default();
    let mut fields = rest.splitn(NUM_QUADRANTS, ',');
    for label in labels.iter_mut() {
        match fields.next() {
            Some(field) => *label = field.trim().to_string(),
            None => {
                log::warn!("Short collision line: {}", line);
                break;
            }
        }
    }
    labels
}
