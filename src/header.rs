use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

use crate::error::FormatError;

/// Bytes occupied by the on-disk header: one f64 plus six i32.
///
/// The sixth i32 is alignment padding — the reference C struct holds five
/// logical counters but pads to an 8-byte boundary, so the word must be
/// read and written even though it carries nothing.
pub const HEADER_SIZE: usize = 32;

/// Spatial dimensionality this implementation supports.
pub const SUPPORTED_DIM: i32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub time: f64,
    pub n_total: i32,
    pub dim: i32,
    pub n_gas: i32,
    pub n_dark: i32,
    pub n_star: i32,
    pub pad: i32,
}

impl Header {
    /// Star-only header, as written back by [`crate::Stars::save`].
    /// Gas and dark-matter counts are always zero on the write path.
    pub fn new(time: f64, n_star: i32) -> Self {
        Self {
            time,
            n_total: n_star,
            dim: SUPPORTED_DIM,
            n_gas: 0,
            n_dark: 0,
            n_star,
            pad: 0,
        }
    }

    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_f64::<LittleEndian>(self.time)?;
        writer.write_i32::<LittleEndian>(self.n_total)?;
        writer.write_i32::<LittleEndian>(self.dim)?;
        writer.write_i32::<LittleEndian>(self.n_gas)?;
        writer.write_i32::<LittleEndian>(self.n_dark)?;
        writer.write_i32::<LittleEndian>(self.n_star)?;
        writer.write_i32::<LittleEndian>(self.pad)?;
        Ok(())
    }

    /// Read and validate a header. Fails before any particle record is
    /// touched when the dimensionality is anything but 3.
    pub fn read<R: Read>(mut reader: R) -> Result<Self, FormatError> {
        let time = reader.read_f64::<LittleEndian>()?;
        let n_total = reader.read_i32::<LittleEndian>()?;
        let dim = reader.read_i32::<LittleEndian>()?;
        let n_gas = reader.read_i32::<LittleEndian>()?;
        let n_dark = reader.read_i32::<LittleEndian>()?;
        let n_star = reader.read_i32::<LittleEndian>()?;
        let pad = reader.read_i32::<LittleEndian>()?;
        if dim != SUPPORTED_DIM {
            return Err(FormatError::UnsupportedDimension(dim));
        }
        Ok(Self { time, n_total, dim, n_gas, n_dark, n_star, pad })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn header_roundtrip() {
        let hdr = Header::new(1.25, 4096);
        let mut buf = Vec::new();
        hdr.write(&mut buf).unwrap();
        assert_eq!(buf.len(), HEADER_SIZE);

        let back = Header::read(Cursor::new(&buf)).unwrap();
        assert_eq!(back, hdr);
        assert_eq!(back.n_total, 4096);
        assert_eq!(back.n_gas, 0);
        assert_eq!(back.n_dark, 0);
    }

    #[test]
    fn rejects_2d() {
        let mut hdr = Header::new(0.0, 10);
        hdr.dim = 2;
        let mut buf = Vec::new();
        hdr.write(&mut buf).unwrap();

        match Header::read(Cursor::new(&buf)) {
            Err(FormatError::UnsupportedDimension(2)) => {}
            other => panic!("expected dimension error, got {:?}", other),
        }
    }

    #[test]
    fn truncated_header_is_io_error() {
        let hdr = Header::new(0.0, 1);
        let mut buf = Vec::new();
        hdr.write(&mut buf).unwrap();
        buf.truncate(20);

        match Header::read(Cursor::new(&buf)) {
            Err(FormatError::Io(e)) => {
                assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof)
            }
            other => panic!("expected short-read error, got {:?}", other),
        }
    }
}
