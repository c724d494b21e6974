use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

use crate::error::FormatError;

/// Fixed size of one star record on disk: 10 f32 fields plus one i32.
pub const RECORD_SIZE: usize = 44;

/// One star as laid out in the file.
///
/// Metallicity, formation time, and softening occupy bytes on disk but are
/// never interpreted; they are written as 0.0 and dropped on read. The id
/// lives in the slot the original format used for the potential, which is
/// why it is an integer on the wire even though the in-memory collection
/// keeps it as f32.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarRecord {
    pub mass: f32,
    pub pos: [f32; 3],
    pub vel: [f32; 3],
    pub id: i32,
}

impl StarRecord {
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_f32::<LittleEndian>(self.mass)?;
        for p in self.pos {
            writer.write_f32::<LittleEndian>(p)?;
        }
        for v in self.vel {
            writer.write_f32::<LittleEndian>(v)?;
        }
        writer.write_f32::<LittleEndian>(0.0)?; // metals
        writer.write_f32::<LittleEndian>(0.0)?; // tform
        writer.write_f32::<LittleEndian>(0.0)?; // eps
        writer.write_i32::<LittleEndian>(self.id)?;
        Ok(())
    }

    pub fn read<R: Read>(mut reader: R) -> Result<Self, FormatError> {
        let mass = reader.read_f32::<LittleEndian>()?;
        let mut pos = [0.0f32; 3];
        for p in &mut pos {
            *p = reader.read_f32::<LittleEndian>()?;
        }
        let mut vel = [0.0f32; 3];
        for v in &mut vel {
            *v = reader.read_f32::<LittleEndian>()?;
        }
        let _metals = reader.read_f32::<LittleEndian>()?;
        let _tform = reader.read_f32::<LittleEndian>()?;
        let _eps = reader.read_f32::<LittleEndian>()?;
        let id = reader.read_i32::<LittleEndian>()?;
        Ok(Self { mass, pos, vel, id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn record_roundtrip() {
        let rec = StarRecord {
            mass: 0.5,
            pos: [1.0, -2.0, 3.5],
            vel: [0.01, 0.02, -0.03],
            id: 41,
        };
        let mut buf = Vec::new();
        rec.write(&mut buf).unwrap();
        assert_eq!(buf.len(), RECORD_SIZE);

        let back = StarRecord::read(Cursor::new(&buf)).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn unused_fields_write_as_zero() {
        let rec = StarRecord { mass: 1.0, pos: [0.0; 3], vel: [0.0; 3], id: 0 };
        let mut buf = Vec::new();
        rec.write(&mut buf).unwrap();

        // metals, tform, eps sit at byte offsets 28, 32, 36
        for off in [28usize, 32, 36] {
            let word = f32::from_le_bytes(buf[off..off + 4].try_into().unwrap());
            assert_eq!(word, 0.0);
        }
    }

    #[test]
    fn truncated_record_is_io_error() {
        let rec = StarRecord { mass: 1.0, pos: [0.0; 3], vel: [0.0; 3], id: 7 };
        let mut buf = Vec::new();
        rec.write(&mut buf).unwrap();
        buf.truncate(RECORD_SIZE - 1);

        assert!(matches!(
            StarRecord::read(Cursor::new(&buf)),
            Err(FormatError::Io(_))
        ));
    }
}
