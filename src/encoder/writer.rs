use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use std::io::{self, Seek, SeekFrom, Write};

use crate::tags::ByteOrder;

/// Positioned byte sink writing multi-byte values in the file's byte order.
///
/// The order is a run-time property because it is chosen per file by the
/// encode configuration, not per build.
pub struct TiffWriter<W> {
    writer: W,
    byte_order: ByteOrder,
}

impl<W> TiffWriter<W> {
    pub fn new(writer: W, byte_order: ByteOrder) -> Self {
        Self { writer, byte_order }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TiffWriter<W> {
    /// The 8-byte file header: byte-order marker, magic 42 and the absolute
    /// offset of the first directory.
    pub fn write_header(&mut self, first_ifd_offset: u32) -> Result<(), io::Error> {
        self.write_u16(self.byte_order.marker())?;
        self.write_u16(42)?;
        self.write_u32(first_ifd_offset)?;

        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), io::Error> {
        self.writer.write_all(bytes)?;
        Ok(())
    }

    pub fn write_u8(&mut self, n: u8) -> Result<(), io::Error> {
        self.writer.write_u8(n)?;
        Ok(())
    }

    pub fn write_u16(&mut self, n: u16) -> Result<(), io::Error> {
        match self.byte_order {
            ByteOrder::LittleEndian => self.writer.write_u16::<LittleEndian>(n)?,
            ByteOrder::BigEndian => self.writer.write_u16::<BigEndian>(n)?,
        }

        Ok(())
    }

    pub fn write_u32(&mut self, n: u32) -> Result<(), io::Error> {
        match self.byte_order {
            ByteOrder::LittleEndian => self.writer.write_u32::<LittleEndian>(n)?,
            ByteOrder::BigEndian => self.writer.write_u32::<BigEndian>(n)?,
        }

        Ok(())
    }
}

impl<W: Seek> TiffWriter<W> {
    pub fn goto_offset(&mut self, offset: u64) -> Result<(), io::Error> {
        self.writer.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    pub fn offset(&mut self) -> Result<u64, io::Error> {
        self.writer.stream_position()
    }
}
