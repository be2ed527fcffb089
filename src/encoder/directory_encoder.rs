use std::io::{Seek, Write};

use crate::encoder::writer::TiffWriter;
use crate::error::{EncodeResult, ValidationError};
use crate::tags::{Tag, Type};

/// Identifying string stored in every page's Software tag, NUL included.
pub(crate) const SOFTWARE_ID: &str = "multipage-tiff 0.1\0";

/// Byte length of the DateTime tag value: `YYYY:MM:DD HH:MM:SS` plus NUL.
pub(crate) const DATETIME_BYTE_LEN: usize = 20;

const fn padded_even(len: usize) -> usize {
    (len + 1) & !1
}

/// Fixed per-page layout. Every page stores the same 15 directory entries and
/// the same long-value block, so all sizes are compile-time constants.
pub(crate) const DIRECTORY_ENTRIES: u16 = 15;

pub(crate) const HEADER_BYTE_LEN: u32 = 8;

/// Entry count field, 15 entries of 12 bytes each, NextIFD pointer.
pub(crate) const IFD_BYTE_LEN: u32 = 2 + DIRECTORY_ENTRIES as u32 * 12 + 4;

/// BitsPerSample words, two resolution rationals, Software string padded to
/// even length, DateTime string.
pub(crate) const LONG_BLOCK_LEN: u32 =
    (8 + 8 + 8 + padded_even(SOFTWARE_ID.len()) + DATETIME_BYTE_LEN) as u32;

/// Bytes reserved per page ahead of its strip payload. The file header is
/// written once but accounted to every page, which leaves 8 bytes of zero
/// slack per page after the first.
pub(crate) const PAGE_RESERVE: u32 = HEADER_BYTE_LEN + IFD_BYTE_LEN + LONG_BLOCK_LEN;

/// Narrow a file position to the 32-bit offsets TIFF directories hold.
pub(crate) fn checked_offset(offset: u64) -> Result<u32, ValidationError> {
    u32::try_from(offset).map_err(|_| ValidationError::OffsetOverflow { offset })
}

/// Low level interface to encode one ifd directory.
///
/// Entries whose value does not fit the 4-byte slot are written with an
/// offset relative to the long-value block; `finish` rebases them to absolute
/// file positions once the entry count and the block start are known, and
/// back-fills the entry count itself.
pub(crate) struct DirectoryEncoder<'a, W: Write + Seek> {
    writer: &'a mut TiffWriter<W>,
    ifd_start: u64,
    entries: u16,
    long_values: TiffWriter<Vec<u8>>,
    patches: Vec<(u64, u32)>,
}

impl<'a, W: Write + Seek> DirectoryEncoder<'a, W> {
    pub fn new(writer: &'a mut TiffWriter<W>) -> EncodeResult<DirectoryEncoder<'a, W>> {
        let ifd_start = writer.offset()?;
        // entry count placeholder, back-filled by finish
        writer.write_u16(0)?;
        let byte_order = writer.byte_order();

        Ok(DirectoryEncoder {
            writer,
            ifd_start,
            entries: 0,
            long_values: TiffWriter::new(Vec::new(), byte_order),
            patches: Vec::new(),
        })
    }

    fn entry_header(&mut self, tag: Tag, field_type: Type, count: u32) -> EncodeResult<()> {
        self.writer.write_u16(tag.to_u16())?;
        self.writer.write_u16(field_type.to_u16())?;
        self.writer.write_u32(count)?;
        self.entries += 1;

        Ok(())
    }

    /// Write the value slot as a block-relative offset and record it for the
    /// rebase in `finish`.
    fn defer_value_slot(&mut self) -> EncodeResult<()> {
        let slot = self.writer.offset()?;
        let relative = self.long_values.get_ref().len() as u32;
        self.patches.push((slot, relative));
        self.writer.write_u32(relative)?;

        Ok(())
    }

    /// A single SHORT value, stored inline with 2 bytes of padding.
    pub fn entry_short(&mut self, tag: Tag, value: u16) -> EncodeResult<()> {
        self.entry_header(tag, Type::SHORT, 1)?;
        self.writer.write_u16(value)?;
        self.writer.write_u16(0)?;

        Ok(())
    }

    /// A single LONG value, stored inline.
    pub fn entry_long(&mut self, tag: Tag, value: u32) -> EncodeResult<()> {
        self.entry_header(tag, Type::LONG, 1)?;
        self.writer.write_u32(value)?;

        Ok(())
    }

    /// A SHORT array packed as 32-bit words in the long-value block.
    pub fn entry_shorts_packed(&mut self, tag: Tag, count: u32, words: &[u32]) -> EncodeResult<()> {
        self.entry_header(tag, Type::SHORT, count)?;
        self.defer_value_slot()?;
        for word in words {
            self.long_values.write_u32(*word)?;
        }

        Ok(())
    }

    /// A RATIONAL value in the long-value block.
    pub fn entry_rational(&mut self, tag: Tag, numerator: u32, denominator: u32) -> EncodeResult<()> {
        self.entry_header(tag, Type::RATIONAL, 1)?;
        self.defer_value_slot()?;
        self.long_values.write_u32(numerator)?;
        self.long_values.write_u32(denominator)?;

        Ok(())
    }

    /// A NUL-terminated ASCII value in the long-value block, padded there to
    /// an even length. The count stays the unpadded length.
    pub fn entry_ascii(&mut self, tag: Tag, value: &[u8]) -> EncodeResult<()> {
        debug_assert_eq!(value.last(), Some(&0));
        self.entry_header(tag, Type::ASCII, value.len() as u32)?;
        self.defer_value_slot()?;
        self.long_values.write_bytes(value)?;
        if value.len() % 2 != 0 {
            self.long_values.write_u8(0)?;
        }

        Ok(())
    }

    /// Write the NextIFD pointer and the long-value block, then back-patch
    /// the entry count and every deferred offset. Returns the end position,
    /// where the page's strip payload goes.
    pub fn finish(self, next_ifd_offset: u32) -> EncodeResult<u64> {
        let DirectoryEncoder {
            writer,
            ifd_start,
            entries,
            long_values,
            patches,
        } = self;

        writer.write_u32(next_ifd_offset)?;

        let block_start = writer.offset()?;
        writer.write_bytes(long_values.get_ref())?;
        let end = writer.offset()?;

        writer.goto_offset(ifd_start)?;
        writer.write_u16(entries)?;
        for (slot, relative) in patches {
            writer.goto_offset(slot)?;
            writer.write_u32(checked_offset(block_start + u64::from(relative))?)?;
        }
        writer.goto_offset(end)?;

        Ok(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::ByteOrder;
    use std::io::Cursor;

    #[test]
    fn layout_constants_are_consistent() {
        assert_eq!(IFD_BYTE_LEN, 186);
        assert_eq!(LONG_BLOCK_LEN, 64);
        assert_eq!(PAGE_RESERVE, 258);
        assert_eq!(padded_even(SOFTWARE_ID.len()), 20);
    }

    #[test]
    fn inline_short_is_padded() {
        let mut writer = TiffWriter::new(Cursor::new(Vec::new()), ByteOrder::BigEndian);
        writer.write_header(8).unwrap();
        let mut dir = DirectoryEncoder::new(&mut writer).unwrap();
        dir.entry_short(Tag::Compression, 8).unwrap();
        dir.finish(0).unwrap();

        let buf = writer.into_inner().into_inner();
        // tag 259, type SHORT, count 1, value 8 in the upper half of the slot
        assert_eq!(
            &buf[10..22],
            [0x01, 0x03, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x08, 0x00, 0x00]
        );
    }

    #[test]
    fn deferred_offsets_are_rebased_by_finish() {
        let mut writer = TiffWriter::new(Cursor::new(Vec::new()), ByteOrder::BigEndian);
        writer.write_header(8).unwrap();
        let mut dir = DirectoryEncoder::new(&mut writer).unwrap();
        dir.entry_long(Tag::ImageWidth, 7).unwrap();
        dir.entry_rational(Tag::XResolution, 96, 1).unwrap();
        let end = dir.finish(0).unwrap();

        let buf = writer.into_inner().into_inner();
        // header 8, count 2, entries 24, next pointer 4
        let block_start = 8 + 2 + 2 * 12 + 4;
        assert_eq!(end, block_start as u64 + 8);
        // entry count was back-filled
        assert_eq!(&buf[8..10], [0x00, 0x02]);
        // the rational's value slot now holds the absolute block start
        assert_eq!(&buf[30..34], (block_start as u32).to_be_bytes());
        assert_eq!(&buf[block_start..], [0, 0, 0, 96, 0, 0, 0, 1]);
    }

    #[test]
    fn odd_length_ascii_is_padded_in_block_only() {
        let mut writer = TiffWriter::new(Cursor::new(Vec::new()), ByteOrder::BigEndian);
        writer.write_header(8).unwrap();
        let mut dir = DirectoryEncoder::new(&mut writer).unwrap();
        dir.entry_ascii(Tag::Software, b"abc\0").unwrap();
        dir.entry_ascii(Tag::DateTime, b"de\0").unwrap();
        dir.finish(0).unwrap();

        let buf = writer.into_inner().into_inner();
        let block_start = 8 + 2 + 2 * 12 + 4;
        // counts keep the unpadded lengths
        assert_eq!(&buf[14..18], [0, 0, 0, 4]);
        assert_eq!(&buf[26..30], [0, 0, 0, 3]);
        // "abc\0" needs no pad, "de\0" gets one byte so the block stays even
        assert_eq!(&buf[block_start..], [b'a', b'b', b'c', 0, b'd', b'e', 0, 0]);
        // the second string starts right after the first
        assert_eq!(&buf[30..34], (block_start as u32 + 4).to_be_bytes());
    }
}
