//! Encoding of multi-page RGBA TIFF files.
//!
//! The entry point is [`TiffEncoder`]: it takes a sequence of [`RasterPage`]s
//! and an [`EncodeConfig`] and produces one contiguous buffer holding a
//! baseline TIFF file with one directory per page, chained through their
//! NextIFD pointers. Strip data is deflate-compressed when a compression
//! capability is present and requested, and stored raw otherwise.

use std::borrow::Cow;
use std::io::Cursor;

use chrono::{Local, NaiveDateTime};
use log::debug;

pub mod compression;
mod directory_encoder;
mod writer;

use self::compression::Compressor;
use self::directory_encoder::{
    checked_offset, DirectoryEncoder, DATETIME_BYTE_LEN, HEADER_BYTE_LEN, IFD_BYTE_LEN,
    LONG_BLOCK_LEN, PAGE_RESERVE, SOFTWARE_ID,
};
use self::writer::TiffWriter;
use crate::error::{EncodeResult, ValidationError};
use crate::file::TiffFile;
use crate::tags::{
    ByteOrder, CompressionMethod, ExtraSamples, PhotometricInterpretation, ResolutionUnit, Tag,
};

const SAMPLES_PER_PIXEL: u16 = 4;

/// Four 8-bit channel depths, packed in pairs into 32-bit words.
const BITS_PER_SAMPLE_RGBA8: [u32; 2] = [0x0008_0008; 2];

/// One in-memory RGBA image to be stored as one TIFF page.
///
/// The pixel buffer is interleaved RGBA, one byte per channel, and must hold
/// exactly `width * height * 4` bytes. The encoder only reads it.
#[derive(Debug, Clone)]
pub struct RasterPage<'a> {
    pub width: u32,
    pub height: u32,
    pub pixels: Cow<'a, [u8]>,
}

impl<'a> RasterPage<'a> {
    pub fn new(width: u32, height: u32, pixels: impl Into<Cow<'a, [u8]>>) -> RasterPage<'a> {
        RasterPage {
            width,
            height,
            pixels: pixels.into(),
        }
    }

    /// The pixel buffer length the declared dimensions require.
    pub fn expected_len(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height) * 4
    }

    /// Check the declared geometry against the pixel buffer.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.width == 0 || self.height == 0 {
            return Err(ValidationError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.pixels.len() as u64 != self.expected_len() {
            return Err(ValidationError::PixelBufferSize {
                width: self.width,
                height: self.height,
                expected: self.expected_len(),
                actual: self.pixels.len(),
            });
        }

        Ok(())
    }
}

/// Per-file encoding options.
#[derive(Debug, Clone)]
pub struct EncodeConfig {
    /// Compress strip data when a compression capability is present.
    pub compress: bool,
    /// Deflate level in `[0, 9]`; out-of-range values are clamped.
    pub compression_level: u8,
    /// Byte order of every multi-byte field, declared in the file header.
    pub byte_order: ByteOrder,
    /// Horizontal resolution in dots per inch.
    pub dpi_x: u32,
    /// Vertical resolution in dots per inch.
    pub dpi_y: u32,
    /// Value of the DateTime tag; the current local time when `None`.
    /// Pinning it makes the output reproducible.
    pub datetime: Option<NaiveDateTime>,
}

impl Default for EncodeConfig {
    fn default() -> EncodeConfig {
        EncodeConfig {
            compress: true,
            compression_level: 6,
            byte_order: ByteOrder::default(),
            dpi_x: 96,
            dpi_y: 96,
            datetime: None,
        }
    }
}

impl EncodeConfig {
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = level;
        self
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Set both resolution directions at once.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi_x = dpi;
        self.dpi_y = dpi;
        self
    }

    pub fn with_datetime(mut self, datetime: NaiveDateTime) -> Self {
        self.datetime = Some(datetime);
        self
    }
}

/// One page's strip payload, held until it is written into the final buffer.
struct PagePayload<'a> {
    encoded: Cow<'a, [u8]>,
    method: CompressionMethod,
    width: u32,
    height: u32,
}

/// Tiff encoder.
///
/// Encoding is a pure function of the pages, the configuration and the
/// clock: no state survives an [`encode`](TiffEncoder::encode) call.
///
/// # Examples
/// ```
/// use multipage_tiff::encoder::{EncodeConfig, RasterPage, TiffEncoder};
///
/// let pixels = vec![0u8; 2 * 2 * 4];
/// let page = RasterPage::new(2, 2, pixels);
///
/// let mut encoder = TiffEncoder::new(EncodeConfig::default());
/// let file = encoder.encode(&[page]).unwrap();
/// assert_eq!(&file.as_bytes()[..2], b"MM");
/// ```
pub struct TiffEncoder {
    config: EncodeConfig,
    compressor: Option<Box<dyn Compressor>>,
}

impl TiffEncoder {
    /// Create an encoder with the default compression capability: deflate at
    /// the configured level when the `deflate` feature is enabled and the
    /// config asks for compression, none otherwise.
    pub fn new(config: EncodeConfig) -> TiffEncoder {
        let compressor = Self::default_compressor(&config);
        TiffEncoder { config, compressor }
    }

    /// Replace the compression capability.
    ///
    /// `None` forces every page to be stored raw even when the config asks
    /// for compression; the encode still succeeds.
    pub fn with_compressor(mut self, compressor: Option<Box<dyn Compressor>>) -> TiffEncoder {
        self.compressor = compressor;
        self
    }

    #[cfg(feature = "deflate")]
    fn default_compressor(config: &EncodeConfig) -> Option<Box<dyn Compressor>> {
        if config.compress {
            Some(Box::new(compression::Deflate::with_level(
                config.compression_level,
            )))
        } else {
            None
        }
    }

    #[cfg(not(feature = "deflate"))]
    fn default_compressor(_config: &EncodeConfig) -> Option<Box<dyn Compressor>> {
        None
    }

    /// Serialize `pages` into a single multi-page TIFF file, in input order.
    pub fn encode(&mut self, pages: &[RasterPage<'_>]) -> EncodeResult<TiffFile> {
        if pages.is_empty() {
            return Err(ValidationError::NoPages.into());
        }
        for page in pages {
            page.validate()?;
        }

        let payloads = pages
            .iter()
            .map(|page| self.prepare_page(page))
            .collect::<EncodeResult<Vec<_>>>()?;

        let total: u64 = payloads
            .iter()
            .map(|payload| u64::from(PAGE_RESERVE) + payload.encoded.len() as u64)
            .sum();
        checked_offset(total)?;

        debug!(
            "encoding {} page(s) into a {} byte buffer",
            payloads.len(),
            total
        );

        let datetime = self.datetime_value();
        let mut writer = TiffWriter::new(
            Cursor::new(Vec::with_capacity(total as usize)),
            self.config.byte_order,
        );
        writer.write_header(HEADER_BYTE_LEN)?;

        let last = payloads.len() - 1;
        for (index, page) in payloads.iter().enumerate() {
            let ifd_start = writer.offset()?;
            let strip_start = ifd_start + u64::from(IFD_BYTE_LEN) + u64::from(LONG_BLOCK_LEN);
            let strip_len = checked_offset(page.encoded.len() as u64)?;
            let next_ifd = if index == last {
                0
            } else {
                checked_offset(strip_start + u64::from(strip_len))?
            };

            let mut dir = DirectoryEncoder::new(&mut writer)?;
            dir.entry_long(Tag::NewSubfileType, 0)?;
            dir.entry_long(Tag::ImageWidth, page.width)?;
            dir.entry_long(Tag::ImageLength, page.height)?;
            dir.entry_shorts_packed(Tag::BitsPerSample, 4, &BITS_PER_SAMPLE_RGBA8)?;
            dir.entry_short(Tag::Compression, page.method.to_u16())?;
            dir.entry_short(
                Tag::PhotometricInterpretation,
                PhotometricInterpretation::RGB.to_u16(),
            )?;
            dir.entry_long(Tag::StripOffsets, checked_offset(strip_start)?)?;
            dir.entry_short(Tag::SamplesPerPixel, SAMPLES_PER_PIXEL)?;
            dir.entry_long(Tag::StripByteCounts, strip_len)?;
            dir.entry_rational(Tag::XResolution, self.config.dpi_x, 1)?;
            dir.entry_rational(Tag::YResolution, self.config.dpi_y, 1)?;
            dir.entry_short(Tag::ResolutionUnit, ResolutionUnit::Inch.to_u16())?;
            dir.entry_ascii(Tag::Software, SOFTWARE_ID.as_bytes())?;
            dir.entry_ascii(Tag::DateTime, &datetime)?;
            dir.entry_short(Tag::ExtraSamples, ExtraSamples::UnassociatedAlpha.to_u16())?;
            let payload_pos = dir.finish(next_ifd)?;
            debug_assert_eq!(payload_pos, strip_start);

            writer.write_bytes(&page.encoded)?;
        }

        let mut buffer = writer.into_inner().into_inner();
        // the fixed reserve accounts the 8-byte file header to every page;
        // pad the written bytes up to the computed total
        buffer.resize(total as usize, 0);

        Ok(TiffFile::new(buffer))
    }

    /// Like [`encode`](TiffEncoder::encode), but for pages delivered by a
    /// fallible source. The first failure is returned and no file is
    /// produced.
    pub fn encode_iter<'p, I>(&mut self, pages: I) -> EncodeResult<TiffFile>
    where
        I: IntoIterator<Item = EncodeResult<RasterPage<'p>>>,
    {
        let pages = pages.into_iter().collect::<EncodeResult<Vec<_>>>()?;
        self.encode(&pages)
    }

    fn prepare_page<'p>(&mut self, page: &'p RasterPage<'_>) -> EncodeResult<PagePayload<'p>> {
        let (encoded, method): (Cow<'p, [u8]>, _) = match self.compressor.as_mut() {
            Some(compressor) if self.config.compress => {
                let compressed = compressor.compress(&page.pixels)?;
                debug!(
                    "page {}x{}: {} -> {} bytes",
                    page.width,
                    page.height,
                    page.pixels.len(),
                    compressed.len()
                );
                (Cow::Owned(compressed), compressor.method())
            }
            _ => (Cow::Borrowed(page.pixels.as_ref()), CompressionMethod::None),
        };

        Ok(PagePayload {
            encoded,
            method,
            width: page.width,
            height: page.height,
        })
    }

    fn datetime_value(&self) -> Vec<u8> {
        let datetime = self
            .config
            .datetime
            .unwrap_or_else(|| Local::now().naive_local());
        let mut value = datetime.format("%Y:%m:%d %H:%M:%S").to_string().into_bytes();
        value.push(0);
        debug_assert_eq!(value.len(), DATETIME_BYTE_LEN);

        value
    }
}

/// Convenience function to encode a page sequence in one call.
pub fn encode(pages: &[RasterPage<'_>], config: EncodeConfig) -> EncodeResult<TiffFile> {
    TiffEncoder::new(config).encode(pages)
}
