//! Encoding of multi-page RGBA TIFF files
//!
//! This crate serializes in-memory RGBA raster images into a single,
//! baseline TIFF 6.0 file with one page per input image, optionally
//! ZIP-compressing each page's strip data. It does not read TIFF files and
//! only handles 8-bit interleaved RGBA input.
//!
//! # Related Links
//! * <https://web.archive.org/web/20210108073850/https://www.adobe.io/open/standards/TIFF.html> - The TIFF specification

pub mod encoder;
mod error;
mod file;
pub mod tags;

pub use self::error::{
    AcquisitionError, CompressionError, EncodeError, EncodeResult, ValidationError,
};
pub use self::file::TiffFile;
