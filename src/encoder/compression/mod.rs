use crate::error::CompressionError;
use crate::tags::CompressionMethod;

#[cfg(feature = "deflate")]
mod deflate;
mod uncompressed;

#[cfg(feature = "deflate")]
pub use self::deflate::Deflate;
pub use self::uncompressed::Uncompressed;

/// A compression capability injected into the encoder.
///
/// The encoder never depends on a concrete algorithm: it hands each page's
/// raw RGBA bytes to whatever capability it was given and records the
/// capability's [`CompressionMethod`] in that page's Compression tag. An
/// absent capability is not an error; pages are then stored raw.
pub trait Compressor {
    /// The tag value recorded for pages stored through this compressor.
    fn method(&self) -> CompressionMethod;

    /// Compress one page's pixel data.
    fn compress(&mut self, data: &[u8]) -> Result<Vec<u8>, CompressionError>;
}
