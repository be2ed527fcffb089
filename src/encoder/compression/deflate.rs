use std::io::Write;

use flate2::{write::ZlibEncoder, Compression as FlateCompression};

use crate::encoder::compression::Compressor;
use crate::error::CompressionError;
use crate::tags::CompressionMethod;

/// The Deflate algorithm used to compress strip data, stored as a zlib
/// stream as the Compression=8 tag value requires.
#[derive(Debug, Clone)]
pub struct Deflate {
    level: FlateCompression,
}

impl Deflate {
    /// The conservative choice between speed and ratio.
    pub const DEFAULT_LEVEL: u8 = 6;

    /// Create a new deflate compressor with a specific level of compression.
    ///
    /// Levels run from 0 (store only) to 9 (best, slowest); larger values
    /// are clamped to 9.
    pub fn with_level(level: u8) -> Self {
        Self {
            level: FlateCompression::new(u32::from(level.min(9))),
        }
    }
}

impl Default for Deflate {
    fn default() -> Self {
        Self::with_level(Self::DEFAULT_LEVEL)
    }
}

impl Compressor for Deflate {
    fn method(&self) -> CompressionMethod {
        CompressionMethod::Deflate
    }

    fn compress(&mut self, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
        let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), self.level);
        encoder.write_all(data)?;
        Ok(encoder.finish()?)
    }
}
