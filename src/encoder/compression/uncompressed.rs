use crate::encoder::compression::Compressor;
use crate::error::CompressionError;
use crate::tags::CompressionMethod;

/// An identity pass-through.
///
/// Pages stored through it are tagged Compression=1, so substituting it for
/// a real compressor keeps the output file valid. Mostly useful in tests
/// that need the compression plumbing exercised with deterministic bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uncompressed;

impl Compressor for Uncompressed {
    fn method(&self) -> CompressionMethod {
        CompressionMethod::None
    }

    fn compress(&mut self, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
        Ok(data.to_vec())
    }
}
