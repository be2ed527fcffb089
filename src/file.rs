use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

/// A finished TIFF file.
///
/// The buffer starts with the byte-order marker and magic 42; its
/// directories are chained through NextIFD pointers, with the last one
/// holding 0. The wrapper only transforms the bytes, it never re-interprets
/// them.
pub struct TiffFile {
    bytes: Vec<u8>,
}

impl TiffFile {
    /// Media type for the file, e.g. when serving it as a download.
    pub const MIME_TYPE: &'static str = "image/tiff";

    pub(crate) fn new(bytes: Vec<u8>) -> TiffFile {
        TiffFile { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Render the file as a `data:image/tiff;base64,...` URI for inline
    /// embedding.
    ///
    /// The buffer is encoded in chunks so arbitrarily large files never hit
    /// a single-call limit; the chunk length is a multiple of 3, which keeps
    /// the concatenated chunks identical to a one-shot encode.
    pub fn to_data_uri(&self) -> String {
        const CHUNK_LEN: usize = 3 * 8192;

        let mut uri = String::with_capacity(
            "data:;base64,".len() + Self::MIME_TYPE.len() + self.bytes.len().div_ceil(3) * 4,
        );
        uri.push_str("data:");
        uri.push_str(Self::MIME_TYPE);
        uri.push_str(";base64,");
        for chunk in self.bytes.chunks(CHUNK_LEN) {
            BASE64.encode_string(chunk, &mut uri);
        }

        uri
    }
}

impl AsRef<[u8]> for TiffFile {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for TiffFile {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("TiffFile")
            .field("len", &self.bytes.len())
            .finish()
    }
}
