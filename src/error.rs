use std::error::Error;
use std::fmt;
use std::io;

/// Encoding error kinds.
#[derive(Debug)]
pub enum EncodeError {
    /// A page's declared geometry is inconsistent with its pixel buffer
    Validation(ValidationError),

    /// A compressor was available and requested, but failed
    Compression(CompressionError),

    /// A page source failed to deliver pixel data
    Acquisition(AcquisitionError),

    /// An I/O error occurred while assembling the file
    Io(io::Error),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncodeError::Validation(e) => write!(fmt, "Validation error: {e}"),
            EncodeError::Compression(e) => write!(fmt, "Compression error: {e}"),
            EncodeError::Acquisition(e) => write!(fmt, "Acquisition error: {e}"),
            EncodeError::Io(e) => e.fmt(fmt),
        }
    }
}

impl Error for EncodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EncodeError::Validation(e) => Some(e),
            EncodeError::Compression(e) => Some(e),
            EncodeError::Acquisition(e) => Some(e),
            EncodeError::Io(e) => Some(e),
        }
    }
}

/// An inconsistency that would make the output structurally invalid.
///
/// These are hard failures: no padding or truncation rule is guessed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The pixel buffer length does not match `width * height * 4`
    PixelBufferSize {
        width: u32,
        height: u32,
        expected: u64,
        actual: usize,
    },

    /// A page was declared with a zero width or height
    ZeroDimension { width: u32, height: u32 },

    /// No pages were supplied; a TIFF file holds at least one directory
    NoPages,

    /// A strip or directory offset does not fit in the 32-bit offset fields
    OffsetOverflow { offset: u64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ValidationError::PixelBufferSize {
                width,
                height,
                expected,
                actual,
            } => write!(
                fmt,
                "pixel buffer of {actual} bytes does not match {width}x{height} RGBA ({expected} bytes)"
            ),
            ValidationError::ZeroDimension { width, height } => {
                write!(fmt, "image dimensions {width}x{height} must be non-zero")
            }
            ValidationError::NoPages => write!(fmt, "at least one page is required"),
            ValidationError::OffsetOverflow { offset } => {
                write!(fmt, "file offset {offset} exceeds the 32-bit offset range")
            }
        }
    }
}

impl Error for ValidationError {}

/// Failure reported by an injected compressor.
///
/// Distinct from a compressor being absent, which degrades to uncompressed
/// output and is not an error.
#[derive(Debug)]
pub struct CompressionError {
    inner: io::Error,
}

impl fmt::Display for CompressionError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "compressor failed: {}", self.inner)
    }
}

impl Error for CompressionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.inner)
    }
}

impl From<io::Error> for CompressionError {
    fn from(err: io::Error) -> CompressionError {
        CompressionError { inner: err }
    }
}

/// Failure surfaced by a page source before encoding starts, e.g. a
/// security-restricted pixel read on the rendering surface.
#[derive(Debug, Clone)]
pub struct AcquisitionError {
    message: String,
}

impl AcquisitionError {
    pub fn new(message: impl Into<String>) -> AcquisitionError {
        AcquisitionError {
            message: message.into(),
        }
    }
}

impl fmt::Display for AcquisitionError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        self.message.fmt(fmt)
    }
}

impl Error for AcquisitionError {}

impl From<ValidationError> for EncodeError {
    fn from(err: ValidationError) -> EncodeError {
        EncodeError::Validation(err)
    }
}

impl From<CompressionError> for EncodeError {
    fn from(err: CompressionError) -> EncodeError {
        EncodeError::Compression(err)
    }
}

impl From<AcquisitionError> for EncodeError {
    fn from(err: AcquisitionError) -> EncodeError {
        EncodeError::Acquisition(err)
    }
}

impl From<io::Error> for EncodeError {
    fn from(err: io::Error) -> EncodeError {
        EncodeError::Io(err)
    }
}

/// Result of an encoding process
pub type EncodeResult<T> = Result<T, EncodeError>;
