macro_rules! tags {
    {
        // Permit arbitrary meta items, which include documentation.
        $( #[$enum_attr:meta] )*
        $vis:vis enum $name:ident($ty:tt) {
            // Each of the `Name = Val,` permitting documentation.
            $($(#[$ident_attr:meta])* $tag:ident = $val:expr,)*
        }
    } => {
        $( #[$enum_attr] )*
        #[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
        #[repr($ty)]
        $vis enum $name {
            $($(#[$ident_attr])* $tag = $val,)*
        }

        impl $name {
            #[inline(always)]
            pub const fn to_u16(&self) -> u16 {
                *self as u16
            }
        }
    };
}

// Note: only the baseline tags this encoder emits, listed in the order they
// are written into each directory.
tags! {
/// TIFF tags
pub enum Tag(u16) {
    NewSubfileType = 254,
    ImageWidth = 256,
    ImageLength = 257,
    BitsPerSample = 258,
    Compression = 259,
    PhotometricInterpretation = 262,
    StripOffsets = 273,
    SamplesPerPixel = 277,
    StripByteCounts = 279,
    XResolution = 282,
    YResolution = 283,
    ResolutionUnit = 296,
    Software = 305,
    DateTime = 306,
    ExtraSamples = 338,
}
}

tags! {
/// The type of an IFD entry (a 2 byte field).
pub enum Type(u16) {
    /// 8-bit unsigned integer
    BYTE = 1,
    /// 8-bit byte that contains a 7-bit ASCII code; the last byte must be zero
    ASCII = 2,
    /// 16-bit unsigned integer
    SHORT = 3,
    /// 32-bit unsigned integer
    LONG = 4,
    /// Fraction stored as two 32-bit unsigned integers
    RATIONAL = 5,
}
}

tags! {
/// See [TIFF compression tags](https://www.awaresystems.be/imaging/tiff/tifftags/compression.html)
/// for reference.
pub enum CompressionMethod(u16) {
    None = 1,
    Deflate = 8,
}
}

tags! {
pub enum PhotometricInterpretation(u16) {
    WhiteIsZero = 0,
    BlackIsZero = 1,
    RGB = 2,
}
}

tags! {
/// Type to represent resolution units
pub enum ResolutionUnit(u16) {
    None = 1,
    Inch = 2,
    Centimeter = 3,
}
}

tags! {
pub enum ExtraSamples(u16) {
    /// There is no specified association between the sample and the image.
    Unspecified = 0,
    /// The sample is associated alpha, i.e. pre-multiplied color.
    AssociatedAlpha = 1,
    /// The sample is unassociated alpha such as a mask. There might be more than one such sample.
    UnassociatedAlpha = 2,
}
}

/// The byte order a file is written in, declared by its first two bytes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub enum ByteOrder {
    /// little endian byte order, the `II` marker
    LittleEndian,
    /// big endian byte order, the `MM` marker
    #[default]
    BigEndian,
}

impl ByteOrder {
    /// The two-byte marker opening the file header.
    pub const fn marker(self) -> u16 {
        match self {
            ByteOrder::LittleEndian => 0x4949,
            ByteOrder::BigEndian => 0x4d4d,
        }
    }
}
