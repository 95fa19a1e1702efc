//! Rust-side enums for the thrift-generated wire types, with conversions
//! in both directions. The thrift types are i32-backed, so reading from
//! the wire is fallible (unknown values are out of spec) while writing is
//! total.
use crate::error::{ParquetError, ParquetResult};
use crate::thrift_format::{
    CompressionCodec, Encoding as ParquetEncoding, FieldRepetitionType,
    PageType as ParquetPageType,
};

/// Mirrors an i32-backed thrift type as a real enum and derives the two
/// conversions from a variant table.
macro_rules! thrift_enum {
    (
        $(#[$meta:meta])*
        enum $name:ident <=> $thrift:ty {
            $($(#[$variant_meta:meta])* $variant:ident <=> $constant:ident,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
        pub enum $name {
            $($(#[$variant_meta])* $variant,)+
        }

        impl TryFrom<$thrift> for $name {
            type Error = ParquetError;

            fn try_from(value: $thrift) -> Result<Self, Self::Error> {
                $(
                    if value == <$thrift>::$constant {
                        return Ok($name::$variant);
                    }
                )+
                Err(ParquetError::oos(concat!(
                    "unknown ",
                    stringify!($thrift),
                    " value"
                )))
            }
        }

        impl From<$name> for $thrift {
            fn from(value: $name) -> Self {
                match value {
                    $($name::$variant => <$thrift>::$constant,)+
                }
            }
        }
    };
}

thrift_enum! {
    /// How often a field may appear in a record.
    enum Repetition <=> FieldRepetitionType {
        /// Exactly once, never null.
        Required <=> REQUIRED,
        /// At most once; a missing value is a null.
        Optional <=> OPTIONAL,
        /// Any number of times (a list leaf).
        Repeated <=> REPEATED,
    }
}

thrift_enum! {
    /// A codec as recorded in the column-chunk metadata. All codecs of the
    /// format are bridged so metadata round-trips; see
    /// [`CompressionOptions`] for the ones this crate can produce.
    enum Compression <=> CompressionCodec {
        Uncompressed <=> UNCOMPRESSED,
        Snappy <=> SNAPPY,
        Gzip <=> GZIP,
        Lzo <=> LZO,
        Brotli <=> BROTLI,
        Lz4 <=> LZ4,
        Zstd <=> ZSTD,
        Lz4Raw <=> LZ4_RAW,
    }
}

thrift_enum! {
    /// The kinds of pages this crate deals in (v2 data pages are out of
    /// scope).
    enum PageType <=> ParquetPageType {
        DataPage <=> DATA_PAGE,
        DictionaryPage <=> DICTIONARY_PAGE,
    }
}

thrift_enum! {
    /// A value or level encoding as recorded in page headers.
    enum Encoding <=> ParquetEncoding {
        /// Raw little-endian values; byte arrays carry a 4-byte length
        /// prefix, fixed-length arrays just their bytes, booleans pack
        /// eight to a byte LSB-first.
        Plain <=> PLAIN,
        /// The v1 dictionary tag, deprecated by the format but what most
        /// readers expect on v1 chunks. Indices are hybrid RLE regardless.
        PlainDictionary <=> PLAIN_DICTIONARY,
        /// The hybrid run-length/bit-packing layout used for levels (and
        /// for booleans on a single bit).
        Rle <=> RLE,
        /// The legacy whole-stream bit-packing of levels.
        BitPacked <=> BIT_PACKED,
        /// Dictionary indices as hybrid RLE under the non-deprecated tag.
        RleDictionary <=> RLE_DICTIONARY,
    }
}

impl Encoding {
    /// Whether this encoding represents dictionary-indexed data pages.
    pub fn is_dictionary(&self) -> bool {
        matches!(self, Encoding::PlainDictionary | Encoding::RleDictionary)
    }
}

/// The codec to compress pages with, plus an optional level where the
/// codec has one. `None` picks the codec's default level. Only codecs this
/// crate can actually produce appear here; the [`Compression`] bridge
/// stays total for metadata round-trips.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum CompressionOptions {
    Uncompressed,
    Snappy,
    Gzip(Option<GzipLevel>),
    Zstd(Option<ZstdLevel>),
}

impl From<CompressionOptions> for Compression {
    fn from(value: CompressionOptions) -> Self {
        match value {
            CompressionOptions::Uncompressed => Compression::Uncompressed,
            CompressionOptions::Snappy => Compression::Snappy,
            CompressionOptions::Gzip(_) => Compression::Gzip,
            CompressionOptions::Zstd(_) => Compression::Zstd,
        }
    }
}

/// A gzip level, `0..=10` as flate2 counts them.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub struct GzipLevel(u8);

impl GzipLevel {
    pub fn try_new(level: u8) -> ParquetResult<Self> {
        if level > 10 {
            return Err(ParquetError::InvalidParameter(format!(
                "gzip levels stop at 10, got {level}"
            )));
        }
        Ok(Self(level))
    }

    pub fn compression_level(&self) -> u8 {
        self.0
    }
}

impl Default for GzipLevel {
    fn default() -> Self {
        // miniz_oxide's DefaultLevel
        Self(6)
    }
}

#[cfg(feature = "gzip")]
impl From<GzipLevel> for flate2::Compression {
    fn from(level: GzipLevel) -> Self {
        Self::new(level.compression_level() as u32)
    }
}

/// A zstd level, `1..=22`.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub struct ZstdLevel(i32);

impl ZstdLevel {
    pub fn try_new(level: i32) -> ParquetResult<Self> {
        if !(1..=22).contains(&level) {
            return Err(ParquetError::InvalidParameter(format!(
                "zstd levels span 1..=22, got {level}"
            )));
        }
        Ok(Self(level))
    }

    pub fn compression_level(&self) -> i32 {
        self.0
    }
}

#[cfg(feature = "zstd")]
impl Default for ZstdLevel {
    fn default() -> Self {
        Self(zstd::DEFAULT_COMPRESSION_LEVEL)
    }
}
