//! Functionality to compress and decompress page payloads.
//! Codecs are compile-time features; using a codec whose feature is not
//! active surfaces [`ParquetError::FeatureNotActive`].
pub use crate::parquet_bridge::{Compression, CompressionOptions, GzipLevel, ZstdLevel};

use crate::error::{ParquetError, ParquetResult};

#[cfg(any(feature = "snappy", feature = "gzip", feature = "zstd"))]
use crate::error::Feature;

/// Compresses `input_buf` with `compression`, appending to `output_buf`.
pub fn compress(
    compression: CompressionOptions,
    input_buf: &[u8],
    output_buf: &mut Vec<u8>,
) -> ParquetResult<()> {
    match compression {
        CompressionOptions::Uncompressed => {
            output_buf.extend_from_slice(input_buf);
            Ok(())
        },
        #[cfg(feature = "snappy")]
        CompressionOptions::Snappy => {
            let original_len = output_buf.len();
            output_buf.resize(
                original_len + snap::raw::max_compress_len(input_buf.len()),
                0,
            );
            let written = snap::raw::Encoder::new()
                .compress(input_buf, &mut output_buf[original_len..])?;
            output_buf.truncate(original_len + written);
            Ok(())
        },
        #[cfg(not(feature = "snappy"))]
        CompressionOptions::Snappy => Err(ParquetError::FeatureNotActive(
            Feature::Snappy,
            "compress with snappy".to_string(),
        )),
        #[cfg(feature = "gzip")]
        CompressionOptions::Gzip(level) => {
            use std::io::Write;
            let level = level.unwrap_or_default();
            let mut encoder = flate2::write::GzEncoder::new(output_buf, level.into());
            encoder.write_all(input_buf)?;
            encoder.try_finish()?;
            Ok(())
        },
        #[cfg(not(feature = "gzip"))]
        CompressionOptions::Gzip(_) => Err(ParquetError::FeatureNotActive(
            Feature::Gzip,
            "compress with gzip".to_string(),
        )),
        #[cfg(feature = "zstd")]
        CompressionOptions::Zstd(level) => {
            let level = level.map(|x| x.compression_level()).unwrap_or_default();
            zstd::stream::copy_encode(input_buf, output_buf, level)
                .map_err(ParquetError::from)
        },
        #[cfg(not(feature = "zstd"))]
        CompressionOptions::Zstd(_) => Err(ParquetError::FeatureNotActive(
            Feature::Zstd,
            "compress with zstd".to_string(),
        )),
    }
}

/// Decompresses `input_buf` into `output_buf`, which must be sized to the
/// known uncompressed length.
pub fn decompress(
    compression: Compression,
    input_buf: &[u8],
    output_buf: &mut [u8],
) -> ParquetResult<()> {
    match compression {
        Compression::Uncompressed => {
            output_buf.copy_from_slice(input_buf);
            Ok(())
        },
        #[cfg(feature = "snappy")]
        Compression::Snappy => {
            snap::raw::Decoder::new().decompress(input_buf, output_buf)?;
            Ok(())
        },
        #[cfg(not(feature = "snappy"))]
        Compression::Snappy => Err(ParquetError::FeatureNotActive(
            Feature::Snappy,
            "decompress with snappy".to_string(),
        )),
        #[cfg(feature = "gzip")]
        Compression::Gzip => {
            use std::io::Read;
            let mut decoder = flate2::read::GzDecoder::new(input_buf);
            decoder.read_exact(output_buf)?;
            Ok(())
        },
        #[cfg(not(feature = "gzip"))]
        Compression::Gzip => Err(ParquetError::FeatureNotActive(
            Feature::Gzip,
            "decompress with gzip".to_string(),
        )),
        #[cfg(feature = "zstd")]
        Compression::Zstd => {
            zstd::bulk::decompress_to_buffer(input_buf, output_buf)
                .map_err(ParquetError::from)?;
            Ok(())
        },
        #[cfg(not(feature = "zstd"))]
        Compression::Zstd => Err(ParquetError::FeatureNotActive(
            Feature::Zstd,
            "decompress with zstd".to_string(),
        )),
        other => Err(ParquetError::FeatureNotSupported(format!(
            "decompressing {other:?}"
        ))),
    }
}
