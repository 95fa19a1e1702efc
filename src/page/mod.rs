//! Descriptors of the pages assembled by the column writer.
use std::borrow::Cow;

use crate::parquet_bridge::Encoding;
use crate::statistics::Statistics;

/// A v1 data page ready for a [`crate::write::PageWriter`]: the (possibly
/// compressed) concatenation of the level chunks and the value payload,
/// plus everything the page header needs.
///
/// The buffer is borrowed when the page is consumed synchronously by the
/// sink and owned when it outlives the writer's reusable scratch buffers
/// (the deferred-page path), see [`CompressedDataPage::into_owned`].
#[derive(Debug, Clone)]
pub struct CompressedDataPage<'a> {
    buffer: Cow<'a, [u8]>,
    num_values: i32,
    encoding: Encoding,
    definition_level_encoding: Encoding,
    repetition_level_encoding: Encoding,
    uncompressed_page_size: usize,
    statistics: Option<Statistics>,
}

impl<'a> CompressedDataPage<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        buffer: Cow<'a, [u8]>,
        num_values: i32,
        encoding: Encoding,
        definition_level_encoding: Encoding,
        repetition_level_encoding: Encoding,
        uncompressed_page_size: usize,
        statistics: Option<Statistics>,
    ) -> Self {
        Self {
            buffer,
            num_values,
            encoding,
            definition_level_encoding,
            repetition_level_encoding,
            uncompressed_page_size,
            statistics,
        }
    }

    /// The payload handed to the output stream.
    pub fn buffer(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    /// The number of levels (not of non-null values) in the page.
    pub fn num_values(&self) -> i32 {
        self.num_values
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn definition_level_encoding(&self) -> Encoding {
        self.definition_level_encoding
    }

    pub fn repetition_level_encoding(&self) -> Encoding {
        self.repetition_level_encoding
    }

    pub fn uncompressed_size(&self) -> usize {
        self.uncompressed_page_size
    }

    pub fn compressed_size(&self) -> usize {
        self.buffer.len()
    }

    pub fn statistics(&self) -> Option<&Statistics> {
        self.statistics.as_ref()
    }

    /// Detaches the page from the writer's scratch buffers by deep-copying
    /// a borrowed payload.
    pub fn into_owned(self) -> CompressedDataPage<'static> {
        CompressedDataPage {
            buffer: Cow::Owned(self.buffer.into_owned()),
            num_values: self.num_values,
            encoding: self.encoding,
            definition_level_encoding: self.definition_level_encoding,
            repetition_level_encoding: self.repetition_level_encoding,
            uncompressed_page_size: self.uncompressed_page_size,
            statistics: self.statistics,
        }
    }
}

/// The single dictionary page of a chunk: the plain-encoded distinct values
/// in insertion order.
#[derive(Debug, Clone)]
pub struct DictPage {
    pub buffer: Vec<u8>,
    pub num_values: usize,
    pub encoding: Encoding,
    pub is_sorted: bool,
}

impl DictPage {
    pub fn new(buffer: Vec<u8>, num_values: usize, encoding: Encoding) -> Self {
        Self {
            buffer,
            num_values,
            encoding,
            is_sorted: false,
        }
    }
}
