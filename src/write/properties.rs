//! Configuration of the column writers.
use std::collections::HashMap;

use crate::parquet_bridge::{CompressionOptions, Encoding};

/// Default threshold at which buffered values are cut into a data page.
pub const DEFAULT_PAGE_SIZE: usize = 1024 * 1024;
/// Default threshold on the dictionary payload size above which dictionary
/// encoding falls back to plain.
pub const DEFAULT_DICTIONARY_PAGE_SIZE_LIMIT: usize = 1024 * 1024;
/// Default number of values after which the page-size trigger is consulted.
pub const DEFAULT_WRITE_BATCH_SIZE: usize = 1024;

/// Immutable options of one write, shared by all column writers of a chunk.
///
/// Per-column overrides are keyed by the dotted column path
/// (e.g. `"a.b.c"`); unset paths fall back to the chunk-wide default.
#[derive(Debug, Clone)]
pub struct WriterProperties {
    data_page_size: usize,
    dictionary_page_size_limit: usize,
    write_batch_size: usize,
    compression: CompressionOptions,
    default_encoding: Encoding,
    default_dictionary_enabled: bool,
    default_statistics_enabled: bool,
    dictionary_page_encoding: Encoding,
    dictionary_index_encoding: Encoding,
    column_encodings: HashMap<String, Encoding>,
    column_dictionary_enabled: HashMap<String, bool>,
    column_statistics_enabled: HashMap<String, bool>,
}

impl Default for WriterProperties {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WriterProperties {
    /// Returns a builder with all defaults.
    pub fn builder() -> WriterPropertiesBuilder {
        WriterPropertiesBuilder {
            properties: WriterProperties {
                data_page_size: DEFAULT_PAGE_SIZE,
                dictionary_page_size_limit: DEFAULT_DICTIONARY_PAGE_SIZE_LIMIT,
                write_batch_size: DEFAULT_WRITE_BATCH_SIZE,
                compression: CompressionOptions::Uncompressed,
                default_encoding: Encoding::Plain,
                default_dictionary_enabled: true,
                default_statistics_enabled: true,
                dictionary_page_encoding: Encoding::PlainDictionary,
                dictionary_index_encoding: Encoding::PlainDictionary,
                column_encodings: HashMap::new(),
                column_dictionary_enabled: HashMap::new(),
                column_statistics_enabled: HashMap::new(),
            },
        }
    }

    pub fn data_page_size(&self) -> usize {
        self.data_page_size
    }

    pub fn dictionary_page_size_limit(&self) -> usize {
        self.dictionary_page_size_limit
    }

    pub fn write_batch_size(&self) -> usize {
        self.write_batch_size
    }

    pub fn compression(&self) -> CompressionOptions {
        self.compression
    }

    /// The encoding of the dictionary page itself.
    pub fn dictionary_page_encoding(&self) -> Encoding {
        self.dictionary_page_encoding
    }

    /// The encoding recorded on data pages holding dictionary indices.
    pub fn dictionary_index_encoding(&self) -> Encoding {
        self.dictionary_index_encoding
    }

    /// The value encoding of the column at `path` when dictionary encoding
    /// is not in effect.
    pub fn encoding(&self, path: &[String]) -> Encoding {
        self.column_encodings
            .get(&path.join("."))
            .copied()
            .unwrap_or(self.default_encoding)
    }

    pub fn dictionary_enabled(&self, path: &[String]) -> bool {
        self.column_dictionary_enabled
            .get(&path.join("."))
            .copied()
            .unwrap_or(self.default_dictionary_enabled)
    }

    pub fn statistics_enabled(&self, path: &[String]) -> bool {
        self.column_statistics_enabled
            .get(&path.join("."))
            .copied()
            .unwrap_or(self.default_statistics_enabled)
    }
}

/// Builds [`WriterProperties`].
#[derive(Debug, Clone)]
pub struct WriterPropertiesBuilder {
    properties: WriterProperties,
}

impl WriterPropertiesBuilder {
    pub fn set_data_page_size(mut self, size: usize) -> Self {
        self.properties.data_page_size = size;
        self
    }

    pub fn set_dictionary_page_size_limit(mut self, limit: usize) -> Self {
        self.properties.dictionary_page_size_limit = limit;
        self
    }

    pub fn set_write_batch_size(mut self, size: usize) -> Self {
        self.properties.write_batch_size = size.max(1);
        self
    }

    pub fn set_compression(mut self, compression: CompressionOptions) -> Self {
        self.properties.compression = compression;
        self
    }

    pub fn set_encoding(mut self, encoding: Encoding) -> Self {
        self.properties.default_encoding = encoding;
        self
    }

    pub fn set_dictionary_enabled(mut self, enabled: bool) -> Self {
        self.properties.default_dictionary_enabled = enabled;
        self
    }

    pub fn set_statistics_enabled(mut self, enabled: bool) -> Self {
        self.properties.default_statistics_enabled = enabled;
        self
    }

    pub fn set_dictionary_page_encoding(mut self, encoding: Encoding) -> Self {
        self.properties.dictionary_page_encoding = encoding;
        self
    }

    pub fn set_dictionary_index_encoding(mut self, encoding: Encoding) -> Self {
        self.properties.dictionary_index_encoding = encoding;
        self
    }

    pub fn set_column_encoding(mut self, path: &[String], encoding: Encoding) -> Self {
        self.properties
            .column_encodings
            .insert(path.join("."), encoding);
        self
    }

    pub fn set_column_dictionary_enabled(mut self, path: &[String], enabled: bool) -> Self {
        self.properties
            .column_dictionary_enabled
            .insert(path.join("."), enabled);
        self
    }

    pub fn set_column_statistics_enabled(mut self, path: &[String], enabled: bool) -> Self {
        self.properties
            .column_statistics_enabled
            .insert(path.join("."), enabled);
        self
    }

    pub fn build(self) -> WriterProperties {
        self.properties
    }
}
