use crate::error::{ParquetError, ParquetResult};
use crate::metadata::ColumnDescriptor;
use crate::parquet_bridge::{Compression, Encoding};
use crate::statistics::Statistics;
use crate::thrift_format::{ColumnMetaData, Type};

/// Accumulates the metadata of one column chunk while it is being written
/// and turns it into a thrift [`ColumnMetaData`] once the chunk is closed.
///
/// The column writer fills values, sizes, encodings and statistics; the
/// embedding file writer is responsible for the page offsets, which are only
/// known to whoever owns the output stream.
#[derive(Debug, Clone)]
pub struct ColumnChunkMetadataBuilder {
    descriptor: ColumnDescriptor,
    compression: Compression,
    encodings: Vec<Encoding>,
    num_values: i64,
    total_uncompressed_size: i64,
    total_compressed_size: i64,
    data_page_offset: Option<i64>,
    dictionary_page_offset: Option<i64>,
    statistics: Option<Statistics>,
}

impl ColumnChunkMetadataBuilder {
    pub fn new(descriptor: ColumnDescriptor, compression: Compression) -> Self {
        Self {
            descriptor,
            compression,
            encodings: vec![],
            num_values: 0,
            total_uncompressed_size: 0,
            total_compressed_size: 0,
            data_page_offset: None,
            dictionary_page_offset: None,
            statistics: None,
        }
    }

    pub fn descriptor(&self) -> &ColumnDescriptor {
        &self.descriptor
    }

    /// Records an encoding used by a page of this chunk. Duplicates are kept out.
    pub fn add_encoding(&mut self, encoding: Encoding) {
        if !self.encodings.contains(&encoding) {
            self.encodings.push(encoding);
        }
    }

    pub fn add_page_size(&mut self, uncompressed: i64, compressed: i64) {
        self.total_uncompressed_size += uncompressed;
        self.total_compressed_size += compressed;
    }

    pub fn add_num_values(&mut self, num_values: i64) {
        self.num_values += num_values;
    }

    pub fn set_statistics(&mut self, statistics: Statistics) {
        self.statistics = Some(statistics);
    }

    pub fn statistics(&self) -> Option<&Statistics> {
        self.statistics.as_ref()
    }

    pub fn set_data_page_offset(&mut self, offset: i64) {
        if self.data_page_offset.is_none() {
            self.data_page_offset = Some(offset);
        }
    }

    pub fn set_dictionary_page_offset(&mut self, offset: i64) {
        self.dictionary_page_offset = Some(offset);
    }

    pub fn num_values(&self) -> i64 {
        self.num_values
    }

    /// Builds the thrift metadata of this chunk.
    /// # Error
    /// Errors if no data page offset was recorded.
    pub fn finish(&self) -> ParquetResult<ColumnMetaData> {
        let (type_, _): (Type, Option<i32>) =
            self.descriptor.descriptor.primitive_type.physical_type.into();
        let data_page_offset = self.data_page_offset.ok_or_else(|| {
            ParquetError::InvalidParameter(
                "the offset of the first data page is required to build column metadata".to_string(),
            )
        })?;
        Ok(ColumnMetaData {
            type_,
            encodings: self.encodings.iter().map(|x| (*x).into()).collect(),
            path_in_schema: self.descriptor.path_in_schema.clone(),
            codec: self.compression.into(),
            num_values: self.num_values,
            total_uncompressed_size: self.total_uncompressed_size,
            total_compressed_size: self.total_compressed_size,
            key_value_metadata: None,
            data_page_offset,
            index_page_offset: None,
            dictionary_page_offset: self.dictionary_page_offset,
            statistics: self.statistics.as_ref().map(|x| x.serialize()),
            encoding_stats: None,
            bloom_filter_offset: None,
        })
    }
}
