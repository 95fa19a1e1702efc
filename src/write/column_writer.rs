//! The page-assembly state machine turning batches of levels and values
//! into dictionary/data pages.
use std::borrow::Cow;
use std::collections::VecDeque;
use std::sync::Arc;

use super::encoders::{
    BooleanType, ByteArrayType, DataType, DictEncoder, DoubleType, FixedLenByteArrayType,
    FloatType, Int32Type, Int64Type, Int96Type, PlainEncoder,
};
use super::levels::LevelEncoder;
use super::page_writer::PageWriter;
use super::properties::WriterProperties;
use super::statistics::TypedStatistics;
use crate::error::{ParquetError, ParquetResult};
use crate::metadata::{ColumnChunkMetadataBuilder, ColumnDescriptor};
use crate::page::{CompressedDataPage, DictPage};
use crate::parquet_bridge::Encoding;
use crate::schema::types::PhysicalType;

enum ValuesEncoder<D: DataType> {
    Plain(PlainEncoder<D>),
    Dictionary(DictEncoder<D>),
}

impl<D: DataType> ValuesEncoder<D> {
    fn put(&mut self, values: &[D::T]) {
        match self {
            Self::Plain(encoder) => encoder.put(values),
            Self::Dictionary(encoder) => encoder.put(values),
        }
    }

    fn put_spaced(&mut self, values: &[D::T], valid_bits: &[u8], valid_bits_offset: usize) {
        match self {
            Self::Plain(encoder) => encoder.put_spaced(values, valid_bits, valid_bits_offset),
            Self::Dictionary(encoder) => encoder.put_spaced(values, valid_bits, valid_bits_offset),
        }
    }

    fn estimated_data_encoded_size(&self) -> usize {
        match self {
            Self::Plain(encoder) => encoder.estimated_data_encoded_size(),
            Self::Dictionary(encoder) => encoder.estimated_data_encoded_size(),
        }
    }

    fn flush_values(&mut self) -> ParquetResult<Vec<u8>> {
        match self {
            Self::Plain(encoder) => Ok(encoder.flush_values()),
            Self::Dictionary(encoder) => encoder.flush_values(),
        }
    }
}

/// Writes one column chunk: buffers levels and values, cuts data pages by
/// estimated size, defers them while dictionary encoding is active, falls
/// back to plain encoding when the dictionary outgrows its limit, and
/// enforces the declared row count at close.
pub struct TypedColumnWriter<D: DataType> {
    descriptor: ColumnDescriptor,
    properties: Arc<WriterProperties>,
    pager: Box<dyn PageWriter>,
    metadata: ColumnChunkMetadataBuilder,
    expected_rows: i64,
    has_dictionary: bool,
    encoding: Encoding,
    encoder: ValuesEncoder<D>,
    page_statistics: Option<TypedStatistics<D>>,
    chunk_statistics: Option<TypedStatistics<D>>,
    /// Raw levels accumulated since the last page cut.
    def_levels_sink: Vec<i16>,
    rep_levels_sink: Vec<i16>,
    /// Reusable scratch: `u32_le(len)` plus the RLE bytes of one level stream.
    levels_rle: Vec<u8>,
    /// Reusable scratch for the assembled and the compressed page.
    uncompressed_data: Vec<u8>,
    compressed_data: Vec<u8>,
    /// Pages held back while the dictionary is still growing; they own their
    /// payload since the scratch buffers above are reused.
    deferred_pages: VecDeque<CompressedDataPage<'static>>,
    num_buffered_values: i64,
    num_buffered_encoded_values: i64,
    num_rows: i64,
    total_bytes_written: u64,
    fallback: bool,
    closed: bool,
}

impl<D: DataType> TypedColumnWriter<D> {
    pub(crate) fn new(
        descriptor: ColumnDescriptor,
        pager: Box<dyn PageWriter>,
        expected_rows: i64,
        encoding: Encoding,
        properties: Arc<WriterProperties>,
    ) -> ParquetResult<Self> {
        let physical_type = &descriptor.descriptor.primitive_type.physical_type;
        if !D::matches(physical_type) {
            return Err(ParquetError::InvalidParameter(format!(
                "the column writer type cannot write a {physical_type:?} column"
            )));
        }

        let encoder = match encoding {
            Encoding::Plain => {
                ValuesEncoder::Plain(PlainEncoder::new(descriptor.descriptor.clone()))
            },
            Encoding::PlainDictionary | Encoding::RleDictionary => {
                ValuesEncoder::Dictionary(DictEncoder::new(descriptor.descriptor.clone()))
            },
            other => {
                return Err(ParquetError::FeatureNotSupported(format!(
                    "writing values as {other:?}"
                )))
            },
        };

        let (page_statistics, chunk_statistics) =
            if properties.statistics_enabled(&descriptor.path_in_schema) {
                let primitive_type = descriptor.descriptor.primitive_type.clone();
                (
                    Some(TypedStatistics::new(primitive_type.clone())),
                    Some(TypedStatistics::new(primitive_type)),
                )
            } else {
                (None, None)
            };

        let metadata =
            ColumnChunkMetadataBuilder::new(descriptor.clone(), properties.compression().into());

        Ok(Self {
            descriptor,
            pager,
            metadata,
            expected_rows,
            has_dictionary: encoding.is_dictionary(),
            encoding,
            encoder,
            page_statistics,
            chunk_statistics,
            def_levels_sink: vec![],
            rep_levels_sink: vec![],
            levels_rle: vec![],
            uncompressed_data: vec![],
            compressed_data: vec![],
            deferred_pages: VecDeque::new(),
            num_buffered_values: 0,
            num_buffered_encoded_values: 0,
            num_rows: 0,
            total_bytes_written: 0,
            fallback: false,
            closed: false,
            properties,
        })
    }

    /// Writes a batch of values and their levels.
    ///
    /// `def_levels` is required iff the column is nullable or nested
    /// (`max_def_level > 0`), `rep_levels` iff it is repeated
    /// (`max_rep_level > 0`). `values` holds only the non-null leaves, one
    /// per definition level equal to the maximum. Returns the number of
    /// values consumed.
    pub fn write_batch(
        &mut self,
        values: &[D::T],
        def_levels: Option<&[i16]>,
        rep_levels: Option<&[i16]>,
    ) -> ParquetResult<usize> {
        self.write_batch_internal(values, def_levels, rep_levels, None)
    }

    /// The spaced variant of [`TypedColumnWriter::write_batch`]: a validity
    /// bitmap (one bit per level entry, set iff the leaf is non-null)
    /// accompanies the dense values, letting statistics see null positions.
    pub fn write_batch_spaced(
        &mut self,
        values: &[D::T],
        def_levels: Option<&[i16]>,
        rep_levels: Option<&[i16]>,
        valid_bits: &[u8],
        valid_bits_offset: usize,
    ) -> ParquetResult<usize> {
        self.write_batch_internal(
            values,
            def_levels,
            rep_levels,
            Some((valid_bits, valid_bits_offset)),
        )
    }

    /// Closes the writer: emits the pending dictionary page, flushes
    /// residual values and deferred pages, attaches the chunk statistics,
    /// closes the sink and checks the row count. Returns the total number
    /// of bytes written through the sink.
    pub fn close(&mut self) -> ParquetResult<u64> {
        if self.closed {
            return Err(ParquetError::InvalidParameter(
                "the column writer is already closed".to_string(),
            ));
        }
        self.closed = true;

        if self.has_dictionary && !self.fallback {
            self.write_dictionary_page()?;
        }
        self.flush_buffered_data_pages()?;

        if let Some(chunk_statistics) = &self.chunk_statistics {
            self.metadata.set_statistics(chunk_statistics.snapshot());
        }
        self.pager.close(self.has_dictionary, self.fallback)?;

        if self.num_rows != self.expected_rows {
            return Err(ParquetError::InvalidParameter(format!(
                "wrote {} rows into a column chunk declared with {} rows",
                self.num_rows, self.expected_rows
            )));
        }
        Ok(self.total_bytes_written)
    }

    /// The bytes handed to the sink so far. Non-decreasing.
    pub fn total_bytes_written(&self) -> u64 {
        self.total_bytes_written
    }

    /// The number of rows written so far.
    pub fn num_rows(&self) -> i64 {
        self.num_rows
    }

    /// The metadata accumulated for this chunk. Complete once
    /// [`TypedColumnWriter::close`] returned.
    pub fn metadata(&self) -> &ColumnChunkMetadataBuilder {
        &self.metadata
    }

    pub fn descriptor(&self) -> &ColumnDescriptor {
        &self.descriptor
    }

    fn write_batch_internal(
        &mut self,
        values: &[D::T],
        def_levels: Option<&[i16]>,
        rep_levels: Option<&[i16]>,
        valid_bits: Option<(&[u8], usize)>,
    ) -> ParquetResult<usize> {
        if self.closed {
            return Err(ParquetError::InvalidParameter(
                "the column writer is already closed".to_string(),
            ));
        }

        let max_def_level = self.descriptor.descriptor.max_def_level;
        let max_rep_level = self.descriptor.descriptor.max_rep_level;
        if max_def_level > 0 && def_levels.is_none() {
            return Err(ParquetError::InvalidParameter(
                "definition levels are required for a nullable or nested column".to_string(),
            ));
        }
        if max_rep_level > 0 && rep_levels.is_none() {
            return Err(ParquetError::InvalidParameter(
                "repetition levels are required for a repeated column".to_string(),
            ));
        }

        let num_levels = def_levels.map(|x| x.len()).unwrap_or(values.len());
        if let Some(rep_levels) = rep_levels {
            if rep_levels.len() != num_levels {
                return Err(ParquetError::InvalidParameter(
                    "repetition and definition levels must have the same length".to_string(),
                ));
            }
        }

        // Page-size checks run only after a mini-batch is ingested; slicing
        // the input bounds how far past `data_page_size` a page can grow no
        // matter how large the caller's batch is.
        let write_batch_size = self.properties.write_batch_size();
        let mut values_offset = 0;
        let mut offset = 0;
        while offset < num_levels {
            let length = write_batch_size.min(num_levels - offset);
            let mini_def = def_levels.map(|x| &x[offset..offset + length]);
            let mini_rep = rep_levels.map(|x| &x[offset..offset + length]);
            let mini_valid = valid_bits.map(|(bits, start)| (bits, start + offset));
            values_offset += self.write_mini_batch(
                &values[values_offset..],
                mini_def,
                mini_rep,
                mini_valid,
                length,
            )?;
            offset += length;
        }
        Ok(values_offset)
    }

    fn write_mini_batch(
        &mut self,
        values: &[D::T],
        def_levels: Option<&[i16]>,
        rep_levels: Option<&[i16]>,
        valid_bits: Option<(&[u8], usize)>,
        num_values: usize,
    ) -> ParquetResult<usize> {
        let max_def_level = self.descriptor.descriptor.max_def_level;
        let max_rep_level = self.descriptor.descriptor.max_rep_level;

        // If the field is required and non-repeated, there are no definition levels
        let values_to_write = if max_def_level > 0 {
            let def_levels = def_levels.unwrap();
            let values_to_write = def_levels
                .iter()
                .filter(|&&level| level == max_def_level)
                .count();
            self.def_levels_sink.extend_from_slice(def_levels);
            values_to_write
        } else {
            num_values
        };

        if max_rep_level > 0 {
            // A row can span multiple values; count where one starts
            let rep_levels = rep_levels.unwrap();
            self.num_rows += rep_levels.iter().filter(|&&level| level == 0).count() as i64;
            self.rep_levels_sink.extend_from_slice(rep_levels);
        } else {
            // Each value is exactly one row
            self.num_rows += num_values as i64;
        }

        if self.num_rows > self.expected_rows {
            return Err(ParquetError::InvalidParameter(format!(
                "wrote {} rows into a column chunk declared with {} rows",
                self.num_rows, self.expected_rows
            )));
        }

        if values.len() < values_to_write {
            return Err(ParquetError::InvalidParameter(format!(
                "the definition levels announce {} values but only {} were provided",
                values_to_write,
                values.len()
            )));
        }
        let values = &values[..values_to_write];

        let num_nulls = (num_values - values_to_write) as i64;
        match valid_bits {
            Some((bits, offset)) => {
                self.encoder.put_spaced(values, bits, offset);
                if let Some(statistics) = &mut self.page_statistics {
                    statistics.update_spaced(values, bits, offset, values_to_write, num_nulls);
                }
            },
            None => {
                self.encoder.put(values);
                if let Some(statistics) = &mut self.page_statistics {
                    statistics.update(values, values_to_write, num_nulls);
                }
            },
        }

        self.num_buffered_values += num_values as i64;
        self.num_buffered_encoded_values += values_to_write as i64;

        if self.encoder.estimated_data_encoded_size() >= self.properties.data_page_size() {
            self.add_data_page()?;
        }
        if self.has_dictionary && !self.fallback {
            self.check_dictionary_limit()?;
        }

        Ok(values_to_write)
    }

    /// Cuts the buffered levels and values into one data page and hands it
    /// to the sink, or defers it while the dictionary is still growing.
    fn add_data_page(&mut self) -> ParquetResult<()> {
        let values = self.encoder.flush_values()?;

        let max_def_level = self.descriptor.descriptor.max_def_level;
        let max_rep_level = self.descriptor.descriptor.max_rep_level;
        let num_buffered_values = self.num_buffered_values as usize;

        // [rep_chunk?][def_chunk?][values]; a level chunk is the encoded
        // length (u32 LE) followed by the RLE stream, and is omitted
        // entirely when the maximum level is zero
        self.uncompressed_data.clear();
        if max_rep_level > 0 {
            Self::rle_encode_levels(
                &mut self.levels_rle,
                &self.rep_levels_sink,
                max_rep_level,
                num_buffered_values,
            )?;
            self.uncompressed_data.extend_from_slice(&self.levels_rle);
        }
        if max_def_level > 0 {
            Self::rle_encode_levels(
                &mut self.levels_rle,
                &self.def_levels_sink,
                max_def_level,
                num_buffered_values,
            )?;
            self.uncompressed_data.extend_from_slice(&self.levels_rle);
        }
        self.uncompressed_data.extend_from_slice(&values);
        let uncompressed_size = self.uncompressed_data.len();

        let statistics = match (&mut self.page_statistics, &mut self.chunk_statistics) {
            (Some(page), Some(chunk)) => {
                chunk.merge(page);
                let snapshot = page.snapshot();
                page.reset();
                Some(snapshot)
            },
            _ => None,
        };

        let buffer: Cow<[u8]> = if self.pager.has_compressor() {
            self.compressed_data.clear();
            self.pager
                .compress(&self.uncompressed_data, &mut self.compressed_data)?;
            Cow::Borrowed(&self.compressed_data)
        } else {
            Cow::Borrowed(&self.uncompressed_data)
        };

        let page = CompressedDataPage::new(
            buffer,
            self.num_buffered_values as i32,
            self.encoding,
            Encoding::Rle,
            Encoding::Rle,
            uncompressed_size,
            statistics,
        );
        log::trace!(
            "cut a data page of {} values ({} non-null, {} bytes uncompressed)",
            self.num_buffered_values,
            self.num_buffered_encoded_values,
            uncompressed_size
        );

        self.metadata.add_encoding(self.encoding);
        self.metadata.add_num_values(self.num_buffered_values);

        if self.has_dictionary && !self.fallback {
            // the scratch buffers are about to be reused; the queued page
            // needs its own copy
            self.deferred_pages.push_back(page.into_owned());
        } else {
            Self::write_page(
                self.pager.as_mut(),
                &mut self.metadata,
                &mut self.total_bytes_written,
                &page,
            )?;
        }

        self.def_levels_sink.clear();
        self.rep_levels_sink.clear();
        self.num_buffered_values = 0;
        self.num_buffered_encoded_values = 0;
        Ok(())
    }

    /// Encodes one level stream into `levels_rle`: 4 bytes of little-endian
    /// encoded length followed by the RLE bytes.
    fn rle_encode_levels(
        levels_rle: &mut Vec<u8>,
        levels: &[i16],
        max_level: i16,
        num_values: usize,
    ) -> ParquetResult<()> {
        let length_prefix = std::mem::size_of::<u32>();
        let rle_size =
            LevelEncoder::max_buffer_size(Encoding::Rle, max_level, num_values)? + length_prefix;
        levels_rle.resize(rle_size, 0);

        let mut encoder =
            LevelEncoder::new(Encoding::Rle, max_level, &mut levels_rle[length_prefix..])?;
        let encoded = encoder.encode(levels);
        if encoded != levels.len() {
            return Err(ParquetError::oos(
                "the level buffer was sized too small for its stream",
            ));
        }
        let encoded_size = encoder.len();
        levels_rle[..length_prefix].copy_from_slice(&(encoded_size as u32).to_le_bytes());
        levels_rle.truncate(length_prefix + encoded_size);
        Ok(())
    }

    /// One-way transition out of dictionary encoding once the dictionary
    /// payload crosses the configured limit: emit the dictionary page, drain
    /// the deferred pages, then continue with a plain encoder.
    fn check_dictionary_limit(&mut self) -> ParquetResult<()> {
        let dict_encoded_size = match &self.encoder {
            ValuesEncoder::Dictionary(encoder) => encoder.dict_encoded_size(),
            ValuesEncoder::Plain(_) => return Ok(()),
        };
        if dict_encoded_size < self.properties.dictionary_page_size_limit() {
            return Ok(());
        }

        log::debug!(
            "dictionary of column {} reached {} bytes (limit {}); falling back to plain encoding",
            self.descriptor.path_in_schema.join("."),
            dict_encoded_size,
            self.properties.dictionary_page_size_limit()
        );
        self.write_dictionary_page()?;
        // the residual buffered indices become one last dictionary-encoded
        // page before the encoder is replaced
        self.flush_buffered_data_pages()?;
        self.fallback = true;
        self.encoder = ValuesEncoder::Plain(PlainEncoder::new(self.descriptor.descriptor.clone()));
        self.encoding = Encoding::Plain;
        Ok(())
    }

    fn write_dictionary_page(&mut self) -> ParquetResult<()> {
        let (buffer, num_entries) = match &mut self.encoder {
            ValuesEncoder::Dictionary(encoder) => (encoder.write_dict(), encoder.num_entries()),
            ValuesEncoder::Plain(_) => {
                return Err(ParquetError::InvalidParameter(
                    "only a dictionary-encoded writer can emit a dictionary page".to_string(),
                ))
            },
        };
        let uncompressed_size = buffer.len();
        let page = DictPage::new(
            buffer,
            num_entries,
            self.properties.dictionary_page_encoding(),
        );

        self.metadata
            .set_dictionary_page_offset(self.total_bytes_written as i64);
        let bytes_written = self.pager.write_dictionary_page(&page)?;
        self.total_bytes_written += bytes_written;
        let header_size = bytes_written.saturating_sub(page.buffer.len() as u64);
        self.metadata.add_page_size(
            (uncompressed_size as u64 + header_size) as i64,
            bytes_written as i64,
        );
        self.metadata
            .add_encoding(self.properties.dictionary_page_encoding());
        Ok(())
    }

    /// Cuts the residual buffered values into a final page and drains the
    /// deferred queue in FIFO order.
    fn flush_buffered_data_pages(&mut self) -> ParquetResult<()> {
        if self.num_buffered_values > 0 {
            self.add_data_page()?;
        }
        while let Some(page) = self.deferred_pages.pop_front() {
            Self::write_page(
                self.pager.as_mut(),
                &mut self.metadata,
                &mut self.total_bytes_written,
                &page,
            )?;
        }
        Ok(())
    }

    fn write_page(
        pager: &mut dyn PageWriter,
        metadata: &mut ColumnChunkMetadataBuilder,
        total_bytes_written: &mut u64,
        page: &CompressedDataPage,
    ) -> ParquetResult<()> {
        // offsets recorded on the metadata are relative to the first byte
        // of the chunk; the embedding file writer rebases them
        metadata.set_data_page_offset(*total_bytes_written as i64);
        let compressed_size = page.compressed_size() as u64;
        let bytes_written = pager.write_data_page(page)?;
        *total_bytes_written += bytes_written;
        // total sizes include the page headers
        let header_size = bytes_written.saturating_sub(compressed_size);
        metadata.add_page_size(
            (page.uncompressed_size() as u64 + header_size) as i64,
            bytes_written as i64,
        );
        Ok(())
    }
}

/// A column writer of any physical type. Obtain one from
/// [`get_column_writer`] and match on the variant to write typed batches.
pub enum ColumnWriter {
    Boolean(TypedColumnWriter<BooleanType>),
    Int32(TypedColumnWriter<Int32Type>),
    Int64(TypedColumnWriter<Int64Type>),
    Int96(TypedColumnWriter<Int96Type>),
    Float(TypedColumnWriter<FloatType>),
    Double(TypedColumnWriter<DoubleType>),
    ByteArray(TypedColumnWriter<ByteArrayType>),
    FixedLenByteArray(TypedColumnWriter<FixedLenByteArrayType>),
}

macro_rules! dispatch {
    ($self:expr, $writer:ident => $body:expr) => {
        match $self {
            ColumnWriter::Boolean($writer) => $body,
            ColumnWriter::Int32($writer) => $body,
            ColumnWriter::Int64($writer) => $body,
            ColumnWriter::Int96($writer) => $body,
            ColumnWriter::Float($writer) => $body,
            ColumnWriter::Double($writer) => $body,
            ColumnWriter::ByteArray($writer) => $body,
            ColumnWriter::FixedLenByteArray($writer) => $body,
        }
    };
}

impl ColumnWriter {
    /// See [`TypedColumnWriter::close`].
    pub fn close(&mut self) -> ParquetResult<u64> {
        dispatch!(self, writer => writer.close())
    }

    pub fn total_bytes_written(&self) -> u64 {
        dispatch!(self, writer => writer.total_bytes_written())
    }

    pub fn num_rows(&self) -> i64 {
        dispatch!(self, writer => writer.num_rows())
    }

    pub fn metadata(&self) -> &ColumnChunkMetadataBuilder {
        dispatch!(self, writer => writer.metadata())
    }
}

/// Binds a typed column writer to `descriptor`, choosing the value encoding
/// from `properties`: the dictionary index encoding when dictionary
/// encoding is enabled for the column's path and the type supports it, the
/// configured plain encoding otherwise.
pub fn get_column_writer(
    descriptor: ColumnDescriptor,
    properties: Arc<WriterProperties>,
    pager: Box<dyn PageWriter>,
    expected_rows: i64,
) -> ParquetResult<ColumnWriter> {
    let physical_type = descriptor.descriptor.primitive_type.physical_type;
    let mut encoding = properties.encoding(&descriptor.path_in_schema);
    if properties.dictionary_enabled(&descriptor.path_in_schema)
        && physical_type != PhysicalType::Boolean
    {
        encoding = properties.dictionary_index_encoding();
    }

    Ok(match physical_type {
        PhysicalType::Boolean => ColumnWriter::Boolean(TypedColumnWriter::new(
            descriptor,
            pager,
            expected_rows,
            encoding,
            properties,
        )?),
        PhysicalType::Int32 => ColumnWriter::Int32(TypedColumnWriter::new(
            descriptor,
            pager,
            expected_rows,
            encoding,
            properties,
        )?),
        PhysicalType::Int64 => ColumnWriter::Int64(TypedColumnWriter::new(
            descriptor,
            pager,
            expected_rows,
            encoding,
            properties,
        )?),
        PhysicalType::Int96 => ColumnWriter::Int96(TypedColumnWriter::new(
            descriptor,
            pager,
            expected_rows,
            encoding,
            properties,
        )?),
        PhysicalType::Float => ColumnWriter::Float(TypedColumnWriter::new(
            descriptor,
            pager,
            expected_rows,
            encoding,
            properties,
        )?),
        PhysicalType::Double => ColumnWriter::Double(TypedColumnWriter::new(
            descriptor,
            pager,
            expected_rows,
            encoding,
            properties,
        )?),
        PhysicalType::ByteArray => ColumnWriter::ByteArray(TypedColumnWriter::new(
            descriptor,
            pager,
            expected_rows,
            encoding,
            properties,
        )?),
        PhysicalType::FixedLenByteArray(_) => ColumnWriter::FixedLenByteArray(
            TypedColumnWriter::new(descriptor, pager, expected_rows, encoding, properties)?,
        ),
    })
}
