//! Sinks consuming the pages assembled by the column writer.
use std::io::Write;

use crate::compression;
use crate::error::{ParquetError, ParquetResult};
use crate::page::{CompressedDataPage, DictPage};
use crate::parquet_bridge::CompressionOptions;
use crate::thrift_format::thrift::protocol::TCompactOutputProtocol;
use crate::thrift_format::{
    DataPageHeader, DictionaryPageHeader, PageHeader as ParquetPageHeader, PageType,
};

/// Consumes assembled pages, owning compression and the output stream.
///
/// Pages handed to `write_data_page` may borrow the writer's reusable
/// buffers and must be consumed before the call returns.
pub trait PageWriter {
    /// Whether this sink compresses page payloads.
    fn has_compressor(&self) -> bool;

    /// Compresses `uncompressed` into `compressed`.
    fn compress(&mut self, uncompressed: &[u8], compressed: &mut Vec<u8>) -> ParquetResult<()>;

    /// Consumes one data page, returning the number of bytes written to the
    /// underlying stream.
    fn write_data_page(&mut self, page: &CompressedDataPage) -> ParquetResult<u64>;

    /// Consumes the dictionary page, returning the number of bytes written.
    fn write_dictionary_page(&mut self, page: &DictPage) -> ParquetResult<u64>;

    /// Closes the sink. `has_dictionary` and `fallback` describe how the
    /// chunk ended up encoded.
    fn close(&mut self, has_dictionary: bool, fallback: bool) -> ParquetResult<()>;
}

/// Metrics of one page written to the stream.
#[derive(Debug, Clone)]
pub struct PageWriteSpec {
    pub header: ParquetPageHeader,
    pub num_values: usize,
    pub header_size: u64,
    pub offset: u64,
    pub bytes_written: u64,
}

fn maybe_bytes(uncompressed: usize, compressed: usize) -> ParquetResult<(i32, i32)> {
    let uncompressed_page_size: i32 = uncompressed.try_into().map_err(|_| {
        ParquetError::oos(format!(
            "A page can only contain i32::MAX uncompressed bytes. This one contains {}",
            uncompressed
        ))
    })?;

    let compressed_page_size: i32 = compressed.try_into().map_err(|_| {
        ParquetError::oos(format!(
            "A page can only contain i32::MAX compressed bytes. This one contains {}",
            compressed
        ))
    })?;

    Ok((uncompressed_page_size, compressed_page_size))
}

fn assemble_data_page_header(page: &CompressedDataPage) -> ParquetResult<ParquetPageHeader> {
    let (uncompressed_page_size, compressed_page_size) =
        maybe_bytes(page.uncompressed_size(), page.compressed_size())?;

    Ok(ParquetPageHeader {
        type_: PageType::DATA_PAGE,
        uncompressed_page_size,
        compressed_page_size,
        crc: None,
        data_page_header: Some(DataPageHeader {
            num_values: page.num_values(),
            encoding: page.encoding().into(),
            definition_level_encoding: page.definition_level_encoding().into(),
            repetition_level_encoding: page.repetition_level_encoding().into(),
            statistics: page.statistics().map(|x| x.serialize()),
        }),
        index_page_header: None,
        dictionary_page_header: None,
        data_page_header_v2: None,
    })
}

fn assemble_dict_page_header(
    page: &DictPage,
    uncompressed_size: usize,
    compressed_size: usize,
) -> ParquetResult<ParquetPageHeader> {
    let (uncompressed_page_size, compressed_page_size) =
        maybe_bytes(uncompressed_size, compressed_size)?;

    let num_values: i32 = page.num_values.try_into().map_err(|_| {
        ParquetError::oos(format!(
            "A dictionary page can only contain i32::MAX items. This one contains {}",
            page.num_values
        ))
    })?;

    Ok(ParquetPageHeader {
        type_: PageType::DICTIONARY_PAGE,
        uncompressed_page_size,
        compressed_page_size,
        crc: None,
        data_page_header: None,
        index_page_header: None,
        dictionary_page_header: Some(DictionaryPageHeader {
            num_values,
            encoding: page.encoding.into(),
            is_sorted: Some(page.is_sorted),
        }),
        data_page_header_v2: None,
    })
}

/// Writes the page header into `writer`, returning the number of bytes used
/// in the process.
fn write_page_header<W: Write>(
    mut writer: &mut W,
    header: &ParquetPageHeader,
) -> ParquetResult<u64> {
    let mut protocol = TCompactOutputProtocol::new(&mut writer);
    Ok(header.write_to_out_protocol(&mut protocol)? as u64)
}

/// A [`PageWriter`] framing each page with its thrift-serialized v1 header
/// and appending it to an [`std::io::Write`] stream.
pub struct SerializedPageWriter<W: Write> {
    writer: W,
    compression: CompressionOptions,
    offset: u64,
    specs: Vec<PageWriteSpec>,
    scratch: Vec<u8>,
}

impl<W: Write> SerializedPageWriter<W> {
    pub fn new(writer: W, compression: CompressionOptions) -> Self {
        Self {
            writer,
            compression,
            offset: 0,
            specs: vec![],
            scratch: vec![],
        }
    }

    /// The number of bytes written so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// The metrics of every page written, in stream order.
    pub fn specs(&self) -> &[PageWriteSpec] {
        &self.specs
    }

    /// Returns the underlying stream, consuming the sink.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_page(
        &mut self,
        header: ParquetPageHeader,
        payload: &[u8],
        num_values: usize,
    ) -> ParquetResult<u64> {
        let offset = self.offset;
        let header_size = write_page_header(&mut self.writer, &header)?;
        self.writer.write_all(payload)?;
        let bytes_written = header_size + payload.len() as u64;
        self.offset += bytes_written;
        self.specs.push(PageWriteSpec {
            header,
            num_values,
            header_size,
            offset,
            bytes_written,
        });
        Ok(bytes_written)
    }
}

impl<W: Write> PageWriter for SerializedPageWriter<W> {
    fn has_compressor(&self) -> bool {
        self.compression != CompressionOptions::Uncompressed
    }

    fn compress(&mut self, uncompressed: &[u8], compressed: &mut Vec<u8>) -> ParquetResult<()> {
        compression::compress(self.compression, uncompressed, compressed)
    }

    fn write_data_page(&mut self, page: &CompressedDataPage) -> ParquetResult<u64> {
        // the column writer already compressed the payload
        let header = assemble_data_page_header(page)?;
        self.write_page(header, page.buffer(), page.num_values() as usize)
    }

    fn write_dictionary_page(&mut self, page: &DictPage) -> ParquetResult<u64> {
        let uncompressed_size = page.buffer.len();
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.clear();
        let payload: &[u8] = if self.has_compressor() {
            compression::compress(self.compression, &page.buffer, &mut scratch)?;
            &scratch
        } else {
            &page.buffer
        };
        let header = assemble_dict_page_header(page, uncompressed_size, payload.len())?;
        let result = self.write_page(header, payload, page.num_values);
        self.scratch = scratch;
        result
    }

    fn close(&mut self, has_dictionary: bool, fallback: bool) -> ParquetResult<()> {
        log::trace!(
            "closing page stream at {} bytes (dictionary: {}, fell back to plain: {})",
            self.offset,
            has_dictionary,
            fallback
        );
        self.writer.flush()?;
        Ok(())
    }
}
