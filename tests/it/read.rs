//! Just enough of a read path to verify what the writer emits. The crate
//! itself has no read API; these helpers parse the serialized page stream
//! with the crate's own decoders and the thrift page headers.
use parquet_chunk::compression;
use parquet_chunk::encoding::get_bit_width;
use parquet_chunk::encoding::hybrid_rle::HybridRleDecoder;
use parquet_chunk::thrift_format::thrift::protocol::TCompactInputProtocol;
use parquet_chunk::thrift_format::{PageHeader, PageType};
use parquet_chunk::types::{self, NativeType};
use parquet_chunk::Compression;

/// One page of the stream, header parsed and payload decompressed.
pub struct RawPage {
    pub header: PageHeader,
    pub data: Vec<u8>,
}

impl RawPage {
    pub fn is_dictionary(&self) -> bool {
        self.header.type_ == PageType::DICTIONARY_PAGE
    }

    pub fn num_values(&self) -> usize {
        if self.is_dictionary() {
            self.header.dictionary_page_header.as_ref().unwrap().num_values as usize
        } else {
            self.header.data_page_header.as_ref().unwrap().num_values as usize
        }
    }
}

/// Splits `stream` into its pages.
pub fn read_pages(mut stream: &[u8], compression: Compression) -> Vec<RawPage> {
    let mut pages = vec![];
    while !stream.is_empty() {
        let header = {
            let mut protocol = TCompactInputProtocol::new(&mut stream, usize::MAX);
            PageHeader::read_from_in_protocol(&mut protocol).unwrap()
        };
        let (payload, rest) = stream.split_at(header.compressed_page_size as usize);
        stream = rest;

        let data = if compression == Compression::Uncompressed {
            payload.to_vec()
        } else {
            let mut data = vec![0u8; header.uncompressed_page_size as usize];
            compression::decompress(compression, payload, &mut data).unwrap();
            data
        };
        pages.push(RawPage { header, data });
    }
    pages
}

/// Splits a v1 data page payload into its repetition levels, definition
/// levels and value payload. Level chunks are absent when the respective
/// maximum level is zero.
pub fn split_data_page(
    page: &RawPage,
    max_rep_level: i16,
    max_def_level: i16,
) -> (Vec<u32>, Vec<u32>, Vec<u8>) {
    let num_values = page.num_values();
    let mut data = page.data.as_slice();

    let mut read_levels = |max_level: i16| -> Vec<u32> {
        let length = u32::from_le_bytes(data[..4].try_into().unwrap()) as usize;
        let levels = HybridRleDecoder::new(
            &data[4..4 + length],
            get_bit_width(max_level) as usize,
            num_values,
        )
        .collect();
        data = &data[4 + length..];
        levels
    };

    let rep_levels = if max_rep_level > 0 {
        read_levels(max_rep_level)
    } else {
        vec![]
    };
    let def_levels = if max_def_level > 0 {
        read_levels(max_def_level)
    } else {
        vec![]
    };
    (rep_levels, def_levels, data.to_vec())
}

pub fn decode_plain_native<T: NativeType>(data: &[u8]) -> Vec<T> {
    data.chunks_exact(std::mem::size_of::<T::Bytes>())
        .map(types::decode)
        .collect()
}

pub fn decode_plain_boolean(data: &[u8], num_values: usize) -> Vec<bool> {
    (0..num_values)
        .map(|i| data[i / 8] >> (i % 8) & 1 == 1)
        .collect()
}

pub fn decode_plain_byte_array(mut data: &[u8]) -> Vec<Vec<u8>> {
    let mut values = vec![];
    while !data.is_empty() {
        let length = u32::from_le_bytes(data[..4].try_into().unwrap()) as usize;
        values.push(data[4..4 + length].to_vec());
        data = &data[4 + length..];
    }
    values
}

pub fn decode_plain_fixed_len(data: &[u8], size: usize) -> Vec<Vec<u8>> {
    data.chunks_exact(size).map(|chunk| chunk.to_vec()).collect()
}

/// Decodes the bit-width-prefixed dictionary indices of a data page.
pub fn decode_dict_indices(data: &[u8], num_values: usize) -> Vec<u32> {
    let bit_width = data[0] as usize;
    HybridRleDecoder::new(&data[1..], bit_width, num_values).collect()
}
