//! Per-physical-type round trips: encode one column chunk, decode the page
//! stream, compare.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use parquet_chunk::schema::types::PhysicalType;
use parquet_chunk::thrift_format::Encoding as ParquetEncoding;
use parquet_chunk::write::{ColumnWriter, WriterProperties};
use parquet_chunk::{Compression, CompressionOptions};

use super::read::*;
use super::{descriptor, writer};

fn plain_properties() -> WriterProperties {
    WriterProperties::builder()
        .set_dictionary_enabled(false)
        .build()
}

#[test]
fn boolean_plain() {
    let mut rng = StdRng::seed_from_u64(42);
    let values = (0..1003).map(|_| rng.gen::<bool>()).collect::<Vec<_>>();

    let (mut column_writer, stream) = writer(
        descriptor(PhysicalType::Boolean, 0, 0),
        plain_properties(),
        CompressionOptions::Uncompressed,
        values.len() as i64,
    );
    match &mut column_writer {
        ColumnWriter::Boolean(typed) => {
            typed.write_batch(&values, None, None).unwrap();
            typed.close().unwrap();
        },
        _ => unreachable!(),
    }

    let pages = read_pages(&stream.bytes(), Compression::Uncompressed);
    let mut decoded = vec![];
    for page in &pages {
        let (_, _, data) = split_data_page(page, 0, 0);
        decoded.extend(decode_plain_boolean(&data, page.num_values()));
    }
    assert_eq!(decoded, values);
}

#[test]
fn float_plain_with_nan() {
    let mut values = (0..500).map(|x| x as f32 / 3.0).collect::<Vec<_>>();
    values[7] = f32::NAN;

    let (mut column_writer, stream) = writer(
        descriptor(PhysicalType::Float, 0, 0),
        plain_properties(),
        CompressionOptions::Uncompressed,
        values.len() as i64,
    );
    match &mut column_writer {
        ColumnWriter::Float(typed) => {
            typed.write_batch(&values, None, None).unwrap();
            typed.close().unwrap();
        },
        _ => unreachable!(),
    }

    let pages = read_pages(&stream.bytes(), Compression::Uncompressed);
    let (_, _, data) = split_data_page(&pages[0], 0, 0);
    let decoded = decode_plain_native::<f32>(&data);
    assert_eq!(decoded.len(), values.len());
    assert!(decoded[7].is_nan());
    assert_eq!(&decoded[..7], &values[..7]);

    // NaN is excluded from the chunk min/max
    match column_writer.metadata().statistics() {
        Some(parquet_chunk::statistics::Statistics::Float(stats)) => {
            assert_eq!(stats.min_value, Some(0.0));
            assert!(stats.max_value.unwrap().is_finite());
        },
        _ => unreachable!(),
    }
}

#[test]
fn double_plain() {
    let mut rng = StdRng::seed_from_u64(7);
    let values = (0..777).map(|_| rng.gen::<f64>()).collect::<Vec<_>>();

    let (mut column_writer, stream) = writer(
        descriptor(PhysicalType::Double, 0, 0),
        plain_properties(),
        CompressionOptions::Uncompressed,
        values.len() as i64,
    );
    match &mut column_writer {
        ColumnWriter::Double(typed) => {
            typed.write_batch(&values, None, None).unwrap();
            typed.close().unwrap();
        },
        _ => unreachable!(),
    }

    let pages = read_pages(&stream.bytes(), Compression::Uncompressed);
    let (_, _, data) = split_data_page(&pages[0], 0, 0);
    assert_eq!(decode_plain_native::<f64>(&data), values);
}

#[test]
fn int96_plain() {
    let values = (0..100u32)
        .map(|x| [x, x.wrapping_mul(31), 2_454_923])
        .collect::<Vec<[u32; 3]>>();

    let (mut column_writer, stream) = writer(
        descriptor(PhysicalType::Int96, 0, 0),
        plain_properties(),
        CompressionOptions::Uncompressed,
        values.len() as i64,
    );
    match &mut column_writer {
        ColumnWriter::Int96(typed) => {
            typed.write_batch(&values, None, None).unwrap();
            typed.close().unwrap();
        },
        _ => unreachable!(),
    }

    let pages = read_pages(&stream.bytes(), Compression::Uncompressed);
    let (_, _, data) = split_data_page(&pages[0], 0, 0);
    assert_eq!(decode_plain_native::<[u32; 3]>(&data), values);
}

#[test]
fn fixed_len_byte_array_plain() {
    let values = (0..300u16)
        .map(|x| x.to_be_bytes().to_vec())
        .collect::<Vec<_>>();

    let (mut column_writer, stream) = writer(
        descriptor(PhysicalType::FixedLenByteArray(2), 0, 0),
        plain_properties(),
        CompressionOptions::Uncompressed,
        values.len() as i64,
    );
    match &mut column_writer {
        ColumnWriter::FixedLenByteArray(typed) => {
            typed.write_batch(&values, None, None).unwrap();
            typed.close().unwrap();
        },
        _ => unreachable!(),
    }

    let pages = read_pages(&stream.bytes(), Compression::Uncompressed);
    let (_, _, data) = split_data_page(&pages[0], 0, 0);
    assert_eq!(decode_plain_fixed_len(&data, 2), values);
}

#[test]
fn byte_array_rle_dictionary_tag() {
    let values = (0..256)
        .map(|i| format!("{}", i % 4).into_bytes())
        .collect::<Vec<_>>();
    let properties = WriterProperties::builder()
        .set_dictionary_index_encoding(parquet_chunk::Encoding::RleDictionary)
        .set_dictionary_page_encoding(parquet_chunk::Encoding::Plain)
        .build();

    let (mut column_writer, stream) = writer(
        descriptor(PhysicalType::ByteArray, 0, 0),
        properties,
        CompressionOptions::Uncompressed,
        values.len() as i64,
    );
    match &mut column_writer {
        ColumnWriter::ByteArray(typed) => {
            typed.write_batch(&values, None, None).unwrap();
            typed.close().unwrap();
        },
        _ => unreachable!(),
    }

    let pages = read_pages(&stream.bytes(), Compression::Uncompressed);
    assert!(pages[0].is_dictionary());
    // the configured tags are recorded consistently in the headers
    assert_eq!(
        pages[0]
            .header
            .dictionary_page_header
            .as_ref()
            .unwrap()
            .encoding,
        ParquetEncoding::PLAIN
    );
    let dictionary = decode_plain_byte_array(&pages[0].data);

    let mut decoded = vec![];
    for page in &pages[1..] {
        let header = page.header.data_page_header.as_ref().unwrap();
        assert_eq!(header.encoding, ParquetEncoding::RLE_DICTIONARY);
        assert_eq!(header.definition_level_encoding, ParquetEncoding::RLE);
        assert_eq!(header.repetition_level_encoding, ParquetEncoding::RLE);
        let (_, _, data) = split_data_page(page, 0, 0);
        for index in decode_dict_indices(&data, page.num_values()) {
            decoded.push(dictionary[index as usize].clone());
        }
    }
    assert_eq!(decoded, values);
}

#[test]
fn nested_optional_list() {
    // [[0, 1], None, [2, None, 3], [4, 5, 6], [], [7, 8, 9], None, [10]]
    let def_levels = [3i16, 3, 0, 3, 2, 3, 3, 3, 3, 1, 3, 3, 3, 0, 3];
    let rep_levels = [0i16, 1, 0, 0, 1, 1, 0, 1, 1, 0, 0, 1, 1, 0, 0];
    let values = (0..11i64).collect::<Vec<_>>();

    let (mut column_writer, stream) = writer(
        descriptor(PhysicalType::Int64, 3, 1),
        plain_properties(),
        CompressionOptions::Uncompressed,
        8,
    );
    match &mut column_writer {
        ColumnWriter::Int64(typed) => {
            typed
                .write_batch(&values, Some(&def_levels), Some(&rep_levels))
                .unwrap();
            assert_eq!(typed.num_rows(), 8);
            typed.close().unwrap();
        },
        _ => unreachable!(),
    }

    let pages = read_pages(&stream.bytes(), Compression::Uncompressed);
    let (decoded_rep, decoded_def, data) = split_data_page(&pages[0], 1, 3);
    assert_eq!(
        decoded_rep,
        rep_levels.iter().map(|x| *x as u32).collect::<Vec<_>>()
    );
    assert_eq!(
        decoded_def,
        def_levels.iter().map(|x| *x as u32).collect::<Vec<_>>()
    );
    assert_eq!(decode_plain_native::<i64>(&data), values);
}
