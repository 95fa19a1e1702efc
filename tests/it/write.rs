//! Behavior of the page-assembly state machine, observed through the
//! serialized page stream.
use parquet_chunk::error::ParquetError;
use parquet_chunk::schema::types::{PhysicalType, PrimitiveType};
use parquet_chunk::statistics::Statistics;
use parquet_chunk::thrift_format::{Encoding as ParquetEncoding, PageType};
use parquet_chunk::write::WriterProperties;
use parquet_chunk::{Compression, CompressionOptions};

use super::read::*;
use super::{descriptor, writer};
use parquet_chunk::write::ColumnWriter;

fn plain_no_stats() -> WriterProperties {
    WriterProperties::builder()
        .set_dictionary_enabled(false)
        .set_statistics_enabled(false)
        .build()
}

#[test]
fn required_int32_plain_multiple_pages() {
    let values = (0..1000i32).collect::<Vec<_>>();
    let properties = WriterProperties::builder()
        .set_dictionary_enabled(false)
        .set_statistics_enabled(false)
        .set_data_page_size(256)
        .set_write_batch_size(100)
        .build();
    let (mut column_writer, stream) = writer(
        descriptor(PhysicalType::Int32, 0, 0),
        properties,
        CompressionOptions::Uncompressed,
        1000,
    );

    let total_bytes = match &mut column_writer {
        ColumnWriter::Int32(typed) => {
            typed.write_batch(&values, None, None).unwrap();
            typed.close().unwrap()
        },
        _ => unreachable!(),
    };
    assert_eq!(total_bytes, stream.bytes().len() as u64);

    let pages = read_pages(&stream.bytes(), Compression::Uncompressed);
    assert!(pages.len() > 1);
    assert!(pages.iter().all(|page| !page.is_dictionary()));

    // the page num_values sum to the level count, and the concatenated
    // payloads decode to the input
    let total: usize = pages.iter().map(|page| page.num_values()).sum();
    assert_eq!(total, 1000);

    let mut decoded = vec![];
    for page in &pages {
        let (rep_levels, def_levels, data) = split_data_page(page, 0, 0);
        assert!(rep_levels.is_empty());
        assert!(def_levels.is_empty());
        decoded.extend(decode_plain_native::<i32>(&data));
    }
    assert_eq!(decoded, values);
}

#[test]
fn optional_int64_spaced_with_statistics() {
    // 100 slots, even ones null
    let def_levels = (0..100).map(|i| (i % 2) as i16).collect::<Vec<_>>();
    let values = (0..100)
        .filter(|i| i % 2 == 1)
        .map(|i| i as i64)
        .collect::<Vec<_>>();
    let mut valid_bits = vec![0u8; 13];
    (0..100).filter(|i| i % 2 == 1).for_each(|i| {
        valid_bits[i / 8] |= 1 << (i % 8);
    });

    let (mut column_writer, stream) = writer(
        descriptor(PhysicalType::Int64, 1, 0),
        WriterProperties::builder().set_dictionary_enabled(false).build(),
        CompressionOptions::Uncompressed,
        100,
    );
    match &mut column_writer {
        ColumnWriter::Int64(typed) => {
            let written = typed
                .write_batch_spaced(&values, Some(&def_levels), None, &valid_bits, 0)
                .unwrap();
            assert_eq!(written, 50);
            typed.close().unwrap();
        },
        _ => unreachable!(),
    }

    let pages = read_pages(&stream.bytes(), Compression::Uncompressed);
    assert_eq!(pages.len(), 1);
    let page = &pages[0];

    // the def-level chunk reconstructs the null layout
    let (_, decoded_def, data) = split_data_page(page, 0, 1);
    assert_eq!(
        decoded_def,
        def_levels.iter().map(|x| *x as u32).collect::<Vec<_>>()
    );
    assert_eq!(decode_plain_native::<i64>(&data), values);

    // the page statistics count the nulls
    let statistics = page
        .header
        .data_page_header
        .as_ref()
        .unwrap()
        .statistics
        .as_ref()
        .unwrap();
    let statistics = Statistics::deserialize(
        statistics,
        PrimitiveType::from_physical("col".to_string(), PhysicalType::Int64),
    )
    .unwrap();
    match statistics {
        Statistics::Int64(stats) => {
            assert_eq!(stats.null_count, Some(50));
            assert_eq!(stats.min_value, Some(1));
            assert_eq!(stats.max_value, Some(99));
        },
        _ => unreachable!(),
    }
}

#[test]
fn dictionary_byte_array_high_limit() {
    let distinct = (0..10u8)
        .map(|i| format!("string-{i}").into_bytes())
        .collect::<Vec<_>>();
    let values = (0..10_000)
        .map(|i| distinct[i % 10].clone())
        .collect::<Vec<_>>();

    let properties = WriterProperties::builder()
        .set_data_page_size(2048)
        .set_write_batch_size(256)
        .build();
    let (mut column_writer, stream) = writer(
        descriptor(PhysicalType::ByteArray, 0, 0),
        properties,
        CompressionOptions::Uncompressed,
        10_000,
    );
    match &mut column_writer {
        ColumnWriter::ByteArray(typed) => {
            typed.write_batch(&values, None, None).unwrap();
            typed.close().unwrap();
        },
        _ => unreachable!(),
    }

    let pages = read_pages(&stream.bytes(), Compression::Uncompressed);
    // exactly one dictionary page, and it comes first
    assert!(pages[0].is_dictionary());
    assert_eq!(pages.iter().filter(|page| page.is_dictionary()).count(), 1);
    assert_eq!(pages[0].num_values(), 10);

    let dictionary = decode_plain_byte_array(&pages[0].data);
    assert_eq!(dictionary, distinct);

    // no fallback: every data page indexes the dictionary
    let mut decoded = vec![];
    for page in &pages[1..] {
        let header = page.header.data_page_header.as_ref().unwrap();
        assert_eq!(header.encoding, ParquetEncoding::PLAIN_DICTIONARY);
        let (_, _, data) = split_data_page(page, 0, 0);
        for index in decode_dict_indices(&data, page.num_values()) {
            decoded.push(dictionary[index as usize].clone());
        }
    }
    assert_eq!(decoded, values);
}

#[test]
fn dictionary_fallback_at_zero_limit() {
    let values = (0..100i32).collect::<Vec<_>>();
    let properties = WriterProperties::builder()
        .set_dictionary_page_size_limit(0)
        .set_write_batch_size(10)
        .build();
    let (mut column_writer, stream) = writer(
        descriptor(PhysicalType::Int32, 0, 0),
        properties,
        CompressionOptions::Uncompressed,
        100,
    );
    match &mut column_writer {
        ColumnWriter::Int32(typed) => {
            typed.write_batch(&values, None, None).unwrap();
            typed.close().unwrap();
        },
        _ => unreachable!(),
    }

    let pages = read_pages(&stream.bytes(), Compression::Uncompressed);
    assert!(pages[0].is_dictionary());
    let dictionary = decode_plain_native::<i32>(&pages[0].data);

    let mut decoded = vec![];
    let mut seen_plain = false;
    for page in &pages[1..] {
        let header = page.header.data_page_header.as_ref().unwrap();
        let (_, _, data) = split_data_page(page, 0, 0);
        match header.encoding {
            ParquetEncoding::PLAIN_DICTIONARY => {
                // indices buffered before the fallback precede all plain pages
                assert!(!seen_plain);
                for index in decode_dict_indices(&data, page.num_values()) {
                    decoded.push(dictionary[index as usize]);
                }
            },
            ParquetEncoding::PLAIN => {
                seen_plain = true;
                decoded.extend(decode_plain_native::<i32>(&data));
            },
            other => panic!("unexpected encoding {other:?}"),
        }
    }
    assert!(seen_plain);
    assert_eq!(decoded, values);
}

#[test]
fn repeated_int32_rows_from_rep_levels() {
    let rep_levels = [0i16, 1, 1, 0, 1, 0];
    let def_levels = [1i16; 6];
    let values = [1, 2, 3, 4, 5, 6];

    let (mut column_writer, stream) = writer(
        descriptor(PhysicalType::Int32, 1, 1),
        plain_no_stats(),
        CompressionOptions::Uncompressed,
        3,
    );
    match &mut column_writer {
        ColumnWriter::Int32(typed) => {
            typed
                .write_batch(&values, Some(&def_levels), Some(&rep_levels))
                .unwrap();
            assert_eq!(typed.num_rows(), 3);
            typed.close().unwrap();
        },
        _ => unreachable!(),
    }

    let pages = read_pages(&stream.bytes(), Compression::Uncompressed);
    let (decoded_rep, decoded_def, data) = split_data_page(&pages[0], 1, 1);
    assert_eq!(decoded_rep, vec![0, 1, 1, 0, 1, 0]);
    assert_eq!(decoded_def, vec![1; 6]);
    assert_eq!(decode_plain_native::<i32>(&data), values);
}

#[test]
fn too_many_rows_fails() {
    let rep_levels = [0i16, 1, 1, 0, 1, 0];
    let def_levels = [1i16; 6];
    let values = [1, 2, 3, 4, 5, 6];

    let (mut column_writer, _) = writer(
        descriptor(PhysicalType::Int32, 1, 1),
        plain_no_stats(),
        CompressionOptions::Uncompressed,
        2,
    );
    match &mut column_writer {
        ColumnWriter::Int32(typed) => {
            let result = typed.write_batch(&values, Some(&def_levels), Some(&rep_levels));
            assert!(matches!(result, Err(ParquetError::InvalidParameter(_))));
        },
        _ => unreachable!(),
    }
}

#[test]
fn all_null_page_has_levels_only() {
    let def_levels = [0i16; 10];
    let (mut column_writer, stream) = writer(
        descriptor(PhysicalType::Int32, 1, 0),
        WriterProperties::builder().set_dictionary_enabled(false).build(),
        CompressionOptions::Uncompressed,
        10,
    );
    match &mut column_writer {
        ColumnWriter::Int32(typed) => {
            typed.write_batch(&[], Some(&def_levels), None).unwrap();
            typed.close().unwrap();
        },
        _ => unreachable!(),
    }

    let pages = read_pages(&stream.bytes(), Compression::Uncompressed);
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].num_values(), 10);
    let (_, decoded_def, data) = split_data_page(&pages[0], 0, 1);
    assert_eq!(decoded_def, vec![0; 10]);
    assert!(data.is_empty());
}

#[cfg(feature = "snappy")]
#[test]
fn snappy_compressed_pages_round_trip() {
    let values = (0..5000i64).map(|x| x % 33).collect::<Vec<_>>();
    let properties = WriterProperties::builder()
        .set_dictionary_enabled(false)
        .set_data_page_size(4096)
        .set_write_batch_size(512)
        .set_compression(CompressionOptions::Snappy)
        .build();
    let (mut column_writer, stream) = writer(
        descriptor(PhysicalType::Int64, 0, 0),
        properties,
        CompressionOptions::Snappy,
        5000,
    );
    match &mut column_writer {
        ColumnWriter::Int64(typed) => {
            typed.write_batch(&values, None, None).unwrap();
            typed.close().unwrap();
        },
        _ => unreachable!(),
    }

    let pages = read_pages(&stream.bytes(), Compression::Snappy);
    // repetitive payloads actually shrink
    assert!(pages
        .iter()
        .any(|page| page.header.compressed_page_size < page.header.uncompressed_page_size));

    let mut decoded = vec![];
    for page in &pages {
        assert_eq!(page.header.type_, PageType::DATA_PAGE);
        let (_, _, data) = split_data_page(page, 0, 0);
        decoded.extend(decode_plain_native::<i64>(&data));
    }
    assert_eq!(decoded, values);
}

#[test]
fn chunk_statistics_aggregate_pages() {
    let values = (0..1000i32).rev().collect::<Vec<_>>();
    let properties = WriterProperties::builder()
        .set_dictionary_enabled(false)
        .set_data_page_size(128)
        .set_write_batch_size(32)
        .build();
    let (mut column_writer, _) = writer(
        descriptor(PhysicalType::Int32, 0, 0),
        properties,
        CompressionOptions::Uncompressed,
        1000,
    );
    match &mut column_writer {
        ColumnWriter::Int32(typed) => {
            typed.write_batch(&values, None, None).unwrap();
            typed.close().unwrap();
        },
        _ => unreachable!(),
    }

    match column_writer.metadata().statistics() {
        Some(Statistics::Int32(stats)) => {
            assert_eq!(stats.min_value, Some(0));
            assert_eq!(stats.max_value, Some(999));
            assert_eq!(stats.null_count, Some(0));
        },
        _ => unreachable!(),
    }
    let metadata = column_writer.metadata().finish().unwrap();
    assert_eq!(metadata.num_values, 1000);
    assert!(metadata.statistics.is_some());
}
