#![forbid(unsafe_code)]
mod read;
mod roundtrip;
mod write;

use std::sync::Arc;

use parquet_chunk::metadata::ColumnDescriptor;
use parquet_chunk::schema::types::{PhysicalType, PrimitiveType};
use parquet_chunk::write::{
    get_column_writer, ColumnWriter, PageWriter, SerializedPageWriter, WriterProperties,
};
use parquet_chunk::CompressionOptions;

/// A single-leaf column descriptor: `max_def_level` 0 means required,
/// `max_rep_level` > 0 means repeated.
pub fn descriptor(
    physical_type: PhysicalType,
    max_def_level: i16,
    max_rep_level: i16,
) -> ColumnDescriptor {
    ColumnDescriptor::from_leaf(
        PrimitiveType::from_physical("col".to_string(), physical_type),
        max_def_level,
        max_rep_level,
    )
}

/// A writer over an in-memory stream, plus a handle to read the stream back.
pub fn writer(
    descriptor: ColumnDescriptor,
    properties: WriterProperties,
    compression: CompressionOptions,
    expected_rows: i64,
) -> (ColumnWriter, StreamCapture) {
    let capture = StreamCapture::default();
    let pager: Box<dyn PageWriter> =
        Box::new(SerializedPageWriter::new(capture.clone(), compression));
    let writer =
        get_column_writer(descriptor, Arc::new(properties), pager, expected_rows).unwrap();
    (writer, capture)
}

/// `Vec<u8>` behind a shared handle, so the stream outlives the page writer
/// boxed inside the column writer.
#[derive(Default, Clone)]
pub struct StreamCapture(std::rc::Rc<std::cell::RefCell<Vec<u8>>>);

impl StreamCapture {
    pub fn bytes(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }
}

impl std::io::Write for StreamCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
