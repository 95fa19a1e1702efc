//! APIs to write a column chunk: configuration, level/value encoders,
//! statistics accumulation, the column writer state machine and page sinks.
mod column_writer;
mod encoders;
mod levels;
mod page_writer;
mod properties;
mod statistics;

pub use column_writer::{get_column_writer, ColumnWriter, TypedColumnWriter};
pub use encoders::{
    BooleanType, ByteArrayType, DataType, DoubleType, FixedLenByteArrayType, FloatType,
    Int32Type, Int64Type, Int96Type,
};
pub use levels::LevelEncoder;
pub use page_writer::{PageWriter, PageWriteSpec, SerializedPageWriter};
pub use properties::{
    WriterProperties, WriterPropertiesBuilder, DEFAULT_DICTIONARY_PAGE_SIZE_LIMIT,
    DEFAULT_PAGE_SIZE, DEFAULT_WRITE_BATCH_SIZE,
};
pub use statistics::TypedStatistics;
