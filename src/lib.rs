//! Writer core for Parquet column chunks.
//!
//! This crate implements the hot half of a Parquet v1 encoder: it takes
//! batches of typed values together with repetition/definition levels and
//! turns them into an optional dictionary page followed by data pages,
//! ready to be framed into a column chunk by a file-level writer.
//!
//! The entry point is [`write::get_column_writer`], which binds a typed
//! [`write::ColumnWriter`] to a [`metadata::ColumnDescriptor`], a
//! [`write::PageWriter`] sink and a set of [`write::WriterProperties`].
pub mod compression;
pub mod encoding;
pub mod error;
pub mod metadata;
pub mod page;
mod parquet_bridge;
pub mod schema;
pub mod statistics;
pub mod types;
pub mod write;

pub use parquet_bridge::{Compression, CompressionOptions, Encoding, PageType, Repetition};

pub use parquet_format_safe as thrift_format;
