//! Descriptors and metadata of one column chunk.
mod chunk_metadata;
mod column_descriptor;

pub use chunk_metadata::ColumnChunkMetadataBuilder;
pub use column_descriptor::{ColumnDescriptor, Descriptor};
