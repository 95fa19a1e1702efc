//! Min/max/null-count statistics of pages and chunks, in their typed form
//! and bridged to the thrift representation.
mod binary;
mod boolean;
mod fixed_len_binary;
mod primitive;

pub use binary::BinaryStatistics;
pub use boolean::BooleanStatistics;
pub use fixed_len_binary::FixedLenStatistics;
pub use primitive::PrimitiveStatistics;

use crate::error::ParquetResult;
use crate::schema::types::{PhysicalType, PrimitiveType};
use crate::thrift_format::Statistics as ParquetStatistics;

/// Statistics of one physical type. Variants carry the typed min/max so
/// comparisons at merge time do not go through the encoded form.
#[derive(Debug, Clone, PartialEq)]
pub enum Statistics {
    Boolean(BooleanStatistics),
    Int32(PrimitiveStatistics<i32>),
    Int64(PrimitiveStatistics<i64>),
    Int96(PrimitiveStatistics<[u32; 3]>),
    Float(PrimitiveStatistics<f32>),
    Double(PrimitiveStatistics<f64>),
    Binary(BinaryStatistics),
    FixedLen(FixedLenStatistics),
}

impl Statistics {
    pub fn physical_type(&self) -> PhysicalType {
        match self {
            Statistics::Boolean(_) => PhysicalType::Boolean,
            Statistics::Int32(_) => PhysicalType::Int32,
            Statistics::Int64(_) => PhysicalType::Int64,
            Statistics::Int96(_) => PhysicalType::Int96,
            Statistics::Float(_) => PhysicalType::Float,
            Statistics::Double(_) => PhysicalType::Double,
            Statistics::Binary(_) => PhysicalType::ByteArray,
            Statistics::FixedLen(s) => s.primitive_type.physical_type,
        }
    }

    pub fn null_count(&self) -> Option<i64> {
        match self {
            Statistics::Boolean(s) => s.null_count,
            Statistics::Int32(s) => s.null_count,
            Statistics::Int64(s) => s.null_count,
            Statistics::Int96(s) => s.null_count,
            Statistics::Float(s) => s.null_count,
            Statistics::Double(s) => s.null_count,
            Statistics::Binary(s) => s.null_count,
            Statistics::FixedLen(s) => s.null_count,
        }
    }

    /// Serializes into the raw parquet statistics.
    pub fn serialize(&self) -> ParquetStatistics {
        match self {
            Statistics::Boolean(s) => s.serialize(),
            Statistics::Int32(s) => s.serialize(),
            Statistics::Int64(s) => s.serialize(),
            Statistics::Int96(s) => s.serialize(),
            Statistics::Float(s) => s.serialize(),
            Statistics::Double(s) => s.serialize(),
            Statistics::Binary(s) => s.serialize(),
            Statistics::FixedLen(s) => s.serialize(),
        }
    }

    /// Deserializes raw parquet statistics into [`Statistics`].
    /// # Error
    /// This function errors if it is not possible to read the statistics to
    /// the `primitive_type`'s physical type.
    pub fn deserialize(
        statistics: &ParquetStatistics,
        primitive_type: PrimitiveType,
    ) -> ParquetResult<Self> {
        Ok(match primitive_type.physical_type {
            PhysicalType::Boolean => BooleanStatistics::deserialize(statistics)?.into(),
            PhysicalType::Int32 => {
                PrimitiveStatistics::<i32>::deserialize(statistics, primitive_type)?.into()
            },
            PhysicalType::Int64 => {
                PrimitiveStatistics::<i64>::deserialize(statistics, primitive_type)?.into()
            },
            PhysicalType::Int96 => {
                PrimitiveStatistics::<[u32; 3]>::deserialize(statistics, primitive_type)?.into()
            },
            PhysicalType::Float => {
                PrimitiveStatistics::<f32>::deserialize(statistics, primitive_type)?.into()
            },
            PhysicalType::Double => {
                PrimitiveStatistics::<f64>::deserialize(statistics, primitive_type)?.into()
            },
            PhysicalType::ByteArray => {
                BinaryStatistics::deserialize(statistics, primitive_type)?.into()
            },
            PhysicalType::FixedLenByteArray(size) => {
                FixedLenStatistics::deserialize(statistics, size, primitive_type)?.into()
            },
        })
    }
}

/// The thrift form of a min/max/count window. The deprecated pre-ordering
/// `min`/`max` fields are never written.
pub(crate) fn encoded_statistics(
    null_count: Option<i64>,
    distinct_count: Option<i64>,
    min_value: Option<Vec<u8>>,
    max_value: Option<Vec<u8>>,
) -> ParquetStatistics {
    ParquetStatistics {
        null_count,
        distinct_count,
        min_value,
        max_value,
        min: None,
        max: None,
    }
}

impl From<BooleanStatistics> for Statistics {
    fn from(stats: BooleanStatistics) -> Self {
        Self::Boolean(stats)
    }
}

impl From<PrimitiveStatistics<i32>> for Statistics {
    fn from(stats: PrimitiveStatistics<i32>) -> Self {
        Self::Int32(stats)
    }
}

impl From<PrimitiveStatistics<i64>> for Statistics {
    fn from(stats: PrimitiveStatistics<i64>) -> Self {
        Self::Int64(stats)
    }
}

impl From<PrimitiveStatistics<[u32; 3]>> for Statistics {
    fn from(stats: PrimitiveStatistics<[u32; 3]>) -> Self {
        Self::Int96(stats)
    }
}

impl From<PrimitiveStatistics<f32>> for Statistics {
    fn from(stats: PrimitiveStatistics<f32>) -> Self {
        Self::Float(stats)
    }
}

impl From<PrimitiveStatistics<f64>> for Statistics {
    fn from(stats: PrimitiveStatistics<f64>) -> Self {
        Self::Double(stats)
    }
}

impl From<BinaryStatistics> for Statistics {
    fn from(stats: BinaryStatistics) -> Self {
        Self::Binary(stats)
    }
}

impl From<FixedLenStatistics> for Statistics {
    fn from(stats: FixedLenStatistics) -> Self {
        Self::FixedLen(stats)
    }
}
