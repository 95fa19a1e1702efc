use crate::error::{ParquetError, ParquetResult};
use crate::schema::types::PrimitiveType;
use crate::thrift_format::Statistics as ParquetStatistics;

/// Statistics of `FIXED_LEN_BYTE_ARRAY` columns. Min/max carry exactly the
/// column's byte width; anything else on the wire is out of spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLenStatistics {
    pub primitive_type: PrimitiveType,
    pub null_count: Option<i64>,
    pub distinct_count: Option<i64>,
    pub min_value: Option<Vec<u8>>,
    pub max_value: Option<Vec<u8>>,
}

fn sized(encoded: &Option<Vec<u8>>, size: usize, field: &str) -> ParquetResult<Option<Vec<u8>>> {
    match encoded {
        Some(bytes) if bytes.len() != size => Err(ParquetError::oos(format!(
            "the {field} of fixed-length statistics must hold {size} bytes, found {}",
            bytes.len()
        ))),
        _ => Ok(encoded.clone()),
    }
}

impl FixedLenStatistics {
    pub fn deserialize(
        v: &ParquetStatistics,
        size: usize,
        primitive_type: PrimitiveType,
    ) -> ParquetResult<Self> {
        Ok(Self {
            primitive_type,
            null_count: v.null_count,
            distinct_count: v.distinct_count,
            min_value: sized(&v.min_value, size, "min_value")?,
            max_value: sized(&v.max_value, size, "max_value")?,
        })
    }

    pub fn serialize(&self) -> ParquetStatistics {
        super::encoded_statistics(
            self.null_count,
            self.distinct_count,
            self.min_value.clone(),
            self.max_value.clone(),
        )
    }
}
