use crate::error::ParquetResult;
use crate::schema::types::PrimitiveType;
use crate::thrift_format::Statistics as ParquetStatistics;

/// Statistics of `BYTE_ARRAY` columns. The plain encoding of a byte array
/// is the byte array, so the wire form carries min/max as-is and any
/// length is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryStatistics {
    pub primitive_type: PrimitiveType,
    pub null_count: Option<i64>,
    pub distinct_count: Option<i64>,
    pub min_value: Option<Vec<u8>>,
    pub max_value: Option<Vec<u8>>,
}

impl BinaryStatistics {
    pub fn deserialize(
        v: &ParquetStatistics,
        primitive_type: PrimitiveType,
    ) -> ParquetResult<Self> {
        Ok(Self {
            primitive_type,
            null_count: v.null_count,
            distinct_count: v.distinct_count,
            min_value: v.min_value.clone(),
            max_value: v.max_value.clone(),
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
