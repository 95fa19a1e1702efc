use crate::error::{ParquetError, ParquetResult};
use crate::thrift_format::Statistics as ParquetStatistics;

/// Statistics of `BOOLEAN` columns; min/max serialize as one byte each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanStatistics {
    pub null_count: Option<i64>,
    pub distinct_count: Option<i64>,
    pub min_value: Option<bool>,
    pub max_value: Option<bool>,
}

fn from_byte(encoded: &Option<Vec<u8>>, field: &str) -> ParquetResult<Option<bool>> {
    match encoded.as_deref() {
        None => Ok(None),
        Some([byte]) => Ok(Some(*byte != 0)),
        Some(_) => Err(ParquetError::oos(format!(
            "the {field} of boolean statistics must be a single byte"
        ))),
    }
}

impl BooleanStatistics {
    pub fn deserialize(v: &ParquetStatistics) -> ParquetResult<Self> {
        Ok(Self {
            null_count: v.null_count,
            distinct_count: v.distinct_count,
            min_value: from_byte(&v.min_value, "min_value")?,
            max_value: from_byte(&v.max_value, "max_value")?,
        })
    }

    pub fn serialize(&self) -> ParquetStatistics {
        super::encoded_statistics(
            self.null_count,
            self.distinct_count,
            self.min_value.map(|x| vec![x as u8]),
            self.max_value.map(|x| vec![x as u8]),
        )
    }
}
