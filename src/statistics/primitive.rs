use crate::error::{ParquetError, ParquetResult};
use crate::schema::types::PrimitiveType;
use crate::thrift_format::Statistics as ParquetStatistics;
use crate::types::{self, NativeType};

/// Statistics of the fixed-width physical types, held in native form so
/// merging compares values instead of byte strings.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveStatistics<T: NativeType> {
    pub primitive_type: PrimitiveType,
    pub null_count: Option<i64>,
    pub distinct_count: Option<i64>,
    pub min_value: Option<T>,
    pub max_value: Option<T>,
}

/// One plain-encoded value of `T`, or an out-of-spec error if the byte
/// width disagrees with the type.
fn from_plain<T: NativeType>(encoded: &Option<Vec<u8>>, field: &str) -> ParquetResult<Option<T>> {
    encoded
        .as_ref()
        .map(|bytes| {
            if bytes.len() == std::mem::size_of::<T::Bytes>() {
                Ok(types::decode(bytes))
            } else {
                Err(ParquetError::oos(format!(
                    "the {field} of fixed-width statistics must hold exactly one plain-encoded value"
                )))
            }
        })
        .transpose()
}

impl<T: NativeType> PrimitiveStatistics<T> {
    pub fn deserialize(
        v: &ParquetStatistics,
        primitive_type: PrimitiveType,
    ) -> ParquetResult<Self> {
        Ok(Self {
            primitive_type,
            null_count: v.null_count,
            distinct_count: v.distinct_count,
            min_value: from_plain(&v.min_value, "min_value")?,
            max_value: from_plain(&v.max_value, "max_value")?,
        })
    }

    pub fn serialize(&self) -> ParquetStatistics {
        let plain = |value: &Option<T>| value.map(|x| x.to_le_bytes().as_ref().to_vec());
        super::encoded_statistics(
            self.null_count,
            self.distinct_count,
            plain(&self.min_value),
            plain(&self.max_value),
        )
    }
}
