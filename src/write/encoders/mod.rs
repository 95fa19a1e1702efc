//! Typed value encoders: plain and dictionary, monomorphized per physical type.
mod dictionary;
mod plain;

pub use dictionary::DictEncoder;
pub use plain::PlainEncoder;

use crate::encoding::ceil8;
use crate::metadata::Descriptor;
use crate::schema::types::{PhysicalType, PrimitiveType};
use crate::statistics::{
    BinaryStatistics, BooleanStatistics, FixedLenStatistics, PrimitiveStatistics, Statistics,
};
use crate::types::NativeType;

/// Maps a parquet physical type to its in-memory value representation and
/// the per-type pieces the writer needs: plain encoding, dictionary keying
/// and statistics ordering.
pub trait DataType: std::fmt::Debug + Send + Sync + Sized + 'static {
    /// The in-memory representation of one value.
    type T: Clone + PartialEq + std::fmt::Debug + Send + Sync;

    /// The canonical form values are interned by in the dictionary.
    type Key: std::hash::Hash + Eq + Send + Sync + std::fmt::Debug;

    /// Whether columns of `physical_type` can be written through this type.
    fn matches(physical_type: &PhysicalType) -> bool;

    /// The dictionary key of `value`.
    fn key(value: &Self::T) -> Self::Key;

    /// The number of bytes the plain encoding of `values` occupies.
    fn plain_encoded_size(descriptor: &Descriptor, values: &[Self::T]) -> usize;

    /// Appends the plain encoding of `values` to `buffer`. `num_buffered` is
    /// the count of values already encoded in `buffer`; the bit-packed
    /// boolean layout uses it to continue a partial byte.
    fn extend_plain(
        descriptor: &Descriptor,
        buffer: &mut Vec<u8>,
        num_buffered: usize,
        values: &[Self::T],
    );

    /// Folds `value` into the running min/max. Values outside the type's
    /// statistics order (NaN) are excluded.
    fn update_min_max(min: &mut Option<Self::T>, max: &mut Option<Self::T>, value: &Self::T);

    /// Assembles the typed [`Statistics`] of a window.
    fn statistics(
        primitive_type: &PrimitiveType,
        min: Option<Self::T>,
        max: Option<Self::T>,
        null_count: i64,
    ) -> Statistics;
}

#[inline]
fn update_ord<T: PartialOrd + Clone>(min: &mut Option<T>, max: &mut Option<T>, value: &T) {
    if min.as_ref().map_or(true, |current| value < current) {
        *min = Some(value.clone());
    }
    if max.as_ref().map_or(true, |current| value > current) {
        *max = Some(value.clone());
    }
}

macro_rules! native_data_type {
    ($name:ident, $native:ty, $physical:pat, $update:expr) => {
        #[derive(Debug)]
        pub struct $name;

        impl DataType for $name {
            type T = $native;
            type Key = <$native as NativeType>::Bytes;

            fn matches(physical_type: &PhysicalType) -> bool {
                matches!(physical_type, $physical)
            }

            fn key(value: &Self::T) -> Self::Key {
                value.to_le_bytes()
            }

            fn plain_encoded_size(_: &Descriptor, values: &[Self::T]) -> usize {
                values.len() * std::mem::size_of::<$native>()
            }

            fn extend_plain(
                _: &Descriptor,
                buffer: &mut Vec<u8>,
                _: usize,
                values: &[Self::T],
            ) {
                for value in values {
                    buffer.extend_from_slice(value.to_le_bytes().as_ref());
                }
            }

            fn update_min_max(
                min: &mut Option<Self::T>,
                max: &mut Option<Self::T>,
                value: &Self::T,
            ) {
                let update: fn(&mut Option<$native>, &mut Option<$native>, &$native) = $update;
                update(min, max, value)
            }

            fn statistics(
                primitive_type: &PrimitiveType,
                min: Option<Self::T>,
                max: Option<Self::T>,
                null_count: i64,
            ) -> Statistics {
                PrimitiveStatistics::<$native> {
                    primitive_type: primitive_type.clone(),
                    null_count: Some(null_count),
                    distinct_count: None,
                    min_value: min,
                    max_value: max,
                }
                .into()
            }
        }
    };
}

native_data_type!(Int32Type, i32, PhysicalType::Int32, update_ord);
native_data_type!(Int64Type, i64, PhysicalType::Int64, update_ord);
// INT96's sort order is deprecated by the format; min/max are not tracked.
native_data_type!(Int96Type, [u32; 3], PhysicalType::Int96, |_, _, _| {});
native_data_type!(FloatType, f32, PhysicalType::Float, |min, max, value| {
    if !value.is_nan() {
        update_ord(min, max, value)
    }
});
native_data_type!(DoubleType, f64, PhysicalType::Double, |min, max, value| {
    if !value.is_nan() {
        update_ord(min, max, value)
    }
});

#[derive(Debug)]
pub struct BooleanType;

impl DataType for BooleanType {
    type T = bool;
    type Key = bool;

    fn matches(physical_type: &PhysicalType) -> bool {
        matches!(physical_type, PhysicalType::Boolean)
    }

    fn key(value: &Self::T) -> Self::Key {
        *value
    }

    fn plain_encoded_size(_: &Descriptor, values: &[Self::T]) -> usize {
        ceil8(values.len())
    }

    fn extend_plain(_: &Descriptor, buffer: &mut Vec<u8>, num_buffered: usize, values: &[Self::T]) {
        let mut bit = num_buffered % 8;
        for &value in values {
            if bit == 0 {
                buffer.push(0);
            }
            if value {
                *buffer.last_mut().unwrap() |= 1 << bit;
            }
            bit = (bit + 1) % 8;
        }
    }

    fn update_min_max(min: &mut Option<Self::T>, max: &mut Option<Self::T>, value: &Self::T) {
        update_ord(min, max, value)
    }

    fn statistics(
        _: &PrimitiveType,
        min: Option<Self::T>,
        max: Option<Self::T>,
        null_count: i64,
    ) -> Statistics {
        BooleanStatistics {
            null_count: Some(null_count),
            distinct_count: None,
            min_value: min,
            max_value: max,
        }
        .into()
    }
}

#[derive(Debug)]
pub struct ByteArrayType;

impl DataType for ByteArrayType {
    type T = Vec<u8>;
    type Key = Vec<u8>;

    fn matches(physical_type: &PhysicalType) -> bool {
        matches!(physical_type, PhysicalType::ByteArray)
    }

    fn key(value: &Self::T) -> Self::Key {
        value.clone()
    }

    fn plain_encoded_size(_: &Descriptor, values: &[Self::T]) -> usize {
        values
            .iter()
            .map(|value| std::mem::size_of::<u32>() + value.len())
            .sum()
    }

    fn extend_plain(_: &Descriptor, buffer: &mut Vec<u8>, _: usize, values: &[Self::T]) {
        for value in values {
            buffer.extend_from_slice(&(value.len() as u32).to_le_bytes());
            buffer.extend_from_slice(value);
        }
    }

    fn update_min_max(min: &mut Option<Self::T>, max: &mut Option<Self::T>, value: &Self::T) {
        // `Ord` of byte slices is the unsigned lexicographic order parquet
        // specifies for BYTE_ARRAY statistics
        update_ord(min, max, value)
    }

    fn statistics(
        primitive_type: &PrimitiveType,
        min: Option<Self::T>,
        max: Option<Self::T>,
        null_count: i64,
    ) -> Statistics {
        BinaryStatistics {
            primitive_type: primitive_type.clone(),
            null_count: Some(null_count),
            distinct_count: None,
            min_value: min,
            max_value: max,
        }
        .into()
    }
}

#[derive(Debug)]
pub struct FixedLenByteArrayType;

impl FixedLenByteArrayType {
    fn size(descriptor: &Descriptor) -> usize {
        match descriptor.primitive_type.physical_type {
            PhysicalType::FixedLenByteArray(size) => size,
            _ => unreachable!("validated at construction"),
        }
    }
}

impl DataType for FixedLenByteArrayType {
    type T = Vec<u8>;
    type Key = Vec<u8>;

    fn matches(physical_type: &PhysicalType) -> bool {
        matches!(physical_type, PhysicalType::FixedLenByteArray(_))
    }

    fn key(value: &Self::T) -> Self::Key {
        value.clone()
    }

    fn plain_encoded_size(descriptor: &Descriptor, values: &[Self::T]) -> usize {
        values.len() * Self::size(descriptor)
    }

    fn extend_plain(
        descriptor: &Descriptor,
        buffer: &mut Vec<u8>,
        _: usize,
        values: &[Self::T],
    ) {
        let size = Self::size(descriptor);
        for value in values {
            debug_assert_eq!(value.len(), size);
            buffer.extend_from_slice(value);
        }
    }

    fn update_min_max(min: &mut Option<Self::T>, max: &mut Option<Self::T>, value: &Self::T) {
        update_ord(min, max, value)
    }

    fn statistics(
        primitive_type: &PrimitiveType,
        min: Option<Self::T>,
        max: Option<Self::T>,
        null_count: i64,
    ) -> Statistics {
        FixedLenStatistics {
            primitive_type: primitive_type.clone(),
            null_count: Some(null_count),
            distinct_count: None,
            min_value: min,
            max_value: max,
        }
        .into()
    }
}
