//! In-memory representations of parquet's physical fixed-width values.
use crate::schema::types::PhysicalType;

/// A physical native representation of a parquet fixed-width value.
pub trait NativeType:
    std::fmt::Debug + Send + Sync + 'static + Copy + Clone + PartialEq + Default
{
    /// The canonical little-endian byte form of the value.
    type Bytes: AsRef<[u8]>
        + for<'a> TryFrom<&'a [u8], Error = std::array::TryFromSliceError>
        + std::hash::Hash
        + Eq
        + Send
        + Sync
        + Copy
        + std::fmt::Debug;

    /// To the little-endian byte form.
    fn to_le_bytes(&self) -> Self::Bytes;

    /// From the little-endian byte form.
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// The physical type of this native type.
    const TYPE: PhysicalType;
}

macro_rules! native {
    ($type:ty, $physical_type:expr) => {
        impl NativeType for $type {
            type Bytes = [u8; std::mem::size_of::<Self>()];

            #[inline]
            fn to_le_bytes(&self) -> Self::Bytes {
                Self::to_le_bytes(*self)
            }

            #[inline]
            fn from_le_bytes(bytes: Self::Bytes) -> Self {
                Self::from_le_bytes(bytes)
            }

            const TYPE: PhysicalType = $physical_type;
        }
    };
}

native!(i32, PhysicalType::Int32);
native!(i64, PhysicalType::Int64);
native!(f32, PhysicalType::Float);
native!(f64, PhysicalType::Double);

/// The in-memory representation of the parquet `INT96` type. Stored as
/// `[nanos_lo, nanos_hi, julian_day]`, each word little-endian on disk.
impl NativeType for [u32; 3] {
    type Bytes = [u8; 12];

    #[inline]
    fn to_le_bytes(&self) -> Self::Bytes {
        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&self[0].to_le_bytes());
        bytes[4..8].copy_from_slice(&self[1].to_le_bytes());
        bytes[8..12].copy_from_slice(&self[2].to_le_bytes());
        bytes
    }

    #[inline]
    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        let mut word = [0u8; 4];
        word.copy_from_slice(&bytes[0..4]);
        let lo = u32::from_le_bytes(word);
        word.copy_from_slice(&bytes[4..8]);
        let mid = u32::from_le_bytes(word);
        word.copy_from_slice(&bytes[8..12]);
        let hi = u32::from_le_bytes(word);
        [lo, mid, hi]
    }

    const TYPE: PhysicalType = PhysicalType::Int96;
}

/// Decodes a `T` from its plain (little-endian) encoding.
/// # Panic
/// Panics if `chunk` does not hold exactly `size_of::<T::Bytes>()` bytes.
#[inline]
pub fn decode<T: NativeType>(chunk: &[u8]) -> T {
    match chunk.try_into() {
        Ok(bytes) => T::from_le_bytes(bytes),
        Err(_) => panic!("slice length must equal the physical size of the type"),
    }
}
