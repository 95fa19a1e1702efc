//! The hybrid RLE/bit-packing layout used for levels and dictionary indices.
mod decoder;
mod encoder;

pub use decoder::{Decoder, HybridRleDecoder};
pub use encoder::RleEncoder;

/// The two kinds of runs of the hybrid layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HybridEncoded<'a> {
    /// A bitpacked run: a slice of `ceil8(num_values) * num_bits` bytes.
    Bitpacked(&'a [u8]),
    /// A repeated run: the repeated value (LE, `ceil8(num_bits)` bytes) and
    /// the run length.
    Rle(&'a [u8], usize),
}
