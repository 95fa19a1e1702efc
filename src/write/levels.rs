//! Encoding of repetition/definition level streams into caller-owned buffers.
use crate::encoding::hybrid_rle::RleEncoder;
use crate::encoding::{ceil8, get_bit_width};
use crate::error::{ParquetError, ParquetResult};
use crate::parquet_bridge::Encoding;

/// Encodes one stream of levels bounded by a column's maximum level into a
/// caller-owned byte region.
///
/// [`LevelEncoder::encode`] consumes as many levels as fit and reports the
/// count; callers that size the region with
/// [`LevelEncoder::max_buffer_size`] always see the full input consumed.
pub enum LevelEncoder<'a> {
    Rle(RleEncoder<'a>),
    BitPacked(BitPackedEncoder<'a>),
}

impl<'a> LevelEncoder<'a> {
    /// Returns an encoder of `encoding` over `buffer`, for levels in
    /// `0..=max_level`.
    /// # Error
    /// Errors if `encoding` is not a level encoding.
    pub fn new(encoding: Encoding, max_level: i16, buffer: &'a mut [u8]) -> ParquetResult<Self> {
        let bit_width = get_bit_width(max_level) as usize;
        match encoding {
            Encoding::Rle => Ok(Self::Rle(RleEncoder::new(buffer, bit_width))),
            Encoding::BitPacked => Ok(Self::BitPacked(BitPackedEncoder::new(buffer, bit_width))),
            other => Err(ParquetError::FeatureNotSupported(format!(
                "encoding levels as {other:?}"
            ))),
        }
    }

    /// The largest number of bytes `num_values` levels can occupy in
    /// `encoding`. For RLE this includes the encoder's look-ahead head-room;
    /// buffers sized with it never truncate.
    pub fn max_buffer_size(
        encoding: Encoding,
        max_level: i16,
        num_values: usize,
    ) -> ParquetResult<usize> {
        let bit_width = get_bit_width(max_level) as usize;
        match encoding {
            Encoding::Rle => Ok(RleEncoder::max_buffer_size(bit_width, num_values)
                + RleEncoder::min_buffer_size(bit_width)),
            Encoding::BitPacked => Ok(ceil8(num_values * bit_width)),
            other => Err(ParquetError::FeatureNotSupported(format!(
                "encoding levels as {other:?}"
            ))),
        }
    }

    /// Encodes `levels`, returning how many were consumed. Fewer than
    /// `levels.len()` are consumed iff the buffer is full.
    pub fn encode(&mut self, levels: &[i16]) -> usize {
        match self {
            Self::Rle(encoder) => {
                let mut consumed = 0;
                for &level in levels {
                    if !encoder.put(level as u32) {
                        break;
                    }
                    consumed += 1;
                }
                encoder.flush();
                consumed
            },
            Self::BitPacked(encoder) => {
                let mut consumed = 0;
                for &level in levels {
                    if !encoder.put(level as u32) {
                        break;
                    }
                    consumed += 1;
                }
                encoder.flush();
                consumed
            },
        }
    }

    /// The number of bytes written. Final once the last [`LevelEncoder::encode`]
    /// call returned.
    pub fn len(&self) -> usize {
        match self {
            Self::Rle(encoder) => encoder.len(),
            Self::BitPacked(encoder) => encoder.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The deprecated whole-stream bit-packed level encoding: values are packed
/// LSB-first back to back and the stream is padded to a byte boundary.
pub struct BitPackedEncoder<'a> {
    buffer: &'a mut [u8],
    bit_width: usize,
    bits: usize,
}

impl<'a> BitPackedEncoder<'a> {
    fn new(buffer: &'a mut [u8], bit_width: usize) -> Self {
        Self {
            buffer,
            bit_width,
            bits: 0,
        }
    }

    fn put(&mut self, value: u32) -> bool {
        if ceil8(self.bits + self.bit_width) > self.buffer.len() {
            return false;
        }
        for k in 0..self.bit_width {
            let position = self.bits + k;
            if position % 8 == 0 {
                self.buffer[position / 8] = 0;
            }
            if (value >> k) & 1 == 1 {
                self.buffer[position / 8] |= 1 << (position % 8);
            }
        }
        self.bits += self.bit_width;
        true
    }

    fn flush(&mut self) {}

    fn len(&self) -> usize {
        ceil8(self.bits)
    }
}
