use super::HybridEncoded;
use crate::encoding::{bitpacked, ceil8, uleb128};

/// An [`Iterator`] of [`HybridEncoded`] runs.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    values: &'a [u8],
    num_bits: usize,
}

impl<'a> Decoder<'a> {
    /// Returns a new [`Decoder`]
    pub fn new(values: &'a [u8], num_bits: usize) -> Self {
        Self { values, num_bits }
    }

    /// Returns the number of bits being used by this decoder.
    #[inline]
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = HybridEncoded<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (indicator, consumed) = uleb128::decode(self.values);
        self.values = &self.values[consumed..];

        if (consumed * self.num_bits) == 0 {
            return None;
        }

        if indicator & 1 == 1 {
            // is bitpacking
            let bytes = (indicator as usize >> 1) * self.num_bits;
            let bytes = std::cmp::min(bytes, self.values.len());
            let (result, remaining) = self.values.split_at(bytes);
            self.values = remaining;
            Some(HybridEncoded::Bitpacked(result))
        } else {
            // is rle
            let run_length = indicator as usize >> 1;
            // repeated-value := value that is repeated, using a fixed-width of
            // round-up-to-next-byte(bit-width)
            let rle_bytes = ceil8(self.num_bits);
            if rle_bytes > self.values.len() {
                return None;
            }
            let (result, remaining) = self.values.split_at(rle_bytes);
            self.values = remaining;
            Some(HybridEncoded::Rle(result, run_length))
        }
    }
}

enum State<'a> {
    Finished,
    Rle { value: u32, remaining: usize },
    Bitpacked(bitpacked::Decoder<'a>),
}

/// An [`Iterator`] of the `u32` values of a hybrid RLE/bit-packed stream,
/// spanning runs.
pub struct HybridRleDecoder<'a> {
    runs: Decoder<'a>,
    state: State<'a>,
    num_bits: usize,
    remaining: usize,
}

impl<'a> HybridRleDecoder<'a> {
    /// Decodes `num_values` values with `num_bits` each from `values`.
    pub fn new(values: &'a [u8], num_bits: usize, num_values: usize) -> Self {
        Self {
            runs: Decoder::new(values, num_bits),
            state: State::Finished,
            num_bits,
            remaining: num_values,
        }
    }
}

impl<'a> Iterator for HybridRleDecoder<'a> {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        if self.num_bits == 0 {
            // a zero-width stream encodes only zeros
            self.remaining -= 1;
            return Some(0);
        }
        loop {
            match &mut self.state {
                State::Rle { value, remaining } => {
                    if *remaining > 0 {
                        *remaining -= 1;
                        self.remaining -= 1;
                        return Some(*value);
                    }
                },
                State::Bitpacked(decoder) => {
                    if let Some(value) = decoder.next() {
                        self.remaining -= 1;
                        return Some(value);
                    }
                },
                State::Finished => {},
            }
            match self.runs.next()? {
                HybridEncoded::Rle(bytes, run_length) => {
                    let mut word = [0u8; 4];
                    word[..bytes.len().min(4)].copy_from_slice(&bytes[..bytes.len().min(4)]);
                    self.state = State::Rle {
                        value: u32::from_le_bytes(word),
                        remaining: run_length,
                    };
                },
                HybridEncoded::Bitpacked(bytes) => {
                    let num_values =
                        std::cmp::min(bytes.len() * 8 / self.num_bits, self.remaining);
                    let decoder =
                        bitpacked::Decoder::try_new(bytes, self.num_bits, num_values).ok()?;
                    self.state = State::Bitpacked(decoder);
                },
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitpacked_run() {
        let bit_width = 1usize;
        let length = 5;
        let values = [
            2, 0, 0, 0, // length
            0b00000011, 0b00001011, // data
        ];

        let mut decoder = Decoder::new(&values[4..6], bit_width);

        let run = decoder.next().unwrap();

        if let HybridEncoded::Bitpacked(values) = run {
            assert_eq!(values, &[0b00001011]);
            let result = bitpacked::Decoder::try_new(values, bit_width, length)
                .unwrap()
                .collect::<Vec<_>>();
            assert_eq!(result, &[1, 1, 0, 1, 0]);
        } else {
            panic!()
        };
    }

    #[test]
    fn rle_run() {
        let bit_width = 1;
        let length = 8;
        let values = [
            0b00010000, // header: (8 << 1)
            0b00000001, // repeated value
        ];

        let mut decoder = Decoder::new(&values, bit_width);

        let run = decoder.next().unwrap();

        if let HybridEncoded::Rle(values, items) = run {
            assert_eq!(values, &[0b00000001]);
            assert_eq!(items, length);
        } else {
            panic!()
        };
    }

    #[test]
    fn mixed_runs() {
        // a bitpacked run of 8 values followed by an rle run of 10 ones
        let values = [
            0b00000011, // bitpacked, 1 group
            0b01010101, // data
            0b00010100, // rle, 10 repeats
            0b00000001, // repeated value
        ];
        let decoded = HybridRleDecoder::new(&values, 1, 18).collect::<Vec<_>>();
        let mut expected = vec![1, 0, 1, 0, 1, 0, 1, 0];
        expected.extend(std::iter::repeat(1).take(10));
        assert_eq!(decoded, expected);
    }

    #[test]
    fn zero_width() {
        let decoded = HybridRleDecoder::new(&[], 0, 3).collect::<Vec<_>>();
        assert_eq!(decoded, vec![0, 0, 0]);
    }
}
