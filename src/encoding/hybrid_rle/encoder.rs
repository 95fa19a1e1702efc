use crate::encoding::{bitpacked, ceil8, uleb128};

/// Upper bound on the length of one literal run: the single reserved
/// indicator byte can announce at most 63 groups of 8 values.
const MAX_VALUES_PER_LITERAL_RUN: usize = (1 << 6) * 8;

/// Largest ULEB128 encoding of a u32 run length.
const MAX_VLQ_BYTE_LEN: usize = 5;

/// An encoder of the hybrid RLE/bit-packing layout writing into a
/// caller-owned byte region.
///
/// Values are buffered in groups of 8; a group repeating 8 or more times is
/// emitted as a repeated (RLE) run, everything else accumulates into literal
/// (bit-packed) runs whose single indicator byte is back-patched when the
/// run closes.
///
/// The encoder stops accepting values ([`RleEncoder::put`] returns `false`)
/// once fewer than [`RleEncoder::min_buffer_size`] bytes remain, because a
/// run in progress may still grow by that much before it can be sealed.
/// Callers that size the region with [`RleEncoder::max_buffer_size`] plus
/// that head-room never hit this.
pub struct RleEncoder<'a> {
    buffer: &'a mut [u8],
    len: usize,
    bit_width: usize,
    buffered_values: [u32; 8],
    num_buffered_values: usize,
    current_value: u32,
    repeat_count: usize,
    literal_count: usize,
    literal_indicator_offset: Option<usize>,
    buffer_full: bool,
}

impl<'a> RleEncoder<'a> {
    pub fn new(buffer: &'a mut [u8], bit_width: usize) -> Self {
        debug_assert!(bit_width <= 32);
        Self {
            buffer,
            len: 0,
            bit_width,
            buffered_values: [0; 8],
            num_buffered_values: 0,
            current_value: 0,
            repeat_count: 0,
            literal_count: 0,
            literal_indicator_offset: None,
            buffer_full: false,
        }
    }

    /// The maximum number of bytes `num_values` values of `bit_width` may
    /// occupy once encoded. The worst cases are a sequence of 8-value literal
    /// groups and a sequence of 8-value repeated runs.
    pub fn max_buffer_size(bit_width: usize, num_values: usize) -> usize {
        let num_runs = ceil8(num_values);
        let literal_max_size = num_runs + num_runs * bit_width;
        let min_repeated_run_size = 1 + ceil8(bit_width);
        let repeated_max_size = num_runs * min_repeated_run_size;
        literal_max_size.max(repeated_max_size)
    }

    /// The head-room the encoder needs beyond the last sealed run: the
    /// largest literal run (one indicator byte plus 63 packed groups) or the
    /// largest repeated run (run-length varint plus one value).
    pub fn min_buffer_size(bit_width: usize) -> usize {
        let max_literal_run_size = 1 + ceil8(MAX_VALUES_PER_LITERAL_RUN * bit_width);
        let max_repeated_run_size = MAX_VLQ_BYTE_LEN + ceil8(bit_width);
        max_literal_run_size.max(max_repeated_run_size)
    }

    /// Appends `value`. Returns `false` iff the buffer is full and the value
    /// was not consumed.
    pub fn put(&mut self, value: u32) -> bool {
        debug_assert!(self.bit_width == 32 || (value as u64) < (1u64 << self.bit_width));
        if self.buffer_full {
            return false;
        }

        if self.current_value == value {
            self.repeat_count += 1;
            if self.repeat_count > 8 {
                // continuation of a repeated run already long enough to RLE;
                // nothing to buffer
                return true;
            }
        } else {
            if self.repeat_count >= 8 {
                debug_assert_eq!(self.literal_count, 0);
                self.flush_repeated_run();
            }
            self.repeat_count = 1;
            self.current_value = value;
        }

        self.buffered_values[self.num_buffered_values] = value;
        self.num_buffered_values += 1;
        if self.num_buffered_values == 8 {
            debug_assert_eq!(self.literal_count % 8, 0);
            self.flush_buffered_values(false);
        }
        true
    }

    /// Seals the pending run and returns the total number of bytes written.
    pub fn flush(&mut self) -> usize {
        if self.literal_count > 0 || self.repeat_count > 0 || self.num_buffered_values > 0 {
            let all_repeat = self.literal_count == 0
                && (self.repeat_count == self.num_buffered_values || self.num_buffered_values == 0);
            if self.repeat_count > 0 && all_repeat {
                self.flush_repeated_run();
            } else {
                debug_assert_eq!(self.literal_count % 8, 0);
                // pad the final group with zeros to a multiple of 8
                while self.num_buffered_values != 0 && self.num_buffered_values < 8 {
                    self.buffered_values[self.num_buffered_values] = 0;
                    self.num_buffered_values += 1;
                }
                self.literal_count += self.num_buffered_values;
                self.flush_literal_run(true);
                self.repeat_count = 0;
            }
        }
        self.len
    }

    /// The number of bytes written so far. Only final after [`RleEncoder::flush`].
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn flush_buffered_values(&mut self, done: bool) {
        if self.repeat_count >= 8 {
            // the buffered values all belong to the repeated run in progress
            self.num_buffered_values = 0;
            if self.literal_count != 0 {
                debug_assert_eq!(self.literal_count % 8, 0);
                self.flush_literal_run(true);
            }
            return;
        }

        self.literal_count += self.num_buffered_values;
        debug_assert_eq!(self.literal_count % 8, 0);
        let num_groups = self.literal_count / 8;
        if num_groups + 1 >= (1 << 6) {
            // the reserved indicator byte cannot announce more groups
            self.flush_literal_run(true);
        } else {
            self.flush_literal_run(done);
        }
        self.repeat_count = 0;
    }

    fn flush_literal_run(&mut self, update_indicator_byte: bool) {
        if self.literal_indicator_offset.is_none() {
            if self.len >= self.buffer.len() {
                self.buffer_full = true;
                return;
            }
            self.literal_indicator_offset = Some(self.len);
            self.len += 1;
        }

        if self.num_buffered_values > 0 {
            if self.len + self.bit_width > self.buffer.len() {
                self.buffer_full = true;
                return;
            }
            bitpacked::encode_pack8(
                &self.buffered_values[..self.num_buffered_values],
                self.bit_width,
                &mut self.buffer[self.len..],
            );
            self.len += self.bit_width;
            self.num_buffered_values = 0;
        }

        if update_indicator_byte {
            let offset = self.literal_indicator_offset.take().unwrap();
            debug_assert_eq!(self.literal_count % 8, 0);
            let num_groups = self.literal_count / 8;
            self.buffer[offset] = ((num_groups << 1) | 1) as u8;
            self.literal_count = 0;
            self.check_buffer_full();
        }
    }

    fn flush_repeated_run(&mut self) {
        debug_assert!(self.repeat_count > 0);
        let mut header = [0u8; 10];
        // the clear lsb marks a repeated run
        let used = uleb128::encode((self.repeat_count as u64) << 1, &mut header);
        let value_bytes = ceil8(self.bit_width);
        if self.len + used + value_bytes > self.buffer.len() {
            self.buffer_full = true;
            return;
        }
        self.buffer[self.len..self.len + used].copy_from_slice(&header[..used]);
        self.len += used;
        let bytes = self.current_value.to_le_bytes();
        self.buffer[self.len..self.len + value_bytes].copy_from_slice(&bytes[..value_bytes]);
        self.len += value_bytes;
        self.num_buffered_values = 0;
        self.repeat_count = 0;
        self.check_buffer_full();
    }

    fn check_buffer_full(&mut self) {
        if self.len + Self::min_buffer_size(self.bit_width) > self.buffer.len() {
            self.buffer_full = true;
        }
    }
}
