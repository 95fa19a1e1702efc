use hashbrown::hash_map::Entry;
use hashbrown::HashMap;

use super::DataType;
use crate::encoding::hybrid_rle::RleEncoder;
use crate::error::{ParquetError, ParquetResult};
use crate::metadata::Descriptor;

/// Accumulates values as indices into a growing, insertion-ordered
/// dictionary of distinct values.
///
/// [`DictEncoder::flush_values`] serializes the pending indices as a
/// bit-width-prefixed hybrid RLE stream; [`DictEncoder::write_dict`]
/// serializes the dictionary itself (plain encoding, insertion order) and
/// releases the interned values, since pending index pages no longer need
/// them.
#[derive(Debug)]
pub struct DictEncoder<D: DataType> {
    descriptor: Descriptor,
    interned: HashMap<D::Key, u32>,
    values: Vec<D::T>,
    indices: Vec<u32>,
    num_entries: usize,
    dict_encoded_size: usize,
}

impl<D: DataType> DictEncoder<D> {
    pub fn new(descriptor: Descriptor) -> Self {
        Self {
            descriptor,
            interned: HashMap::new(),
            values: vec![],
            indices: vec![],
            num_entries: 0,
            dict_encoded_size: 0,
        }
    }

    /// Appends dense `values`, interning each.
    pub fn put(&mut self, values: &[D::T]) {
        for value in values {
            let index = match self.interned.entry(D::key(value)) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let index = self.values.len() as u32;
                    self.dict_encoded_size +=
                        D::plain_encoded_size(&self.descriptor, std::slice::from_ref(value));
                    self.values.push(value.clone());
                    self.num_entries += 1;
                    entry.insert(index);
                    index
                },
            };
            self.indices.push(index);
        }
    }

    /// See [`super::PlainEncoder::put_spaced`]: values are dense, nulls only
    /// matter to statistics.
    pub fn put_spaced(&mut self, values: &[D::T], _valid_bits: &[u8], _valid_bits_offset: usize) {
        self.put(values)
    }

    /// The number of distinct values interned so far.
    pub fn num_entries(&self) -> usize {
        self.num_entries
    }

    /// The size the dictionary payload would occupy if serialized now.
    pub fn dict_encoded_size(&self) -> usize {
        self.dict_encoded_size
    }

    /// The bit width the pending indices encode at.
    pub fn bit_width(&self) -> usize {
        if self.num_entries <= 1 {
            self.num_entries
        } else {
            (64 - ((self.num_entries - 1) as u64).leading_zeros()) as usize
        }
    }

    /// An upper bound of what [`DictEncoder::flush_values`] would produce.
    pub fn estimated_data_encoded_size(&self) -> usize {
        let bit_width = self.bit_width();
        1 + RleEncoder::max_buffer_size(bit_width, self.indices.len())
            + RleEncoder::min_buffer_size(bit_width)
    }

    /// Serializes the pending indices: one byte holding the bit width,
    /// followed by the hybrid RLE stream. Resets index accumulation.
    pub fn flush_values(&mut self) -> ParquetResult<Vec<u8>> {
        let bit_width = self.bit_width();
        let mut buffer = vec![0u8; self.estimated_data_encoded_size()];
        buffer[0] = bit_width as u8;

        let mut encoder = RleEncoder::new(&mut buffer[1..], bit_width);
        for &index in &self.indices {
            if !encoder.put(index) {
                return Err(ParquetError::oos(
                    "the dictionary index buffer was sized too small",
                ));
            }
        }
        let length = encoder.flush();
        buffer.truncate(1 + length);
        self.indices.clear();
        Ok(buffer)
    }

    /// Serializes the dictionary payload and releases the interned storage.
    /// After this call only the pending indices remain valid; further `put`s
    /// are not expected.
    pub fn write_dict(&mut self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.dict_encoded_size);
        D::extend_plain(&self.descriptor, &mut buffer, 0, &self.values);
        self.values = vec![];
        self.interned = HashMap::new();
        buffer
    }
}
