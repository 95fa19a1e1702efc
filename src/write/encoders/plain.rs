use super::DataType;
use crate::metadata::Descriptor;

/// Accumulates values in their plain encoding. The buffer grows on `put`;
/// [`PlainEncoder::flush_values`] hands it over and restarts accumulation.
#[derive(Debug)]
pub struct PlainEncoder<D: DataType> {
    descriptor: Descriptor,
    buffer: Vec<u8>,
    num_values: usize,
    _data_type: std::marker::PhantomData<D>,
}

impl<D: DataType> PlainEncoder<D> {
    pub fn new(descriptor: Descriptor) -> Self {
        Self {
            descriptor,
            buffer: vec![],
            num_values: 0,
            _data_type: std::marker::PhantomData,
        }
    }

    /// Appends dense `values`.
    pub fn put(&mut self, values: &[D::T]) {
        D::extend_plain(&self.descriptor, &mut self.buffer, self.num_values, values);
        self.num_values += values.len();
    }

    /// Appends the dense non-null values of a nullable window. Null slots
    /// carry no plain encoding, so this is `put`; the bitmap only matters
    /// for statistics.
    pub fn put_spaced(&mut self, values: &[D::T], _valid_bits: &[u8], _valid_bits_offset: usize) {
        self.put(values)
    }

    /// The exact size the accumulated values serialize to.
    pub fn estimated_data_encoded_size(&self) -> usize {
        self.buffer.len()
    }

    /// Hands over the accumulated payload and resets the encoder.
    pub fn flush_values(&mut self) -> Vec<u8> {
        self.num_values = 0;
        std::mem::take(&mut self.buffer)
    }
}
