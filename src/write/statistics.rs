//! Accumulation of min/max/null-count statistics while a page is written.
use super::encoders::DataType;
use crate::schema::types::PrimitiveType;
use crate::statistics::Statistics;

/// Statistics of a window of values of one physical type: the per-page
/// accumulator, and, through [`TypedStatistics::merge`], the chunk aggregate.
#[derive(Debug)]
pub struct TypedStatistics<D: DataType> {
    primitive_type: PrimitiveType,
    min: Option<D::T>,
    max: Option<D::T>,
    null_count: i64,
}

impl<D: DataType> TypedStatistics<D> {
    pub fn new(primitive_type: PrimitiveType) -> Self {
        Self {
            primitive_type,
            min: None,
            max: None,
            null_count: 0,
        }
    }

    /// Folds a window of dense non-null `values` and `num_nulls` nulls into
    /// the accumulator.
    pub fn update(&mut self, values: &[D::T], num_non_null: usize, num_nulls: i64) {
        debug_assert_eq!(values.len(), num_non_null);
        for value in values {
            D::update_min_max(&mut self.min, &mut self.max, value);
        }
        self.null_count += num_nulls;
    }

    /// The spaced variant: `values` is still the dense non-null window; the
    /// validity bitmap describes where the nulls sit and must agree with the
    /// counts.
    pub fn update_spaced(
        &mut self,
        values: &[D::T],
        valid_bits: &[u8],
        valid_bits_offset: usize,
        num_non_null: usize,
        num_nulls: i64,
    ) {
        debug_assert_eq!(
            count_set_bits(valid_bits, valid_bits_offset, num_non_null + num_nulls as usize),
            num_non_null
        );
        self.update(values, num_non_null, num_nulls)
    }

    /// An encoded snapshot of the accumulator.
    pub fn snapshot(&self) -> Statistics {
        D::statistics(
            &self.primitive_type,
            self.min.clone(),
            self.max.clone(),
            self.null_count,
        )
    }

    /// Folds `other` (a page accumulator) into this (chunk) accumulator.
    pub fn merge(&mut self, other: &Self) {
        if let Some(min) = &other.min {
            D::update_min_max(&mut self.min, &mut self.max, min);
        }
        if let Some(max) = &other.max {
            D::update_min_max(&mut self.min, &mut self.max, max);
        }
        self.null_count += other.null_count;
    }

    /// Clears the accumulator for the next page.
    pub fn reset(&mut self) {
        self.min = None;
        self.max = None;
        self.null_count = 0;
    }

    pub fn null_count(&self) -> i64 {
        self.null_count
    }
}

fn count_set_bits(bits: &[u8], offset: usize, length: usize) -> usize {
    (offset..offset + length)
        .filter(|i| bits.get(i / 8).map_or(false, |byte| byte >> (i % 8) & 1 == 1))
        .count()
}
