use crate::schema::types::PrimitiveType;

/// A descriptor of the leaf of a parquet column: its physical type and the
/// maximum levels value assembly needs to reconstruct nesting and nullability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Descriptor {
    /// The [`PrimitiveType`] of this column
    pub primitive_type: PrimitiveType,

    /// The maximum definition level
    pub max_def_level: i16,

    /// The maximum repetition level
    pub max_rep_level: i16,
}

/// A descriptor for leaf-level primitive columns.
/// This encapsulates information such as definition and repetition levels and is used to
/// re-assemble nested data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnDescriptor {
    /// The descriptor of this column's leaf.
    pub descriptor: Descriptor,

    /// The path of this column. For instance, "a.b.c.d".
    pub path_in_schema: Vec<String>,
}

impl ColumnDescriptor {
    /// Creates new descriptor for leaf-level column.
    pub fn new(descriptor: Descriptor, path_in_schema: Vec<String>) -> Self {
        Self {
            descriptor,
            path_in_schema,
        }
    }

    /// A column without nesting: required when `max_def_level == 0`, else optional.
    pub fn from_leaf(primitive_type: PrimitiveType, max_def_level: i16, max_rep_level: i16) -> Self {
        let path_in_schema = vec![primitive_type.field_info.name.clone()];
        Self::new(
            Descriptor {
                primitive_type,
                max_def_level,
                max_rep_level,
            },
            path_in_schema,
        )
    }
}
