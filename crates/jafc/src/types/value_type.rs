//! Concrete expression types

use std::fmt;

use ain::{AinType, DataType};

/// Concrete type of an analyzed expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Void,
    Int,
    Float,
    String,
    /// Struct by struct-table index
    Struct(usize),
}

impl ValueType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueType::Int | ValueType::Float)
    }

    pub fn is_int(&self) -> bool {
        matches!(self, ValueType::Int)
    }
}

impl From<AinType> for ValueType {
    fn from(ty: AinType) -> Self {
        match (ty.data, ty.struct_no) {
            (DataType::Void, _) => ValueType::Void,
            (DataType::Int, _) => ValueType::Int,
            (DataType::Float, _) => ValueType::Float,
            (DataType::String, _) => ValueType::String,
            (DataType::Struct, Some(no)) => ValueType::Struct(no),
            // A struct type without an index never leaves the resolver
            (DataType::Struct, None) => ValueType::Void,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Void => f.write_str("void"),
            ValueType::Int => f.write_str("int"),
            ValueType::Float => f.write_str("float"),
            ValueType::String => f.write_str("string"),
            ValueType::Struct(no) => write!(f, "struct#{}", no),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_without_index_is_not_a_struct() {
        let ty = AinType { data: DataType::Struct, struct_no: None };
        assert_eq!(ValueType::from(ty), ValueType::Void);
        assert_eq!(ValueType::from(AinType::structure(4)), ValueType::Struct(4));
    }

    #[test]
    fn test_display() {
        assert_eq!(ValueType::Struct(2).to_string(), "struct#2");
        assert_eq!(ValueType::Float.to_string(), "float");
    }
}
