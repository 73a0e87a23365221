//! Value types of analyzed expressions
//!
//! Every [`ValueType`] corresponds to one container [`ain::AinType`]; the
//! analyzer reads them off the tables it has filled in.

mod value_type;

pub use value_type::ValueType;
