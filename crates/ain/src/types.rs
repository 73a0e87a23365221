//! Table entry types stored in an [`Ain`](crate::Ain) container
//!
//! These mirror the records the code generator consumes: every variable,
//! member, function and initial value the analyzer produces ends up as one
//! of the types below.

use std::fmt;

/// Primitive data tag of a table type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Void,
    Int,
    Float,
    String,
    Struct,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Void => "void",
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::String => "string",
            DataType::Struct => "struct",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoded type of a variable, member or function return value
///
/// `struct_no` is set exactly when `data` is [`DataType::Struct`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AinType {
    pub data: DataType,
    pub struct_no: Option<usize>,
}

impl AinType {
    pub const VOID: AinType = AinType::primitive(DataType::Void);
    pub const INT: AinType = AinType::primitive(DataType::Int);
    pub const FLOAT: AinType = AinType::primitive(DataType::Float);
    pub const STRING: AinType = AinType::primitive(DataType::String);

    pub const fn primitive(data: DataType) -> Self {
        Self { data, struct_no: None }
    }

    pub const fn structure(struct_no: usize) -> Self {
        Self {
            data: DataType::Struct,
            struct_no: Some(struct_no),
        }
    }
}

impl fmt::Display for AinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.struct_no {
            Some(no) => write!(f, "struct#{}", no),
            None => f.write_str(self.data.as_str()),
        }
    }
}

/// A named, typed storage slot (global, local, parameter or struct member)
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    /// Secondary name, only present in version 12+ containers
    pub name2: Option<String>,
    pub ty: AinType,
}

/// Struct type definition
#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    pub name: String,
    pub members: Vec<Variable>,
}

impl Struct {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Find a member by name, returning its index and record
    pub fn member(&self, name: &str) -> Option<(usize, &Variable)> {
        self.members.iter().enumerate().find(|(_, m)| m.name == name)
    }
}

/// Function table entry
///
/// The first `nr_args` entries of `vars` are the parameters; the rest are
/// locals in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub return_type: AinType,
    pub nr_args: usize,
    pub vars: Vec<Variable>,
}

impl Function {
    pub fn new(name: impl Into<String>, return_type: AinType) -> Self {
        Self {
            name: name.into(),
            return_type,
            nr_args: 0,
            vars: Vec::new(),
        }
    }

    pub fn params(&self) -> &[Variable] {
        self.vars.get(..self.nr_args).unwrap_or(&self.vars)
    }

    pub fn nr_vars(&self) -> usize {
        self.vars.len()
    }
}

/// Literal value used to pre-populate a global
#[derive(Debug, Clone, PartialEq)]
pub enum InitvalValue {
    Int(i32),
    Float(f32),
    String(String),
}

impl fmt::Display for InitvalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitvalValue::Int(v) => write!(f, "{}", v),
            InitvalValue::Float(v) => write!(f, "{:?}", v),
            InitvalValue::String(s) => write!(f, "{:?}", s),
        }
    }
}

/// Initial value attached to a global slot
#[derive(Debug, Clone, PartialEq)]
pub struct Initval {
    pub global_index: usize,
    pub value: InitvalValue,
}
