//! Type specifiers in the AST

use super::VarDecl;
use crate::common::Span;

/// Kind of a written type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Void,
    Int,
    Float,
    String,
    Struct,
    Enum,
    /// Named type not yet resolved; replaced by `Struct` during type resolution
    Typedef,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Void => "void",
            TypeKind::Int => "int",
            TypeKind::Float => "float",
            TypeKind::String => "string",
            TypeKind::Struct => "struct",
            TypeKind::Enum => "enum",
            TypeKind::Typedef => "typedef",
        }
    }
}

/// A type as written in a declaration
///
/// For `struct Name { ... }` the member declarations are kept in `members`
/// until the type resolver registers them; `struct_no` is filled in once
/// the struct is defined or a typedef name is resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpecifier {
    pub kind: TypeKind,
    pub name: Option<String>,
    pub struct_no: Option<usize>,
    pub members: Option<Vec<VarDecl>>,
    pub span: Span,
}

impl TypeSpecifier {
    pub fn new(kind: TypeKind, span: Span) -> Self {
        Self {
            kind,
            name: None,
            struct_no: None,
            members: None,
            span,
        }
    }

    pub fn int(span: Span) -> Self {
        Self::new(TypeKind::Int, span)
    }

    /// Reference to a named type, resolved later
    pub fn typedef(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(TypeKind::Typedef, span)
        }
    }

    /// Struct definition with a member list
    pub fn struct_def(name: Option<String>, members: Vec<VarDecl>, span: Span) -> Self {
        Self {
            name,
            members: Some(members),
            ..Self::new(TypeKind::Struct, span)
        }
    }

    /// Whether this is a struct definition whose body has not been registered
    pub fn is_undefined_struct_def(&self) -> bool {
        self.kind == TypeKind::Struct && self.members.is_some() && self.struct_no.is_none()
    }
}
