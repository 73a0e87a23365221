//! Declaration AST nodes

use super::{Block, Expr, TypeKind, TypeSpecifier};
use crate::common::Span;

/// Declaration node
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// Variable declaration: int x = 5;
    ///
    /// Also carries unnamed type-only declarations such as `struct S { ... };`.
    Variable(VarDecl),

    /// Function definition
    Function(FuncDecl),
}

/// Variable, parameter or struct member declaration
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: Option<String>,
    pub ty: TypeSpecifier,
    pub init: Option<Expr>,
    /// Slot index, assigned by the declaration processor
    pub var_no: Option<usize>,
    pub span: Span,
}

impl VarDecl {
    pub fn new(name: Option<String>, ty: TypeSpecifier, span: Span) -> Self {
        Self {
            name,
            ty,
            init: None,
            var_no: None,
            span,
        }
    }

    pub fn with_init(mut self, init: Expr) -> Self {
        self.init = Some(init);
        self
    }

    /// `struct Name;` with no body and no declarator
    pub fn is_forward_declaration(&self) -> bool {
        self.name.is_none() && self.ty.kind == TypeKind::Typedef
    }
}

/// Function definition
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    pub return_type: TypeSpecifier,
    pub params: Vec<VarDecl>,
    pub body: Block,
    /// Function table index, assigned by the declaration processor
    pub func_no: Option<usize>,
    pub span: Span,
}

impl FuncDecl {
    pub fn new(
        name: String,
        return_type: TypeSpecifier,
        params: Vec<VarDecl>,
        body: Block,
        span: Span,
    ) -> Self {
        Self {
            name,
            return_type,
            params,
            body,
            func_no: None,
            span,
        }
    }
}
