//! Statement AST nodes

use super::{Declaration, Expr};
use crate::common::Span;

/// Statement node
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement kinds
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Expression statement: expr;
    Expr(Expr),

    /// Empty statement: ;
    Empty,

    /// Compound statement (block): { ... }
    Compound(Block),

    /// If statement: if (cond) then [else else]
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    /// While loop: while (cond) body
    While {
        condition: Expr,
        body: Box<Stmt>,
    },

    /// Do-while loop: do body while (cond);
    DoWhile {
        body: Box<Stmt>,
        condition: Expr,
    },

    /// For loop: for (init; cond; update) body
    ///
    /// The init clause is a block of its own so a declaration there is
    /// scoped to the loop.
    For {
        init: Block,
        condition: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },

    /// Switch statement: switch (expr) { ... }
    Switch {
        expr: Expr,
        body: Block,
    },

    /// Case label: case expr: stmt
    Case {
        value: Expr,
        stmt: Box<Stmt>,
    },

    /// Default label: default: stmt
    Default(Box<Stmt>),

    /// Labeled statement: label: stmt
    Labeled {
        label: String,
        stmt: Box<Stmt>,
    },

    /// Goto statement: goto label;
    Goto(String),

    Break,

    Continue,

    /// Return statement: return [expr];
    Return(Option<Expr>),
}

/// Block (compound statement or top-level program)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub items: Vec<BlockItem>,
    pub span: Span,
}

impl Block {
    pub fn new(items: Vec<BlockItem>, span: Span) -> Self {
        Self { items, span }
    }
}

/// Item inside a block
#[derive(Debug, Clone, PartialEq)]
pub enum BlockItem {
    Declaration(Declaration),
    Statement(Stmt),
}
