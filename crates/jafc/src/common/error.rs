//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use thiserror::Error;
use super::Span;
use crate::types::ValueType;

/// Compile error with source location
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Lexer error at {span:?}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span:?}: {message}")]
    Parser { message: String, span: Span },

    #[error("Semantic error at {span:?}: {kind}")]
    Semantic { kind: SemanticErrorKind, span: Span },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons the static analysis rejects a program
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticErrorKind {
    #[error("anonymous structs not supported")]
    AnonymousNotSupported,

    #[error("redefinition of struct '{0}'")]
    DuplicateDefinition(String),

    #[error("redefinition of '{0}'")]
    DuplicateSymbol(String),

    #[error("failed to resolve typedef '{0}'")]
    UnresolvedTypedef(String),

    #[error("{0} types not supported")]
    UnsupportedType(String),

    #[error("function parameters must be named")]
    UnnamedParameter,

    #[error("nested functions not supported")]
    NestedFunctionsNotSupported,

    #[error("initval is not constant")]
    InitvalNotConstant,

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: ValueType, found: ValueType },

    #[error("undefined identifier '{0}'")]
    UndefinedIdentifier(String),

    #[error("undefined function '{0}'")]
    UndefinedFunction(String),

    #[error("invalid operand of type {ty} for operator '{op}'")]
    InvalidOperand { op: &'static str, ty: ValueType },

    #[error("expression is not assignable")]
    NotAssignable,

    #[error("'{name}' takes {expected} arguments but {found} were given")]
    ArgumentCount { name: String, expected: usize, found: usize },

    #[error("member access on non-struct type {0}")]
    NotAStruct(ValueType),

    #[error("no member named '{field}' in struct '{struct_name}'")]
    NoSuchMember { struct_name: String, field: String },

    #[error("local declaration outside of a function")]
    NotInFunction,

    #[error("variable slot {0} does not exist in the enclosing function")]
    UnknownSlot(usize),
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn semantic(kind: SemanticErrorKind, span: Span) -> Self {
        Self::Semantic { kind, span }
    }

    pub fn type_mismatch(expected: ValueType, found: ValueType, span: Span) -> Self {
        Self::semantic(SemanticErrorKind::TypeMismatch { expected, found }, span)
    }

    /// The semantic error kind, if this is a semantic error
    pub fn semantic_kind(&self) -> Option<&SemanticErrorKind> {
        match self {
            Self::Semantic { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    pub fn report_error(&self, file_id: usize, error: &CompileError) {
        let diagnostic = Self::diagnostic(file_id, error);
        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, &diagnostic);
    }

    fn diagnostic(file_id: usize, error: &CompileError) -> Diagnostic<usize> {
        match error {
            CompileError::Lexer { message, span } => Diagnostic::error()
                .with_message("Lexer error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message)
                ]),

            CompileError::Parser { message, span } => Diagnostic::error()
                .with_message("Syntax error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message)
                ]),

            CompileError::Semantic { kind, span } => {
                let title = match kind {
                    SemanticErrorKind::TypeMismatch { .. }
                    | SemanticErrorKind::InvalidOperand { .. }
                    | SemanticErrorKind::NotAStruct(_) => "Type error",
                    _ => "Semantic error",
                };
                Diagnostic::error()
                    .with_message(title)
                    .with_labels(vec![
                        Label::primary(file_id, span.start..span.end).with_message(kind.to_string())
                    ])
            }

            CompileError::Io(err) => {
                Diagnostic::error().with_message(format!("IO error: {}", err))
            }
        }
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
