//! Common infrastructure shared by the frontend and the analysis passes

mod error;
mod span;

pub use error::{CompileError, CompileResult, DiagnosticReporter, SemanticErrorKind};
pub use span::Span;
