//! JAF Compiler - static analysis frontend for the JAF scripting language
//!
//! Turns JAF source into the symbol and type tables of an AIN container,
//! together with a typed, constant-folded syntax tree for code generation.
//!
//! ## Architecture
//!
//! - **Frontend** (`frontend/`): lexer, parser, AST and semantic analysis
//! - **Driver** (`driver/`): file loading and diagnostics around the frontend
//! - **Common** (`common/`): errors, diagnostics and source spans
//! - **Types** (`types/`): value types of analyzed expressions

pub mod common;
pub mod driver;
pub mod frontend;
pub mod types;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, DiagnosticReporter, Span};
pub use driver::Pipeline;
pub use frontend::{CompileContext, CompiledUnit, FrontendConfig, JafFrontend};
