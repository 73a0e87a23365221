//! Abstract Syntax Tree definitions
//!
//! The tree is produced by the parser and then mutated in place by the
//! analysis passes: type specifiers get resolved, declarations get their
//! table indices and expressions get typed and folded.

mod types;
mod expr;
mod stmt;
mod decl;

pub use types::*;
pub use expr::*;
pub use stmt::*;
pub use decl::*;
