//! Parser for JAF source

mod parser;

pub use parser::Parser;
