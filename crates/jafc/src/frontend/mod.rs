//! JAF language frontend
//!
//! Takes source text through lexing, parsing and semantic analysis. The
//! result is the annotated syntax tree together with a populated AIN
//! container, ready for code generation.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod sema;

use ain::Ain;

use crate::common::{CompileResult, DiagnosticReporter};

pub use ast::Block;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;

/// Container version used when none is requested
pub const DEFAULT_AIN_VERSION: u32 = 4;

/// Configuration options passed to the frontend
#[derive(Debug, Clone)]
pub struct FrontendConfig {
    /// Version of the container being produced
    pub ain_version: u32,
    pub dump_tokens: bool,
    pub dump_ast: bool,
    pub verbose: bool,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            ain_version: DEFAULT_AIN_VERSION,
            dump_tokens: false,
            dump_ast: false,
            verbose: false,
        }
    }
}

/// Compilation context providing access to diagnostics and file info
pub struct CompileContext<'a> {
    pub filename: String,
    pub file_id: usize,
    pub reporter: &'a DiagnosticReporter,
}

impl<'a> CompileContext<'a> {
    pub fn new(filename: String, file_id: usize, reporter: &'a DiagnosticReporter) -> Self {
        Self { filename, file_id, reporter }
    }
}

/// Output of a successful frontend run
#[derive(Debug)]
pub struct CompiledUnit {
    pub ain: Ain,
    pub program: Block,
}

/// JAF language frontend
#[derive(Debug, Default)]
pub struct JafFrontend;

impl JafFrontend {
    pub fn new() -> Self {
        Self
    }

    /// Compile source text into an analyzed unit
    ///
    /// Errors are rendered through the context's reporter before being
    /// returned.
    pub fn compile(
        &self,
        source: &str,
        ctx: &CompileContext,
        config: &FrontendConfig,
    ) -> CompileResult<CompiledUnit> {
        let result = Self::run(source, ctx, config);
        if let Err(e) = &result {
            ctx.reporter.report_error(ctx.file_id, e);
        }
        result
    }

    fn run(source: &str, ctx: &CompileContext, config: &FrontendConfig) -> CompileResult<CompiledUnit> {
        // Phase 1: Lexing (optional token dump)
        if config.dump_tokens {
            let tokens = Lexer::new(source).tokenize_all()?;
            eprintln!("=== JAF Tokens ===");
            for token in &tokens {
                eprintln!("{:?}", token);
            }
            eprintln!("=== End Tokens ===\n");
        }

        // Phase 2: Parsing
        if config.verbose {
            eprintln!("Parsing {}...", ctx.filename);
        }
        let mut program = Parser::new(source)?.parse()?;

        // Phase 3: Semantic analysis
        if config.verbose {
            eprintln!("Analyzing (ain version {})...", config.ain_version);
        }
        let mut ain = Ain::new(config.ain_version);
        sema::analyze(&mut ain, &mut program)?;

        if config.dump_ast {
            eprintln!("=== JAF AST ===");
            eprintln!("{:#?}", program);
            eprintln!("=== End AST ===\n");
        }

        Ok(CompiledUnit { ain, program })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{CompileError, SemanticErrorKind};
    use pretty_assertions::assert_eq;

    fn compile(source: &str, config: &FrontendConfig) -> CompileResult<CompiledUnit> {
        let mut reporter = DiagnosticReporter::new();
        let file_id = reporter.add_file("test.jaf", source);
        let ctx = CompileContext::new("test.jaf".to_string(), file_id, &reporter);
        JafFrontend::new().compile(source, &ctx, config)
    }

    #[test]
    fn test_compile_populates_container() {
        let unit = compile("int g = 4; int main() { return g; }", &FrontendConfig::default()).unwrap();

        assert_eq!(unit.ain.version, DEFAULT_AIN_VERSION);
        assert_eq!(unit.ain.functions[0].name, "main");
        assert_eq!(unit.program.items.len(), 2);
    }

    #[test]
    fn test_version_reaches_container() {
        let config = FrontendConfig { ain_version: 14, ..FrontendConfig::default() };
        let unit = compile("int g;", &config).unwrap();
        assert!(unit.ain.has_secondary_names());
    }

    #[test]
    fn test_errors_propagate_by_stage() {
        let config = FrontendConfig::default();
        assert!(matches!(compile("int $;", &config), Err(CompileError::Lexer { .. })));
        assert!(matches!(compile("int f( {", &config), Err(CompileError::Parser { .. })));

        let err = compile("void f() { return missing; }", &config).unwrap_err();
        assert_eq!(
            err.semantic_kind(),
            Some(&SemanticErrorKind::UndefinedIdentifier("missing".to_string()))
        );
    }
}
