//! Compilation driver

use std::fs;
use std::path::Path;

use crate::common::{CompileResult, DiagnosticReporter};
use crate::frontend::{CompileContext, CompiledUnit, FrontendConfig, JafFrontend};

/// Runs the frontend over source files, reporting diagnostics to stderr
pub struct Pipeline {
    frontend: JafFrontend,
    config: FrontendConfig,
    reporter: DiagnosticReporter,
}

impl Pipeline {
    pub fn new(config: FrontendConfig) -> Self {
        Self {
            frontend: JafFrontend::new(),
            config,
            reporter: DiagnosticReporter::new(),
        }
    }

    /// Compile source text registered under `filename`
    pub fn compile_source(&mut self, filename: &str, source: &str) -> CompileResult<CompiledUnit> {
        let file_id = self.reporter.add_file(filename, source);
        let ctx = CompileContext::new(filename.to_string(), file_id, &self.reporter);
        self.frontend.compile(source, &ctx, &self.config)
    }

    /// Read and compile a source file
    pub fn compile_file(&mut self, path: &Path) -> CompileResult<CompiledUnit> {
        let source = fs::read_to_string(path)?;
        self.compile_source(&path.display().to_string(), &source)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(FrontendConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::CompileError;

    #[test]
    fn test_compile_source() {
        let mut pipeline = Pipeline::default();
        let unit = pipeline.compile_source("a.jaf", "struct P { int x; }; P origin;").unwrap();
        assert_eq!(unit.ain.structures.len(), 1);
        assert_eq!(unit.ain.globals.len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut pipeline = Pipeline::default();
        let err = pipeline.compile_file(Path::new("/nonexistent/input.jaf")).unwrap_err();
        assert!(matches!(err, CompileError::Io(_)));
    }
}
