//! Lexical scope chain

use ain::{Ain, Variable};

use crate::common::{CompileError, CompileResult, SemanticErrorKind, Span};
use crate::frontend::ast::VarRef;

/// Bindings introduced by one lexical region
///
/// Locals are slot indices into the owning function's variable list; the
/// variable records themselves live in the container.
#[derive(Debug, Clone, PartialEq)]
struct Frame {
    func_no: usize,
    locals: Vec<usize>,
}

/// Stack of environments from the innermost region out to the global one
///
/// An empty stack is the global environment.
#[derive(Debug, Default)]
pub struct ScopeChain {
    frames: Vec<Frame>,
}

impl ScopeChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of environments above the global one
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_global(&self) -> bool {
        self.frames.is_empty()
    }

    /// Function owning the innermost environment
    pub fn func_no(&self) -> Option<usize> {
        self.frames.last().map(|frame| frame.func_no)
    }

    /// Enter a function body with its parameters already bound
    pub fn push_function(&mut self, func_no: usize, nr_args: usize) {
        self.frames.push(Frame {
            func_no,
            locals: (0..nr_args).collect(),
        });
    }

    /// Enter a nested block of the current function
    ///
    /// Does nothing at global scope, where there is no function to own it.
    pub fn push_block(&mut self) -> bool {
        let Some(func_no) = self.func_no() else {
            return false;
        };
        self.frames.push(Frame {
            func_no,
            locals: Vec::new(),
        });
        true
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Bind a local slot in the innermost environment
    pub fn declare(&mut self, ain: &Ain, var_no: usize, span: Span) -> CompileResult<()> {
        let Some(frame) = self.frames.last_mut() else {
            return Err(CompileError::semantic(SemanticErrorKind::NotInFunction, span));
        };
        let Some(vars) = ain.functions.get(frame.func_no).map(|f| &f.vars) else {
            return Err(CompileError::semantic(SemanticErrorKind::NotInFunction, span));
        };
        let Some(var) = vars.get(var_no) else {
            return Err(CompileError::semantic(SemanticErrorKind::UnknownSlot(var_no), span));
        };

        if frame
            .locals
            .iter()
            .any(|&slot| vars.get(slot).is_some_and(|v| v.name == var.name))
        {
            return Err(CompileError::semantic(
                SemanticErrorKind::DuplicateSymbol(var.name.clone()),
                span,
            ));
        }

        frame.locals.push(var_no);
        Ok(())
    }

    /// Find a variable by name, innermost environment first, then globals
    pub fn lookup<'a>(&self, ain: &'a Ain, name: &str) -> Option<(VarRef, &'a Variable)> {
        for frame in self.frames.iter().rev() {
            let Some(function) = ain.functions.get(frame.func_no) else {
                continue;
            };
            for &slot in frame.locals.iter().rev() {
                if let Some(var) = function.vars.get(slot).filter(|v| v.name == name) {
                    return Some((VarRef::Local(slot), var));
                }
            }
        }

        let global_no = ain.get_global_no(name)?;
        Some((VarRef::Global(global_no), &ain.globals[global_no]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ain::{AinType, Function};
    use pretty_assertions::assert_eq;

    /// `int g; void f(int a) { int x; { float x; int y; } { int z; } }`
    fn container() -> Ain {
        let mut ain = Ain::new(4);
        ain.add_global("g", AinType::INT);
        let mut f = Function::new("f", AinType::VOID);
        for (name, ty) in [
            ("a", AinType::INT),
            ("x", AinType::INT),
            ("x", AinType::FLOAT),
            ("y", AinType::INT),
            ("z", AinType::INT),
        ] {
            f.vars.push(ain.make_variable(name, ty));
        }
        f.nr_args = 1;
        ain.add_function(f);
        ain
    }

    #[test]
    fn test_parameters_visible_in_function_scope() {
        let ain = container();
        let mut scopes = ScopeChain::new();
        scopes.push_function(0, 1);

        let (binding, var) = scopes.lookup(&ain, "a").unwrap();
        assert_eq!(binding, VarRef::Local(0));
        assert_eq!(var.ty, AinType::INT);
    }

    #[test]
    fn test_inner_declaration_shadows_outer() {
        let ain = container();
        let mut scopes = ScopeChain::new();
        scopes.push_function(0, 1);
        scopes.declare(&ain, 1, Span::default()).unwrap();

        assert!(scopes.push_block());
        scopes.declare(&ain, 2, Span::default()).unwrap();
        assert_eq!(scopes.lookup(&ain, "x").map(|(b, _)| b), Some(VarRef::Local(2)));
        assert_eq!(scopes.lookup(&ain, "a").map(|(b, _)| b), Some(VarRef::Local(0)));

        scopes.pop();
        assert_eq!(scopes.lookup(&ain, "x").map(|(b, _)| b), Some(VarRef::Local(1)));
    }

    #[test]
    fn test_sibling_block_bindings_are_invisible() {
        let ain = container();
        let mut scopes = ScopeChain::new();
        scopes.push_function(0, 1);

        scopes.push_block();
        scopes.declare(&ain, 3, Span::default()).unwrap();
        assert!(scopes.lookup(&ain, "y").is_some());
        scopes.pop();

        scopes.push_block();
        scopes.declare(&ain, 4, Span::default()).unwrap();
        assert!(scopes.lookup(&ain, "y").is_none());
        assert!(scopes.lookup(&ain, "z").is_some());
    }

    #[test]
    fn test_globals_are_the_fallback() {
        let ain = container();
        let mut scopes = ScopeChain::new();
        assert_eq!(scopes.lookup(&ain, "g").map(|(b, _)| b), Some(VarRef::Global(0)));

        scopes.push_function(0, 1);
        assert_eq!(scopes.lookup(&ain, "g").map(|(b, _)| b), Some(VarRef::Global(0)));
        assert!(scopes.lookup(&ain, "nope").is_none());
    }

    #[test]
    fn test_redeclaration_in_same_block() {
        let ain = container();
        let mut scopes = ScopeChain::new();
        scopes.push_function(0, 1);
        scopes.declare(&ain, 1, Span::default()).unwrap();

        let err = scopes.declare(&ain, 2, Span::default()).unwrap_err();
        assert_eq!(
            err.semantic_kind(),
            Some(&SemanticErrorKind::DuplicateSymbol("x".to_string()))
        );
    }

    #[test]
    fn test_declare_needs_an_existing_slot() {
        let ain = container();
        let mut scopes = ScopeChain::new();

        let err = scopes.declare(&ain, 1, Span::default()).unwrap_err();
        assert_eq!(err.semantic_kind(), Some(&SemanticErrorKind::NotInFunction));

        scopes.push_function(0, 1);
        let err = scopes.declare(&ain, 9, Span::default()).unwrap_err();
        assert_eq!(err.semantic_kind(), Some(&SemanticErrorKind::UnknownSlot(9)));

        scopes.pop();
        scopes.push_function(7, 0);
        let err = scopes.declare(&ain, 0, Span::default()).unwrap_err();
        assert_eq!(err.semantic_kind(), Some(&SemanticErrorKind::NotInFunction));
    }

    #[test]
    fn test_block_needs_a_function() {
        let mut scopes = ScopeChain::new();
        assert!(!scopes.push_block());
        assert!(scopes.is_global());

        scopes.push_function(0, 0);
        assert!(scopes.push_block());
        assert_eq!(scopes.depth(), 2);
        assert_eq!(scopes.func_no(), Some(0));
    }
}
