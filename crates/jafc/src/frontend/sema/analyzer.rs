//! Statement and expression analysis

use ain::{Ain, Function, Initval, InitvalValue, Struct};

use super::check::{check_type, derive_type, SymbolLookup};
use super::scope::ScopeChain;
use super::simplify::simplify;
use crate::common::{CompileError, CompileResult, SemanticErrorKind, Span};
use crate::frontend::ast::*;
use crate::types::ValueType;

/// Walks function bodies and global initializers
///
/// Binds every variable reference through the scope chain, derives and
/// checks expression types, folds constants in place and records the
/// initial values of globals in the container.
pub struct Analyzer<'a> {
    ain: &'a mut Ain,
    scopes: ScopeChain,
}

impl<'a> Analyzer<'a> {
    pub fn new(ain: &'a mut Ain) -> Self {
        Self {
            ain,
            scopes: ScopeChain::new(),
        }
    }

    pub fn scopes(&self) -> &ScopeChain {
        &self.scopes
    }

    /// Analyze the top-level block of a program
    pub fn analyze_program(&mut self, program: &mut Block) -> CompileResult<()> {
        self.analyze_block(program)
    }

    /// Run `f` inside a new block scope, popped again however `f` exits
    fn in_block<T>(&mut self, f: impl FnOnce(&mut Self) -> CompileResult<T>) -> CompileResult<T> {
        let pushed = self.scopes.push_block();
        let result = f(self);
        if pushed {
            self.scopes.pop();
        }
        result
    }

    fn in_function<T>(
        &mut self,
        func_no: usize,
        nr_args: usize,
        f: impl FnOnce(&mut Self) -> CompileResult<T>,
    ) -> CompileResult<T> {
        self.scopes.push_function(func_no, nr_args);
        let result = f(self);
        self.scopes.pop();
        result
    }

    fn analyze_block(&mut self, block: &mut Block) -> CompileResult<()> {
        for item in &mut block.items {
            match item {
                BlockItem::Declaration(decl) => self.analyze_declaration(decl)?,
                BlockItem::Statement(stmt) => self.analyze_statement(stmt)?,
            }
        }
        Ok(())
    }

    fn analyze_nested_block(&mut self, block: &mut Block) -> CompileResult<()> {
        self.in_block(|this| this.analyze_block(block))
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn analyze_declaration(&mut self, decl: &mut Declaration) -> CompileResult<()> {
        match decl {
            Declaration::Function(func) => self.analyze_function(func),
            Declaration::Variable(var) if self.scopes.is_global() => self.analyze_global(var),
            Declaration::Variable(var) => self.analyze_local(var),
        }
    }

    fn analyze_function(&mut self, func: &mut FuncDecl) -> CompileResult<()> {
        // Only top-level functions are numbered
        let Some(func_no) = func.func_no else {
            return Err(CompileError::semantic(
                SemanticErrorKind::NestedFunctionsNotSupported,
                func.span,
            ));
        };
        let Some(nr_args) = self.ain.functions.get(func_no).map(|f| f.nr_args) else {
            return Err(CompileError::semantic(
                SemanticErrorKind::UndefinedFunction(func.name.clone()),
                func.span,
            ));
        };

        log::trace!("analyzing function '{}'", func.name);
        self.in_function(func_no, nr_args, |this| this.analyze_block(&mut func.body))
    }

    fn analyze_global(&mut self, var: &mut VarDecl) -> CompileResult<()> {
        let Some(name) = &var.name else {
            return Ok(());
        };
        let Some(global_no) = var.var_no else {
            return Err(undefined(name, var.span));
        };
        let Some(init) = &mut var.init else {
            return Ok(());
        };

        let Some(expected) = self.ain.globals.get(global_no).map(|g| ValueType::from(g.ty)) else {
            return Err(undefined(name, var.span));
        };
        self.analyze_expression(init)?;
        check_type(init, expected)?;

        let value = match &init.kind {
            ExprKind::IntLiteral(v) => InitvalValue::Int(*v),
            ExprKind::FloatLiteral(v) => InitvalValue::Float(*v),
            ExprKind::StringLiteral(s) => InitvalValue::String(s.clone()),
            _ => {
                return Err(CompileError::semantic(
                    SemanticErrorKind::InitvalNotConstant,
                    init.span,
                ));
            }
        };
        log::debug!("initval for global '{}': {}", name, value);
        self.ain.add_initval(Initval {
            global_index: global_no,
            value,
        });
        Ok(())
    }

    fn analyze_local(&mut self, var: &mut VarDecl) -> CompileResult<()> {
        let Some(name) = &var.name else {
            return Ok(());
        };
        let Some(var_no) = var.var_no else {
            return Err(undefined(name, var.span));
        };

        // The initializer cannot see the variable it initializes
        if let Some(init) = &mut var.init {
            let expected = self.local_type(var_no, var.span)?;
            self.analyze_expression(init)?;
            check_type(init, expected)?;
        }

        self.scopes.declare(self.ain, var_no, var.span)
    }

    fn local_type(&self, var_no: usize, span: Span) -> CompileResult<ValueType> {
        let vars = &self.current_function(span)?.vars;
        vars.get(var_no)
            .map(|v| v.ty.into())
            .ok_or_else(|| CompileError::semantic(SemanticErrorKind::UnknownSlot(var_no), span))
    }

    fn current_function(&self, span: Span) -> CompileResult<&Function> {
        self.scopes
            .func_no()
            .and_then(|no| self.ain.functions.get(no))
            .ok_or_else(|| CompileError::semantic(SemanticErrorKind::NotInFunction, span))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn analyze_statement(&mut self, stmt: &mut Stmt) -> CompileResult<()> {
        match &mut stmt.kind {
            StmtKind::Expr(expr) => self.analyze_expression(expr),
            StmtKind::Compound(block) => self.analyze_nested_block(block),
            StmtKind::If { condition, then_branch, else_branch } => {
                self.analyze_expression(condition)?;
                self.analyze_statement(then_branch)?;
                if let Some(else_branch) = else_branch {
                    self.analyze_statement(else_branch)?;
                }
                Ok(())
            }
            StmtKind::While { condition, body } | StmtKind::DoWhile { body, condition } => {
                self.analyze_expression(condition)?;
                self.analyze_statement(body)
            }
            StmtKind::For { init, condition, update, body } => self.in_block(|this| {
                this.analyze_block(init)?;
                if let Some(condition) = condition {
                    this.analyze_expression(condition)?;
                }
                if let Some(update) = update {
                    this.analyze_expression(update)?;
                }
                this.analyze_statement(body)
            }),
            StmtKind::Switch { expr, body } => {
                self.analyze_expression(expr)?;
                self.analyze_nested_block(body)
            }
            StmtKind::Case { value, stmt } => {
                self.analyze_expression(value)?;
                self.analyze_statement(stmt)
            }
            StmtKind::Default(stmt) | StmtKind::Labeled { stmt, .. } => self.analyze_statement(stmt),
            StmtKind::Return(value) => self.analyze_return(value.as_mut(), stmt.span),
            StmtKind::Empty | StmtKind::Goto(_) | StmtKind::Break | StmtKind::Continue => Ok(()),
        }
    }

    fn analyze_return(&mut self, value: Option<&mut Expr>, span: Span) -> CompileResult<()> {
        let expected = ValueType::from(self.current_function(span)?.return_type);

        match value {
            Some(expr) => {
                self.analyze_expression(expr)?;
                check_type(expr, expected)
            }
            None if expected == ValueType::Void => Ok(()),
            None => Err(CompileError::type_mismatch(expected, ValueType::Void, span)),
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Derive types, then fold the expression in place
    fn analyze_expression(&mut self, expr: &mut Expr) -> CompileResult<()> {
        derive_type(&*self, expr)?;
        *expr = simplify(expr.take());
        Ok(())
    }
}

impl SymbolLookup for Analyzer<'_> {
    fn lookup_variable(&self, name: &str) -> Option<(VarRef, ValueType)> {
        self.scopes
            .lookup(self.ain, name)
            .map(|(binding, var)| (binding, var.ty.into()))
    }

    fn lookup_function(&self, name: &str) -> Option<(usize, &Function)> {
        let no = self.ain.get_function_no(name)?;
        Some((no, &self.ain.functions[no]))
    }

    fn lookup_struct(&self, struct_no: usize) -> Option<&Struct> {
        self.ain.structures.get(struct_no)
    }
}

fn undefined(name: &str, span: Span) -> CompileError {
    CompileError::semantic(SemanticErrorKind::UndefinedIdentifier(name.to_string()), span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parser::Parser;
    use crate::frontend::sema::{process_declarations, resolve_types};
    use pretty_assertions::assert_eq;

    fn prepare(source: &str) -> (Ain, Block) {
        let mut block = Parser::new(source).unwrap().parse().unwrap();
        let mut ain = Ain::new(4);
        resolve_types(&mut ain, &mut block).unwrap();
        process_declarations(&mut ain, &mut block).unwrap();
        (ain, block)
    }

    fn return_expr(block: &Block, func: usize, item: usize) -> &Expr {
        let BlockItem::Declaration(Declaration::Function(f)) = &block.items[func] else {
            panic!("expected function");
        };
        let BlockItem::Statement(Stmt { kind: StmtKind::Return(Some(expr)), .. }) = &f.body.items[item] else {
            panic!("expected return");
        };
        expr
    }

    #[test]
    fn test_scope_chain_unwinds_on_error() {
        let (mut ain, mut block) = prepare("void f(int n) { { { for (;;) { n = \"s\"; } } } }");
        let mut analyzer = Analyzer::new(&mut ain);

        let err = analyzer.analyze_program(&mut block).unwrap_err();
        assert!(matches!(
            err.semantic_kind(),
            Some(SemanticErrorKind::TypeMismatch { .. })
        ));
        assert_eq!(analyzer.scopes().depth(), 0);
    }

    #[test]
    fn test_expressions_are_folded_in_place() {
        let (mut ain, mut block) = prepare("int f() { return 2 * 3 + 1; }");
        Analyzer::new(&mut ain).analyze_program(&mut block).unwrap();

        let expr = return_expr(&block, 0, 0);
        assert_eq!(expr.kind, ExprKind::IntLiteral(7));
        assert_eq!(expr.ty, Some(ValueType::Int));
    }

    #[test]
    fn test_local_initializer_sees_outer_binding() {
        let (mut ain, mut block) = prepare("int x; int f() { int x = x + 1; return x; }");
        Analyzer::new(&mut ain).analyze_program(&mut block).unwrap();

        let BlockItem::Declaration(Declaration::Function(f)) = &block.items[1] else {
            panic!("expected function");
        };
        let BlockItem::Declaration(Declaration::Variable(local)) = &f.body.items[0] else {
            panic!("expected local");
        };
        let ExprKind::Binary { left, .. } = &local.init.as_ref().unwrap().kind else {
            panic!("expected binary");
        };
        assert_eq!(
            left.kind,
            ExprKind::Identifier { name: "x".to_string(), binding: Some(VarRef::Global(0)) }
        );

        let ExprKind::Identifier { binding, .. } = &return_expr(&block, 1, 1).kind else {
            panic!("expected identifier");
        };
        assert_eq!(*binding, Some(VarRef::Local(0)));
    }

    #[test]
    fn test_parameters_bound_from_function_scope() {
        let (mut ain, mut block) = prepare("float f(int a, float b) { return b; }");
        Analyzer::new(&mut ain).analyze_program(&mut block).unwrap();

        let ExprKind::Identifier { binding, .. } = &return_expr(&block, 0, 0).kind else {
            panic!("expected identifier");
        };
        assert_eq!(*binding, Some(VarRef::Local(1)));
    }

    #[test]
    fn test_return_without_value() {
        let (mut ain, mut block) = prepare("int f() { return; }");
        let err = Analyzer::new(&mut ain).analyze_program(&mut block).unwrap_err();
        assert_eq!(
            err.semantic_kind(),
            Some(&SemanticErrorKind::TypeMismatch { expected: ValueType::Int, found: ValueType::Void })
        );

        let (mut ain, mut block) = prepare("void f() { return 1; }");
        let err = Analyzer::new(&mut ain).analyze_program(&mut block).unwrap_err();
        assert_eq!(
            err.semantic_kind(),
            Some(&SemanticErrorKind::TypeMismatch { expected: ValueType::Void, found: ValueType::Int })
        );
    }

    #[test]
    fn test_return_outside_function() {
        let mut ain = Ain::new(4);
        let mut stmt = Stmt::new(StmtKind::Return(Some(Expr::int(1, Span::default()))), Span::default());

        let err = Analyzer::new(&mut ain).analyze_statement(&mut stmt).unwrap_err();
        assert_eq!(err.semantic_kind(), Some(&SemanticErrorKind::NotInFunction));
    }

    #[test]
    fn test_local_with_stale_slot() {
        let (mut ain, mut block) = prepare("void f() { int x = 1; }");
        ain.functions[0].vars.clear();

        let err = Analyzer::new(&mut ain).analyze_program(&mut block).unwrap_err();
        assert_eq!(err.semantic_kind(), Some(&SemanticErrorKind::UnknownSlot(0)));
    }

    #[test]
    fn test_unregistered_function_number() {
        let (mut ain, mut block) = prepare("void f() {}");
        ain.functions.clear();

        let err = Analyzer::new(&mut ain).analyze_program(&mut block).unwrap_err();
        assert_eq!(
            err.semantic_kind(),
            Some(&SemanticErrorKind::UndefinedFunction("f".to_string()))
        );
    }

    #[test]
    fn test_for_init_scoped_to_loop() {
        let (mut ain, mut block) =
            prepare("void f() { for (int i = 0; i < 3; i++) {} i = 1; }");
        let err = Analyzer::new(&mut ain).analyze_program(&mut block).unwrap_err();
        assert_eq!(
            err.semantic_kind(),
            Some(&SemanticErrorKind::UndefinedIdentifier("i".to_string()))
        );
    }
}
