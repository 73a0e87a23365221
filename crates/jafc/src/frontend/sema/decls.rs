//! Declaration processing
//!
//! Registers top-level functions and globals in the container and numbers
//! every variable slot. Slots are handed out in declaration order: a
//! function's parameters first, then each local in the order it appears in
//! the body, nested blocks included.

use ain::{Ain, Function, Variable};

use super::resolve::to_ain_type;
use crate::common::{CompileError, CompileResult, SemanticErrorKind};
use crate::frontend::ast::*;

/// Register every named top-level declaration
pub fn process_declarations(ain: &mut Ain, block: &mut Block) -> CompileResult<()> {
    for item in &mut block.items {
        let BlockItem::Declaration(decl) = item else {
            continue;
        };
        match decl {
            Declaration::Function(func) => add_function(ain, func)?,
            Declaration::Variable(var) => add_global(ain, var)?,
        }
    }
    Ok(())
}

fn add_function(ain: &mut Ain, func: &mut FuncDecl) -> CompileResult<()> {
    if ain.get_function_no(&func.name).is_some() {
        return Err(CompileError::semantic(
            SemanticErrorKind::DuplicateSymbol(func.name.clone()),
            func.span,
        ));
    }

    let mut function = Function::new(func.name.as_str(), to_ain_type(&func.return_type)?);

    for param in &mut func.params {
        let Some(name) = &param.name else {
            return Err(CompileError::semantic(
                SemanticErrorKind::UnnamedParameter,
                param.span,
            ));
        };
        param.var_no = Some(function.vars.len());
        function.vars.push(ain.make_variable(name.as_str(), to_ain_type(&param.ty)?));
    }
    function.nr_args = function.vars.len();

    collect_locals(ain, &mut function.vars, &mut func.body)?;

    let func_no = ain.add_function(function);
    func.func_no = Some(func_no);
    log::debug!(
        "function '{}' -> #{} ({} vars)",
        func.name,
        func_no,
        ain.functions[func_no].nr_vars()
    );
    Ok(())
}

fn add_global(ain: &mut Ain, var: &mut VarDecl) -> CompileResult<()> {
    // Type-only declarations have nothing to register
    let Some(name) = &var.name else {
        return Ok(());
    };
    if ain.get_global_no(name).is_some() {
        return Err(CompileError::semantic(
            SemanticErrorKind::DuplicateSymbol(name.clone()),
            var.span,
        ));
    }

    let global_no = ain.add_global(name.as_str(), to_ain_type(&var.ty)?);
    var.var_no = Some(global_no);
    log::debug!("global '{}' -> #{}", name, global_no);
    Ok(())
}

fn collect_locals(ain: &Ain, vars: &mut Vec<Variable>, block: &mut Block) -> CompileResult<()> {
    for item in &mut block.items {
        match item {
            BlockItem::Declaration(Declaration::Variable(var)) => {
                if let Some(name) = &var.name {
                    var.var_no = Some(vars.len());
                    vars.push(ain.make_variable(name.as_str(), to_ain_type(&var.ty)?));
                }
            }
            BlockItem::Declaration(Declaration::Function(func)) => {
                return Err(CompileError::semantic(
                    SemanticErrorKind::NestedFunctionsNotSupported,
                    func.span,
                ));
            }
            BlockItem::Statement(stmt) => collect_in_statement(ain, vars, stmt)?,
        }
    }
    Ok(())
}

fn collect_in_statement(ain: &Ain, vars: &mut Vec<Variable>, stmt: &mut Stmt) -> CompileResult<()> {
    match &mut stmt.kind {
        StmtKind::Compound(block) | StmtKind::Switch { body: block, .. } => {
            collect_locals(ain, vars, block)
        }
        StmtKind::If { then_branch, else_branch, .. } => {
            collect_in_statement(ain, vars, then_branch)?;
            if let Some(else_branch) = else_branch {
                collect_in_statement(ain, vars, else_branch)?;
            }
            Ok(())
        }
        StmtKind::While { body, .. } | StmtKind::DoWhile { body, .. } => {
            collect_in_statement(ain, vars, body)
        }
        StmtKind::For { init, body, .. } => {
            collect_locals(ain, vars, init)?;
            collect_in_statement(ain, vars, body)
        }
        StmtKind::Case { stmt, .. } | StmtKind::Default(stmt) | StmtKind::Labeled { stmt, .. } => {
            collect_in_statement(ain, vars, stmt)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parser::Parser;
    use crate::frontend::sema::resolve_types;
    use ain::AinType;
    use pretty_assertions::assert_eq;

    fn process(source: &str) -> CompileResult<(Ain, Block)> {
        let mut block = Parser::new(source)?.parse()?;
        let mut ain = Ain::new(4);
        resolve_types(&mut ain, &mut block)?;
        process_declarations(&mut ain, &mut block)?;
        Ok((ain, block))
    }

    fn var_names(ain: &Ain, func_no: usize) -> Vec<&str> {
        ain.functions[func_no].vars.iter().map(|v| v.name.as_str()).collect()
    }

    #[test]
    fn test_slots_follow_declaration_order() {
        let source = r#"
            int f(int a, float b) {
                int c;
                if (a) { string d; } else { int e; }
                for (int i = 0; i < a; i++) { float g; }
                switch (a) { case 1: { int h; } }
                return c;
            }
        "#;
        let (ain, block) = process(source).unwrap();

        assert_eq!(var_names(&ain, 0), vec!["a", "b", "c", "d", "e", "i", "g", "h"]);
        let f = &ain.functions[0];
        assert_eq!(f.nr_args, 2);
        assert_eq!(f.vars[1].ty, AinType::FLOAT);
        assert_eq!(f.vars[3].ty, AinType::STRING);

        let BlockItem::Declaration(Declaration::Function(func)) = &block.items[0] else {
            panic!("expected function");
        };
        assert_eq!(func.func_no, Some(0));
        assert_eq!(func.params[1].var_no, Some(1));
        let BlockItem::Declaration(Declaration::Variable(c)) = &func.body.items[0] else {
            panic!("expected local");
        };
        assert_eq!(c.var_no, Some(2));
    }

    #[test]
    fn test_globals_and_functions_are_numbered() {
        let (ain, block) = process("int x; void f() {} float y; void g() {}").unwrap();

        assert_eq!(ain.get_global_no("y"), Some(1));
        assert_eq!(ain.get_function_no("g"), Some(1));
        let BlockItem::Declaration(Declaration::Variable(y)) = &block.items[2] else {
            panic!("expected global");
        };
        assert_eq!(y.var_no, Some(1));
    }

    #[test]
    fn test_type_only_declaration_is_skipped() {
        let (ain, _) = process("struct S { int a; }; S s;").unwrap();
        assert_eq!(ain.globals.len(), 1);
        assert_eq!(ain.globals[0].ty, AinType::structure(0));
    }

    #[test]
    fn test_nested_function_rejected_at_any_depth() {
        for source in [
            "int g() { void h() {} }",
            "int g() { if (1) { while (1) { void h() {} } } }",
            "void g() { for (;;) { switch (1) { default: { int h() { return 0; } } } } }",
        ] {
            let err = process(source).unwrap_err();
            assert_eq!(
                err.semantic_kind(),
                Some(&SemanticErrorKind::NestedFunctionsNotSupported),
                "{}",
                source
            );
        }
    }

    #[test]
    fn test_unnamed_parameter() {
        let err = process("void f(int) {}").unwrap_err();
        assert_eq!(err.semantic_kind(), Some(&SemanticErrorKind::UnnamedParameter));
    }

    #[test]
    fn test_duplicate_symbols() {
        let err = process("void f() {} int f() { return 0; }").unwrap_err();
        assert_eq!(
            err.semantic_kind(),
            Some(&SemanticErrorKind::DuplicateSymbol("f".to_string()))
        );

        let err = process("int x; float x;").unwrap_err();
        assert_eq!(
            err.semantic_kind(),
            Some(&SemanticErrorKind::DuplicateSymbol("x".to_string()))
        );
    }
}
