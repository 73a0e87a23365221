//! Semantic analysis for JAF
//!
//! Runs as three passes over the whole program. Each pass completes before
//! the next one starts:
//!
//! 1. type resolution, which also registers struct definitions
//! 2. declaration processing, which numbers functions, globals and locals
//! 3. analysis, which binds names through the scope chain, checks types and
//!    folds constants

mod analyzer;
mod check;
mod decls;
mod resolve;
mod scope;
mod simplify;
mod structs;

pub use analyzer::Analyzer;
pub use check::{check_type, derive_type, SymbolLookup};
pub use decls::process_declarations;
pub use resolve::{resolve_type, resolve_types, to_ain_type};
pub use scope::ScopeChain;
pub use simplify::simplify;
pub use structs::define_struct;

use ain::Ain;

use crate::common::CompileResult;
use crate::frontend::ast::Block;

/// Analyze a parsed program, filling in `ain` and annotating the tree
pub fn analyze(ain: &mut Ain, program: &mut Block) -> CompileResult<()> {
    resolve_types(ain, program)?;
    log::debug!("type resolution done: {} structs", ain.structures.len());

    process_declarations(ain, program)?;
    log::debug!(
        "declarations done: {} functions, {} globals",
        ain.functions.len(),
        ain.globals.len()
    );

    Analyzer::new(ain).analyze_program(program)?;
    log::debug!("analysis done: {} initvals", ain.initvals.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{CompileError, SemanticErrorKind};
    use crate::frontend::parser::Parser;
    use crate::types::ValueType;
    use ain::{AinType, InitvalValue};
    use pretty_assertions::assert_eq;

    fn compile(source: &str) -> CompileResult<Ain> {
        let mut program = Parser::new(source)?.parse()?;
        let mut ain = Ain::new(4);
        analyze(&mut ain, &mut program)?;
        Ok(ain)
    }

    fn error_kind(source: &str) -> SemanticErrorKind {
        match compile(source) {
            Err(CompileError::Semantic { kind, .. }) => kind,
            other => panic!("expected semantic error, got {:?}", other),
        }
    }

    #[test]
    fn test_global_initializer_is_folded() {
        let ain = compile("int x = 1 + 2;").unwrap();

        assert_eq!(ain.globals.len(), 1);
        assert_eq!(ain.globals[0].ty, AinType::INT);
        assert_eq!(ain.initval_for(0), Some(&InitvalValue::Int(3)));
    }

    #[test]
    fn test_global_initializers_of_each_type() {
        let ain = compile("float f = 1.5 * 2; string s = \"a\" + \"b\"; int n;").unwrap();

        assert_eq!(ain.initval_for(0), Some(&InitvalValue::Float(3.0)));
        assert_eq!(ain.initval_for(1), Some(&InitvalValue::String("ab".to_string())));
        assert_eq!(ain.initval_for(2), None);
    }

    #[test]
    fn test_global_initializer_must_be_constant() {
        assert_eq!(error_kind("int a = 1; int b = a;"), SemanticErrorKind::InitvalNotConstant);
    }

    #[test]
    fn test_global_initializer_type_checked() {
        assert_eq!(
            error_kind("int a = \"one\";"),
            SemanticErrorKind::TypeMismatch { expected: ValueType::Int, found: ValueType::String }
        );
    }

    #[test]
    fn test_mutually_referential_structs_through_members() {
        let source = "struct B; struct A { int x; B b; }; struct B { int y; A a; }; \
                      A root; int f() { return root.b.a.b.y; }";
        let ain = compile(source).unwrap();

        assert_eq!(ain.structures.len(), 2);
        assert_eq!(ain.globals[0].ty, AinType::structure(0));
        assert_eq!(ain.functions[0].return_type, AinType::INT);
    }

    #[test]
    fn test_self_referential_struct() {
        let ain = compile("struct S { int a; S next; }; S head; int f() { return head.next.next.a; }")
            .unwrap();

        let s = ain.get_struct("S").unwrap();
        assert_eq!(s.members.len(), 2);
        assert_eq!(s.members[1].ty, AinType::structure(0));
    }

    #[test]
    fn test_struct_defined_once() {
        assert_eq!(
            error_kind("struct S { int a; }; struct S { float b; };"),
            SemanticErrorKind::DuplicateDefinition("S".to_string())
        );
    }

    #[test]
    fn test_anonymous_struct_rejected() {
        assert_eq!(error_kind("struct { int a; } v;"), SemanticErrorKind::AnonymousNotSupported);
    }

    #[test]
    fn test_struct_members_resolved_before_use() {
        let source = r#"
            struct P { int x; float y; };
            float f() { P p; p.x = 1; return p.y; }
            float g() { P p; return p.z; }
        "#;
        assert_eq!(
            error_kind(source),
            SemanticErrorKind::NoSuchMember { struct_name: "P".to_string(), field: "z".to_string() }
        );
    }

    #[test]
    fn test_return_type_mismatch() {
        assert_eq!(
            error_kind("string f(int n) { return n; }"),
            SemanticErrorKind::TypeMismatch { expected: ValueType::String, found: ValueType::Int }
        );
    }

    #[test]
    fn test_nested_function_rejected() {
        assert_eq!(
            error_kind("int g() { void h() {} }"),
            SemanticErrorKind::NestedFunctionsNotSupported
        );
    }

    #[test]
    fn test_inner_block_shadows_and_expires() {
        let shadowing = r#"
            int f() {
                int x = 1;
                { float x = 2.0; x = x * 2; }
                return x;
            }
        "#;
        assert!(compile(shadowing).is_ok());

        let sibling = "void f() { { int y; y = 1; } { y = 2; } }";
        assert_eq!(error_kind(sibling), SemanticErrorKind::UndefinedIdentifier("y".to_string()));
    }

    #[test]
    fn test_redeclaration_in_block() {
        assert_eq!(
            error_kind("void f(int a) { int a; }"),
            SemanticErrorKind::DuplicateSymbol("a".to_string())
        );
    }

    #[test]
    fn test_calls_between_functions() {
        let source = r#"
            int twice(int n) { return n * 2; }
            int main() { return twice(add(1, 2)); }
            int add(int a, int b) { return a + b; }
        "#;
        let ain = compile(source).unwrap();
        assert_eq!(ain.functions.len(), 3);

        assert_eq!(
            error_kind("int f(int a) { return f(); }"),
            SemanticErrorKind::ArgumentCount { name: "f".to_string(), expected: 1, found: 0 }
        );
    }

    #[test]
    fn test_control_flow_statements() {
        let source = r#"
            int count(int n) {
                int total = 0;
                int i;
                for (i = 0; i < n; ++i) {
                    if (i % 2) continue;
                    total += i;
                }
                while (total > 100) total -= 100;
                do { total++; } while (total < 10);
                switch (total) {
                case 10: total = 0; break;
                default: break;
                }
            done:
                return total > 0 ? total : -total;
            }
        "#;
        let ain = compile(source).unwrap();
        assert_eq!(ain.functions[0].nr_vars(), 3);
    }

    #[test]
    fn test_secondary_names_for_new_containers() {
        let mut program = Parser::new("int g; void f(int a) { int b; }").unwrap().parse().unwrap();
        let mut ain = Ain::new(12);
        analyze(&mut ain, &mut program).unwrap();

        assert_eq!(ain.globals[0].name2.as_deref(), Some(""));
        assert!(ain.functions[0].vars.iter().all(|v| v.name2.as_deref() == Some("")));
    }
}
