//! Type resolution
//!
//! Runs in two walks over every declaration in the program, however deeply
//! nested. The first registers each struct definition in source order, so
//! a struct name is known everywhere before any member list is resolved and
//! structs may refer to each other in either order. The second turns named
//! type references into struct indices and writes member lists to the
//! struct table.

use ain::{Ain, AinType};

use super::structs::define_struct;
use crate::common::{CompileError, CompileResult, SemanticErrorKind};
use crate::frontend::ast::*;

/// Resolve every type specifier in a block
pub fn resolve_types(ain: &mut Ain, block: &mut Block) -> CompileResult<()> {
    for_each_type(block, &mut |ty: &mut TypeSpecifier| {
        if ty.is_undefined_struct_def() {
            define_struct(ain, ty)?;
        }
        Ok(())
    })?;
    for_each_type(block, &mut |ty: &mut TypeSpecifier| resolve_type(ain, ty))
}

/// Visit the type of every declaration in a block, in source order
///
/// Forward declarations such as `struct B;` are skipped.
fn for_each_type<F>(block: &mut Block, f: &mut F) -> CompileResult<()>
where
    F: FnMut(&mut TypeSpecifier) -> CompileResult<()>,
{
    for item in &mut block.items {
        match item {
            BlockItem::Declaration(Declaration::Variable(var)) => {
                if !var.is_forward_declaration() {
                    f(&mut var.ty)?;
                }
            }
            BlockItem::Declaration(Declaration::Function(func)) => {
                f(&mut func.return_type)?;
                for param in &mut func.params {
                    f(&mut param.ty)?;
                }
                for_each_type(&mut func.body, f)?;
            }
            BlockItem::Statement(stmt) => for_each_type_in_statement(stmt, f)?,
        }
    }
    Ok(())
}

fn for_each_type_in_statement<F>(stmt: &mut Stmt, f: &mut F) -> CompileResult<()>
where
    F: FnMut(&mut TypeSpecifier) -> CompileResult<()>,
{
    match &mut stmt.kind {
        StmtKind::Compound(block) | StmtKind::Switch { body: block, .. } => for_each_type(block, f),
        StmtKind::If { then_branch, else_branch, .. } => {
            for_each_type_in_statement(then_branch, f)?;
            if let Some(else_branch) = else_branch {
                for_each_type_in_statement(else_branch, f)?;
            }
            Ok(())
        }
        StmtKind::While { body, .. } | StmtKind::DoWhile { body, .. } => {
            for_each_type_in_statement(body, f)
        }
        StmtKind::For { init, body, .. } => {
            for_each_type(init, f)?;
            for_each_type_in_statement(body, f)
        }
        StmtKind::Case { stmt, .. } | StmtKind::Default(stmt) | StmtKind::Labeled { stmt, .. } => {
            for_each_type_in_statement(stmt, f)
        }
        StmtKind::Expr(_)
        | StmtKind::Empty
        | StmtKind::Goto(_)
        | StmtKind::Break
        | StmtKind::Continue
        | StmtKind::Return(_) => Ok(()),
    }
}

/// Resolve a single type specifier in place
pub fn resolve_type(ain: &mut Ain, ty: &mut TypeSpecifier) -> CompileResult<()> {
    match ty.kind {
        TypeKind::Typedef => resolve_typedef(ain, ty),
        TypeKind::Struct if ty.members.is_some() => resolve_struct_body(ain, ty),
        TypeKind::Enum => Err(CompileError::semantic(
            SemanticErrorKind::UnsupportedType(TypeKind::Enum.as_str().to_string()),
            ty.span,
        )),
        _ => Ok(()),
    }
}

fn resolve_typedef(ain: &Ain, ty: &mut TypeSpecifier) -> CompileResult<()> {
    let name = ty.name.clone().unwrap_or_default();
    let Some(struct_no) = ain.get_struct_no(&name) else {
        return Err(CompileError::semantic(
            SemanticErrorKind::UnresolvedTypedef(name),
            ty.span,
        ));
    };
    ty.kind = TypeKind::Struct;
    ty.struct_no = Some(struct_no);
    Ok(())
}

fn resolve_struct_body(ain: &mut Ain, ty: &mut TypeSpecifier) -> CompileResult<()> {
    let struct_no = match ty.struct_no {
        Some(no) => no,
        None => define_struct(ain, ty)?,
    };

    let Some(members) = &mut ty.members else {
        return Ok(());
    };
    let mut vars = Vec::with_capacity(members.len());
    for member in members.iter_mut() {
        if member.is_forward_declaration() {
            continue;
        }
        resolve_type(ain, &mut member.ty)?;
        // Type-only member declarations introduce a type, not a member
        if let Some(name) = &member.name {
            vars.push(ain.make_variable(name.as_str(), to_ain_type(&member.ty)?));
        }
    }

    log::trace!("struct #{} has {} members", struct_no, vars.len());
    ain.structures[struct_no].members = vars;
    Ok(())
}

/// Encode a resolved type specifier for the container
pub fn to_ain_type(ty: &TypeSpecifier) -> CompileResult<AinType> {
    match ty.kind {
        TypeKind::Void => Ok(AinType::VOID),
        TypeKind::Int => Ok(AinType::INT),
        TypeKind::Float => Ok(AinType::FLOAT),
        TypeKind::String => Ok(AinType::STRING),
        TypeKind::Struct | TypeKind::Typedef => match (ty.kind, ty.struct_no) {
            (TypeKind::Struct, Some(no)) => Ok(AinType::structure(no)),
            _ => Err(CompileError::semantic(
                SemanticErrorKind::UnresolvedTypedef(ty.name.clone().unwrap_or_default()),
                ty.span,
            )),
        },
        TypeKind::Enum => Err(CompileError::semantic(
            SemanticErrorKind::UnsupportedType(TypeKind::Enum.as_str().to_string()),
            ty.span,
        )),
    }
}
