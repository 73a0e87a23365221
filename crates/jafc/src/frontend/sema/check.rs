//! Expression type derivation and checking

use ain::{Function, Struct};

use crate::common::{CompileError, CompileResult, SemanticErrorKind, Span};
use crate::frontend::ast::*;
use crate::types::ValueType;

/// Name resolution needed while deriving expression types
pub trait SymbolLookup {
    /// Variable visible under `name`, with its type
    fn lookup_variable(&self, name: &str) -> Option<(VarRef, ValueType)>;

    /// Function table entry for `name`
    fn lookup_function(&self, name: &str) -> Option<(usize, &Function)>;

    fn lookup_struct(&self, struct_no: usize) -> Option<&Struct>;
}

/// Derive the type of an expression bottom-up
///
/// Records the type on every node it visits, along with variable bindings,
/// function indices and member indices.
pub fn derive_type<L: SymbolLookup + ?Sized>(lookup: &L, expr: &mut Expr) -> CompileResult<ValueType> {
    let span = expr.span;

    let ty = match &mut expr.kind {
        ExprKind::IntLiteral(_) => ValueType::Int,
        ExprKind::FloatLiteral(_) => ValueType::Float,
        ExprKind::StringLiteral(_) => ValueType::String,

        ExprKind::Identifier { name, binding } => {
            let Some((var, ty)) = lookup.lookup_variable(name) else {
                return Err(CompileError::semantic(
                    SemanticErrorKind::UndefinedIdentifier(name.clone()),
                    span,
                ));
            };
            *binding = Some(var);
            ty
        }

        ExprKind::Unary { op, operand } => derive_unary(lookup, *op, operand, span)?,

        ExprKind::Binary { op, left, right } => {
            let left_ty = derive_type(lookup, left)?;
            let right_ty = derive_type(lookup, right)?;
            binary_result(*op, left_ty, right_ty, span)?
        }

        ExprKind::Assign { op, target, value } => {
            let target_ty = derive_type(lookup, target)?;
            if !is_assignable(target) {
                return Err(CompileError::semantic(SemanticErrorKind::NotAssignable, target.span));
            }
            let value_ty = derive_type(lookup, value)?;
            let result = match op.to_binary_op() {
                Some(bin) => binary_result(bin, target_ty, value_ty, span)?,
                None => value_ty,
            };
            if result != target_ty {
                return Err(CompileError::type_mismatch(target_ty, result, value.span));
            }
            target_ty
        }

        ExprKind::Ternary { condition, then_expr, else_expr } => {
            let cond_ty = derive_type(lookup, condition)?;
            if !cond_ty.is_int() {
                return Err(invalid_operand("?:", cond_ty, condition.span));
            }
            let then_ty = derive_type(lookup, then_expr)?;
            let else_ty = derive_type(lookup, else_expr)?;
            if then_ty != else_ty {
                return Err(CompileError::type_mismatch(then_ty, else_ty, else_expr.span));
            }
            then_ty
        }

        ExprKind::Call { name, args, func_no } => {
            let Some((no, function)) = lookup.lookup_function(name) else {
                return Err(CompileError::semantic(
                    SemanticErrorKind::UndefinedFunction(name.clone()),
                    span,
                ));
            };
            let params: Vec<ValueType> = function.params().iter().map(|v| v.ty.into()).collect();
            let return_ty = ValueType::from(function.return_type);

            if args.len() != params.len() {
                return Err(CompileError::semantic(
                    SemanticErrorKind::ArgumentCount {
                        name: name.clone(),
                        expected: params.len(),
                        found: args.len(),
                    },
                    span,
                ));
            }
            for (arg, &param_ty) in args.iter_mut().zip(&params) {
                derive_type(lookup, arg)?;
                check_type(arg, param_ty)?;
            }

            *func_no = Some(no);
            return_ty
        }

        ExprKind::Cast { target, expr: inner } => {
            let inner_ty = derive_type(lookup, inner)?;
            if !inner_ty.is_numeric() {
                return Err(invalid_operand("cast", inner_ty, inner.span));
            }
            match target {
                TypeKind::Int => ValueType::Int,
                TypeKind::Float => ValueType::Float,
                other => {
                    return Err(CompileError::semantic(
                        SemanticErrorKind::UnsupportedType(other.as_str().to_string()),
                        span,
                    ));
                }
            }
        }

        ExprKind::Member { object, field, member_no } => {
            let object_ty = derive_type(lookup, object)?;
            let ValueType::Struct(struct_no) = object_ty else {
                return Err(CompileError::semantic(
                    SemanticErrorKind::NotAStruct(object_ty),
                    object.span,
                ));
            };
            let Some(structure) = lookup.lookup_struct(struct_no) else {
                return Err(CompileError::semantic(
                    SemanticErrorKind::NotAStruct(object_ty),
                    object.span,
                ));
            };
            let Some((index, member)) = structure.member(field) else {
                return Err(CompileError::semantic(
                    SemanticErrorKind::NoSuchMember {
                        struct_name: structure.name.clone(),
                        field: field.clone(),
                    },
                    span,
                ));
            };
            *member_no = Some(index);
            member.ty.into()
        }

        ExprKind::Comma(exprs) => {
            let mut last = ValueType::Void;
            for e in exprs.iter_mut() {
                last = derive_type(lookup, e)?;
            }
            last
        }
    };

    expr.ty = Some(ty);
    Ok(ty)
}

fn derive_unary<L: SymbolLookup + ?Sized>(
    lookup: &L,
    op: UnaryOp,
    operand: &mut Expr,
    span: Span,
) -> CompileResult<ValueType> {
    let ty = derive_type(lookup, operand)?;

    match op {
        UnaryOp::Neg if ty.is_numeric() => Ok(ty),
        UnaryOp::Not | UnaryOp::BitNot if ty.is_int() => Ok(ty),
        _ if op.is_increment() => {
            if !is_assignable(operand) {
                return Err(CompileError::semantic(SemanticErrorKind::NotAssignable, span));
            }
            if !ty.is_int() {
                return Err(invalid_operand(op.as_str(), ty, operand.span));
            }
            Ok(ty)
        }
        _ => Err(invalid_operand(op.as_str(), ty, operand.span)),
    }
}

/// Result type of a binary operator applied to the given operand types
fn binary_result(op: BinaryOp, left: ValueType, right: ValueType, span: Span) -> CompileResult<ValueType> {
    let numeric = left.is_numeric() && right.is_numeric();
    let strings = left == ValueType::String && right == ValueType::String;

    let ok = if op.is_arithmetic() {
        if numeric {
            let promoted = if left == ValueType::Float || right == ValueType::Float {
                ValueType::Float
            } else {
                ValueType::Int
            };
            return Ok(promoted);
        }
        strings && op == BinaryOp::Add
    } else if op.is_comparison() {
        numeric || strings
    } else {
        // Integer-only and logical operators
        left.is_int() && right.is_int()
    };

    if ok {
        return Ok(if strings && !op.is_comparison() {
            ValueType::String
        } else {
            ValueType::Int
        });
    }

    let offending = if op.is_arithmetic() || op.is_comparison() {
        if left.is_numeric() || (left == ValueType::String && !right.is_numeric()) {
            right
        } else {
            left
        }
    } else if left.is_int() {
        right
    } else {
        left
    };
    Err(invalid_operand(op.as_str(), offending, span))
}

fn is_assignable(expr: &Expr) -> bool {
    matches!(expr.kind, ExprKind::Identifier { .. } | ExprKind::Member { .. })
}

fn invalid_operand(op: &'static str, ty: ValueType, span: Span) -> CompileError {
    CompileError::semantic(SemanticErrorKind::InvalidOperand { op, ty }, span)
}

/// Require an analyzed expression to have exactly the expected type
pub fn check_type(expr: &Expr, expected: ValueType) -> CompileResult<()> {
    let found = expr.ty.unwrap_or(ValueType::Void);
    if found == expected {
        Ok(())
    } else {
        Err(CompileError::type_mismatch(expected, found, expr.span))
    }
}
