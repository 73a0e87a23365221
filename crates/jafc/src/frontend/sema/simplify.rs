//! Constant folding

use std::cmp::Ordering;

use crate::frontend::ast::*;

/// Fold constant subexpressions, children first
///
/// Returns the expression unchanged where nothing folds. Folded nodes keep
/// the span and type of the node they replace.
pub fn simplify(expr: Expr) -> Expr {
    let Expr { kind, span, ty } = expr;

    let kind = match kind {
        ExprKind::Unary { op, operand } => {
            let operand = simplify(*operand);
            match fold_unary(op, &operand.kind) {
                Some(folded) => folded,
                None => ExprKind::Unary { op, operand: Box::new(operand) },
            }
        }

        ExprKind::Binary { op, left, right } => {
            let left = simplify(*left);
            let right = simplify(*right);
            match fold_binary(op, &left.kind, &right.kind) {
                Some(folded) => folded,
                None => ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            }
        }

        ExprKind::Cast { target, expr: inner } => {
            let inner = simplify(*inner);
            match fold_cast(target, &inner.kind) {
                Some(folded) => folded,
                None => ExprKind::Cast { target, expr: Box::new(inner) },
            }
        }

        ExprKind::Ternary { condition, then_expr, else_expr } => {
            let condition = simplify(*condition);
            let then_expr = simplify(*then_expr);
            let else_expr = simplify(*else_expr);
            match condition.kind {
                ExprKind::IntLiteral(0) => return else_expr,
                ExprKind::IntLiteral(_) => return then_expr,
                _ => ExprKind::Ternary {
                    condition: Box::new(condition),
                    then_expr: Box::new(then_expr),
                    else_expr: Box::new(else_expr),
                },
            }
        }

        ExprKind::Comma(exprs) => {
            let count = exprs.len();
            // Leading literals have no effect
            let mut kept: Vec<Expr> = exprs
                .into_iter()
                .map(simplify)
                .enumerate()
                .filter(|(i, e)| *i + 1 == count || !e.is_literal())
                .map(|(_, e)| e)
                .collect();
            if kept.len() == 1 {
                if let Some(last) = kept.pop() {
                    return last;
                }
            }
            ExprKind::Comma(kept)
        }

        ExprKind::Assign { op, target, value } => ExprKind::Assign {
            op,
            target: Box::new(simplify(*target)),
            value: Box::new(simplify(*value)),
        },

        ExprKind::Call { name, args, func_no } => ExprKind::Call {
            name,
            args: args.into_iter().map(simplify).collect(),
            func_no,
        },

        ExprKind::Member { object, field, member_no } => ExprKind::Member {
            object: Box::new(simplify(*object)),
            field,
            member_no,
        },

        leaf @ (ExprKind::IntLiteral(_)
        | ExprKind::FloatLiteral(_)
        | ExprKind::StringLiteral(_)
        | ExprKind::Identifier { .. }) => leaf,
    };

    Expr { kind, span, ty }
}

fn fold_unary(op: UnaryOp, operand: &ExprKind) -> Option<ExprKind> {
    match (op, operand) {
        (UnaryOp::Neg, ExprKind::IntLiteral(v)) => Some(ExprKind::IntLiteral(v.wrapping_neg())),
        (UnaryOp::Neg, ExprKind::FloatLiteral(v)) => Some(ExprKind::FloatLiteral(-v)),
        (UnaryOp::Not, ExprKind::IntLiteral(v)) => Some(ExprKind::IntLiteral(i32::from(*v == 0))),
        (UnaryOp::BitNot, ExprKind::IntLiteral(v)) => Some(ExprKind::IntLiteral(!v)),
        _ => None,
    }
}

fn fold_binary(op: BinaryOp, left: &ExprKind, right: &ExprKind) -> Option<ExprKind> {
    match (left, right) {
        (ExprKind::IntLiteral(a), ExprKind::IntLiteral(b)) => fold_int(op, *a, *b).map(ExprKind::IntLiteral),
        (ExprKind::StringLiteral(a), ExprKind::StringLiteral(b)) => fold_string(op, a, b),
        _ => {
            let a = float_value(left)?;
            let b = float_value(right)?;
            fold_float(op, a, b)
        }
    }
}

fn fold_int(op: BinaryOp, a: i32, b: i32) -> Option<i32> {
    let value = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div if b != 0 => a.wrapping_div(b),
        BinaryOp::Mod if b != 0 => a.wrapping_rem(b),
        BinaryOp::Div | BinaryOp::Mod => return None,
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitOr => a | b,
        BinaryOp::BitXor => a ^ b,
        BinaryOp::Shl | BinaryOp::Shr => {
            let shift = u32::try_from(b).ok().filter(|s| *s < 32)?;
            if op == BinaryOp::Shl { a << shift } else { a >> shift }
        }
        BinaryOp::LogAnd => i32::from(a != 0 && b != 0),
        BinaryOp::LogOr => i32::from(a != 0 || b != 0),
        _ => i32::from(compare(op, a.cmp(&b))),
    };
    Some(value)
}

fn fold_float(op: BinaryOp, a: f32, b: f32) -> Option<ExprKind> {
    let value = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div if b != 0.0 => a / b,
        _ if op.is_comparison() => {
            let ordering = a.partial_cmp(&b)?;
            return Some(ExprKind::IntLiteral(i32::from(compare(op, ordering))));
        }
        _ => return None,
    };
    Some(ExprKind::FloatLiteral(value))
}

fn fold_string(op: BinaryOp, a: &str, b: &str) -> Option<ExprKind> {
    match op {
        BinaryOp::Add => Some(ExprKind::StringLiteral(format!("{}{}", a, b))),
        _ if op.is_comparison() => Some(ExprKind::IntLiteral(i32::from(compare(op, a.cmp(b))))),
        _ => None,
    }
}

fn compare(op: BinaryOp, ordering: Ordering) -> bool {
    match op {
        BinaryOp::Eq => ordering == Ordering::Equal,
        BinaryOp::Ne => ordering != Ordering::Equal,
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::Le => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::Ge => ordering != Ordering::Less,
        _ => false,
    }
}

fn float_value(kind: &ExprKind) -> Option<f32> {
    match kind {
        ExprKind::IntLiteral(v) => Some(*v as f32),
        ExprKind::FloatLiteral(v) => Some(*v),
        _ => None,
    }
}

fn fold_cast(target: TypeKind, operand: &ExprKind) -> Option<ExprKind> {
    match (target, operand) {
        (TypeKind::Int, ExprKind::IntLiteral(v)) => Some(ExprKind::IntLiteral(*v)),
        (TypeKind::Int, ExprKind::FloatLiteral(v)) => Some(ExprKind::IntLiteral(*v as i32)),
        (TypeKind::Float, ExprKind::IntLiteral(v)) => Some(ExprKind::FloatLiteral(*v as f32)),
        (TypeKind::Float, ExprKind::FloatLiteral(v)) => Some(ExprKind::FloatLiteral(*v)),
        _ => None,
    }
}
