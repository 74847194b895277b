//! Expression evaluation against a point context

use crate::ast::*;
use crate::errors::EvalError;

use super::context::PointContext;

/// Evaluate `expr` for the point bound in `ctx`.
///
/// Arithmetic follows IEEE rules: dividing by zero or taking the square root
/// of a negative number yields a non-finite result rather than an error.
/// Only identifiers without a value for this point fail.
pub fn eval_expr(ctx: &PointContext, expr: &Expr) -> Result<f64, EvalError> {
    Ok(match expr {
        Expr::Number(n) => *n,
        Expr::Var(var) => ctx
            .resolve(*var)
            .ok_or(EvalError::Unbound { name: var.name() })?,
        Expr::ParenExpr(e) => eval_expr(ctx, e)?,
        Expr::UnaryOp(op, e) => {
            let v = eval_expr(ctx, e)?;
            match op {
                UnaryOp::Neg => -v,
                UnaryOp::Pos => v,
            }
        }
        Expr::BinaryOp(lhs, op, rhs) => {
            let a = eval_expr(ctx, lhs)?;
            let b = eval_expr(ctx, rhs)?;
            match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                BinaryOp::Pow => a.powf(b),
            }
        }
        Expr::FuncCall(fc) => {
            if fc.args.len() != fc.func.arity() {
                return Err(EvalError::Arity {
                    name: fc.func.name(),
                    expected: fc.func.arity(),
                    got: fc.args.len(),
                });
            }
            let args = fc
                .args
                .iter()
                .map(|a| eval_expr(ctx, a))
                .collect::<Result<Vec<f64>, _>>()?;
            match fc.func {
                Function::Abs => args[0].abs(),
                Function::Cos => args[0].to_radians().cos(),
                Function::Sin => args[0].to_radians().sin(),
                Function::Int => args[0].trunc(),
                Function::Sqrt => args[0].sqrt(),
                Function::Ln => args[0].ln(),
                Function::Exp => args[0].exp(),
                Function::Max => args[0].max(args[1]),
                Function::Min => args[0].min(args[1]),
            }
        }
    })
}
