//! Coordinate filters
//!
//! A filter removes points that parsed fine. Filtered points carry no
//! unbounded direction, so they are always discarded, even under the jump
//! policy.

use crate::ast::Expr;
use crate::errors::{EvalError, ExprError};
use crate::parse::parse_expr;

use super::context::PointContext;
use super::eval::eval_expr;

/// Decides whether a valid point is removed from the plot
pub trait PointFilter {
    /// `true` removes the point
    fn discard(&self, ctx: &PointContext) -> Result<bool, EvalError>;

    /// Human-readable form used in error reports
    fn describe(&self) -> String {
        "coordinate filter".to_string()
    }
}

impl<F> PointFilter for F
where
    F: Fn(&PointContext) -> bool,
{
    fn discard(&self, ctx: &PointContext) -> Result<bool, EvalError> {
        Ok(self(ctx))
    }
}

/// Removes points for which the expression is non-zero (NaN counts as
/// non-zero)
#[derive(Debug, Clone, PartialEq)]
pub struct DiscardIf {
    expr: Expr,
}

impl DiscardIf {
    pub fn new(expr: Expr) -> Self {
        Self { expr }
    }

    pub fn parse(source: &str) -> Result<Self, ExprError> {
        Ok(Self::new(parse_expr(source)?))
    }
}

impl PointFilter for DiscardIf {
    fn discard(&self, ctx: &PointContext) -> Result<bool, EvalError> {
        Ok(eval_expr(ctx, &self.expr)? != 0.0)
    }

    fn describe(&self) -> String {
        self.expr.to_string()
    }
}
