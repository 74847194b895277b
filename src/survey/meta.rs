//! Point meta strategies
//!
//! Each strategy derives a point's meta value during the survey. The set is
//! closed; dispatch goes through [`PointMetaHandler`].

use enum_dispatch::enum_dispatch;

use crate::ast::Expr;
use crate::errors::{ExprError, SurveyError};
use crate::parse::parse_expr;
use crate::types::{Coord, Dir, MetaValue, RawValue};

use super::context::PointContext;
use super::eval::eval_expr;

/// Common behavior of the point meta strategies
#[enum_dispatch]
pub trait AssignMeta {
    /// Set `pt.meta` if it is still unset. Never overwrites an assigned meta.
    fn assign(&self, pt: &mut Coord) -> Result<(), SurveyError>;

    /// Symbolic meta is excluded from limits and from normalization
    fn is_symbolic(&self) -> bool {
        false
    }

    /// Whether the strategy reads a separate meta field of the input record
    fn explicit_input(&self) -> bool {
        false
    }
}

/// Meta taken from one coordinate of the point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordAssignment {
    pub dir: Dir,
}

impl CoordAssignment {
    pub fn new(dir: Dir) -> Self {
        Self { dir }
    }
}

impl AssignMeta for CoordAssignment {
    fn assign(&self, pt: &mut Coord) -> Result<(), SurveyError> {
        if pt.meta.is_none() {
            pt.meta = pt.get(self.dir).map(MetaValue::Number);
        }
        Ok(())
    }
}

/// Meta parsed from the record's explicit meta field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Explicit;

impl AssignMeta for Explicit {
    fn assign(&self, pt: &mut Coord) -> Result<(), SurveyError> {
        if pt.meta.is_some() {
            return Ok(());
        }
        let Some(raw) = pt.unfiltered.as_ref().and_then(|u| u.meta.as_ref()) else {
            return Ok(());
        };
        let value = raw
            .to_number()
            .ok_or_else(|| SurveyError::UnparsedMeta {
                value: raw.to_string(),
            })?;
        pt.meta = Some(MetaValue::Number(value));
        Ok(())
    }

    fn explicit_input(&self) -> bool {
        true
    }
}

/// The record's explicit meta field, kept verbatim as a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExplicitSymbolic;

impl AssignMeta for ExplicitSymbolic {
    fn assign(&self, pt: &mut Coord) -> Result<(), SurveyError> {
        if pt.meta.is_some() {
            return Ok(());
        }
        if let Some(raw) = pt.unfiltered.as_ref().and_then(|u| u.meta.as_ref()) {
            let text = match raw {
                RawValue::Text(s) => s.trim().to_string(),
                RawValue::Number(n) => n.to_string(),
            };
            pt.meta = Some(MetaValue::Symbolic(text));
        }
        Ok(())
    }

    fn is_symbolic(&self) -> bool {
        true
    }

    fn explicit_input(&self) -> bool {
        true
    }
}

/// Meta computed by an expression over the in-flight point
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionMeta {
    expr: Expr,
}

impl ExpressionMeta {
    pub fn new(expr: Expr) -> Self {
        Self { expr }
    }

    pub fn parse(source: &str) -> Result<Self, ExprError> {
        Ok(Self::new(parse_expr(source)?))
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

impl AssignMeta for ExpressionMeta {
    fn assign(&self, pt: &mut Coord) -> Result<(), SurveyError> {
        if pt.meta.is_some() {
            return Ok(());
        }
        let ctx = PointContext::for_point(pt);
        let value = eval_expr(&ctx, &self.expr).map_err(|e| SurveyError::RejectedExpression {
            expr: self.expr.to_string(),
            reason: e.to_string(),
        })?;
        pt.meta = Some(MetaValue::Number(value));
        Ok(())
    }
}

/// How a plot derives its point meta
#[enum_dispatch(AssignMeta)]
#[derive(Debug, Clone, PartialEq)]
pub enum PointMetaHandler {
    CoordAssignment(CoordAssignment),
    Explicit(Explicit),
    ExplicitSymbolic(ExplicitSymbolic),
    Expression(ExpressionMeta),
}

impl PointMetaHandler {
    /// Meta from the coordinate in direction `dir` (1, 2 or 3)
    pub fn coord(dir: u8) -> Result<Self, SurveyError> {
        Ok(CoordAssignment::new(Dir::from_number(dir)?).into())
    }

    pub fn expression(source: &str) -> Result<Self, ExprError> {
        Ok(ExpressionMeta::parse(source)?.into())
    }
}
