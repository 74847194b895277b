//! Point-scoped evaluation context
//!
//! Expressions never see global state: each evaluation receives the context
//! of exactly one in-flight point, built right before the evaluation.

use crate::ast::PointVar;
use crate::types::{Coord, Dir, RawValue};

/// Values the point identifiers resolve to for one point
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointContext {
    /// Parsed coordinates (`x`, `y`, `z`)
    pub x: [Option<f64>; 3],
    /// Numbers read from the unfiltered record (`rawx`, `rawy`, `rawz`)
    pub raw: [Option<f64>; 3],
    /// Raw meta input (`meta`)
    pub meta: Option<f64>,
}

impl PointContext {
    /// Bind the identifiers to `pt` and its unfiltered record
    pub fn for_point(pt: &Coord) -> Self {
        let mut ctx = PointContext {
            x: pt.x,
            ..PointContext::default()
        };
        if let Some(raw) = &pt.unfiltered {
            for dir in Dir::ALL {
                ctx.raw[dir.index()] = raw.number(dir);
            }
            ctx.meta = raw.meta.as_ref().and_then(RawValue::to_number);
        }
        ctx
    }

    pub fn resolve(&self, var: PointVar) -> Option<f64> {
        match var {
            PointVar::X => self.x[0],
            PointVar::Y => self.x[1],
            PointVar::Z => self.x[2],
            PointVar::RawX => self.raw[0],
            PointVar::RawY => self.raw[1],
            PointVar::RawZ => self.raw[2],
            PointVar::Meta => self.meta,
        }
    }
}
