//! Survey and visualization passes for plot coordinate streams.
//!
//! A host feeds raw coordinate records for one plot into a [`Plothandler`],
//! which parses and validates them against a shared [`Axis`], tracks the
//! extents of coordinates and point meta, and applies the discard or jump
//! policy to points that escape. Once every plot on the axis is finalized,
//! a [`PlotVisualizer`] turns each surveyed sequence into its render-ready
//! form.
//!
//! ```
//! use plotsurvey::{Axis, PlainNumberFormat, Plothandler, PlothandlerConfig, RawRecord};
//!
//! let mut axis = Axis::default();
//! let mut plot = Plothandler::new(PlothandlerConfig::default())?;
//! let records = [RawRecord::xy(1.0, 2.0), RawRecord::xy(3.0, "nan"), RawRecord::xy(5.0, 6.0)];
//! let summary = plotsurvey::survey_plot(&mut axis, &mut plot, records, &PlainNumberFormat)?;
//! assert_eq!(summary.get("filteredcoordsaway"), Some("true"));
//! # Ok::<(), plotsurvey::SurveyError>(())
//! ```

use pest_derive::Parser;

pub mod ast;
pub mod errors;
pub mod log;
pub mod map;
pub mod parse;
pub mod survey;
pub mod types;

pub use ast::Expr;
pub use errors::{EvalError, ExprError, SurveyError};
pub use map::{DatascaleTrafo, LinearMap, PointMetaMap};
pub use parse::parse_expr;
pub use survey::advisory::{Advisory, DropCause};
pub use survey::axis::Axis;
pub use survey::config::{AxisConfig, AxisScale, PlothandlerConfig, PointMetaRel, UnboundedCoords};
pub use survey::context::PointContext;
pub use survey::eval::eval_expr;
pub use survey::filter::{DiscardIf, PointFilter};
pub use survey::hooks::{DefaultHooks, SurveyHooks};
pub use survey::meta::{
    AssignMeta, CoordAssignment, Explicit, ExplicitSymbolic, ExpressionMeta, PointMetaHandler,
};
pub use survey::serialize::{NumberFormat, PlainNumberFormat, SurveySummary, serialize_coords};
pub use survey::visualizer::{JumpHook, NoJumpHook, PlotVisualizer, SegmentCollector};
pub use survey::{Plothandler, SurveyPhase};
pub use types::{Coord, Dir, MetaValue, RawRecord, RawValue};

#[derive(Parser)]
#[grammar = "expr.pest"]
pub struct PointExprParser;

/// Run a complete survey of `records` for one plot and finalize it.
///
/// Starts the survey, surveys every record in order and returns the
/// summary of [`Axis::survey_to_pgfplots`]. The first fatal error aborts
/// the survey.
pub fn survey_plot<H, I>(
    axis: &mut Axis,
    handler: &mut Plothandler<H>,
    records: I,
    fmt: &dyn NumberFormat,
) -> Result<SurveySummary, SurveyError>
where
    H: SurveyHooks,
    I: IntoIterator<Item = RawRecord>,
{
    handler.survey_start()?;
    for raw in records {
        handler.survey_point(axis, raw)?;
    }
    axis.survey_to_pgfplots(handler, fmt)
}
