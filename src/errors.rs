//! Error types with rich diagnostics using miette
//!
//! Survey errors are fatal for the plot being surveyed. Expression errors
//! carry source spans so a malformed point meta expression renders with a
//! labelled snippet.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::survey::SurveyPhase;

/// Name under which expression sources are reported
pub const EXPR_SOURCE_NAME: &str = "<point meta expression>";

pub(crate) fn expr_source(source: &str) -> NamedSource<String> {
    NamedSource::new(EXPR_SOURCE_NAME, source.to_string())
}

// ============================================================================
// Survey Errors
// ============================================================================

/// Fatal errors raised while surveying or visualizing a plot
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum SurveyError {
    #[error("missing required argument: {what}")]
    #[diagnostic(code(plotsurvey::survey::missing_argument))]
    MissingArgument { what: &'static str },

    #[error("invalid domain [{min}, {max}]")]
    #[diagnostic(
        code(plotsurvey::survey::invalid_domain),
        help("the input interval of a linear map needs min < max")
    )]
    InvalidDomain { min: f64, max: f64 },

    #[error("got unparsed point meta: {value}")]
    #[diagnostic(
        code(plotsurvey::survey::unparsed_meta),
        help("numeric point meta handlers need numeric input; use a symbolic handler for text")
    )]
    UnparsedMeta { value: String },

    #[error("expression `{expr}` produced no usable value: {reason}")]
    #[diagnostic(code(plotsurvey::survey::rejected_expression))]
    RejectedExpression { expr: String, reason: String },

    #[error("{operation} is not allowed in the {phase} phase")]
    #[diagnostic(
        code(plotsurvey::survey::phase_violation),
        help("phases run in order: survey_start, survey_point*, survey_end, visualization_phase_init")
    )]
    PhaseViolation {
        operation: &'static str,
        phase: SurveyPhase,
    },

    #[error("invalid axis direction {dir}")]
    #[diagnostic(
        code(plotsurvey::survey::invalid_direction),
        help("directions are numbered 1 (x), 2 (y) and 3 (z)")
    )]
    InvalidDirection { dir: u8 },
}

// ============================================================================
// Expression Errors
// ============================================================================

/// Errors that occur while parsing a point meta or filter expression
#[derive(Error, Diagnostic, Debug)]
pub enum ExprError {
    #[error("invalid expression syntax")]
    #[diagnostic(code(plotsurvey::expr::syntax))]
    Syntax {
        #[source_code]
        src: NamedSource<String>,
        #[label("expected {expected}")]
        span: SourceSpan,
        expected: String,
    },

    #[error("unknown identifier: {name}")]
    #[diagnostic(
        code(plotsurvey::expr::unknown_identifier),
        help("available identifiers are x, y, z, rawx, rawy, rawz and meta")
    )]
    UnknownIdentifier {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a point identifier")]
        span: SourceSpan,
    },

    #[error("unknown function: {name}")]
    #[diagnostic(code(plotsurvey::expr::unknown_function))]
    UnknownFunction {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not defined")]
        span: SourceSpan,
    },

    #[error("{name} expects {expected} argument(s), got {got}")]
    #[diagnostic(code(plotsurvey::expr::arity))]
    Arity {
        name: &'static str,
        expected: usize,
        got: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("called here")]
        span: SourceSpan,
    },

    #[error("invalid number: {message}")]
    #[diagnostic(code(plotsurvey::expr::invalid_number))]
    InvalidNumber {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid number")]
        span: SourceSpan,
    },
}

// ============================================================================
// Evaluation Errors
// ============================================================================

/// Errors that occur while evaluating an expression against one point
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("`{name}` has no value for the current point")]
    #[diagnostic(code(plotsurvey::eval::unbound))]
    Unbound { name: &'static str },

    #[error("{name} expects {expected} argument(s), got {got}")]
    #[diagnostic(code(plotsurvey::eval::arity))]
    Arity {
        name: &'static str,
        expected: usize,
        got: usize,
    },
}
