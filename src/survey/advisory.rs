//! Advisories: recoverable conditions reported while processing continues.
//!
//! Each advisory is logged at `warn` level and kept on the object that raised
//! it, so hosts can relay them without installing a tracing subscriber.

use std::fmt;

use crate::log::warn;
use crate::types::Dir;

/// Why a point was removed from the surveyed sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropCause {
    /// The coordinate in this direction was unbounded or unparsable
    Unbounded(Dir),
    /// A coordinate filter rejected the point
    Filter,
}

/// A recoverable condition
#[derive(Debug, Clone, PartialEq)]
pub enum Advisory {
    /// A point was discarded during the survey
    Dropped {
        plot_type: String,
        coordindex: usize,
        /// The unfiltered input, formatted for humans
        point: String,
        cause: DropCause,
    },
    /// A non-finite meta value was mapped to the bottom of the meta range
    UnboundedMeta { value: f64 },
    /// A point without meta was given the neutral meta value
    MissingMeta { neutral: f64 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::Dropped {
                plot_type,
                coordindex,
                point,
                cause,
            } => {
                write!(
                    f,
                    "NOTE ({}): coordinate {} (index {}) has been dropped because ",
                    plot_type, point, coordindex
                )?;
                match cause {
                    DropCause::Unbounded(dir) => write!(f, "it is unbounded in {}.", dir),
                    DropCause::Filter => f.write_str("of a coordinate filter."),
                }
            }
            Advisory::UnboundedMeta { value } => write!(
                f,
                "point meta {} is unbounded; using the lower end of the meta range instead. \
                 Further unbounded point meta values are not reported.",
                value
            ),
            Advisory::MissingMeta { neutral } => write!(
                f,
                "point meta is missing at visualization time; using {} instead.",
                neutral
            ),
        }
    }
}

/// Log `advisory` and append it to `log`
pub(crate) fn record(log: &mut Vec<Advisory>, advisory: Advisory) {
    warn!("{}", advisory);
    log.push(advisory);
}
