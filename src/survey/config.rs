//! Policy bundles for plot handlers and axes

use crate::errors::SurveyError;
use crate::types::Dir;

use super::defaults;

/// What to do with a point that escapes in some direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnboundedCoords {
    /// Drop the point
    #[default]
    Discard,
    /// Keep a sentinel that breaks the line at this point
    Jump,
}

/// Which extents the meta normalization of a plot uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointMetaRel {
    /// Shared by every plot on the axis
    #[default]
    AxisWide,
    /// This plot's own extents
    PerPlot,
}

/// Scale of one axis direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisScale {
    #[default]
    Linear,
    /// Data is surveyed in natural-log space
    Logarithmic,
}

/// Immutable policy of one plot handler
#[derive(Debug, Clone, PartialEq)]
pub struct PlothandlerConfig {
    pub unbounded_coords: UnboundedCoords,
    /// Report every discarded point as an advisory
    pub warn_for_filter_discards: bool,
    pub point_meta_rel: PointMetaRel,
    /// Fixed lower meta bound; `None` means computed from data
    pub meta_min: Option<f64>,
    /// Fixed upper meta bound; `None` means computed from data
    pub meta_max: Option<f64>,
    /// Name used in advisories
    pub plot_type: String,
}

impl Default for PlothandlerConfig {
    fn default() -> Self {
        Self {
            unbounded_coords: UnboundedCoords::default(),
            warn_for_filter_discards: true,
            point_meta_rel: PointMetaRel::default(),
            meta_min: None,
            meta_max: None,
            plot_type: defaults::PLOT_TYPE.to_string(),
        }
    }
}

impl PlothandlerConfig {
    pub fn with_unbounded_coords(mut self, policy: UnboundedCoords) -> Self {
        self.unbounded_coords = policy;
        self
    }

    pub fn with_point_meta_rel(mut self, rel: PointMetaRel) -> Self {
        self.point_meta_rel = rel;
        self
    }

    pub fn with_meta_limits(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.meta_min = min;
        self.meta_max = max;
        self
    }

    pub fn with_discard_warnings(mut self, warn: bool) -> Self {
        self.warn_for_filter_discards = warn;
        self
    }

    pub fn with_plot_type(mut self, plot_type: impl Into<String>) -> Self {
        self.plot_type = plot_type.into();
        self
    }

    pub(crate) fn validate(&self) -> Result<(), SurveyError> {
        check_bound(self.meta_min, "meta_min")?;
        check_bound(self.meta_max, "meta_max")
    }
}

/// Axis setup supplied once per plotting environment
#[derive(Debug, Clone, PartialEq)]
pub struct AxisConfig {
    /// Reject points outside fixed limits from the autocomputed extents
    pub clip_limits: bool,
    pub scales: [AxisScale; 3],
    /// Fixed lower limit per direction, in data space
    pub min: [Option<f64>; 3],
    /// Fixed upper limit per direction, in data space
    pub max: [Option<f64>; 3],
    pub meta_min: Option<f64>,
    pub meta_max: Option<f64>,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            clip_limits: true,
            scales: [AxisScale::Linear; 3],
            min: [None; 3],
            max: [None; 3],
            meta_min: None,
            meta_max: None,
        }
    }
}

impl AxisConfig {
    pub fn with_limits(mut self, dir: Dir, min: Option<f64>, max: Option<f64>) -> Self {
        self.min[dir.index()] = min;
        self.max[dir.index()] = max;
        self
    }

    pub fn with_scale(mut self, dir: Dir, scale: AxisScale) -> Self {
        self.scales[dir.index()] = scale;
        self
    }

    pub fn with_clip_limits(mut self, clip: bool) -> Self {
        self.clip_limits = clip;
        self
    }

    pub fn with_meta_limits(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.meta_min = min;
        self.meta_max = max;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), SurveyError> {
        for dir in Dir::ALL {
            check_bound(self.min[dir.index()], "axis min")?;
            check_bound(self.max[dir.index()], "axis max")?;
        }
        check_bound(self.meta_min, "axis meta_min")?;
        check_bound(self.meta_max, "axis meta_max")
    }
}

fn check_bound(bound: Option<f64>, what: &'static str) -> Result<(), SurveyError> {
    match bound {
        Some(v) if v.is_nan() => Err(SurveyError::MissingArgument { what }),
        _ => Ok(()),
    }
}
