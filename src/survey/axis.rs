//! Axis state shared by every plot of one plotting environment
//!
//! The axis owns the global extents, the dimensionality latch and the
//! accept/discard/jump decision. It is mutated by each attached plot
//! handler during that handler's survey, one handler at a time, and is
//! read-only during visualization.

use crate::errors::SurveyError;
use crate::log::debug;
use crate::map::DatascaleTrafo;
use crate::types::{Coord, Dir, RawRecord, finite};

use super::Plothandler;
use super::advisory::{Advisory, DropCause};
use super::config::{AxisConfig, AxisScale, UnboundedCoords};
use super::hooks::SurveyHooks;
use super::serialize::{NumberFormat, SurveySummary, serialize_coord};

const DIRS_2D: &[Dir] = &[Dir::X, Dir::Y];
const DIRS_3D: &[Dir] = &[Dir::X, Dir::Y, Dir::Z];

/// Global coordinate state of one plotting environment
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    /// Running extents; `+inf`/`-inf` until first updated
    min: [f64; 3],
    max: [f64; 3],
    autocompute_min: [bool; 3],
    autocompute_max: [bool; 3],
    is_linear: [bool; 3],
    is3d: bool,
    clip_limits: bool,
    axiswidemetamin: f64,
    axiswidemetamax: f64,
    autocompute_meta_min: bool,
    autocompute_meta_max: bool,
    datascale_trafo: [DatascaleTrafo; 3],
}

impl Default for Axis {
    fn default() -> Self {
        Self {
            min: [f64::INFINITY; 3],
            max: [f64::NEG_INFINITY; 3],
            autocompute_min: [true; 3],
            autocompute_max: [true; 3],
            is_linear: [true; 3],
            is3d: false,
            clip_limits: true,
            axiswidemetamin: f64::INFINITY,
            axiswidemetamax: f64::NEG_INFINITY,
            autocompute_meta_min: true,
            autocompute_meta_max: true,
            datascale_trafo: [DatascaleTrafo::identity(); 3],
        }
    }
}

impl Axis {
    /// Build an axis. Fixed limits of logarithmic directions are given in
    /// data space and must be positive.
    pub fn new(config: AxisConfig) -> Result<Self, SurveyError> {
        config.validate()?;
        let mut axis = Axis {
            clip_limits: config.clip_limits,
            ..Axis::default()
        };

        for dir in Dir::ALL {
            let i = dir.index();
            let linear = config.scales[i] == AxisScale::Linear;
            let (min, max) = (config.min[i], config.max[i]);
            if !linear && [min, max].iter().flatten().any(|v| *v <= 0.0) {
                return Err(SurveyError::InvalidDomain {
                    min: min.unwrap_or(f64::NEG_INFINITY),
                    max: max.unwrap_or(f64::INFINITY),
                });
            }
            let to_survey_space = |v: f64| if linear { v } else { v.ln() };

            axis.is_linear[i] = linear;
            if let Some(min) = min {
                axis.min[i] = to_survey_space(min);
                axis.autocompute_min[i] = false;
            }
            if let Some(max) = max {
                axis.max[i] = to_survey_space(max);
                axis.autocompute_max[i] = false;
            }
        }

        if let Some(min) = config.meta_min {
            axis.axiswidemetamin = min;
            axis.autocompute_meta_min = false;
        }
        if let Some(max) = config.meta_max {
            axis.axiswidemetamax = max;
            axis.autocompute_meta_max = false;
        }
        Ok(axis)
    }

    /// Lower extent of `dir`, or `None` while never set
    pub fn min(&self, dir: Dir) -> Option<f64> {
        Some(self.min[dir.index()]).filter(|v| v.is_finite())
    }

    /// Upper extent of `dir`, or `None` while never set
    pub fn max(&self, dir: Dir) -> Option<f64> {
        Some(self.max[dir.index()]).filter(|v| v.is_finite())
    }

    pub fn is_autocompute_min(&self, dir: Dir) -> bool {
        self.autocompute_min[dir.index()]
    }

    pub fn is_autocompute_max(&self, dir: Dir) -> bool {
        self.autocompute_max[dir.index()]
    }

    pub fn is_linear(&self, dir: Dir) -> bool {
        self.is_linear[dir.index()]
    }

    /// Becomes true for good once any surveyed record has a third coordinate
    pub fn is3d(&self) -> bool {
        self.is3d
    }

    /// Number of active directions
    pub fn loop_max(&self) -> usize {
        self.active_dirs().len()
    }

    fn active_dirs(&self) -> &'static [Dir] {
        if self.is3d { DIRS_3D } else { DIRS_2D }
    }

    /// Meta extents shared by all surveyed plots, if any numeric meta was seen
    pub fn axis_wide_meta_limits(&self) -> Option<(f64, f64)> {
        if self.axiswidemetamin.is_finite() && self.axiswidemetamax.is_finite() {
            Some((self.axiswidemetamin, self.axiswidemetamax))
        } else {
            None
        }
    }

    pub fn set_datascale_trafo(&mut self, dir: Dir, trafo: DatascaleTrafo) {
        self.datascale_trafo[dir.index()] = trafo;
    }

    pub fn datascale_trafo(&self, dir: Dir) -> &DatascaleTrafo {
        &self.datascale_trafo[dir.index()]
    }

    /// Turn a raw record into a validated point.
    ///
    /// Blank fields become absent. A third coordinate latches the axis to
    /// 3D. The returned point keeps the record under `unfiltered`.
    pub fn parse_coordinate(&mut self, mut raw: RawRecord) -> Coord {
        raw.normalize_blanks();
        if raw.x[Dir::Z.index()].is_some() && !self.is3d {
            debug!("third coordinate seen; axis is 3D from now on");
            self.is3d = true;
        }

        let mut pt = Coord::default();
        for &dir in self.active_dirs() {
            let i = dir.index();
            pt.x[i] = raw
                .number(dir)
                .map(|v| if self.is_linear[i] { v } else { v.ln() });
        }
        pt.unfiltered = Some(Box::new(raw));
        self.validate_coord(&mut pt);
        pt
    }

    /// Clear every slot of `pt` unless all active directions are finite.
    ///
    /// All directions are checked, so when several fail the last one is
    /// the one remembered in `unbounded_dir`.
    pub fn validate_coord(&self, pt: &mut Coord) {
        let mut valid = true;
        for &dir in self.active_dirs() {
            let i = dir.index();
            if pt.x[i].map(finite).is_none_or(|v| v.is_err()) {
                valid = false;
                pt.unbounded_dir = Some(dir);
                pt.x[i] = None;
            }
        }
        if !valid {
            pt.invalidate();
        }
    }

    /// Widen the autocomputed extents to include `pt`.
    ///
    /// If clipping is on and the point lies outside a fixed limit in any
    /// direction, no extent is updated at all, in any direction.
    pub fn update_limits_for_coordinate(&mut self, pt: &Coord) {
        let dirs = self.active_dirs();

        let mut clipped = false;
        if self.clip_limits {
            for &dir in dirs {
                let i = dir.index();
                let Some(v) = pt.x[i] else { continue };
                if !self.autocompute_min[i] {
                    clipped |= v < self.min[i];
                }
                if !self.autocompute_max[i] {
                    clipped |= v > self.max[i];
                }
            }
        }
        if clipped {
            debug!(%pt, "point outside fixed limits; extents unchanged");
            return;
        }

        for &dir in dirs {
            let i = dir.index();
            let Some(v) = pt.x[i] else { continue };
            if self.autocompute_min[i] {
                self.min[i] = self.min[i].min(v);
            }
            if self.autocompute_max[i] {
                self.max[i] = self.max[i].max(v);
            }
        }
    }

    /// Accept, discard or keep as jump.
    ///
    /// Valid points run the handler's meta hooks and are appended. Invalid
    /// points are dropped, except under the jump policy when a direction
    /// escaped: then an all-absent sentinel is appended instead.
    pub fn datapoint_surveyed<H: SurveyHooks>(
        &mut self,
        mut pt: Coord,
        handler: &mut Plothandler<H>,
    ) -> Result<(), SurveyError> {
        if pt.is_valid() {
            handler.survey_before_set_point_meta(&mut pt);
            handler.set_per_point_meta(&mut pt)?;
            handler.set_per_point_meta_limits(&pt)?;
            self.fold_meta_limits(handler);
            handler.survey_after_set_point_meta(&mut pt);
            handler.add_surveyed_point(pt);
            return Ok(());
        }

        match (handler.config().unbounded_coords, pt.unbounded_dir) {
            (UnboundedCoords::Jump, Some(dir)) => {
                debug!(coordindex = handler.coordindex(), %dir, "jump");
                handler.plot_has_jumps = true;
                pt.invalidate();
                handler.add_surveyed_point(pt);
            }
            (_, cause) => {
                handler.filtered_coords_away = true;
                if handler.config().warn_for_filter_discards {
                    let point = match &pt.unfiltered {
                        Some(raw) => raw.to_string(),
                        None => pt.to_string(),
                    };
                    let advisory = Advisory::Dropped {
                        plot_type: handler.config().plot_type.clone(),
                        coordindex: handler.coordindex(),
                        point,
                        cause: cause.map_or(DropCause::Filter, DropCause::Unbounded),
                    };
                    handler.advise(advisory);
                }
            }
        }
        Ok(())
    }

    /// Widen the axis-wide meta extents by `handler`'s, unless fixed.
    ///
    /// Runs after every accepted point, so the extents are current as soon
    /// as the plot's survey has ended.
    fn fold_meta_limits<H: SurveyHooks>(&mut self, handler: &Plothandler<H>) {
        if handler.is_symbolic_meta() {
            return;
        }
        if let Some((lo, hi)) = handler.meta_limits() {
            if self.autocompute_meta_min {
                self.axiswidemetamin = self.axiswidemetamin.min(lo);
            }
            if self.autocompute_meta_max {
                self.axiswidemetamax = self.axiswidemetamax.max(hi);
            }
        }
    }

    /// Finalize `handler`'s survey and report it.
    ///
    /// Ends the survey and returns the summary handed back to the host.
    pub fn survey_to_pgfplots<H: SurveyHooks>(
        &mut self,
        handler: &mut Plothandler<H>,
        fmt: &dyn NumberFormat,
    ) -> Result<SurveySummary, SurveyError> {
        handler.survey_end()?;
        self.fold_meta_limits(handler);

        let mut summary = SurveySummary::new();
        for dir in Dir::ALL {
            let (min_key, max_key) = match dir {
                Dir::X => ("xmin", "xmax"),
                Dir::Y => ("ymin", "ymax"),
                Dir::Z => ("zmin", "zmax"),
            };
            summary.push(min_key, fmt_opt(fmt, self.min(dir)));
            summary.push(max_key, fmt_opt(fmt, self.max(dir)));
        }
        summary.push("metamin", fmt_opt(fmt, handler.metamin()));
        summary.push("metamax", fmt_opt(fmt, handler.metamax()));
        summary.push("is3d", self.is3d.to_string());
        if let Some(first) = handler.coords().first() {
            summary.push("firstcoord", serialize_coord(first, fmt));
        }
        if let Some(last) = handler.coords().last() {
            summary.push("lastcoord", serialize_coord(last, fmt));
        }
        summary.push("plothasjumps", handler.plot_has_jumps().to_string());
        summary.push("filteredcoordsaway", handler.filtered_coords_away().to_string());
        summary.push("coordindex", handler.coordindex().to_string());
        Ok(summary)
    }

    /// Apply the data scale transform of each direction to `pt`, in place
    pub fn visphase_transform_coordinate(&self, pt: &mut Coord) {
        for dir in Dir::ALL {
            let i = dir.index();
            pt.x[i] = pt.x[i].map(|v| self.datascale_trafo[i].map(v));
        }
    }
}

fn fmt_opt(fmt: &dyn NumberFormat, value: Option<f64>) -> String {
    match value {
        Some(_) => fmt.format(value),
        None => String::new(),
    }
}
