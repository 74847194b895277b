//! Scalar maps: the affine interval map, point meta normalization and the
//! per-axis data scale transform used in the visualization phase.

use crate::errors::SurveyError;
use crate::log::debug;
use crate::survey::advisory::{self, Advisory};
use crate::survey::defaults::{META_MAP_OUT_MAX, META_MAP_OUT_MIN};

/// Affine map from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// Stateless after construction; values outside the input interval map
/// outside the output interval. Both spans are kept halved so that domains
/// as wide as the whole finite range still map their endpoints exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMap {
    in_min: f64,
    half_in: f64,
    out_min: f64,
    half_out: f64,
}

impl LinearMap {
    /// Fails with `MissingArgument` if any bound is NaN or infinite and with
    /// `InvalidDomain` unless `in_min < in_max`.
    pub fn new(in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> Result<Self, SurveyError> {
        for (what, value) in [
            ("in_min", in_min),
            ("in_max", in_max),
            ("out_min", out_min),
            ("out_max", out_max),
        ] {
            if !value.is_finite() {
                return Err(SurveyError::MissingArgument { what });
            }
        }

        let half_in = in_max * 0.5 - in_min * 0.5;
        // also catches subnormal domains whose halved width underflows
        if in_min >= in_max || half_in <= 0.0 {
            return Err(SurveyError::InvalidDomain {
                min: in_min,
                max: in_max,
            });
        }

        Ok(Self {
            in_min,
            half_in,
            out_min,
            half_out: out_max * 0.5 - out_min * 0.5,
        })
    }

    #[inline]
    pub fn map(&self, x: f64) -> f64 {
        let t = (x * 0.5 - self.in_min * 0.5) / self.half_in;
        self.out_min + t * self.half_out + t * self.half_out
    }

    /// Output change per unit of input
    pub fn scale(&self) -> f64 {
        self.half_out / self.half_in
    }
}

/// Normalizes point meta into `[0, 1000]`.
///
/// Finite values outside the domain saturate. Non-finite values map to 0;
/// the first one per instance raises an advisory and later ones are silent.
#[derive(Debug, Clone, PartialEq)]
pub struct PointMetaMap {
    map: LinearMap,
    warn_on_unbounded: bool,
    advisories: Vec<Advisory>,
}

impl PointMetaMap {
    pub fn new(in_min: f64, in_max: f64) -> Result<Self, SurveyError> {
        let map = LinearMap::new(in_min, in_max, META_MAP_OUT_MIN, META_MAP_OUT_MAX)?;
        debug!(in_min, in_max, "point meta map");
        Ok(Self {
            map,
            warn_on_unbounded: true,
            advisories: Vec::new(),
        })
    }

    pub fn map(&mut self, meta: f64) -> f64 {
        if meta.is_finite() {
            return self.map.map(meta).clamp(META_MAP_OUT_MIN, META_MAP_OUT_MAX);
        }

        if self.warn_on_unbounded {
            self.warn_on_unbounded = false;
            advisory::record(&mut self.advisories, Advisory::UnboundedMeta { value: meta });
        }
        META_MAP_OUT_MIN
    }

    /// Whether the next unbounded meta value will still be reported
    pub fn warns_on_unbounded(&self) -> bool {
        self.warn_on_unbounded
    }

    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }
}

/// Visualization-phase transform of one axis direction:
/// `x * 10^exponent - shift`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatascaleTrafo {
    exponent: i32,
    shift: f64,
    factor: f64,
}

impl DatascaleTrafo {
    pub fn new(exponent: i32, shift: f64) -> Result<Self, SurveyError> {
        if !shift.is_finite() {
            return Err(SurveyError::MissingArgument { what: "shift" });
        }
        Ok(Self {
            exponent,
            shift,
            factor: 10f64.powi(exponent),
        })
    }

    pub const fn identity() -> Self {
        Self {
            exponent: 0,
            shift: 0.0,
            factor: 1.0,
        }
    }

    #[inline]
    pub fn map(&self, x: f64) -> f64 {
        self.factor * x - self.shift
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    pub fn shift(&self) -> f64 {
        self.shift
    }
}

impl Default for DatascaleTrafo {
    fn default() -> Self {
        Self::identity()
    }
}
