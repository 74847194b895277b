//! Value types flowing through the survey and visualization passes.
//!
//! A [`RawRecord`] is what the host hands us; a [`Coord`] is what survives
//! parsing. Coordinates are `Option<f64>` per direction: `None` means the
//! direction is unresolved, and a valid point has every active direction set.

use std::fmt;

use crate::errors::SurveyError;
use crate::survey::defaults::MISSING_COORD;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Accept a value only if it is bounded.
#[inline]
pub fn finite(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else {
        Ok(val)
    }
}

/// Axis direction. On the wire directions are numbered 1 (x), 2 (y), 3 (z).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dir {
    X,
    Y,
    Z,
}

impl Dir {
    pub const ALL: [Dir; 3] = [Dir::X, Dir::Y, Dir::Z];

    /// Zero-based slot index into coordinate arrays
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Dir::X => 0,
            Dir::Y => 1,
            Dir::Z => 2,
        }
    }

    /// One-based direction number
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn from_number(dir: u8) -> Result<Dir, SurveyError> {
        match dir {
            1 => Ok(Dir::X),
            2 => Ok(Dir::Y),
            3 => Ok(Dir::Z),
            _ => Err(SurveyError::InvalidDirection { dir }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dir::X => "x",
            Dir::Y => "y",
            Dir::Z => "z",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One unparsed field of an input record
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Blank text counts as "not supplied"
    pub fn is_blank(&self) -> bool {
        matches!(self, RawValue::Text(s) if s.trim().is_empty())
    }

    /// Numeric reading of the field. Accepts `inf`, `-inf` and `nan` spellings,
    /// which then fail validation rather than parsing.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Text(s) => f.write_str(s.trim()),
        }
    }
}

/// A coordinate record as supplied by the host: up to three positional
/// fields plus an optional separate meta field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRecord {
    pub x: [Option<RawValue>; 3],
    pub meta: Option<RawValue>,
}

impl RawRecord {
    pub fn xy(x: impl Into<RawValue>, y: impl Into<RawValue>) -> Self {
        Self {
            x: [Some(x.into()), Some(y.into()), None],
            meta: None,
        }
    }

    pub fn xyz(x: impl Into<RawValue>, y: impl Into<RawValue>, z: impl Into<RawValue>) -> Self {
        Self {
            x: [Some(x.into()), Some(y.into()), Some(z.into())],
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: impl Into<RawValue>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    /// Numeric reading of the raw field in `dir`, if present and parsable
    pub fn number(&self, dir: Dir) -> Option<f64> {
        self.x[dir.index()].as_ref().and_then(RawValue::to_number)
    }

    /// Replace blank fields by "absent"
    pub(crate) fn normalize_blanks(&mut self) {
        for slot in self.x.iter_mut().chain(std::iter::once(&mut self.meta)) {
            if slot.as_ref().is_some_and(RawValue::is_blank) {
                *slot = None;
            }
        }
    }
}

impl fmt::Display for RawRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, slot) in self.x.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match slot {
                Some(v) => write!(f, "{}", v)?,
                None => f.write_str(MISSING_COORD)?,
            }
        }
        f.write_str(")")?;
        if let Some(meta) = &self.meta {
            write!(f, " [{}]", meta)?;
        }
        Ok(())
    }
}

/// Per-point scalar: numeric, or symbolic text that is never normalized
#[derive(Clone, Debug, PartialEq)]
pub enum MetaValue {
    Number(f64),
    Symbolic(String),
}

impl MetaValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetaValue::Number(n) => Some(*n),
            MetaValue::Symbolic(_) => None,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Number(n) => write!(f, "{}", n),
            MetaValue::Symbolic(s) => f.write_str(s),
        }
    }
}

/// A surveyed point.
///
/// Either every active direction of `x` is set (valid), or the point is
/// invalid and all three slots are cleared. A jump sentinel is an invalid
/// point kept in the surveyed sequence to break the line there.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Coord {
    pub x: [Option<f64>; 3],
    pub meta: Option<MetaValue>,
    /// Normalized meta, set only during visualization
    pub metatransformed: Option<f64>,
    /// The record this point was parsed from (blank fields already removed)
    pub unfiltered: Option<Box<RawRecord>>,
    /// The direction that made this point invalid, if that was the cause
    pub unbounded_dir: Option<Dir>,
    /// Coordinates before the visualization transform
    pub untransformed: Option<[Option<f64>; 3]>,
}

impl Coord {
    pub fn new(x: [Option<f64>; 3]) -> Self {
        Self {
            x,
            ..Self::default()
        }
    }

    pub fn xy(x: f64, y: f64) -> Self {
        Self::new([Some(x), Some(y), None])
    }

    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self::new([Some(x), Some(y), Some(z)])
    }

    /// Fresh point with the same coordinates and meta, for hosts that keep
    /// points beyond a survey.
    ///
    /// The raw record link and the unbounded direction are dropped. Use
    /// `clone()` to keep them, as the visualization pass does.
    pub fn copy(&self) -> Coord {
        Coord {
            x: self.x,
            meta: self.meta.clone(),
            ..Coord::default()
        }
    }

    /// A point is valid when its first coordinate survived validation
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.x[0].is_some()
    }

    #[inline]
    pub fn get(&self, dir: Dir) -> Option<f64> {
        self.x[dir.index()]
    }

    /// Clear every coordinate slot
    pub(crate) fn invalidate(&mut self) {
        self.x = [None; 3];
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, slot) in self.x.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match slot {
                Some(v) => write!(f, "{}", v)?,
                None => f.write_str(MISSING_COORD)?,
            }
        }
        f.write_str(")")?;
        if let Some(meta) = &self.meta {
            write!(f, " [{}]", meta)?;
        }
        Ok(())
    }
}
