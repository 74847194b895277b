//! Wire formats handed back to the host
//!
//! Coordinates travel as brace groups `{<meta>;<x>,<y>,<z>}` concatenated
//! without separator. The survey summary is a list of `key=value,` pairs.

use std::fmt;

use crate::types::{Coord, MetaValue};

/// Number-to-text conversion owned by the host
pub trait NumberFormat {
    /// Format a number; `None` is an absent value
    fn format(&self, value: Option<f64>) -> String;
}

/// Shortest round-trip decimal form; absent values are empty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlainNumberFormat;

impl NumberFormat for PlainNumberFormat {
    fn format(&self, value: Option<f64>) -> String {
        match value {
            Some(v) => v.to_string(),
            None => String::new(),
        }
    }
}

/// Append the group of one point to `out`
pub fn write_coord(out: &mut String, pt: &Coord, fmt: &dyn NumberFormat) {
    out.push('{');
    match (pt.metatransformed, &pt.meta) {
        (Some(t), _) => out.push_str(&fmt.format(Some(t))),
        (None, Some(MetaValue::Number(n))) => out.push_str(&fmt.format(Some(*n))),
        (None, Some(MetaValue::Symbolic(s))) => out.push_str(s),
        (None, None) => out.push_str(&fmt.format(None)),
    }
    out.push(';');
    for (i, x) in pt.x.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&fmt.format(*x));
    }
    out.push('}');
}

/// The group of one point
pub fn serialize_coord(pt: &Coord, fmt: &dyn NumberFormat) -> String {
    let mut out = String::new();
    write_coord(&mut out, pt, fmt);
    out
}

/// All groups back to back
pub fn serialize_coords(coords: &[Coord], fmt: &dyn NumberFormat) -> String {
    let mut out = String::new();
    for pt in coords {
        write_coord(&mut out, pt, fmt);
    }
    out
}

/// Ordered `key=value,` report produced when a plot's survey is finalized
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveySummary {
    entries: Vec<(&'static str, String)>,
}

impl SurveySummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; blank values are dropped
    pub fn push(&mut self, key: &'static str, value: impl Into<String>) {
        let value = value.into();
        if !value.trim().is_empty() {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn entries(&self) -> &[(&'static str, String)] {
        &self.entries
    }
}

impl fmt::Display for SurveySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            write!(f, "{}={},", key, value)?;
        }
        Ok(())
    }
}
