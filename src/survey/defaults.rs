//! Default values and fixed ranges

/// Lower end of the normalized point meta range
pub const META_MAP_OUT_MIN: f64 = 0.0;
/// Upper end of the normalized point meta range
pub const META_MAP_OUT_MAX: f64 = 1000.0;
/// Meta substituted for points that have none at visualization time
pub const NEUTRAL_META: f64 = 1.0;
/// Meta domain used when no numeric meta was surveyed
pub const FALLBACK_META_DOMAIN: (f64, f64) = (0.0, 1.0);
/// Placeholder for an absent coordinate in diagnostics
pub const MISSING_COORD: &str = "--";
/// Label used in advisories when the host does not name the plot
pub const PLOT_TYPE: &str = "plot";
