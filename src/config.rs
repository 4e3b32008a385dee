// ---------------------------------------------------------------------------
// Static configuration
// ---------------------------------------------------------------------------

/// Window / application title.
pub const APP_TITLE: &str = "Grade Atlas – County Distancing Map";

/// Attribute the range filter applies to.
pub const FILTER_FIELD: &str = "grade_distance";

/// Default slider bounds; also the reset values when the filter is disabled.
pub const DEFAULT_MIN: f64 = 0.0;
pub const DEFAULT_MAX: f64 = 100.0;

/// Attribute carrying the letter grade of a feature.
pub const GRADE_FIELD: &str = "grade";

/// Attribute carrying the display name of a feature.
pub const NAME_FIELD: &str = "name";
