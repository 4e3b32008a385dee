/// UI layer: panels (toolbar, filters), the county map, and the
/// grade-distribution chart.
pub mod chart;
pub mod map;
pub mod panels;
