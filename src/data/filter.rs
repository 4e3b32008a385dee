use std::fmt;

use crate::config;

use super::model::{County, CountyDataset};

// ---------------------------------------------------------------------------
// Filter predicate: a numeric range over one attribute
// ---------------------------------------------------------------------------

/// User-selected slider bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterRange {
    pub min: f64,
    pub max: f64,
}

impl Default for FilterRange {
    fn default() -> Self {
        FilterRange {
            min: config::DEFAULT_MIN,
            max: config::DEFAULT_MAX,
        }
    }
}

/// A range predicate over one numeric attribute.
///
/// Formats as the feature-service clause `"<field>" BETWEEN <min> AND <max>`
/// and evaluates the same predicate against loaded counties.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub field: String,
    pub min: f64,
    pub max: f64,
}

impl WhereClause {
    pub fn between(field: &str, range: FilterRange) -> Self {
        WhereClause {
            field: field.to_string(),
            min: range.min,
            max: range.max,
        }
    }

    /// Whether a county's attribute lies inside the closed range.
    /// A missing or non-numeric attribute fails the predicate.
    pub fn matches(&self, county: &County) -> bool {
        county
            .attribute(&self.field)
            .and_then(|v| v.as_f64())
            .is_some_and(|v| v >= self.min && v <= self.max)
    }
}

impl fmt::Display for WhereClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" BETWEEN {} AND {}", self.field, self.min, self.max)
    }
}

/// Split county indices into (matching, excluded) under the clause.
///
/// The map keeps drawing both sets; excluded counties are dimmed rather
/// than removed.
pub fn partition_by_clause(
    dataset: &CountyDataset,
    clause: &WhereClause,
) -> (Vec<usize>, Vec<usize>) {
    let mut included = Vec::with_capacity(dataset.len());
    let mut excluded = Vec::new();
    for (i, county) in dataset.counties.iter().enumerate() {
        if clause.matches(county) {
            included.push(i);
        } else {
            excluded.push(i);
        }
    }
    (included, excluded)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::super::model::{AttributeValue, Grade};
    use super::*;

    fn county_with_score(score: Option<f64>) -> County {
        let mut attributes = BTreeMap::new();
        if let Some(v) = score {
            attributes.insert(config::FILTER_FIELD.to_string(), AttributeValue::Float(v));
        }
        County {
            name: "Test".to_string(),
            grade: Grade::C,
            rings: vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]],
            attributes,
        }
    }

    #[test]
    fn clause_formats_exactly() {
        let clause = WhereClause::between(
            "grade_distance",
            FilterRange {
                min: 0.0,
                max: 100.0,
            },
        );
        assert_eq!(clause.to_string(), "\"grade_distance\" BETWEEN 0 AND 100");
    }

    #[test]
    fn clause_formats_fractional_bounds() {
        let clause = WhereClause::between("score", FilterRange { min: 2.5, max: 7.25 });
        assert_eq!(clause.to_string(), "\"score\" BETWEEN 2.5 AND 7.25");
    }

    #[test]
    fn default_range_matches_configured_bounds() {
        let range = FilterRange::default();
        assert_eq!(range.min, config::DEFAULT_MIN);
        assert_eq!(range.max, config::DEFAULT_MAX);
    }

    #[test]
    fn matches_is_inclusive_at_both_bounds() {
        let clause = WhereClause::between(
            config::FILTER_FIELD,
            FilterRange {
                min: 10.0,
                max: 20.0,
            },
        );
        assert!(clause.matches(&county_with_score(Some(10.0))));
        assert!(clause.matches(&county_with_score(Some(20.0))));
        assert!(!clause.matches(&county_with_score(Some(9.99))));
        assert!(!clause.matches(&county_with_score(Some(20.01))));
    }

    #[test]
    fn missing_attribute_fails_the_predicate() {
        let clause = WhereClause::between(config::FILTER_FIELD, FilterRange::default());
        assert!(!clause.matches(&county_with_score(None)));
    }

    #[test]
    fn partition_is_disjoint_and_complete() {
        let dataset = CountyDataset::from_counties(vec![
            county_with_score(Some(5.0)),
            county_with_score(Some(50.0)),
            county_with_score(Some(95.0)),
            county_with_score(None),
        ]);
        let clause = WhereClause::between(
            config::FILTER_FIELD,
            FilterRange {
                min: 40.0,
                max: 60.0,
            },
        );

        let (included, excluded) = partition_by_clause(&dataset, &clause);
        assert_eq!(included, [1]);
        assert_eq!(excluded, [0, 2, 3]);
        assert_eq!(included.len() + excluded.len(), dataset.len());
    }
}
