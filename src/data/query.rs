use super::filter::WhereClause;
use super::model::{CountyDataset, Grade};

// ---------------------------------------------------------------------------
// Grade distribution: aggregate county counts per category
// ---------------------------------------------------------------------------

/// County counts aligned to [`Grade::ALL`], so the chart's category order
/// never depends on the order counties were loaded or matched in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradeCounts {
    counts: [u64; Grade::ALL.len()],
}

impl GradeCounts {
    pub fn count(&self, grade: Grade) -> u64 {
        self.counts[grade.index()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// (grade, count) pairs in fixed A through F order.
    pub fn entries(&self) -> impl Iterator<Item = (Grade, u64)> + '_ {
        Grade::ALL.iter().map(move |&g| (g, self.counts[g.index()]))
    }
}

/// Count the counties matching the clause, bucketed by grade.
pub fn grade_distribution(dataset: &CountyDataset, clause: &WhereClause) -> GradeCounts {
    let mut distribution = GradeCounts::default();
    for county in &dataset.counties {
        if clause.matches(county) {
            distribution.counts[county.grade.index()] += 1;
        }
    }
    distribution
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::config;

    use super::super::filter::FilterRange;
    use super::super::model::{AttributeValue, County};
    use super::*;

    fn county(grade: Grade, score: f64) -> County {
        let mut attributes = BTreeMap::new();
        attributes.insert(
            config::FILTER_FIELD.to_string(),
            AttributeValue::Float(score),
        );
        County {
            name: format!("{grade} county"),
            grade,
            rings: vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]],
            attributes,
        }
    }

    fn everything() -> WhereClause {
        WhereClause::between(config::FILTER_FIELD, FilterRange::default())
    }

    #[test]
    fn counts_are_bucketed_by_grade() {
        let dataset = CountyDataset::from_counties(vec![
            county(Grade::A, 90.0),
            county(Grade::A, 92.0),
            county(Grade::C, 55.0),
            county(Grade::F, 10.0),
        ]);

        let distribution = grade_distribution(&dataset, &everything());
        assert_eq!(distribution.count(Grade::A), 2);
        assert_eq!(distribution.count(Grade::B), 0);
        assert_eq!(distribution.count(Grade::C), 1);
        assert_eq!(distribution.count(Grade::F), 1);
        assert_eq!(distribution.total(), 4);
    }

    #[test]
    fn entry_order_is_independent_of_input_order() {
        let forward = CountyDataset::from_counties(vec![
            county(Grade::A, 90.0),
            county(Grade::B, 75.0),
            county(Grade::F, 5.0),
        ]);
        let reversed = CountyDataset::from_counties(vec![
            county(Grade::F, 5.0),
            county(Grade::B, 75.0),
            county(Grade::A, 90.0),
        ]);

        let a = grade_distribution(&forward, &everything());
        let b = grade_distribution(&reversed, &everything());
        assert_eq!(a, b);

        let grades: Vec<Grade> = a.entries().map(|(g, _)| g).collect();
        assert_eq!(grades, Grade::ALL);
    }

    #[test]
    fn clause_restricts_the_distribution() {
        let dataset = CountyDataset::from_counties(vec![
            county(Grade::A, 90.0),
            county(Grade::B, 75.0),
            county(Grade::F, 5.0),
        ]);
        let clause = WhereClause::between(
            config::FILTER_FIELD,
            FilterRange {
                min: 70.0,
                max: 100.0,
            },
        );

        let distribution = grade_distribution(&dataset, &clause);
        assert_eq!(distribution.count(Grade::A), 1);
        assert_eq!(distribution.count(Grade::B), 1);
        assert_eq!(distribution.count(Grade::F), 0);
        assert_eq!(distribution.total(), 2);
    }
}
