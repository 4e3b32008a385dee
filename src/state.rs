use crate::color::GradeSymbology;
use crate::config;
use crate::data::filter::{FilterRange, WhereClause, partition_by_clause};
use crate::data::model::CountyDataset;
use crate::data::query::{GradeCounts, grade_distribution};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until the user opens a file).
    pub dataset: Option<CountyDataset>,

    /// Slider-selected bounds for the filter attribute.
    pub range: FilterRange,

    /// Whether the range filter is active (the checkbox).
    pub filter_enabled: bool,

    /// Indices of counties matching the current predicate (cached).
    pub included: Vec<usize>,

    /// Indices drawn dimmed because they fall outside the predicate (cached).
    pub excluded: Vec<usize>,

    /// Grade distribution under the current predicate (cached).
    pub distribution: GradeCounts,

    /// Map layer symbology.
    pub symbology: GradeSymbology,

    /// County-name search text.
    pub search_query: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            range: FilterRange::default(),
            filter_enabled: true,
            included: Vec::new(),
            excluded: Vec::new(),
            distribution: GradeCounts::default(),
            symbology: GradeSymbology::default(),
            search_query: String::new(),
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and apply the default filter.
    pub fn set_dataset(&mut self, dataset: CountyDataset) {
        self.range = FilterRange::default();
        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
        self.apply_filter();
    }

    /// The active predicate: slider bounds while the filter is enabled,
    /// default bounds otherwise.
    pub fn clause(&self) -> WhereClause {
        let range = if self.filter_enabled {
            self.range
        } else {
            FilterRange::default()
        };
        WhereClause::between(config::FILTER_FIELD, range)
    }

    /// Recompute the map partition and the chart distribution from the
    /// current predicate.  Both update in the same call, so the chart always
    /// reflects the last-applied filter.
    pub fn apply_filter(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        let clause = self.clause();
        self.distribution = grade_distribution(dataset, &clause);

        if self.filter_enabled {
            let (included, excluded) = partition_by_clause(dataset, &clause);
            self.included = included;
            self.excluded = excluded;
        } else {
            // Filter off: no dimming effect on the map.
            self.included = (0..dataset.len()).collect();
            self.excluded = Vec::new();
        }

        log::debug!(
            "applied filter {clause}: {} of {} counties match",
            self.distribution.total(),
            dataset.len()
        );
    }

    /// Slider change.
    pub fn set_range(&mut self, range: FilterRange) {
        if range != self.range {
            self.range = range;
            self.apply_filter();
        }
    }

    /// Checkbox toggle.  Disabling resets the slider to the default bounds
    /// and clears the dimming effect.
    pub fn set_filter_enabled(&mut self, enabled: bool) {
        self.filter_enabled = enabled;
        if !enabled {
            self.range = FilterRange::default();
        }
        self.apply_filter();
    }

    /// First county whose name contains the search text, case-insensitively.
    pub fn search_match(&self) -> Option<usize> {
        let query = self.search_query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        let dataset = self.dataset.as_ref()?;
        dataset
            .counties
            .iter()
            .position(|county| county.name.to_lowercase().contains(&query))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::data::model::{AttributeValue, County, CountyDataset, Grade};

    use super::*;

    fn county(grade: Grade, score: f64) -> County {
        let mut attributes = BTreeMap::new();
        attributes.insert(
            config::FILTER_FIELD.to_string(),
            AttributeValue::Float(score),
        );
        County {
            name: format!("{grade} {score}"),
            grade,
            rings: vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]],
            attributes,
        }
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(CountyDataset::from_counties(vec![
            county(Grade::A, 95.0),
            county(Grade::B, 75.0),
            county(Grade::D, 45.0),
            county(Grade::F, 5.0),
        ]));
        state
    }

    #[test]
    fn loading_a_dataset_applies_the_default_filter() {
        let state = loaded_state();
        assert_eq!(state.included, [0, 1, 2, 3]);
        assert!(state.excluded.is_empty());
        assert_eq!(state.distribution.total(), 4);
        assert_eq!(
            state.clause().to_string(),
            "\"grade_distance\" BETWEEN 0 AND 100"
        );
    }

    #[test]
    fn narrowing_the_range_dims_the_rest_and_updates_the_chart() {
        let mut state = loaded_state();
        state.set_range(FilterRange {
            min: 40.0,
            max: 80.0,
        });

        assert_eq!(state.included, [1, 2]);
        assert_eq!(state.excluded, [0, 3]);
        assert_eq!(state.distribution.count(Grade::B), 1);
        assert_eq!(state.distribution.count(Grade::D), 1);
        assert_eq!(state.distribution.count(Grade::A), 0);
        // Chart and map always agree on the matched set.
        assert_eq!(state.distribution.total() as usize, state.included.len());
    }

    #[test]
    fn disabling_the_filter_resets_range_and_clears_the_effect() {
        let mut state = loaded_state();
        state.set_range(FilterRange {
            min: 40.0,
            max: 80.0,
        });
        state.set_filter_enabled(false);

        assert_eq!(state.range, FilterRange::default());
        assert!(state.excluded.is_empty());
        assert_eq!(state.included.len(), 4);
        assert_eq!(state.distribution.total(), 4);
    }

    #[test]
    fn search_matches_names_case_insensitively() {
        let mut state = loaded_state();
        state.search_query = "a 95".to_string();
        assert_eq!(state.search_match(), Some(0));

        state.search_query = "  ".to_string();
        assert_eq!(state.search_match(), None);

        state.search_query = "nowhere".to_string();
        assert_eq!(state.search_match(), None);
    }

    #[test]
    fn reenabling_the_filter_starts_from_default_bounds() {
        let mut state = loaded_state();
        state.set_range(FilterRange {
            min: 40.0,
            max: 80.0,
        });
        state.set_filter_enabled(false);
        state.set_filter_enabled(true);

        assert_eq!(
            state.clause().to_string(),
            "\"grade_distance\" BETWEEN 0 AND 100"
        );
        assert!(state.excluded.is_empty());
    }
}
