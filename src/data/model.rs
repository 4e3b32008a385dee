use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Grade – the social-distancing grade assigned to a county
// ---------------------------------------------------------------------------

/// Letter grade of a county, best first. There is no E.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Fixed category order used by the distribution chart and the legend.
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    /// Position in [`Grade::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid grade '{0}', expected one of A, B, C, D, F")]
pub struct GradeParseError(pub String);

impl FromStr for Grade {
    type Err = GradeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Grade::A),
            "B" | "b" => Ok(Grade::B),
            "C" | "c" => Ok(Grade::C),
            "D" | "d" => Ok(Grade::D),
            "F" | "f" => Ok(Grade::F),
            other => Err(GradeParseError(other.to_string())),
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AttributeValue – a single feature attribute
// ---------------------------------------------------------------------------

/// A dynamically-typed feature attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl AttributeValue {
    /// Numeric view used by range predicates.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(v) => Some(*v),
            AttributeValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(s) => write!(f, "{s}"),
            AttributeValue::Int(i) => write!(f, "{i}"),
            AttributeValue::Float(v) => write!(f, "{v:.2}"),
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Null => write!(f, "<null>"),
        }
    }
}

// ---------------------------------------------------------------------------
// County – one map feature
// ---------------------------------------------------------------------------

/// A closed ring of `[lon, lat]` vertices. The closing edge is implicit.
pub type Ring = Vec<[f64; 2]>;

/// One county: polygon geometry plus attributes.
#[derive(Debug, Clone)]
pub struct County {
    /// Display name shown in the hover panel.
    pub name: String,
    /// Assigned social-distancing grade.
    pub grade: Grade,
    /// Polygon rings; the first is the outer boundary.
    pub rings: Vec<Ring>,
    /// Remaining attributes (fips, state, grade_distance, …).
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl County {
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Even-odd ray-casting hit test across all rings, so interior rings
    /// act as holes.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let mut inside = false;
        for ring in &self.rings {
            let n = ring.len();
            if n < 3 {
                continue;
            }
            let mut j = n - 1;
            for i in 0..n {
                let [xi, yi] = ring[i];
                let [xj, yj] = ring[j];
                if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi {
                    inside = !inside;
                }
                j = i;
            }
        }
        inside
    }
}

// ---------------------------------------------------------------------------
// CountyDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Lon/lat extent of a dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Bounds {
    fn point(lon: f64, lat: f64) -> Self {
        Bounds {
            min_lon: lon,
            min_lat: lat,
            max_lon: lon,
            max_lat: lat,
        }
    }

    fn expand(mut self, lon: f64, lat: f64) -> Self {
        self.min_lon = self.min_lon.min(lon);
        self.min_lat = self.min_lat.min(lat);
        self.max_lon = self.max_lon.max(lon);
        self.max_lat = self.max_lat.max(lat);
        self
    }
}

/// The full parsed dataset with a pre-computed attribute index and extent.
#[derive(Debug, Clone)]
pub struct CountyDataset {
    /// All counties (features).
    pub counties: Vec<County>,
    /// Ordered union of attribute names across all counties.
    pub attribute_names: Vec<String>,
    /// Geographic extent over all rings (None for an empty dataset).
    pub bounds: Option<Bounds>,
}

impl CountyDataset {
    /// Build the attribute index and extent from the loaded counties.
    pub fn from_counties(counties: Vec<County>) -> Self {
        let mut names: BTreeSet<String> = BTreeSet::new();
        let mut bounds: Option<Bounds> = None;

        for county in &counties {
            for name in county.attributes.keys() {
                names.insert(name.clone());
            }
            for ring in &county.rings {
                for &[lon, lat] in ring {
                    bounds = Some(match bounds {
                        Some(b) => b.expand(lon, lat),
                        None => Bounds::point(lon, lat),
                    });
                }
            }
        }

        CountyDataset {
            counties,
            attribute_names: names.into_iter().collect(),
            bounds,
        }
    }

    /// Number of counties.
    pub fn len(&self) -> usize {
        self.counties.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.counties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> Ring {
        vec![
            [x0, y0],
            [x0 + size, y0],
            [x0 + size, y0 + size],
            [x0, y0 + size],
        ]
    }

    fn county_with_rings(rings: Vec<Ring>) -> County {
        County {
            name: "Test".to_string(),
            grade: Grade::B,
            rings,
            attributes: BTreeMap::new(),
        }
    }

    #[test]
    fn grade_parses_letters_case_insensitively() {
        assert_eq!("A".parse::<Grade>(), Ok(Grade::A));
        assert_eq!(" f ".parse::<Grade>(), Ok(Grade::F));
        assert_eq!("E".parse::<Grade>(), Err(GradeParseError("E".to_string())));
    }

    #[test]
    fn grade_order_is_a_through_f() {
        let labels: Vec<&str> = Grade::ALL.iter().map(|g| g.as_str()).collect();
        assert_eq!(labels, ["A", "B", "C", "D", "F"]);
        for (i, grade) in Grade::ALL.iter().enumerate() {
            assert_eq!(grade.index(), i);
        }
    }

    #[test]
    fn contains_hits_inside_and_misses_outside() {
        let county = county_with_rings(vec![square(0.0, 0.0, 10.0)]);
        assert!(county.contains(5.0, 5.0));
        assert!(!county.contains(15.0, 5.0));
        assert!(!county.contains(-1.0, -1.0));
    }

    #[test]
    fn interior_ring_is_a_hole() {
        let county = county_with_rings(vec![square(0.0, 0.0, 10.0), square(4.0, 4.0, 2.0)]);
        assert!(county.contains(1.0, 1.0));
        assert!(!county.contains(5.0, 5.0));
    }

    #[test]
    fn dataset_indexes_attributes_and_extent() {
        let mut a = county_with_rings(vec![square(-100.0, 40.0, 1.0)]);
        a.attributes
            .insert("fips".to_string(), AttributeValue::Text("01001".into()));
        let mut b = county_with_rings(vec![square(-90.0, 30.0, 1.0)]);
        b.attributes
            .insert("population".to_string(), AttributeValue::Int(52_000));

        let dataset = CountyDataset::from_counties(vec![a, b]);
        assert_eq!(dataset.attribute_names, ["fips", "population"]);

        let bounds = dataset.bounds.unwrap();
        assert_eq!(bounds.min_lon, -100.0);
        assert_eq!(bounds.max_lon, -89.0);
        assert_eq!(bounds.min_lat, 30.0);
        assert_eq!(bounds.max_lat, 41.0);
    }
}
