/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .parquet / .geojson / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → CountyDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ CountyDataset │  Vec<County>, attribute index, extent
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐     ┌──────────┐
///   │  filter   │────│  query    │  range predicate → partition, grade counts
///   └──────────┘     └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod query;
