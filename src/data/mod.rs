/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ApplicationDataset (one read per process)
///   └──────────┘
///        │
///        ▼
///   ┌────────────────────┐
///   │ ApplicationDataset  │  Vec<Application>, filter option sets
///   └────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  set-membership predicates → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ summary / stats   │  grouped aggregates, histogram, box stats
///   └──────────────────┘
/// ```
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
pub mod summary;

// ---------------------------------------------------------------------------
// Whole-pipeline tests
// ---------------------------------------------------------------------------
