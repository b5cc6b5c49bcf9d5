/// Data layer: core types, loading, categorization, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → FrequencyTable (wide: time + unit columns)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ FrequencyTable │  time Vec, Vec<UnitSeries> in source column order
///   └──────────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ categorize  │  apply name predicates per condition → CategorizedTable
///   └────────────┘     (long format: time, condition, spike_freq, unit_name)
///        │
///        ▼
///   ┌────────────┐
///   │ aggregate   │  group-by means / stds for the plot layer
///   └────────────┘
/// ```

pub mod aggregate;
pub mod categorize;
pub mod filter;
pub mod loader;
pub mod model;
pub mod timeparse;
