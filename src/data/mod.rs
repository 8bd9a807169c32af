/// Data layer: core types, loading, and window filtering.
///
/// Architecture:
/// ```text
///  esp32_data.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  schema check → parse → derive irradiance → clean
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  readings sorted by timestamp
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply TimeWindow → selected indices
///   └──────────┘
/// ```

pub mod calibration;
pub mod filter;
pub mod loader;
pub mod model;
