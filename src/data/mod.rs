/// Data layer: table model and loading.
///
/// Architecture:
/// ```text
///  results.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table, validate shape
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │    Table      │  Vec<Column>, roles derived from header prefixes
///   └──────────────┘
/// ```

pub mod loader;
pub mod model;
