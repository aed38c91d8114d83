//! Data layer: core types and loading.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Dataset (type inference per column)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Dataset   │  Vec<Column>, equal lengths, read-only from here on
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;
