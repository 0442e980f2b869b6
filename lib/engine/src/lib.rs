//! # fuzzyjoin Engine
//!
//! Runs a fuzzy join end to end:
//!
//! 1. [`KeyProjector`] classifies every column pair and prepares its strategy
//! 2. [`RightIndex`] hashes the complete right key tuples
//! 3. [`ChunkScheduler`] matches row-contiguous left chunks on a rayon pool
//! 4. [`row_pairs`] / [`assemble`] build the output for the join mode
//!
//! ## Example
//!
//! ```rust
//! use fuzzyjoin_core::{Column, JoinColumnSpec, JoinMode, JoinSpec, SemanticType, Table, Value};
//! use fuzzyjoin_engine::fuzzy_join;
//!
//! let left = Table::new(vec![
//!     Column::new("name", vec![Value::from("Alice")]).with_type(SemanticType::Text),
//! ])
//! .unwrap();
//! let right = Table::new(vec![
//!     Column::new("name", vec![Value::from("Alicia")]).with_type(SemanticType::Text),
//!     Column::new("city", vec![Value::from("Rome")]).with_type(SemanticType::Text),
//! ])
//! .unwrap();
//!
//! let spec = JoinSpec::new(vec![JoinColumnSpec::new("name", "name", 0.6)], JoinMode::Inner);
//! let output = fuzzy_join(&left, &right, &spec).unwrap();
//! assert_eq!(output.table.get(0, "city"), Some(&Value::from("Rome")));
//! ```

pub mod join;
pub mod merge;
pub mod projection;
pub mod scheduler;

pub use join::{fuzzy_join, join_datasets, DatasetJoin};
pub use merge::{assemble, row_pairs, JoinOutput, RightIndex, RowMatches, RowPair, LEFT_SUFFIX, RIGHT_SUFFIX};
pub use projection::{KeyProjector, ROW_INDEX_COLUMN};
pub use scheduler::{partition, ChunkScheduler};
