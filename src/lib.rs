//! # fuzzyjoin
//!
//! Approximate equi-joins over tabular data.
//!
//! Rows of two tables are joined when their join columns are *close enough*
//! rather than equal: strings by similarity score, numbers and vectors within
//! a relative or absolute tolerance, polygons within a distance in meters and
//! timestamps within a window derived from the data. The strategy for each
//! column pair is picked from the semantic types the columns declare.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! fuzzyjoin --left people.json --right contacts.json --config join.json
//! ```
//!
//! where `join.json` holds the join parameters:
//!
//! ```json
//! { "left_col": "name", "right_col": "name", "accuracy": 0.8, "join_type": "inner" }
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use fuzzyjoin::prelude::*;
//!
//! let left = Table::new(vec![
//!     Column::new("id", vec![Value::Int(1)]).with_type(SemanticType::Integer),
//!     Column::new("name", vec![Value::from("Alice")]).with_type(SemanticType::Text),
//! ])
//! .unwrap();
//! let right = Table::new(vec![
//!     Column::new("id", vec![Value::Int(10)]).with_type(SemanticType::Integer),
//!     Column::new("name", vec![Value::from("Alicia")]).with_type(SemanticType::Text),
//! ])
//! .unwrap();
//!
//! let mut config = JoinConfig::single("name", "name", 0.6);
//! config.join_type = "inner".to_string();
//! let output = fuzzy_join(&left, &right, &config.validate().unwrap()).unwrap();
//!
//! assert_eq!(output.table.num_rows(), 1);
//! assert_eq!(output.table.get(0, "id_right"), Some(&Value::Int(10)));
//! ```
//!
//! ## Crate Structure
//!
//! - `fuzzyjoin-core` - Tables, values, keys, join configuration and errors
//! - `fuzzyjoin-similarity` - Type classification, scorers and match strategies
//! - `fuzzyjoin-engine` - Key projection, chunked scheduling and merging
//!
//! ## Features
//!
//! - **String matching**: Weighted-ratio similarity with an accuracy threshold
//! - **Numeric matching**: Nearest value within a relative or absolute tolerance
//! - **Vector matching**: Per-dimension numeric matching of fixed-length vectors
//! - **Geo matching**: Haversine narrowing of polygons, tolerance in meters
//! - **DateTime matching**: Nearest timestamp within a range-derived window
//! - **Parallel**: Left chunks matched on a thread pool, output independent of chunking

// Re-export core types
pub use fuzzyjoin_core::{
    Column, Dataset, Error, JoinColumnSpec, JoinConfig, JoinMode, JoinSpec, OneOrMany, Result,
    SemanticType, Table, Value, MAIN_RESOURCE_ID,
};

// Re-export matching
pub use fuzzyjoin_similarity::{classify, MatchCategory};

// Re-export the engine
pub use fuzzyjoin_engine::{fuzzy_join, join_datasets, DatasetJoin, JoinOutput};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        classify, fuzzy_join, join_datasets, Column, Dataset, DatasetJoin, Error, JoinColumnSpec,
        JoinConfig, JoinMode, JoinOutput, JoinSpec, MatchCategory, Result, SemanticType, Table,
        Value,
    };
}
