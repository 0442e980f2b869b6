//! # fuzzyjoin Similarity
//!
//! Turns a left/right column pair into synthetic join keys.
//!
//! ## Features
//!
//! - **Classification**: Picks a [`MatchCategory`] from declared semantic types
//! - **String matching**: Weighted-ratio scoring with per-distinct-value memoisation
//! - **Numeric / Vector matching**: Nearest value within a relative or absolute tolerance
//! - **Geo matching**: Haversine narrowing of polygons point by point
//! - **DateTime matching**: Nearest timestamp within a range-derived window
//!
//! ## Example
//!
//! ```rust
//! use fuzzyjoin_core::{Column, JoinColumnSpec, SemanticType, Value};
//! use fuzzyjoin_similarity::{classify, prepare, MatchCategory};
//!
//! let left = Column::new("price", vec![Value::from(100.0)]).with_type(SemanticType::Float);
//! let right = Column::new("price", vec![Value::from(108.0)]).with_type(SemanticType::Float);
//!
//! let category = classify(&left.semantic_types, &right.semantic_types).unwrap();
//! assert_eq!(category, MatchCategory::Numeric);
//!
//! let spec = JoinColumnSpec::new("price", "price", 0.9);
//! let strategy = prepare(0, &spec, category, &left, &right).unwrap();
//! let keys = strategy.left_keys(0..1).unwrap();
//! assert_eq!(keys[0].keys, strategy.right_keys()[0].keys);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Semantic   │────>│  Classify   │────>│  Strategy   │
//! │   types     │     │ (category)  │     │ (prepare)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                      ┌─────────────┐           │
//!                      │ Right keys  │<──────────┤ once
//!                      └─────────────┘           │
//!                      ┌─────────────┐           │
//!                      │ Left keys   │<──────────┘ per chunk
//!                      └─────────────┘
//! ```

pub mod classify;
pub mod distance;
pub mod fuzz;
pub mod strategy;

// Re-export main types for convenience
pub use classify::{classify, MatchCategory};
pub use distance::{haversine_meters, nearest_number, nearest_timestamp, numeric_tolerance, LatLon};
pub use fuzz::{default_process, extract_one, weighted_ratio};
pub use strategy::{
    parse_timestamp, prepare, DateTimeMatch, GeoMatch, MatchStrategy, NumericMatch, StringMatch,
    VectorMatch,
};
