//! # fuzzyjoin Core
//!
//! Core data model for the fuzzyjoin engine.
//!
//! This crate provides the types every other crate builds on:
//!
//! - [`Table`] / [`Column`] - Positional tabular data with declared semantic types
//! - [`Value`] - Nullable cell values (numbers, text, booleans, vectors)
//! - [`Key`] / [`KeyColumn`] - Hashable synthetic join keys
//! - [`JoinConfig`] / [`JoinSpec`] - Raw and validated join parameters
//! - [`Dataset`] - Named resources and main-table selection
//!
//! ## Example
//!
//! ```rust
//! use fuzzyjoin_core::{Column, JoinConfig, JoinMode, SemanticType, Table, Value};
//!
//! let table = Table::new(vec![
//!     Column::new("name", vec![Value::from("Alice"), Value::from("Bob")])
//!         .with_type(SemanticType::Text),
//! ])
//! .unwrap();
//! assert_eq!(table.num_rows(), 2);
//!
//! let spec = JoinConfig::single("name", "name", 0.8).validate().unwrap();
//! assert_eq!(spec.mode, JoinMode::Left);
//! ```

pub mod column;
pub mod config;
pub mod dataset;
pub mod error;
pub mod key;
pub mod table;
pub mod value;

pub use column::{Column, SemanticType};
pub use config::{JoinColumnSpec, JoinConfig, JoinMode, JoinSpec, OneOrMany, DEFAULT_CHUNKS};
pub use dataset::{Dataset, MAIN_RESOURCE_ID};
pub use error::{Error, Result};
pub use key::{key_tuple, Key, KeyColumn, KeyTuple};
pub use table::Table;
pub use value::{parse_float_list, Value};
