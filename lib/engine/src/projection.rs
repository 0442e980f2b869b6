//! Key projection
//!
//! Resolves a strategy for every join column pair before any matching starts,
//! then hands out synthetic key columns: right keys once, left keys per chunk.

use fuzzyjoin_core::{JoinSpec, KeyColumn, KeyTuple, Result, Table};
use fuzzyjoin_similarity::{classify, prepare, MatchCategory, MatchStrategy};
use std::ops::Range;
use tracing::debug;

/// Row identifier column that only the left side keeps
pub const ROW_INDEX_COLUMN: &str = "d3mIndex";

pub struct KeyProjector<'a> {
    strategies: Vec<Box<dyn MatchStrategy + 'a>>,
    /// Right columns left out of the output
    dropped: Vec<String>,
}

impl<'a> KeyProjector<'a> {
    /// Classify and prepare every column pair in spec order
    ///
    /// Fails on the first pair that is missing, cannot be classified or cannot
    /// be prepared.
    pub fn new(left: &'a Table, right: &'a Table, spec: &JoinSpec) -> Result<Self> {
        let mut strategies = Vec::with_capacity(spec.columns.len());
        let mut dropped: Vec<String> = Vec::new();

        for (index, column_spec) in spec.columns.iter().enumerate() {
            let left_column = left.column(&column_spec.left)?;
            let right_column = right.column(&column_spec.right)?;
            let category = classify(&left_column.semantic_types, &right_column.semantic_types)?;
            debug!(
                index,
                left = %column_spec.left,
                right = %column_spec.right,
                %category,
                absolute = column_spec.absolute,
                accuracy = column_spec.accuracy,
                "resolved match category"
            );

            strategies.push(prepare(index, column_spec, category, left_column, right_column)?);
            if !dropped.contains(&column_spec.right) {
                dropped.push(column_spec.right.clone());
            }
        }

        if right.contains(ROW_INDEX_COLUMN) && !dropped.iter().any(|c| c == ROW_INDEX_COLUMN) {
            dropped.push(ROW_INDEX_COLUMN.to_string());
        }

        Ok(Self {
            strategies,
            dropped,
        })
    }

    pub fn categories(&self) -> Vec<MatchCategory> {
        self.strategies.iter().map(|s| s.category()).collect()
    }

    pub fn dropped_columns(&self) -> &[String] {
        &self.dropped
    }

    /// Complete key tuple of a right row, `None` if any key is null
    pub fn right_tuple(&self, row: usize) -> Option<KeyTuple> {
        let mut tuple = KeyTuple::new();
        for strategy in &self.strategies {
            for column in strategy.right_keys() {
                tuple.push(column.keys.get(row)?.clone()?);
            }
        }
        Some(tuple)
    }

    /// Left key columns for `rows`, in the same order as the right key tuple
    pub fn left_keys(&self, rows: Range<usize>) -> Result<Vec<KeyColumn>> {
        let mut columns = Vec::new();
        for strategy in &self.strategies {
            columns.extend(strategy.left_keys(rows.clone())?);
        }
        Ok(columns)
    }
}
