use ahash::AHashMap;
use fuzzyjoin_core::{Column, Error, JoinColumnSpec, Key, KeyColumn, Result};
use ordered_float::OrderedFloat;
use std::borrow::Cow;
use std::ops::Range;
use tracing::warn;

use super::{key_name, null_key_column, MatchStrategy};
use crate::classify::MatchCategory;
use crate::distance::{nearest_number, numeric_tolerance};

/// Per-dimension numeric matching of fixed-length vectors
///
/// Every dimension gets its own key column, so a row joins only when all of
/// its dimensions matched the same right row.
pub struct VectorMatch<'a> {
    left: &'a Column,
    index: usize,
    accuracy: f64,
    absolute: bool,
    dims: usize,
    /// Non-null right values per dimension, in row order
    choices: Vec<Vec<f64>>,
    right_keys: Vec<KeyColumn>,
}

impl<'a> VectorMatch<'a> {
    pub fn new(
        index: usize,
        spec: &JoinColumnSpec,
        left: &'a Column,
        right: &'a Column,
    ) -> Result<Self> {
        let left_dims = list_len(left)?;
        let right_dims = list_len(right)?;
        let dims = match (left_dims, right_dims) {
            (Some(l), Some(r)) if l != r => {
                return Err(Error::DimensionMismatch {
                    column: left.name.clone(),
                    expected: r,
                    actual: l,
                })
            }
            (Some(d), _) | (None, Some(d)) => d,
            (None, None) => 0,
        };

        let lists = coerce_float_lists(right, 0..right.len())?;

        let mut choices = vec![Vec::new(); dims];
        let mut right_keys = Vec::with_capacity(dims.max(1));
        for (d, dim_choices) in choices.iter_mut().enumerate() {
            let values: Vec<Option<f64>> = lists
                .iter()
                .map(|list| list.as_ref().and_then(|l| l.get(d).copied()))
                .collect();
            dim_choices.extend(values.iter().flatten().filter(|x| !x.is_nan()));
            right_keys.push(KeyColumn::new(
                key_name("right", MatchCategory::Vector, index, Some(d)),
                values.into_iter().map(|x| x.and_then(Key::number)).collect(),
            ));
        }

        if dims == 0 {
            warn!(
                left = %left.name,
                right = %right.name,
                "vector columns have no dimensions, nothing will match"
            );
            right_keys.push(null_key_column(
                key_name("right", MatchCategory::Vector, index, None),
                right.len(),
            ));
        }

        Ok(Self {
            left,
            index,
            accuracy: spec.accuracy,
            absolute: spec.absolute,
            dims,
            choices,
            right_keys,
        })
    }

    pub fn dims(&self) -> usize {
        self.dims
    }
}

impl MatchStrategy for VectorMatch<'_> {
    fn category(&self) -> MatchCategory {
        MatchCategory::Vector
    }

    fn right_keys(&self) -> &[KeyColumn] {
        &self.right_keys
    }

    fn left_keys(&self, rows: Range<usize>) -> Result<Vec<KeyColumn>> {
        let len = rows.len();
        if self.dims == 0 {
            return Ok(vec![null_key_column(
                key_name("left", MatchCategory::Vector, self.index, None),
                len,
            )]);
        }

        let lists = coerce_float_lists(self.left, rows)?;
        let mut columns = Vec::with_capacity(self.dims);
        for (d, choices) in self.choices.iter().enumerate() {
            let mut matches: AHashMap<OrderedFloat<f64>, Option<f64>> = AHashMap::new();
            let keys = lists
                .iter()
                .map(|list| {
                    let x = list.as_ref().and_then(|l| l.get(d).copied())?;
                    let matched = *matches.entry(OrderedFloat(x)).or_insert_with(|| {
                        let tolerance = numeric_tolerance(x, self.accuracy, self.absolute);
                        nearest_number(x, choices.iter().copied(), tolerance)
                    });
                    matched.and_then(Key::number)
                })
                .collect();
            columns.push(KeyColumn::new(
                key_name("left", MatchCategory::Vector, self.index, Some(d)),
                keys,
            ));
        }
        Ok(columns)
    }
}

/// Length of the first non-null list in a column
pub(crate) fn list_len(column: &Column) -> Result<Option<usize>> {
    match column.first_non_null() {
        Some((row, value)) => value
            .to_float_list()
            .map(|list| list.map(|l| l.len()))
            .map_err(|reason| Error::invalid_value(&column.name, row, reason)),
        None => Ok(None),
    }
}

/// Read `rows` of a column as float lists
pub(crate) fn coerce_float_lists(
    column: &Column,
    rows: Range<usize>,
) -> Result<Vec<Option<Cow<'_, [f64]>>>> {
    let start = rows.start;
    column.values[rows]
        .iter()
        .enumerate()
        .map(|(offset, value)| {
            value
                .to_float_list()
                .map_err(|reason| Error::invalid_value(&column.name, start + offset, reason))
        })
        .collect()
}
