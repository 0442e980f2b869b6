use ahash::{AHashMap, AHashSet};
use fuzzyjoin_core::{Column, Error, JoinColumnSpec, Key, KeyColumn, Result};
use ordered_float::OrderedFloat;
use std::ops::Range;

use super::{key_name, MatchStrategy};
use crate::classify::MatchCategory;
use crate::distance::{nearest_number, numeric_tolerance};

/// Nearest-number matching against the distinct right values
pub struct NumericMatch<'a> {
    left: &'a Column,
    index: usize,
    accuracy: f64,
    absolute: bool,
    /// Distinct right numbers in first-appearance order
    choices: Vec<f64>,
    right_keys: Vec<KeyColumn>,
}

impl<'a> NumericMatch<'a> {
    pub fn new(
        index: usize,
        spec: &JoinColumnSpec,
        left: &'a Column,
        right: &'a Column,
    ) -> Result<Self> {
        let numbers = coerce_numbers(right, 0..right.len())?;

        let mut seen = AHashSet::new();
        let choices: Vec<f64> = numbers
            .iter()
            .flatten()
            .copied()
            .filter(|x| !x.is_nan() && seen.insert(OrderedFloat(*x)))
            .collect();

        let keys = numbers.iter().map(|x| x.and_then(Key::number)).collect();

        Ok(Self {
            left,
            index,
            accuracy: spec.accuracy,
            absolute: spec.absolute,
            choices,
            right_keys: vec![KeyColumn::new(
                key_name("right", MatchCategory::Numeric, index, None),
                keys,
            )],
        })
    }
}

impl MatchStrategy for NumericMatch<'_> {
    fn category(&self) -> MatchCategory {
        MatchCategory::Numeric
    }

    fn right_keys(&self) -> &[KeyColumn] {
        &self.right_keys
    }

    fn left_keys(&self, rows: Range<usize>) -> Result<Vec<KeyColumn>> {
        let numbers = coerce_numbers(self.left, rows)?;

        let mut matches: AHashMap<OrderedFloat<f64>, Option<f64>> = AHashMap::new();
        for x in numbers.iter().flatten() {
            matches.entry(OrderedFloat(*x)).or_insert_with(|| {
                let tolerance = numeric_tolerance(*x, self.accuracy, self.absolute);
                nearest_number(*x, self.choices.iter().copied(), tolerance)
            });
        }

        let keys = numbers
            .iter()
            .map(|x| {
                x.and_then(|x| matches.get(&OrderedFloat(x)).copied().flatten())
                    .and_then(Key::number)
            })
            .collect();
        Ok(vec![KeyColumn::new(
            key_name("left", MatchCategory::Numeric, self.index, None),
            keys,
        )])
    }
}

/// Coerce `rows` of a column to numbers, failing on the first unparseable value
pub(crate) fn coerce_numbers(column: &Column, rows: Range<usize>) -> Result<Vec<Option<f64>>> {
    let start = rows.start;
    column.values[rows]
        .iter()
        .enumerate()
        .map(|(offset, value)| {
            value
                .to_number()
                .map_err(|reason| Error::invalid_value(&column.name, start + offset, reason))
        })
        .collect()
}
