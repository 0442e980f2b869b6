//! Tolerance match strategies
//!
//! A strategy turns one left/right column pair into synthetic key columns.
//! Right-side keys are computed once when the strategy is prepared; left-side
//! keys are computed per row range so chunks can be matched independently.
//! A left key equals a right key exactly when the left value was matched to
//! that right value.

use fuzzyjoin_core::{Column, JoinColumnSpec, Key, KeyColumn, Result};
use std::ops::Range;

use crate::classify::MatchCategory;

mod datetime;
mod geo;
mod numeric;
mod string;
mod vector;

pub use datetime::{parse_timestamp, DateTimeMatch};
pub use geo::GeoMatch;
pub use numeric::NumericMatch;
pub use string::StringMatch;
pub use vector::VectorMatch;

/// Produces synthetic join keys for one column pair
pub trait MatchStrategy: Send + Sync {
    fn category(&self) -> MatchCategory;

    /// Key columns for every right row
    fn right_keys(&self) -> &[KeyColumn];

    /// Key columns for the left rows in `rows`, aligned with `right_keys`
    fn left_keys(&self, rows: Range<usize>) -> Result<Vec<KeyColumn>>;
}

/// Build the strategy for `category`
///
/// Fails before any matching work when the pair cannot be matched with the
/// given parameters (geo without an absolute tolerance, unparseable values,
/// inconsistent vector lengths).
pub fn prepare<'a>(
    index: usize,
    spec: &JoinColumnSpec,
    category: MatchCategory,
    left: &'a Column,
    right: &'a Column,
) -> Result<Box<dyn MatchStrategy + 'a>> {
    let strategy: Box<dyn MatchStrategy + 'a> = match category {
        MatchCategory::String => Box::new(StringMatch::new(index, spec, left, right)),
        MatchCategory::Numeric => Box::new(NumericMatch::new(index, spec, left, right)?),
        MatchCategory::Geo => Box::new(GeoMatch::new(index, spec, left, right)?),
        MatchCategory::Vector => Box::new(VectorMatch::new(index, spec, left, right)?),
        MatchCategory::DateTime => Box::new(DateTimeMatch::new(index, spec, left, right)?),
    };
    Ok(strategy)
}

/// Synthetic column name, e.g. `lefty_numeric0` or `righty_vector1_2`
pub(crate) fn key_name(side: &str, category: MatchCategory, index: usize, part: Option<usize>) -> String {
    match part {
        Some(part) => format!("{}y_{}{}_{}", side, category, index, part),
        None => format!("{}y_{}{}", side, category, index),
    }
}

/// A single all-null key column, used when a vector-valued pair has no
/// dimensions to compare so nothing can match
pub(crate) fn null_key_column(name: String, len: usize) -> KeyColumn {
    KeyColumn::new(name, vec![None; len])
}

/// Keys of the value at `row` of each column, one per column
pub(crate) fn keys_at(columns: &[KeyColumn], row: usize) -> impl Iterator<Item = Option<Key>> + '_ {
    columns.iter().map(move |c| c.keys[row].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuzzyjoin_core::{Error, Value};

    #[test]
    fn test_key_names() {
        assert_eq!(key_name("left", MatchCategory::Numeric, 0, None), "lefty_numeric0");
        assert_eq!(key_name("right", MatchCategory::Vector, 1, Some(2)), "righty_vector1_2");
    }

    #[test]
    fn test_prepare_dispatches_by_category() {
        let left = Column::new("a", vec![Value::Int(1)]);
        let right = Column::new("b", vec![Value::Int(1)]);
        let spec = JoinColumnSpec::new("a", "b", 1.0);
        let strategy = prepare(0, &spec, MatchCategory::Numeric, &left, &right).unwrap();
        assert_eq!(strategy.category(), MatchCategory::Numeric);
        assert_eq!(strategy.right_keys().len(), 1);
    }

    #[test]
    fn test_prepare_rejects_relative_geo() {
        let left = Column::new("a", vec![Value::from("1,2")]);
        let right = Column::new("b", vec![Value::from("1,2")]);
        let spec = JoinColumnSpec::new("a", "b", 0.5);
        assert!(matches!(
            prepare(0, &spec, MatchCategory::Geo, &left, &right),
            Err(Error::UnsupportedType(_))
        ));
    }
}
