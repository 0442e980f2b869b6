//! Hashable join keys
//!
//! Synthetic key columns hold `Option<Key>`; `None` never equals anything,
//! including another `None`.

use ordered_float::OrderedFloat;
use smallvec::SmallVec;

/// A hashable, exactly comparable key value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Text(String),
    Number(OrderedFloat<f64>),
    Bool(bool),
    /// Microseconds since the Unix epoch
    Timestamp(i64),
    /// Latitude, longitude in degrees
    Point(OrderedFloat<f64>, OrderedFloat<f64>),
    Vector(Vec<OrderedFloat<f64>>),
}

impl Key {
    /// Numeric key; NaN has no key
    #[inline]
    pub fn number(x: f64) -> Option<Key> {
        if x.is_nan() {
            None
        } else {
            Some(Key::Number(OrderedFloat(normalize_zero(x))))
        }
    }

    #[inline]
    pub fn point(lat: f64, lon: f64) -> Option<Key> {
        if lat.is_nan() || lon.is_nan() {
            None
        } else {
            Some(Key::Point(
                OrderedFloat(normalize_zero(lat)),
                OrderedFloat(normalize_zero(lon)),
            ))
        }
    }

    pub fn vector(v: &[f64]) -> Option<Key> {
        if v.iter().any(|x| x.is_nan()) {
            return None;
        }
        Some(Key::Vector(
            v.iter().map(|x| OrderedFloat(normalize_zero(*x))).collect(),
        ))
    }
}

#[inline]
fn normalize_zero(x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x
    }
}

/// A complete (all non-null) key tuple, one entry per synthetic key column
pub type KeyTuple = SmallVec<[Key; 4]>;

/// A synthetic key column produced by a match strategy
#[derive(Debug, Clone, PartialEq)]
pub struct KeyColumn {
    pub name: String,
    pub keys: Vec<Option<Key>>,
}

impl KeyColumn {
    pub fn new(name: impl Into<String>, keys: Vec<Option<Key>>) -> Self {
        Self {
            name: name.into(),
            keys,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Gather the key tuple for `row` across `columns`
///
/// Returns `None` as soon as any column holds a null key at that row, so a
/// partially matched row never joins.
pub fn key_tuple(columns: &[KeyColumn], row: usize) -> Option<KeyTuple> {
    let mut tuple = KeyTuple::with_capacity(columns.len());
    for column in columns {
        tuple.push(column.keys.get(row)?.clone()?);
    }
    Some(tuple)
}
