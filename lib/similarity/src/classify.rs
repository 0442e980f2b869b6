//! Match category resolution
//!
//! Picks the matching strategy for a column pair from the semantic types the
//! two columns declare.

use fuzzyjoin_core::{Error, Result, SemanticType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Matching strategy family for one column pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchCategory {
    /// Fuzzy string similarity (Text, Categorical, Boolean)
    String,
    /// Nearest number within a tolerance (Integer, Float)
    Numeric,
    /// Point-by-point haversine narrowing (BoundingPolygon)
    Geo,
    /// Per-dimension numeric matching (FloatVector)
    Vector,
    /// Nearest timestamp within a range-derived window (DateTime)
    DateTime,
}

impl MatchCategory {
    /// Resolution order when a pair shares types from several categories
    pub const PRIORITY: [MatchCategory; 5] = [
        MatchCategory::String,
        MatchCategory::Numeric,
        MatchCategory::Geo,
        MatchCategory::Vector,
        MatchCategory::DateTime,
    ];

    /// Whether a semantic type belongs to this category
    pub fn accepts(self, semantic_type: &SemanticType) -> bool {
        match self {
            MatchCategory::String => matches!(
                semantic_type,
                SemanticType::Text | SemanticType::Categorical | SemanticType::Boolean
            ),
            MatchCategory::Numeric => {
                matches!(semantic_type, SemanticType::Integer | SemanticType::Float)
            }
            MatchCategory::Geo => matches!(semantic_type, SemanticType::BoundingPolygon),
            MatchCategory::Vector => matches!(semantic_type, SemanticType::FloatVector),
            MatchCategory::DateTime => matches!(semantic_type, SemanticType::DateTime),
        }
    }

    /// Whether a semantic type is joinable at all
    pub fn is_supported(semantic_type: &SemanticType) -> bool {
        Self::PRIORITY.iter().any(|c| c.accepts(semantic_type))
    }
}

impl fmt::Display for MatchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchCategory::String => "string",
            MatchCategory::Numeric => "numeric",
            MatchCategory::Geo => "geo",
            MatchCategory::Vector => "vector",
            MatchCategory::DateTime => "datetime",
        };
        f.write_str(name)
    }
}

/// Resolve the match category for a column pair
///
/// Types declared on both sides win, in [`MatchCategory::PRIORITY`] order.
/// Without a shared type, any two numeric types join numerically and any two
/// string-like types join as strings.
pub fn classify(
    left: &BTreeSet<SemanticType>,
    right: &BTreeSet<SemanticType>,
) -> Result<MatchCategory> {
    let shared: Vec<&SemanticType> = left
        .iter()
        .filter(|t| MatchCategory::is_supported(t) && right.contains(*t))
        .collect();

    if let Some(category) = MatchCategory::PRIORITY
        .into_iter()
        .find(|c| shared.iter().any(|t| c.accepts(t)))
    {
        return Ok(category);
    }

    let both = |category: MatchCategory| {
        left.iter().any(|t| category.accepts(t)) && right.iter().any(|t| category.accepts(t))
    };
    if both(MatchCategory::Numeric) {
        return Ok(MatchCategory::Numeric);
    }
    if both(MatchCategory::String) {
        return Ok(MatchCategory::String);
    }

    Err(Error::UnsupportedType(format!(
        "join not supported between types [{}] and [{}]",
        describe(left),
        describe(right)
    )))
}

fn describe(types: &BTreeSet<SemanticType>) -> String {
    types
        .iter()
        .map(SemanticType::name)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(list: &[SemanticType]) -> BTreeSet<SemanticType> {
        list.iter().cloned().collect()
    }

    #[test]
    fn test_shared_type_selected() {
        let left = types(&[SemanticType::DateTime, SemanticType::Other("Attribute".into())]);
        let right = types(&[SemanticType::DateTime]);
        assert_eq!(classify(&left, &right).unwrap(), MatchCategory::DateTime);
    }

    #[test]
    fn test_priority_order_on_multiple_shared_types() {
        let left = types(&[SemanticType::FloatVector, SemanticType::Text]);
        let right = types(&[SemanticType::FloatVector, SemanticType::Text]);
        assert_eq!(classify(&left, &right).unwrap(), MatchCategory::String);
    }

    #[test]
    fn test_shared_type_beats_promotion() {
        let left = types(&[SemanticType::Text, SemanticType::Integer]);
        let right = types(&[SemanticType::Categorical, SemanticType::Integer]);
        assert_eq!(classify(&left, &right).unwrap(), MatchCategory::Numeric);
    }

    #[test]
    fn test_numeric_promotion() {
        let left = types(&[SemanticType::Integer]);
        let right = types(&[SemanticType::Float]);
        assert_eq!(classify(&left, &right).unwrap(), MatchCategory::Numeric);
    }

    #[test]
    fn test_string_promotion() {
        let left = types(&[SemanticType::Categorical]);
        let right = types(&[SemanticType::Text]);
        assert_eq!(classify(&left, &right).unwrap(), MatchCategory::String);
    }

    #[test]
    fn test_unsupported_pair() {
        let left = types(&[SemanticType::Text]);
        let right = types(&[SemanticType::Integer]);
        assert!(matches!(classify(&left, &right), Err(Error::UnsupportedType(_))));

        let empty = BTreeSet::new();
        assert!(classify(&empty, &empty).is_err());
    }
}
