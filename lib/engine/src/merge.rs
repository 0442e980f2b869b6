//! Merge engine
//!
//! Equi-join on synthetic key tuples. Right tuples are hashed once; each
//! chunk probes the index with its left tuples. Row pairs for the join mode
//! are assembled over the whole left table so every mode is independent of
//! how the left table was chunked.

use ahash::{AHashMap, AHashSet};
use fuzzyjoin_core::{key_tuple, Column, JoinMode, KeyColumn, KeyTuple, Result, SemanticType, Table, Value};
use smallvec::SmallVec;

use crate::projection::KeyProjector;

/// Matched right rows of one left row, ascending
pub type RowMatches = SmallVec<[usize; 2]>;

/// A left/right row pair of the output; `None` is the null-filled side
pub type RowPair = (Option<usize>, Option<usize>);

pub const LEFT_SUFFIX: &str = "_left";
pub const RIGHT_SUFFIX: &str = "_right";

/// Hash index from complete right key tuples to right rows
pub struct RightIndex {
    buckets: AHashMap<KeyTuple, RowMatches>,
}

impl RightIndex {
    /// Index every right row whose key tuple has no nulls
    pub fn build(projector: &KeyProjector<'_>, right_rows: usize) -> Self {
        let mut buckets: AHashMap<KeyTuple, RowMatches> = AHashMap::new();
        for row in 0..right_rows {
            if let Some(tuple) = projector.right_tuple(row) {
                buckets.entry(tuple).or_default().push(row);
            }
        }
        Self { buckets }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Right rows matching each of the `rows` left rows described by `left_keys`
    pub fn probe(&self, left_keys: &[KeyColumn], rows: usize) -> Vec<RowMatches> {
        (0..rows)
            .map(|row| {
                key_tuple(left_keys, row)
                    .and_then(|tuple| self.buckets.get(&tuple).cloned())
                    .unwrap_or_default()
            })
            .collect()
    }
}

/// Output row pairs for `mode`
///
/// `matches` holds the matched right rows of every left row. Left-driven modes
/// follow left row order; `right` follows right row order; `outer` appends the
/// never-matched right rows after the left-driven rows. An empty left table
/// produces no rows in any mode.
pub fn row_pairs(mode: JoinMode, left_rows: usize, right_rows: usize, matches: &[RowMatches]) -> Vec<RowPair> {
    if left_rows == 0 {
        return Vec::new();
    }

    let mut pairs = Vec::new();
    match mode {
        JoinMode::Cross => {
            for l in 0..left_rows {
                pairs.extend((0..right_rows).map(|r| (Some(l), Some(r))));
            }
        }
        JoinMode::Inner | JoinMode::Left | JoinMode::Outer => {
            for (l, matched) in matches.iter().enumerate() {
                if matched.is_empty() {
                    if mode != JoinMode::Inner {
                        pairs.push((Some(l), None));
                    }
                } else {
                    pairs.extend(matched.iter().map(|&r| (Some(l), Some(r))));
                }
            }
            if mode == JoinMode::Outer {
                let mut seen = vec![false; right_rows];
                for &r in matches.iter().flatten() {
                    seen[r] = true;
                }
                pairs.extend((0..right_rows).filter(|&r| !seen[r]).map(|r| (None, Some(r))));
            }
        }
        JoinMode::Right => {
            let mut by_right: Vec<Vec<usize>> = vec![Vec::new(); right_rows];
            for (l, matched) in matches.iter().enumerate() {
                for &r in matched {
                    by_right[r].push(l);
                }
            }
            for (r, lefts) in by_right.iter().enumerate() {
                if lefts.is_empty() {
                    pairs.push((None, Some(r)));
                } else {
                    pairs.extend(lefts.iter().map(|&l| (Some(l), Some(r))));
                }
            }
        }
    }
    pairs
}

/// Result of a join
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutput {
    pub table: Table,
    /// Output columns holding vectors, tagged [`SemanticType::FloatVector`]
    pub vector_columns: Vec<String>,
}

/// Materialise the output table
///
/// Left columns come first, then the right columns not in `dropped`. Names
/// present on both sides get [`LEFT_SUFFIX`] / [`RIGHT_SUFFIX`]; the suffix is
/// repeated while the suffixed name is still taken.
pub fn assemble(left: &Table, right: &Table, dropped: &[String], pairs: &[RowPair]) -> Result<JoinOutput> {
    let kept_right: Vec<&Column> = right
        .columns()
        .iter()
        .filter(|c| !dropped.contains(&c.name))
        .collect();

    let right_names: AHashSet<&str> = kept_right.iter().map(|c| c.name.as_str()).collect();
    let left_names: AHashSet<&str> = left.column_names().collect();
    let mut taken: AHashSet<String> = left_names
        .iter()
        .chain(right_names.iter())
        .map(|name| name.to_string())
        .collect();

    let mut columns = Vec::with_capacity(left.num_columns() + kept_right.len());
    let mut vector_columns = Vec::new();

    for column in left.columns() {
        let name = if right_names.contains(column.name.as_str()) {
            suffixed(&column.name, LEFT_SUFFIX, &mut taken)
        } else {
            column.name.clone()
        };
        let values = pairs.iter().map(|(l, _)| take(column, *l)).collect();
        columns.push(output_column(name, column, values, &mut vector_columns));
    }

    for column in kept_right {
        let name = if left_names.contains(column.name.as_str()) {
            suffixed(&column.name, RIGHT_SUFFIX, &mut taken)
        } else {
            column.name.clone()
        };
        let values = pairs.iter().map(|(_, r)| take(column, *r)).collect();
        columns.push(output_column(name, column, values, &mut vector_columns));
    }

    Ok(JoinOutput {
        table: Table::new(columns)?,
        vector_columns,
    })
}

fn suffixed(name: &str, suffix: &str, taken: &mut AHashSet<String>) -> String {
    let mut candidate = format!("{}{}", name, suffix);
    while taken.contains(&candidate) {
        candidate.push_str(suffix);
    }
    taken.insert(candidate.clone());
    candidate
}

#[inline]
fn take(column: &Column, row: Option<usize>) -> Value {
    row.and_then(|r| column.values.get(r).cloned()).unwrap_or_default()
}

fn output_column(name: String, source: &Column, values: Vec<Value>, vector_columns: &mut Vec<String>) -> Column {
    let mut column = Column {
        name,
        semantic_types: source.semantic_types.clone(),
        values,
    };
    let holds_vectors = column.first_non_null().is_some_and(|(_, v)| v.is_vector());
    if holds_vectors || source.has_type(&SemanticType::FloatVector) {
        column.semantic_types.insert(SemanticType::FloatVector);
        vector_columns.push(column.name.clone());
    }
    column
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn matches() -> Vec<RowMatches> {
        // left 0 -> right 1; left 1 unmatched; left 2 -> right 0 and 1
        vec![smallvec![1], smallvec![], smallvec![0, 1]]
    }

    #[test]
    fn test_inner_and_left_pairs() {
        assert_eq!(
            row_pairs(JoinMode::Inner, 3, 3, &matches()),
            vec![(Some(0), Some(1)), (Some(2), Some(0)), (Some(2), Some(1))]
        );
        assert_eq!(
            row_pairs(JoinMode::Left, 3, 3, &matches()),
            vec![(Some(0), Some(1)), (Some(1), None), (Some(2), Some(0)), (Some(2), Some(1))]
        );
    }

    #[test]
    fn test_right_and_outer_pairs() {
        assert_eq!(
            row_pairs(JoinMode::Right, 3, 3, &matches()),
            vec![(Some(2), Some(0)), (Some(0), Some(1)), (Some(2), Some(1)), (None, Some(2))]
        );
        assert_eq!(
            row_pairs(JoinMode::Outer, 3, 3, &matches()),
            vec![
                (Some(0), Some(1)),
                (Some(1), None),
                (Some(2), Some(0)),
                (Some(2), Some(1)),
                (None, Some(2)),
            ]
        );
    }

    #[test]
    fn test_cross_pairs() {
        assert_eq!(
            row_pairs(JoinMode::Cross, 2, 2, &[]),
            vec![(Some(0), Some(0)), (Some(0), Some(1)), (Some(1), Some(0)), (Some(1), Some(1))]
        );
    }

    #[test]
    fn test_empty_left_yields_nothing() {
        for mode in [JoinMode::Inner, JoinMode::Left, JoinMode::Right, JoinMode::Outer, JoinMode::Cross] {
            assert!(row_pairs(mode, 0, 5, &[]).is_empty());
        }
    }

    #[test]
    fn test_assemble_suffixes_and_drops() {
        let left = Table::new(vec![
            Column::new("id", vec![Value::Int(1)]).with_type(SemanticType::Integer),
            Column::new("name", vec![Value::from("Alice")]),
        ])
        .unwrap();
        let right = Table::new(vec![
            Column::new("id", vec![Value::Int(10), Value::Int(20)]).with_type(SemanticType::Integer),
            Column::new("name", vec![Value::from("Alicia"), Value::from("Bob")]),
            Column::new("embedding", vec![Value::Null, Value::from(vec![1.0, 2.0])]),
        ])
        .unwrap();

        let dropped = vec!["name".to_string()];
        let output = assemble(&left, &right, &dropped, &[(Some(0), Some(0)), (None, Some(1))]).unwrap();
        let table = &output.table;

        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec!["id_left", "name", "id_right", "embedding"]
        );
        assert_eq!(table.column("id_left").unwrap().values, vec![Value::Int(1), Value::Null]);
        assert_eq!(table.column("id_right").unwrap().values, vec![Value::Int(10), Value::Int(20)]);
        assert!(table.column("id_right").unwrap().has_type(&SemanticType::Integer));
        assert_eq!(output.vector_columns, vec!["embedding"]);
        assert!(table.column("embedding").unwrap().has_type(&SemanticType::FloatVector));
    }

    #[test]
    fn test_suffix_skips_taken_names() {
        let left = Table::new(vec![
            Column::new("id", vec![Value::Int(1)]),
            Column::new("id_left", vec![Value::Int(2)]),
        ])
        .unwrap();
        let right = Table::new(vec![
            Column::new("id", vec![Value::Int(3)]),
            Column::new("id_right", vec![Value::Int(4)]),
        ])
        .unwrap();

        let output = assemble(&left, &right, &[], &[(Some(0), Some(0))]).unwrap();
        assert_eq!(
            output.table.column_names().collect::<Vec<_>>(),
            vec!["id_left_left", "id_left", "id_right_right", "id_right"]
        );
        assert_eq!(output.table.column("id_left_left").unwrap().values, vec![Value::Int(1)]);
        assert_eq!(output.table.column("id_right_right").unwrap().values, vec![Value::Int(3)]);
    }
}
