use fuzzyjoin_core::{Column, Error, JoinColumnSpec, Key, KeyColumn, Result};
use std::ops::Range;
use tracing::warn;

use super::vector::{coerce_float_lists, list_len};
use super::{key_name, keys_at, null_key_column, MatchStrategy};
use crate::classify::MatchCategory;
use crate::distance::{haversine_meters, LatLon};

/// Point-by-point geographic matching of polygons and paths
///
/// Values are flat `lat,lon,lat,lon,...` lists. For each left row the right
/// rows are narrowed position by position to those whose point lies closer
/// than the tolerance (meters). The first surviving right row is the match,
/// not necessarily the closest one.
pub struct GeoMatch<'a> {
    left: &'a Column,
    index: usize,
    tolerance: f64,
    /// Point count of the first non-null left value
    left_points: usize,
    /// Point count of the first non-null right value; 0 when nothing can match
    right_count: usize,
    right_points: Vec<Option<Vec<LatLon>>>,
    right_keys: Vec<KeyColumn>,
}

impl<'a> GeoMatch<'a> {
    pub fn new(
        index: usize,
        spec: &JoinColumnSpec,
        left: &'a Column,
        right: &'a Column,
    ) -> Result<Self> {
        if !spec.absolute {
            return Err(Error::UnsupportedType(format!(
                "geo matching of '{}' and '{}' requires an absolute tolerance in meters",
                spec.left, spec.right
            )));
        }

        let left_points = list_len(left)?.unwrap_or(0) / 2;
        let right_count = list_len(right)?.unwrap_or(0) / 2;

        let right_points: Vec<Option<Vec<LatLon>>> = coerce_float_lists(right, 0..right.len())?
            .into_iter()
            .map(|list| list.map(|l| to_points(&l)))
            .collect();

        let mut right_keys: Vec<KeyColumn> = (0..right_count)
            .map(|i| {
                let keys = right_points
                    .iter()
                    .map(|points| {
                        let (lat, lon) = *points.as_ref()?.get(i)?;
                        Key::point(lat, lon)
                    })
                    .collect();
                KeyColumn::new(key_name("right", MatchCategory::Geo, index, Some(i)), keys)
            })
            .collect();

        let right_count = if right_count == 0 || left_points == 0 {
            warn!(
                left = %left.name,
                right = %right.name,
                "geo columns have no points, nothing will match"
            );
            right_keys = vec![null_key_column(
                key_name("right", MatchCategory::Geo, index, None),
                right.len(),
            )];
            0
        } else {
            right_count
        };

        Ok(Self {
            left,
            index,
            tolerance: spec.accuracy,
            left_points,
            right_count,
            right_points,
            right_keys,
        })
    }

    /// First right row within tolerance of `points` at every compared position
    fn first_candidate(&self, points: &[LatLon]) -> Option<usize> {
        let positions = self.left_points.min(self.right_count).min(points.len());
        if positions == 0 {
            return None;
        }

        let mut candidates: Vec<usize> = (0..self.right_points.len())
            .filter(|&row| self.right_points[row].is_some())
            .collect();
        for (i, &point) in points.iter().enumerate().take(positions) {
            candidates.retain(|&row| {
                self.right_points[row]
                    .as_ref()
                    .and_then(|p| p.get(i))
                    .is_some_and(|&other| haversine_meters(point, other) < self.tolerance)
            });
            if candidates.is_empty() {
                return None;
            }
        }
        candidates.first().copied()
    }
}

impl MatchStrategy for GeoMatch<'_> {
    fn category(&self) -> MatchCategory {
        MatchCategory::Geo
    }

    fn right_keys(&self) -> &[KeyColumn] {
        &self.right_keys
    }

    fn left_keys(&self, rows: Range<usize>) -> Result<Vec<KeyColumn>> {
        let len = rows.len();
        if self.right_count == 0 {
            return Ok(vec![null_key_column(
                key_name("left", MatchCategory::Geo, self.index, None),
                len,
            )]);
        }

        let lists = coerce_float_lists(self.left, rows)?;
        let mut columns: Vec<KeyColumn> = (0..self.right_count)
            .map(|i| {
                KeyColumn::new(
                    key_name("left", MatchCategory::Geo, self.index, Some(i)),
                    Vec::with_capacity(len),
                )
            })
            .collect();

        for list in &lists {
            let matched = list
                .as_ref()
                .and_then(|l| self.first_candidate(&to_points(l)));
            match matched {
                Some(row) => {
                    for (column, key) in columns.iter_mut().zip(keys_at(&self.right_keys, row)) {
                        column.keys.push(key);
                    }
                }
                None => {
                    for column in columns.iter_mut() {
                        column.keys.push(None);
                    }
                }
            }
        }
        Ok(columns)
    }
}

/// Pair up a flat coordinate list; a trailing odd value is ignored
fn to_points(flat: &[f64]) -> Vec<LatLon> {
    flat.chunks_exact(2).map(|p| (p[0], p[1])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuzzyjoin_core::Value;

    fn geo_column(name: &str, values: &[&str]) -> Column {
        Column::new(name, values.iter().map(|v| Value::from(*v)).collect())
    }

    #[test]
    fn test_to_points() {
        assert_eq!(to_points(&[1.0, 2.0, 3.0, 4.0, 5.0]), vec![(1.0, 2.0), (3.0, 4.0)]);
    }

    #[test]
    fn test_first_candidate_kept() {
        let left = geo_column("l", &["10.0,20.0,10.0,20.1"]);
        // both right rows are within tolerance, the second one is closer
        let right = geo_column("r", &["10.0005,20.0,10.0,20.1", "10.0,20.0,10.0,20.1"]);
        let spec = JoinColumnSpec::absolute("l", "r", 200.0);
        let strategy = GeoMatch::new(0, &spec, &left, &right).unwrap();

        let keys = strategy.left_keys(0..1).unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].keys, vec![Key::point(10.0005, 20.0)]);
        assert_eq!(keys[1].keys, vec![Key::point(10.0, 20.1)]);
    }

    #[test]
    fn test_candidates_narrowed_per_position() {
        let left = geo_column("l", &["0.0,0.0,1.0,1.0"]);
        let right = geo_column("r", &["0.0,0.0,5.0,5.0", "0.0,0.0,1.0,1.0"]);
        let spec = JoinColumnSpec::absolute("l", "r", 10.0);
        let strategy = GeoMatch::new(0, &spec, &left, &right).unwrap();

        let keys = strategy.left_keys(0..1).unwrap();
        assert_eq!(keys[1].keys, vec![Key::point(1.0, 1.0)]);
    }

    #[test]
    fn test_out_of_tolerance_is_null() {
        let left = geo_column("l", &["0.0,0.0"]);
        let right = geo_column("r", &["0.0,1.0"]);
        // one degree of longitude at the equator is about 111 km
        let spec = JoinColumnSpec::absolute("l", "r", 1_000.0);
        let strategy = GeoMatch::new(0, &spec, &left, &right).unwrap();
        assert_eq!(strategy.left_keys(0..1).unwrap()[0].keys, vec![None]);
    }

    #[test]
    fn test_null_values() {
        let left = Column::new("l", vec![Value::Null, Value::from("0,0")]);
        let right = Column::new("r", vec![Value::Null, Value::from("0,0")]);
        let spec = JoinColumnSpec::absolute("l", "r", 1.0);
        let strategy = GeoMatch::new(0, &spec, &left, &right).unwrap();
        assert_eq!(
            strategy.left_keys(0..2).unwrap()[0].keys,
            vec![None, Key::point(0.0, 0.0)]
        );
        assert_eq!(strategy.right_keys()[0].keys, vec![None, Key::point(0.0, 0.0)]);
    }

    #[test]
    fn test_relative_tolerance_rejected() {
        let left = geo_column("l", &["0,0"]);
        let spec = JoinColumnSpec::new("l", "l", 0.9);
        assert!(matches!(
            GeoMatch::new(0, &spec, &left, &left),
            Err(Error::UnsupportedType(_))
        ));
    }
}
