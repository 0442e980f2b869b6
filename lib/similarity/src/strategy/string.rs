use ahash::{AHashMap, AHashSet};
use fuzzyjoin_core::{Column, JoinColumnSpec, Key, KeyColumn, Result};
use std::ops::Range;

use super::{key_name, MatchStrategy};
use crate::classify::MatchCategory;
use crate::fuzz::{default_process, extract_one};

/// String matching
///
/// With accuracy 1.0 or more the raw values are the keys, also when the
/// accuracy is flagged absolute. Otherwise each distinct
/// left value is matched once to the best scoring distinct right value and
/// kept when the score reaches `accuracy * 100`.
pub struct StringMatch<'a> {
    left: &'a Column,
    index: usize,
    /// `None` for exact matching
    min_score: Option<f64>,
    /// Distinct right values in first-appearance order: processed text and key
    choices: Vec<(String, Key)>,
    right_keys: Vec<KeyColumn>,
}

impl<'a> StringMatch<'a> {
    pub fn new(index: usize, spec: &JoinColumnSpec, left: &'a Column, right: &'a Column) -> Self {
        let keys: Vec<Option<Key>> = right.values.iter().map(|v| v.to_key()).collect();

        let min_score = if spec.is_exact() {
            None
        } else {
            Some(spec.accuracy * 100.0)
        };

        let mut choices = Vec::new();
        if min_score.is_some() {
            let mut seen = AHashSet::new();
            for (value, key) in right.values.iter().zip(&keys) {
                let (Some(text), Some(key)) = (value.to_text(), key) else {
                    continue;
                };
                if seen.insert(key.clone()) {
                    choices.push((default_process(&text), key.clone()));
                }
            }
        }

        Self {
            left,
            index,
            min_score,
            choices,
            right_keys: vec![KeyColumn::new(
                key_name("right", MatchCategory::String, index, None),
                keys,
            )],
        }
    }

    fn best_match(&self, text: &str, min_score: f64) -> Option<Key> {
        let query = default_process(text);
        let (choice, score) = extract_one(&query, self.choices.iter().map(|(c, _)| c.as_str()))?;
        if score >= min_score {
            Some(self.choices[choice].1.clone())
        } else {
            None
        }
    }
}

impl MatchStrategy for StringMatch<'_> {
    fn category(&self) -> MatchCategory {
        MatchCategory::String
    }

    fn right_keys(&self) -> &[KeyColumn] {
        &self.right_keys
    }

    fn left_keys(&self, rows: Range<usize>) -> Result<Vec<KeyColumn>> {
        let values = &self.left.values[rows];
        let name = key_name("left", MatchCategory::String, self.index, None);

        let Some(min_score) = self.min_score else {
            let keys = values.iter().map(|v| v.to_key()).collect();
            return Ok(vec![KeyColumn::new(name, keys)]);
        };

        // Resolve every distinct left value once, then map the rows
        let mut matches: AHashMap<String, Option<Key>> = AHashMap::new();
        for value in values {
            if let Some(text) = value.to_text() {
                if !matches.contains_key(&*text) {
                    let matched = self.best_match(&text, min_score);
                    matches.insert(text.into_owned(), matched);
                }
            }
        }

        let keys = values
            .iter()
            .map(|v| {
                v.to_text()
                    .and_then(|text| matches.get(&*text).cloned().flatten())
            })
            .collect();
        Ok(vec![KeyColumn::new(name, keys)])
    }
}
