//! Join configuration
//!
//! [`JoinConfig`] is the loose, serde-friendly form where each parameter may be
//! a scalar (one column pair) or a list (one entry per column pair).
//! [`JoinConfig::validate`] turns it into a typed [`JoinSpec`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Default number of row-contiguous chunks the left table is split into
pub const DEFAULT_CHUNKS: usize = 32;

/// Relational join family applied after key matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinMode {
    #[default]
    Left,
    Right,
    Inner,
    Outer,
    Cross,
}

impl FromStr for JoinMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(JoinMode::Left),
            "right" => Ok(JoinMode::Right),
            "inner" => Ok(JoinMode::Inner),
            "outer" => Ok(JoinMode::Outer),
            "cross" => Ok(JoinMode::Cross),
            other => Err(Error::Configuration(format!("unsupported join type '{}'", other))),
        }
    }
}

impl fmt::Display for JoinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JoinMode::Left => "left",
            JoinMode::Right => "right",
            JoinMode::Inner => "inner",
            JoinMode::Outer => "outer",
            JoinMode::Cross => "cross",
        };
        f.write_str(name)
    }
}

/// A parameter given either once or once per column pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T: Clone> OneOrMany<T> {
    fn is_one(&self) -> bool {
        matches!(self, OneOrMany::One(_))
    }

    fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(v) => v.len(),
        }
    }

    fn shape(&self) -> &'static str {
        if self.is_one() {
            "a single value"
        } else {
            "a list"
        }
    }

    fn to_vec(&self) -> Vec<T> {
        match self {
            OneOrMany::One(x) => vec![x.clone()],
            OneOrMany::Many(v) => v.clone(),
        }
    }
}

/// Raw join parameters as supplied by a caller or a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinConfig {
    pub left_col: OneOrMany<String>,
    pub right_col: OneOrMany<String>,
    /// Required closeness; in (0, 1] unless the matching flag is absolute
    pub accuracy: OneOrMany<f64>,
    /// Treat accuracy as an absolute tolerance; defaults to false everywhere
    #[serde(default)]
    pub absolute_accuracy: Option<OneOrMany<bool>>,
    #[serde(default = "default_join_type")]
    pub join_type: String,
    /// Worker pool size; non-positive means all available cores
    #[serde(default = "default_n_jobs")]
    pub n_jobs: i64,
    #[serde(default = "default_chunks")]
    pub chunks: usize,
}

fn default_join_type() -> String {
    JoinMode::default().to_string()
}

fn default_n_jobs() -> i64 {
    -1
}

fn default_chunks() -> usize {
    DEFAULT_CHUNKS
}

impl JoinConfig {
    /// Single column pair configuration with defaults for everything else
    pub fn single(left_col: &str, right_col: &str, accuracy: f64) -> Self {
        Self {
            left_col: OneOrMany::One(left_col.to_string()),
            right_col: OneOrMany::One(right_col.to_string()),
            accuracy: OneOrMany::One(accuracy),
            absolute_accuracy: None,
            join_type: default_join_type(),
            n_jobs: default_n_jobs(),
            chunks: default_chunks(),
        }
    }

    /// Check parameter shapes and ranges and build the typed spec
    pub fn validate(&self) -> Result<JoinSpec> {
        if self.left_col.is_one() != self.right_col.is_one()
            || self.left_col.len() != self.right_col.len()
        {
            return Err(Error::Configuration(
                "both left_col and right_col need to have same data type and if they are lists, the same list lengths"
                    .to_string(),
            ));
        }

        let absolute = match &self.absolute_accuracy {
            Some(flags) => flags.clone(),
            None if self.accuracy.is_one() => OneOrMany::One(false),
            None => OneOrMany::Many(vec![false; self.accuracy.len()]),
        };
        if self.accuracy.is_one() != absolute.is_one() {
            return Err(Error::Configuration(format!(
                "accuracy is {} but absolute_accuracy is {}",
                self.accuracy.shape(),
                absolute.shape()
            )));
        }
        if self.accuracy.len() != absolute.len() {
            return Err(Error::Configuration(
                "the count of accuracy values does not match the count of absolute_accuracy values"
                    .to_string(),
            ));
        }
        if self.accuracy.is_one() != self.left_col.is_one()
            || self.accuracy.len() != self.left_col.len()
        {
            return Err(Error::Configuration(format!(
                "accuracy is {} of length {} but {} join column(s) were given",
                self.accuracy.shape(),
                self.accuracy.len(),
                self.left_col.len()
            )));
        }

        let columns = self
            .left_col
            .to_vec()
            .into_iter()
            .zip(self.right_col.to_vec())
            .zip(self.accuracy.to_vec().into_iter().zip(absolute.to_vec()))
            .map(|((left, right), (accuracy, is_absolute))| JoinColumnSpec {
                left,
                right,
                accuracy,
                absolute: is_absolute,
            })
            .collect();

        let spec = JoinSpec {
            columns,
            mode: self.join_type.parse()?,
            workers: workers_from_n_jobs(self.n_jobs),
            chunks: self.chunks,
        };
        spec.validate()?;
        Ok(spec)
    }
}

fn workers_from_n_jobs(n_jobs: i64) -> usize {
    if n_jobs <= 0 {
        0
    } else {
        n_jobs as usize
    }
}

/// One join predicate: a column pair and its tolerance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinColumnSpec {
    pub left: String,
    pub right: String,
    pub accuracy: f64,
    pub absolute: bool,
}

impl JoinColumnSpec {
    /// Relative accuracy in (0, 1]
    pub fn new(left: impl Into<String>, right: impl Into<String>, accuracy: f64) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            accuracy,
            absolute: false,
        }
    }

    /// Absolute tolerance in the column's native units (meters for geo)
    pub fn absolute(left: impl Into<String>, right: impl Into<String>, tolerance: f64) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            accuracy: tolerance,
            absolute: true,
        }
    }

    /// Exact equality is requested for string columns, whether or not the
    /// accuracy is absolute
    #[inline]
    pub fn is_exact(&self) -> bool {
        self.accuracy >= 1.0
    }

    fn validate(&self) -> Result<()> {
        if self.absolute {
            if !self.accuracy.is_finite() || self.accuracy < 0.0 {
                return Err(Error::Configuration(format!(
                    "absolute tolerance of {} for '{}' must be a finite, non-negative number",
                    self.accuracy, self.left
                )));
            }
        } else if !(self.accuracy > 0.0 && self.accuracy <= 1.0) {
            return Err(Error::Configuration(format!(
                "accuracy of {} for '{}' is out of range",
                self.accuracy, self.left
            )));
        }
        Ok(())
    }
}

/// Validated join parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinSpec {
    pub columns: Vec<JoinColumnSpec>,
    pub mode: JoinMode,
    /// Worker threads; 0 means all available execution units
    pub workers: usize,
    /// Number of row-contiguous left chunks
    pub chunks: usize,
}

impl JoinSpec {
    pub fn new(columns: Vec<JoinColumnSpec>, mode: JoinMode) -> Self {
        Self {
            columns,
            mode,
            workers: 0,
            chunks: DEFAULT_CHUNKS,
        }
    }

    /// Set the pool size the way `n_jobs` does: non-positive means all cores
    pub fn with_workers(mut self, n_jobs: i64) -> Self {
        self.workers = workers_from_n_jobs(n_jobs);
        self
    }

    pub fn with_chunks(mut self, chunks: usize) -> Self {
        self.chunks = chunks;
        self
    }

    /// Check every column spec and the scheduling parameters
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::Configuration("no join columns given".to_string()));
        }
        if self.chunks == 0 {
            return Err(Error::Configuration("chunk count must be at least 1".to_string()));
        }
        self.columns.iter().try_for_each(JoinColumnSpec::validate)
    }
}
