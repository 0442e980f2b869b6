use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::value::Value;
use crate::{Error, Result};

/// An ordered set of equally long, uniquely named columns
///
/// Rows have no identity beyond their position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create a table, checking column lengths and name uniqueness
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let table = Self { columns };
        table.validate()?;
        Ok(table)
    }

    /// Check the table invariants (used after deserialization)
    pub fn validate(&self) -> Result<()> {
        let mut seen = AHashSet::with_capacity(self.columns.len());
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(Error::Configuration(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }
        if let Some(first) = self.columns.first() {
            for column in &self.columns[1..] {
                if column.len() != first.len() {
                    return Err(Error::DimensionMismatch {
                        column: column.name.clone(),
                        expected: first.len(),
                        actual: column.len(),
                    });
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Value at (`row`, `column`), `None` when out of range
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.column(column).ok()?.values.get(row)
    }

    /// Cloned row as (name, value) pairs; mainly useful in tests and debugging
    pub fn row(&self, row: usize) -> Vec<(&str, &Value)> {
        self.columns
            .iter()
            .filter_map(|c| c.values.get(row).map(|v| (c.name.as_str(), v)))
            .collect()
    }
}
