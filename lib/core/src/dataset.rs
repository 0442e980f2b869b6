//! Datasets: named collections of tables
//!
//! The join itself works on two tables; a dataset is the envelope those
//! tables usually arrive in, with one "main" tabular resource.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::table::Table;
use crate::{Error, Result};

/// Conventional id of the main tabular resource
pub const MAIN_RESOURCE_ID: &str = "learningData";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub resources: BTreeMap<String, Table>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a single table as the main resource
    pub fn from_table(table: Table) -> Self {
        let mut resources = BTreeMap::new();
        resources.insert(MAIN_RESOURCE_ID.to_string(), table);
        Self { resources }
    }

    /// Load a dataset from a JSON file and validate every table
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let dataset: Dataset = serde_json::from_str(&text)?;
        for table in dataset.resources.values() {
            table.validate()?;
        }
        Ok(dataset)
    }

    /// Select the tabular resource to join on
    ///
    /// An explicit id must exist. Without one, a dataset holding a single
    /// resource yields it; otherwise the main resource is used.
    pub fn tabular_resource(&self, resource_id: Option<&str>) -> Result<(&str, &Table)> {
        let found = match resource_id {
            Some(id) => self.resources.get_key_value(id),
            None if self.resources.len() == 1 => self.resources.iter().next(),
            None => self.resources.get_key_value(MAIN_RESOURCE_ID),
        };
        found
            .map(|(id, table)| (id.as_str(), table))
            .ok_or_else(|| {
                Error::MissingResource(match resource_id {
                    Some(id) => format!("no resource named '{}'", id),
                    None => "failure to find tabular resource".to_string(),
                })
            })
    }

    /// Replace (or add) one resource, keeping the others intact
    pub fn with_resource(mut self, resource_id: impl Into<String>, table: Table) -> Self {
        self.resources.insert(resource_id.into(), table);
        self
    }
}
