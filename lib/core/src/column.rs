//! Columns and their declared semantic types

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::value::Value;

/// Logical data kind declared for a column
///
/// Parses both short names (`"Text"`, `"float"`) and the D3M schema URIs
/// (`"http://schema.org/Text"`). Unknown tags are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SemanticType {
    Text,
    Categorical,
    Boolean,
    Integer,
    Float,
    FloatVector,
    BoundingPolygon,
    DateTime,
    Other(String),
}

impl SemanticType {
    /// D3M metadata URI for the known types
    pub fn uri(&self) -> Option<&'static str> {
        match self {
            SemanticType::Text => Some("http://schema.org/Text"),
            SemanticType::Categorical => {
                Some("https://metadata.datadrivendiscovery.org/types/CategoricalData")
            }
            SemanticType::Boolean => Some("http://schema.org/Boolean"),
            SemanticType::Integer => Some("http://schema.org/Integer"),
            SemanticType::Float => Some("http://schema.org/Float"),
            SemanticType::FloatVector => {
                Some("https://metadata.datadrivendiscovery.org/types/FloatVector")
            }
            SemanticType::BoundingPolygon => {
                Some("https://metadata.datadrivendiscovery.org/types/BoundingPolygon")
            }
            SemanticType::DateTime => Some("http://schema.org/DateTime"),
            SemanticType::Other(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SemanticType::Text => "Text",
            SemanticType::Categorical => "Categorical",
            SemanticType::Boolean => "Boolean",
            SemanticType::Integer => "Integer",
            SemanticType::Float => "Float",
            SemanticType::FloatVector => "FloatVector",
            SemanticType::BoundingPolygon => "BoundingPolygon",
            SemanticType::DateTime => "DateTime",
            SemanticType::Other(s) => s,
        }
    }
}

impl FromStr for SemanticType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tail = s.rsplit('/').next().unwrap_or(s);
        let parsed = match tail.to_ascii_lowercase().as_str() {
            "text" | "string" => SemanticType::Text,
            "categorical" | "categoricaldata" => SemanticType::Categorical,
            "boolean" | "bool" => SemanticType::Boolean,
            "integer" | "int" => SemanticType::Integer,
            "float" | "real" => SemanticType::Float,
            "floatvector" | "vector" => SemanticType::FloatVector,
            "boundingpolygon" | "geo" => SemanticType::BoundingPolygon,
            "datetime" | "date" | "time" => SemanticType::DateTime,
            _ => SemanticType::Other(s.to_string()),
        };
        Ok(parsed)
    }
}

impl From<String> for SemanticType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(t) => t,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for SemanticType {
    fn from(s: &str) -> Self {
        SemanticType::from(s.to_string())
    }
}

impl From<SemanticType> for String {
    fn from(t: SemanticType) -> Self {
        t.name().to_string()
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named column with declared semantic types and nullable values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(default)]
    pub semantic_types: BTreeSet<SemanticType>,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            semantic_types: BTreeSet::new(),
            values,
        }
    }

    /// Builder-style semantic type declaration
    pub fn with_type(mut self, semantic_type: SemanticType) -> Self {
        self.semantic_types.insert(semantic_type);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn has_type(&self, semantic_type: &SemanticType) -> bool {
        self.semantic_types.contains(semantic_type)
    }

    /// First non-null value, used to infer per-column vector shapes
    pub fn first_non_null(&self) -> Option<(usize, &Value)> {
        self.values.iter().enumerate().find(|(_, v)| !v.is_null())
    }
}
