//! Shared query infrastructure: the [`Query`] trait and [`QueryCommon`] fields.

use serde_json::{Map, Value};

/// Trait implemented by all search query builders. Provides JSON body
/// serialization and shared builder methods for result windowing and
/// `_source` filtering.
pub trait Query {
    /// Serializes this query into an Elasticsearch `_search` request body.
    fn to_body(&self) -> Value;

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Sets the maximum number of hits to return.
    fn with_size(mut self, size: i64) -> Self
    where
        Self: Sized,
    {
        self.get_common().size = Some(size);
        self
    }

    /// Sets the offset of the first hit to return (0-indexed).
    fn with_from(mut self, from: i64) -> Self
    where
        Self: Sized,
    {
        self.get_common().from = Some(from);
        self
    }

    /// Restricts `_source` to the given field path. May be called repeatedly.
    fn with_source_field(mut self, field: &str) -> Self
    where
        Self: Sized,
    {
        self.get_common().source_fields.push(field.to_string());
        self
    }
}

/// Fields shared by all query types: result window and `_source` filtering.
#[derive(Clone, Default)]
pub struct QueryCommon {
    /// Number of hits to return. `None` uses the index default (10).
    pub size: Option<i64>,
    /// Offset of the first hit. `None` starts at the first hit.
    pub from: Option<i64>,
    /// `_source` include paths. Empty returns the whole document.
    pub source_fields: Vec<String>,
}

impl QueryCommon {
    /// Writes the common windowing and filtering keys into the request body.
    pub fn add_to_body(&self, body: &mut Map<String, Value>) {
        if let Some(size) = self.size {
            body.insert("size".to_string(), Value::from(size));
        }
        if let Some(from) = self.from {
            body.insert("from".to_string(), Value::from(from));
        }
        if !self.source_fields.is_empty() {
            body.insert(
                "_source".to_string(),
                Value::from(self.source_fields.clone()),
            );
        }
    }
}
