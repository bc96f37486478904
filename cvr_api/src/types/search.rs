//! Search result envelope returned by the registry `_search` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Eight-digit identifier of a company in the CVR registry.
pub type CvrNumber = i64;

/// Key under `_source` that wraps the actual company document.
pub const ENTITY_KEY: &str = "Vrvirksomhed";

/// Index field holding the CVR number.
pub const CVR_NUMBER_FIELD: &str = "Vrvirksomhed.cvrNummer";

/// Index field holding the most recent company name.
pub const NAME_FIELD: &str = "Vrvirksomhed.virksomhedMetadata.nyesteNavn.navn";

/// Top-level `_search` response.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SearchResponse {
    /// Server-side query time in milliseconds.
    #[serde(default)]
    pub took: Option<i64>,
    #[serde(default)]
    pub timed_out: bool,
    pub hits: Hits,
}

impl SearchResponse {
    /// Total number of matching documents, which may exceed the hits returned.
    pub fn total(&self) -> i64 {
        self.hits
            .total
            .as_ref()
            .map(TotalHits::value)
            .unwrap_or(self.hits.hits.len() as i64)
    }

    /// Returns `true` when the search matched nothing.
    pub fn is_empty(&self) -> bool {
        self.hits.hits.is_empty()
    }

    /// Returns the first hit, if any.
    pub fn first(&self) -> Option<&Hit> {
        self.hits.hits.first()
    }
}

/// The `hits` object of a search response.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Hits {
    /// Total hit count. Absent when the query disables total tracking.
    #[serde(default)]
    pub total: Option<TotalHits>,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// Total hit count. Elasticsearch 6 returns a bare integer, 7+ an object.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(untagged)]
pub enum TotalHits {
    /// `"total": 42`
    Count(i64),
    /// `"total": {"value": 42, "relation": "eq"}`
    Object { value: i64 },
}

impl TotalHits {
    pub fn value(&self) -> i64 {
        match self {
            TotalHits::Count(value) => *value,
            TotalHits::Object { value } => *value,
        }
    }
}

/// A single matching document.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Hit {
    #[serde(rename = "_index", default)]
    pub index: Option<String>,

    #[serde(rename = "_id", default)]
    pub id: Option<String>,

    #[serde(rename = "_score", default)]
    pub score: Option<f64>,

    /// The raw stored document. Its shape is only known at the [`ENTITY_KEY`] level.
    #[serde(rename = "_source", default)]
    pub source: Value,
}

impl Hit {
    /// Returns the company document wrapped under [`ENTITY_KEY`], if present.
    pub fn entity(&self) -> Option<&Value> {
        self.source.get(ENTITY_KEY).filter(|v| v.is_object())
    }
}
