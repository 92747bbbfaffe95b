//! Search service interface.

use async_trait::async_trait;
use bedrock_relay_error::SearchError;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A query posted to `/query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SearchQuery {
    /// Free-text query
    query: String,
    /// Index to search; the service default when absent
    #[serde(default)]
    index: Option<String>,
    /// Maximum number of hits
    #[serde(default)]
    size: Option<u32>,
}

impl SearchQuery {
    /// Creates a query against the default index.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            index: None,
            size: None,
        }
    }
}

/// One matching document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Document identifier
    pub id: String,
    /// Relevance score
    pub score: f64,
    /// Stored document fields
    pub source: serde_json::Value,
}

/// Search response returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Index that was searched
    pub index: String,
    /// Echo of the query text
    pub query: String,
    /// Total matches
    pub total: u64,
    /// Returned hits
    pub hits: Vec<SearchHit>,
}

/// A document search backend.
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Runs a query.
    async fn search(&self, query: SearchQuery) -> Result<SearchResults, SearchError>;
}
