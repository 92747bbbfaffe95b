//! Placeholder search backend.

use async_trait::async_trait;
use bedrock_relay_error::SearchError;
use bedrock_relay_interface::{SearchQuery, SearchResults, SearchService};
use tracing::{debug, instrument};

/// Answers every query with zero hits.
///
/// Stands in for the managed search cluster until a real client is wired up.
#[derive(Debug, Clone)]
pub struct StubSearch {
    default_index: String,
}

impl StubSearch {
    /// Creates a stub that reports `default_index` for queries naming none.
    pub fn new(default_index: impl Into<String>) -> Self {
        Self {
            default_index: default_index.into(),
        }
    }
}

#[async_trait]
impl SearchService for StubSearch {
    #[instrument(skip(self), fields(query = %query.query()))]
    async fn search(&self, query: SearchQuery) -> Result<SearchResults, SearchError> {
        if query.query().trim().is_empty() {
            return Err(SearchError::new("query is empty"));
        }
        let index = query
            .index()
            .clone()
            .unwrap_or_else(|| self.default_index.clone());
        debug!(index = %index, "Stub search returning no hits");
        Ok(SearchResults {
            index,
            query: query.query().clone(),
            total: 0,
            hits: Vec::new(),
        })
    }
}
