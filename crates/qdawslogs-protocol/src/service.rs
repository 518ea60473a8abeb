use crate::query::*;

/// Logs Insights query service (StartQuery + GetQueryResults)
#[allow(async_fn_in_trait)]
pub trait InsightsService {
    /// Submit a query
    ///
    /// Returns the id to poll with.
    async fn start_query(&self, request: &QueryRequest) -> Result<QueryId, ServiceError>;

    /// Fetch the current status and (possibly partial) results of a query
    async fn get_query_results(&self, query_id: &QueryId) -> Result<QueryResults, ServiceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to start query: {0}")]
    StartQuery(String),

    #[error("service returned no query id")]
    MissingQueryId,

    #[error("failed to get query results: {0}")]
    GetQueryResults(String),
}
