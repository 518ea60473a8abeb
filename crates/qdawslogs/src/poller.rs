use std::time::Duration;

use qdawslogs_protocol::*;

/// Delay before each GetQueryResults call
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Submits a query and polls it until it reaches a terminal status
pub struct Poller<S> {
    service: S,
    interval: Duration,
}

impl<S: InsightsService> Poller<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[cfg(test)]
    fn service(&self) -> &S {
        &self.service
    }

    /// Start `request` and wait for it to complete
    pub async fn run(&self, request: &QueryRequest) -> Result<QueryResults, PollError> {
        tracing::info!(
            log_group = %request.log_group_name,
            start_time = request.start_time,
            end_time = request.end_time,
            limit = ?request.limit,
            query = %request.query_string,
            "starting query"
        );

        let query_id = self.service.start_query(request).await?;
        tracing::info!(%query_id, "query started");

        self.wait(&query_id).await
    }

    /// Poll an already started query until it reaches a terminal status
    ///
    /// Only a `Complete` query yields results; every other terminal status is
    /// an error.
    pub async fn wait(&self, query_id: &QueryId) -> Result<QueryResults, PollError> {
        loop {
            tracing::debug!("waiting to retrieve results");
            tokio::time::sleep(self.interval).await;

            let results = self.service.get_query_results(query_id).await?;
            let stats = results.statistics.unwrap_or_default();
            tracing::info!(
                records = results.rows.len(),
                records_matched = stats.records_matched,
                records_scanned = stats.records_scanned,
                bytes_scanned = stats.bytes_scanned,
                status = %results.status,
                "got query results"
            );

            match results.status {
                QueryStatus::Scheduled | QueryStatus::Running => continue,
                QueryStatus::Complete => return Ok(results),
                status => {
                    return Err(PollError::Terminated {
                        query_id: query_id.clone(),
                        status,
                    })
                }
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("query {query_id} ended with status {status}")]
    Terminated {
        query_id: QueryId,
        status: QueryStatus,
    },
}
