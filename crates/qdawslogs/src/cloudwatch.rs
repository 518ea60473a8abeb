use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudwatchlogs::error::DisplayErrorContext;
use aws_sdk_cloudwatchlogs::types::{QueryStatistics as SdkStatistics, ResultField};
use aws_sdk_cloudwatchlogs::Client;
use qdawslogs_protocol::*;

/// [`InsightsService`] backed by the CloudWatch Logs API
#[derive(Clone, Debug)]
pub struct CloudWatchInsights {
    client: Client,
}

impl CloudWatchInsights {
    /// Build a client for `region`, with credentials from the default provider chain
    pub async fn connect(region: impl Into<String>) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.into()))
            .load()
            .await;

        Self::new(Client::new(&config))
    }

    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl InsightsService for CloudWatchInsights {
    async fn start_query(&self, request: &QueryRequest) -> Result<QueryId, ServiceError> {
        let output = self
            .client
            .start_query()
            .log_group_name(&request.log_group_name)
            .start_time(request.start_time)
            .end_time(request.end_time)
            .query_string(&request.query_string)
            .set_limit(request.limit)
            .send()
            .await
            .map_err(|e| ServiceError::StartQuery(DisplayErrorContext(&e).to_string()))?;

        output
            .query_id()
            .map(|id| QueryId(id.to_string()))
            .ok_or(ServiceError::MissingQueryId)
    }

    async fn get_query_results(&self, query_id: &QueryId) -> Result<QueryResults, ServiceError> {
        let output = self
            .client
            .get_query_results()
            .query_id(query_id.as_str())
            .send()
            .await
            .map_err(|e| ServiceError::GetQueryResults(DisplayErrorContext(&e).to_string()))?;

        let status = output
            .status()
            .map(|s| QueryStatus::from_wire(s.as_str()))
            .unwrap_or(QueryStatus::Unknown);

        Ok(QueryResults {
            status,
            statistics: output.statistics().map(convert_statistics),
            rows: output.results().iter().map(|fields| convert_row(fields)).collect(),
        })
    }
}

fn convert_statistics(stats: &SdkStatistics) -> QueryStatistics {
    QueryStatistics {
        records_matched: stats.records_matched(),
        records_scanned: stats.records_scanned(),
        bytes_scanned: stats.bytes_scanned(),
    }
}

fn convert_row(fields: &[ResultField]) -> ResultRow {
    fields
        .iter()
        .filter_map(|f| Some((f.field()?, f.value().unwrap_or_default())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_skip_pointers_and_nameless_fields() {
        let fields = vec![
            ResultField::builder().field("@timestamp").value("2019-06-12 06:47:12.000").build(),
            ResultField::builder().field("@ptr").value("CmAKJwoj").build(),
            ResultField::builder().value("orphan").build(),
            ResultField::builder().field("@message").build(),
        ];

        let row = convert_row(&fields);
        let pairs: Vec<_> = row.iter().collect();
        assert_eq!(
            pairs,
            vec![("@timestamp", "2019-06-12 06:47:12.000"), ("@message", "")]
        );
    }

    #[test]
    fn statistics_are_copied() {
        let stats = SdkStatistics::builder()
            .records_matched(3.0)
            .records_scanned(120.0)
            .bytes_scanned(8192.0)
            .build();

        let converted = convert_statistics(&stats);
        assert_eq!(converted.records_matched, 3.0);
        assert_eq!(converted.records_scanned, 120.0);
        assert_eq!(converted.bytes_scanned, 8192.0);
    }
}
