use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Internal pointer fields (`@ptr`) carry no user data and are never shown.
pub const POINTER_FIELD_MARKER: &str = "@ptr";

/// A fully validated StartQuery input
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub log_group_name: String,
    /// Start of the range, epoch seconds (inclusive)
    pub start_time: i64,
    /// End of the range, epoch seconds
    pub end_time: i64,
    pub query_string: String,
    pub limit: Option<i32>,
}

/// Identifier handed back by StartQuery
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryId(pub String);

impl QueryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote query status
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryStatus {
    Scheduled,
    Running,
    Complete,
    Failed,
    Cancelled,
    Timeout,
    Unknown,
    /// A status this client does not know about
    Other(String),
}

impl QueryStatus {
    /// Parse the wire name used by the service
    pub fn from_wire(s: &str) -> Self {
        match s {
            "Scheduled" => Self::Scheduled,
            "Running" => Self::Running,
            "Complete" => Self::Complete,
            "Failed" => Self::Failed,
            "Cancelled" => Self::Cancelled,
            "Timeout" => Self::Timeout,
            "Unknown" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Running => "Running",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
            Self::Timeout => "Timeout",
            Self::Unknown => "Unknown",
            Self::Other(s) => s,
        }
    }

    /// Whether polling stops at this status
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Scheduled | Self::Running)
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters reported alongside query results
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryStatistics {
    pub records_matched: f64,
    pub records_scanned: f64,
    pub bytes_scanned: f64,
}

/// One matched log record, as ordered `(field, value)` pairs
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultRow {
    fields: Vec<(String, String)>,
}

impl ResultRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, skipping pointer fields
    pub fn push(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        if field.contains(POINTER_FIELD_MARKER) {
            return;
        }
        self.fields.push((field, value.into()));
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResultRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = ResultRow::new();
        for (field, value) in iter {
            row.push(field, value);
        }
        row
    }
}

// Serialized as a map so JSON output keeps the service's field order
impl Serialize for ResultRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, value) in &self.fields {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

/// One GetQueryResults response
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QueryResults {
    pub status: QueryStatus,
    pub statistics: Option<QueryStatistics>,
    pub rows: Vec<ResultRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_fields_are_dropped() {
        let row: ResultRow = [
            ("@timestamp", "2019-06-12 06:47:12.000"),
            ("@ptr", "CmAKJwoj..."),
            ("@message", "job started"),
        ]
        .into_iter()
        .collect();

        assert_eq!(row.len(), 2);
        assert_eq!(row.get("@ptr"), None);
        assert_eq!(row.get("@message"), Some("job started"));
    }

    #[test]
    fn status_terminality() {
        assert!(!QueryStatus::Scheduled.is_terminal());
        assert!(!QueryStatus::Running.is_terminal());
        assert!(QueryStatus::Complete.is_terminal());
        assert!(QueryStatus::Failed.is_terminal());
        assert!(QueryStatus::Cancelled.is_terminal());
        assert!(QueryStatus::from_wire("Exploded").is_terminal());
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(QueryStatus::from_wire("Running"), QueryStatus::Running);
        assert_eq!(QueryStatus::from_wire("Timeout").as_str(), "Timeout");
        assert_eq!(
            QueryStatus::from_wire("Exploded"),
            QueryStatus::Other("Exploded".to_string())
        );
    }

    #[test]
    fn row_serializes_in_field_order() {
        let row: ResultRow = [("@timestamp", "t"), ("@message", "m"), ("@logStream", "s")]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"@timestamp":"t","@message":"m","@logStream":"s"}"#);
    }
}
