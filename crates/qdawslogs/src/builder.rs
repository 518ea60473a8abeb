//! Turns command-line style inputs into a validated [`QueryRequest`].
//!
//! Query syntax: <https://docs.aws.amazon.com/AmazonCloudWatch/latest/logs/CWL_QuerySyntax.html>

use qdawslogs_protocol::QueryRequest;

use crate::time_arg::{now_epoch_secs, parse_time_arg, TimeArgError};

/// Fields a query may project
pub const ALLOWED_FIELDS: &[&str] = &["@timestamp", "@message", "@logStream", "@ingestionTime"];

/// Projection used when no field is requested
pub const DEFAULT_FIELDS: &[&str] = &["@timestamp", "@logStream", "@message"];

/// Width of the query window when no start time is given
pub const DEFAULT_RANGE_SECS: i64 = 3600;

const TIMESTAMP_FIELD: &str = "@timestamp";

// StartQuery accepts 1..=10000
const MAX_LIMIT: i64 = 10_000;

#[derive(Clone, Debug)]
enum TimeBound {
    Epoch(i64),
    Arg(String),
}

impl TimeBound {
    fn resolve(&self) -> Result<i64, TimeArgError> {
        match self {
            TimeBound::Epoch(secs) => Ok(*secs),
            TimeBound::Arg(arg) => parse_time_arg(arg),
        }
    }
}

/// Builder for a Logs Insights query
#[derive(Clone, Debug)]
pub struct QueryBuilder {
    log_group_name: String,
    fields: Vec<String>,
    filters: Vec<String>,
    message_filter: Option<String>,
    start_time: Option<TimeBound>,
    end_time: Option<TimeBound>,
    limit: Option<i64>,
}

impl QueryBuilder {
    pub fn new(log_group_name: impl Into<String>) -> Self {
        Self {
            log_group_name: log_group_name.into(),
            fields: Vec::new(),
            filters: Vec::new(),
            message_filter: None,
            start_time: None,
            end_time: None,
            limit: None,
        }
    }

    /// Project a field (repeatable)
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Add a complete filter clause, e.g. `@logStream like /coord/` (repeatable)
    pub fn filter(mut self, clause: impl Into<String>) -> Self {
        self.filters.push(clause.into());
        self
    }

    pub fn filters<I, S>(mut self, clauses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.extend(clauses.into_iter().map(Into::into));
        self
    }

    /// Match `@message` against this value (becomes `@message like /value/`)
    pub fn message_filter(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.message_filter = (!value.is_empty()).then_some(value);
        self
    }

    pub fn start_time(mut self, epoch_secs: i64) -> Self {
        self.start_time = Some(TimeBound::Epoch(epoch_secs));
        self
    }

    pub fn end_time(mut self, epoch_secs: i64) -> Self {
        self.end_time = Some(TimeBound::Epoch(epoch_secs));
        self
    }

    /// Start time as epoch seconds or RFC 3339, parsed at build time
    pub fn start_time_arg(mut self, arg: impl Into<String>) -> Self {
        self.start_time = Some(TimeBound::Arg(arg.into()));
        self
    }

    /// End time as epoch seconds or RFC 3339, parsed at build time
    pub fn end_time_arg(mut self, arg: impl Into<String>) -> Self {
        self.end_time = Some(TimeBound::Arg(arg.into()));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Validate and build, using the current time for missing bounds
    pub fn build(self) -> Result<QueryRequest, BuildError> {
        self.build_at(now_epoch_secs())
    }

    /// Validate and build, using `now` (epoch seconds) for missing bounds
    pub fn build_at(self, now: i64) -> Result<QueryRequest, BuildError> {
        if self.log_group_name.trim().is_empty() {
            return Err(BuildError::EmptyLogGroup);
        }

        let fields = resolve_fields(&self.fields)?;

        if self.filters.is_empty() && self.message_filter.is_none() {
            return Err(BuildError::MissingFilter);
        }
        let mut filters = self.filters;
        if let Some(value) = &self.message_filter {
            filters.push(format!("@message like /{}/", value));
        }

        let end_time = match &self.end_time {
            Some(bound) => bound.resolve()?,
            None => now,
        };
        let start_time = match &self.start_time {
            Some(bound) => bound.resolve()?,
            None => end_time
                .checked_sub(DEFAULT_RANGE_SECS)
                .ok_or(BuildError::TimeOutOfRange(end_time))?,
        };
        if start_time >= end_time {
            return Err(BuildError::EmptyRange { start_time, end_time });
        }

        let limit = match self.limit {
            Some(limit) if (1..=MAX_LIMIT).contains(&limit) => Some(limit as i32),
            Some(limit) => return Err(BuildError::InvalidLimit(limit)),
            None => None,
        };

        Ok(QueryRequest {
            log_group_name: self.log_group_name,
            start_time,
            end_time,
            query_string: query_string(&fields, &filters),
            limit,
        })
    }
}

/// Apply the default projection, check the allow-list, dedupe, and make sure
/// `@timestamp` is projected.
fn resolve_fields(requested: &[String]) -> Result<Vec<String>, BuildError> {
    if requested.is_empty() {
        return Ok(DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect());
    }

    let invalid: Vec<String> = requested
        .iter()
        .filter(|f| !ALLOWED_FIELDS.contains(&f.as_str()))
        .cloned()
        .collect();
    if !invalid.is_empty() {
        return Err(BuildError::InvalidFields(invalid));
    }

    let mut fields: Vec<String> = Vec::with_capacity(requested.len() + 1);
    for field in requested {
        if !fields.contains(field) {
            fields.push(field.clone());
        }
    }
    if !fields.iter().any(|f| f == TIMESTAMP_FIELD) {
        fields.push(TIMESTAMP_FIELD.to_string());
    }
    Ok(fields)
}

fn query_string(fields: &[String], filters: &[String]) -> String {
    let mut query = format!("fields {} | sort {} desc", fields.join(", "), TIMESTAMP_FIELD);
    for filter in filters {
        query.push_str(" | filter ");
        query.push_str(filter);
    }
    query
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid fields {0:?}, allowed fields are {allowed:?}", allowed = ALLOWED_FIELDS)]
    InvalidFields(Vec<String>),

    #[error(
        "missing filter or messageFilter, for example -filter \"@message like /19023434_xxx/\" or -messageFilter 1992344_9sf34"
    )]
    MissingFilter,

    #[error("log group name must not be empty")]
    EmptyLogGroup,

    #[error("limit must be between 1 and {max}, got {0}", max = MAX_LIMIT)]
    InvalidLimit(i64),

    #[error("start time {start_time} must be before end time {end_time}")]
    EmptyRange { start_time: i64, end_time: i64 },

    #[error("end time {0} is too early to default the start time")]
    TimeOutOfRange(i64),

    #[error(transparent)]
    InvalidTime(#[from] TimeArgError),
}
