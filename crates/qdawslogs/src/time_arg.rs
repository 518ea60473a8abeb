use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Parse a time bound given either as epoch seconds or as an RFC 3339 timestamp.
pub fn parse_time_arg(value: &str) -> Result<i64, TimeArgError> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<i64>() {
        return Ok(secs);
    }

    OffsetDateTime::parse(value, &Rfc3339)
        .map(|t| t.unix_timestamp())
        .map_err(|_| TimeArgError(value.to_string()))
}

pub(crate) fn now_epoch_secs() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

#[derive(Debug, thiserror::Error)]
#[error("invalid time {0:?}: expected epoch seconds or RFC 3339 (e.g. 2019-06-12T06:47:12.000Z)")]
pub struct TimeArgError(pub String);
