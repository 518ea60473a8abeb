//! Flag handling for the `qdawslogs` binary.
//!
//! Flags are accepted Go-style (`-logGroupName x`, `-limit=10`) as well as in
//! the usual `--logGroupName x` form.

use std::ffi::OsString;
use std::io::Write;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::Parser;
use qdawslogs::{CloudWatchInsights, OutputFormat, Poller, QueryBuilder, QueryRequest, QueryResults};

pub const DEFAULT_LOG_GROUP: &str = "/aws/ecs/prod-rt";
pub const DEFAULT_REGION: &str = "us-east-1";

pub const USAGE: &str = r#"qdawslogs - query CloudWatch Logs Insights and wait for the results

USAGE:
    qdawslogs [-logGroupName NAME] [-field FIELD]* (-filter CLAUSE)* [-messageFilter VALUE]
              [-startTime TIME] [-endTime TIME] [-limit N] [-region REGION]
              [-pollInterval SECS] [-output text|json]

REQUIRED:
    -filter or -messageFilter (at least one).

    -filter CLAUSE         A complete filter clause, e.g. "@logStream like /coord/" (repeatable).
                           See https://docs.aws.amazon.com/AmazonCloudWatch/latest/logs/CWL_QuerySyntax.html
    -messageFilter VALUE   Value matched against @message, becomes "@message like /VALUE/".

OPTIONS:
    -logGroupName NAME     Log group to query (default: /aws/ecs/prod-rt)
    -field FIELD           Field to return (repeatable): @timestamp, @message, @logStream
                           or @ingestionTime (default: @timestamp, @logStream, @message).
                           @timestamp is always returned.
    -startTime TIME        Epoch seconds or RFC 3339 (default: one hour before endTime)
    -endTime TIME          Epoch seconds or RFC 3339 (default: now)
    -limit N               Maximum number of records, 1 to 10000
    -region REGION         AWS region (default: us-east-1)
    -pollInterval SECS     Seconds to wait before each results poll (default: 10)
    -output FORMAT         Row format: text (default) or json
    -h, -help              Print this help message

    Log verbosity is controlled with RUST_LOG (default: info).

EXAMPLES:
    Fields @timestamp and @message from /aws/ecs/stage-rt in the hour before an epoch time:
        qdawslogs -logGroupName /aws/ecs/stage-rt -field @timestamp -field @message \
            -filter "@message like /19062412_5Xi2eYcEc6/" -endTime 1560322977 -limit 1000

    Default fields from /aws/ecs/prod-rt starting at an RFC 3339 time:
        qdawslogs -startTime "2019-06-12T06:47:12.000Z" -messageFilter 19062412_5Xi2eYcEc6

    Same, restricted to log streams containing "coord":
        qdawslogs -startTime "2019-06-12T06:47:12.000Z" -messageFilter 19062412_5Xi2eYcEc6 \
            -filter "@logStream like /coord/"
"#;

/// Long flag names, used to accept the single-dash spelling
const LONG_FLAGS: &[&str] = &[
    "logGroupName",
    "field",
    "filter",
    "messageFilter",
    "startTime",
    "endTime",
    "limit",
    "region",
    "pollInterval",
    "output",
    "help",
];

#[derive(Debug, Parser)]
#[command(name = "qdawslogs")]
#[command(about = "Query CloudWatch Logs Insights and wait for the results", long_about = None)]
#[command(override_help = USAGE)]
pub struct Cli {
    /// Log group to query
    #[arg(
        long = "logGroupName",
        allow_hyphen_values = true,
        default_value = DEFAULT_LOG_GROUP
    )]
    pub log_group_name: String,

    /// Field to return (repeatable)
    #[arg(long = "field", allow_hyphen_values = true)]
    pub fields: Vec<String>,

    /// Complete filter clause (repeatable)
    #[arg(long = "filter", allow_hyphen_values = true)]
    pub filters: Vec<String>,

    /// Value for `@message like /VALUE/`
    #[arg(long = "messageFilter", allow_hyphen_values = true)]
    pub message_filter: Option<String>,

    /// Epoch seconds or RFC 3339
    #[arg(long = "startTime", allow_hyphen_values = true)]
    pub start_time: Option<String>,

    /// Epoch seconds or RFC 3339
    #[arg(long = "endTime", allow_hyphen_values = true)]
    pub end_time: Option<String>,

    #[arg(long = "limit", allow_hyphen_values = true)]
    pub limit: Option<i64>,

    #[arg(long = "region", allow_hyphen_values = true, default_value = DEFAULT_REGION)]
    pub region: String,

    /// Seconds to wait before each results poll
    #[arg(long = "pollInterval", default_value_t = 10)]
    pub poll_interval: u64,

    #[arg(long = "output", default_value = "text")]
    pub output: OutputFormat,
}

impl Cli {
    pub fn query_builder(&self) -> QueryBuilder {
        let mut builder = QueryBuilder::new(&self.log_group_name)
            .fields(&self.fields)
            .filters(&self.filters);

        if let Some(value) = &self.message_filter {
            builder = builder.message_filter(value);
        }
        if let Some(start) = &self.start_time {
            builder = builder.start_time_arg(start);
        }
        if let Some(end) = &self.end_time {
            builder = builder.end_time_arg(end);
        }
        if let Some(limit) = self.limit {
            builder = builder.limit(limit);
        }
        builder
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ArgsError {
    #[error("no flags given")]
    NoFlags,

    #[error(transparent)]
    Clap(#[from] clap::Error),
}

/// Parse a full argv (program name first)
pub fn parse_args<I, T>(args: I) -> Result<Cli, ArgsError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args = normalize_args(args);
    if args.len() <= 1 {
        return Err(ArgsError::NoFlags);
    }
    Ok(Cli::try_parse_from(args)?)
}

/// Rewrite `-name` / `-name=value` to `--name` / `--name=value` for known long flags.
///
/// The token after a value-taking flag is its value and is passed through as is.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut value_next = false;
    for arg in args.into_iter().map(Into::into) {
        if std::mem::take(&mut value_next) {
            out.push(arg);
            continue;
        }

        let Some(s) = arg.to_str() else {
            out.push(arg);
            continue;
        };
        let name = match s.strip_prefix("--") {
            Some(rest) => rest,
            None => s.strip_prefix('-').unwrap_or(""),
        };
        let (name, inline_value) = match name.split_once('=') {
            Some((name, _)) => (name, true),
            None => (name, false),
        };
        if !LONG_FLAGS.contains(&name) {
            out.push(arg);
            continue;
        }

        value_next = name != "help" && !inline_value;
        if s.starts_with("--") {
            out.push(arg);
        } else {
            out.push(OsString::from(format!("-{}", s)));
        }
    }
    out
}

/// Process exit code for an argument error: usage requests succeed, everything else fails
pub fn args_exit_code(err: &ArgsError) -> u8 {
    match err {
        ArgsError::Clap(e)
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) =>
        {
            0
        }
        _ => 1,
    }
}

/// Run the query described by `cli` and write rows to `out`
pub async fn run(cli: &Cli, request: &QueryRequest, out: &mut impl Write) -> anyhow::Result<()> {
    let service = CloudWatchInsights::connect(&cli.region).await;
    let poller = Poller::new(service).with_interval(cli.poll_interval());

    let results = poller.run(request).await?;
    print_results(&results, cli.output, out)?;
    Ok(())
}

pub fn print_results(
    results: &QueryResults,
    format: OutputFormat,
    out: &mut impl Write,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(out, "----------------")?;
            for row in &results.rows {
                writeln!(out, "{}\n", format.render(row))?;
            }
        }
        OutputFormat::Json => {
            for row in &results.rows {
                writeln!(out, "{}", format.render(row))?;
            }
        }
    }
    out.flush()
}
