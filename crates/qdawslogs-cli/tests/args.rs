//! Flag parsing through to the StartQuery request.

use qdawslogs::{BuildError, OutputFormat};
use qdawslogs_cli::{parse_args, ArgsError, DEFAULT_LOG_GROUP, DEFAULT_REGION};

const NOW: i64 = 1_560_322_977;

#[test]
fn no_flags_is_an_error() {
    assert!(matches!(parse_args(["qdawslogs"]), Err(ArgsError::NoFlags)));
}

#[test]
fn missing_filter_fails_validation() {
    let cli = parse_args(["qdawslogs", "-logGroupName", "/aws/ecs/stage-rt"]).unwrap();
    let err = cli.query_builder().build_at(NOW).unwrap_err();
    assert!(matches!(err, BuildError::MissingFilter));
}

#[test]
fn message_filter_only() {
    let cli = parse_args(["qdawslogs", "-messageFilter", "19062412_5Xi2eYcEc6"]).unwrap();
    assert_eq!(cli.region, DEFAULT_REGION);
    assert_eq!(cli.output, OutputFormat::Text);

    let request = cli.query_builder().build_at(NOW).unwrap();
    assert_eq!(request.log_group_name, DEFAULT_LOG_GROUP);
    assert_eq!(request.end_time, NOW);
    assert_eq!(request.start_time, NOW - 3600);
    assert_eq!(request.limit, None);
    assert!(request
        .query_string
        .contains("@message like /19062412_5Xi2eYcEc6/"));
    assert!(request.query_string.starts_with("fields @timestamp, @logStream, @message"));
}

#[test]
fn full_invocation() {
    let cli = parse_args([
        "qdawslogs",
        "-logGroupName",
        "/aws/ecs/stage-rt",
        "-field",
        "@message",
        "-field=@logStream",
        "-filter",
        "@message like /19062412_5Xi2eYcEc6/",
        "-endTime",
        "1560322977",
        "-limit",
        "1000",
        "-region",
        "eu-west-1",
        "--pollInterval",
        "2",
        "-output",
        "json",
    ])
    .unwrap();

    assert_eq!(cli.region, "eu-west-1");
    assert_eq!(cli.poll_interval().as_secs(), 2);
    assert_eq!(cli.output, OutputFormat::Json);

    let request = cli.query_builder().build_at(NOW + 999).unwrap();
    assert_eq!(request.log_group_name, "/aws/ecs/stage-rt");
    assert_eq!(request.start_time, 1_560_322_977 - 3600);
    assert_eq!(request.end_time, 1_560_322_977);
    assert_eq!(request.limit, Some(1000));
    assert_eq!(
        request.query_string,
        "fields @message, @logStream, @timestamp | sort @timestamp desc | filter @message like /19062412_5Xi2eYcEc6/"
    );
}

#[test]
fn invalid_field_fails_validation() {
    let cli = parse_args(["qdawslogs", "-field", "@requestId", "-messageFilter", "x"]).unwrap();
    let err = cli.query_builder().build_at(NOW).unwrap_err();
    assert!(matches!(err, BuildError::InvalidFields(_)));
}

#[test]
fn unknown_flag_is_rejected() {
    assert!(matches!(
        parse_args(["qdawslogs", "--bogus", "1"]),
        Err(ArgsError::Clap(_))
    ));
}

#[test]
fn values_may_start_with_a_hyphen() {
    let cli = parse_args(["qdawslogs", "-messageFilter", "-abc", "-startTime", "-100"]).unwrap();
    assert_eq!(cli.message_filter.as_deref(), Some("-abc"));
    assert_eq!(cli.start_time.as_deref(), Some("-100"));

    let cli = parse_args(["qdawslogs", "-filter", "-limit", "-limit", "5"]).unwrap();
    assert_eq!(cli.filters, vec!["-limit".to_string()]);
    assert_eq!(cli.limit, Some(5));
}

#[test]
fn negative_limit_reaches_validation() {
    let cli = parse_args(["qdawslogs", "-messageFilter", "x", "-limit", "-5"]).unwrap();
    let err = cli.query_builder().build_at(NOW).unwrap_err();
    assert!(matches!(err, BuildError::InvalidLimit(-5)));
}
