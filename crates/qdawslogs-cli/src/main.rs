use std::process::ExitCode;

use qdawslogs_cli::{args_exit_code, parse_args, run, ArgsError, USAGE};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => {
            let code = args_exit_code(&err);
            match &err {
                ArgsError::NoFlags => println!("{}", USAGE),
                ArgsError::Clap(e) => {
                    let _ = e.print();
                    if code != 0 {
                        eprintln!("Run 'qdawslogs -help' for usage information.");
                    }
                }
            }
            return ExitCode::from(code);
        }
    };

    let request = match cli.query_builder().build() {
        Ok(request) => request,
        Err(e) => {
            eprintln!("ERROR {}\n\n{}", e, USAGE);
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = std::io::stdout().lock();
    match run(&cli, &request, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
