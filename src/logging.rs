use std::env;
use std::io;
use tracing_appender::rolling;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_STDOUT_FILTER: &str = "info,llm_request=info,db_query=warn,sqlx=off";
const DEFAULT_FILE_FILTER: &str = "info,llm_request=debug,cluster=debug,sqlx=info";

/// Installs the global subscriber: stdout plus a daily rolling file.
///
/// `RUST_LOG` replaces the stdout filter; `LOG_DIR` moves the log files out
/// of `logs/`.
pub fn configure_logging() {
    let stdout_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_STDOUT_FILTER));

    // Diagnostics go to stderr so JSON output on stdout stays clean
    let stdout_log = fmt::layer()
        .with_writer(io::stderr)
        .with_filter(stdout_filter);

    let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());
    let file_appender = rolling::daily(log_dir, "news-clusters.log");
    let file_log = fmt::layer()
        .with_ansi(false)
        .with_writer(file_appender)
        .with_filter(EnvFilter::new(DEFAULT_FILE_FILTER));

    tracing_subscriber::Registry::default()
        .with(stdout_log)
        .with(file_log)
        .init();
}
