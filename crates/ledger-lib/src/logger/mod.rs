use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable that overrides the log filter (e.g. `ledger_lib=trace`).
pub const LOG_ENV: &str = "LEDGER_LOG";

/// Build the log filter. `LEDGER_LOG` wins when set; otherwise `debug`
/// selects DEBUG and the default is WARN, so command output on stdout is
/// not interleaved with routine log lines.
pub fn filter(debug: bool) -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(spec) if !spec.trim().is_empty() => EnvFilter::new(spec),
        _ if debug => EnvFilter::new("debug"),
        _ => EnvFilter::new("warn"),
    }
}

/// Initialize the tracing subscriber with timestamp, level, and target,
/// writing to stderr.
pub fn init(debug: bool) {
    fmt()
        .with_env_filter(filter(debug))
        .with_timer(fmt::time::SystemTime)
        .with_level(true)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
