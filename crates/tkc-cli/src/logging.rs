use tracing_subscriber::EnvFilter;

/// Maps the `-v` count to a `tracing` level filter.
fn level(verbose: u8) -> &'static str {
    match verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Logs go to stderr so stdout only ever
/// carries count lines.
pub fn init(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level(verbose)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
