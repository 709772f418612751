//! Tracing subscriber bootstrap for the server binary.

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG`, defaulting to
/// `info`. Safe to call more than once; later calls are ignored.
pub fn init() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
