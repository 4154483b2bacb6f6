//! Logging initialization

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber for the CLI binary.
///
/// `RUST_LOG` wins when set; `default_level` applies otherwise. Diagnostics
/// go to stderr so command output on stdout stays machine-readable.
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
