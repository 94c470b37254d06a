//! Logging setup shared by the binaries.
use tracing_subscriber::EnvFilter;

/// Install a global `fmt` subscriber writing to standard output.
///
/// Verbosity is controlled via `RUST_LOG`, defaulting to `info`.
pub fn init_subscriber() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
