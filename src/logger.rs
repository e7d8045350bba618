//! Tracing subscriber setup shared by the server and client binaries.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the given binary name is
/// filtered at `default_level` and tower-http at `info`.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let target = bin_name.replace('-', "_");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{target}={default_level},pong_relay_rs={default_level},tower_http=info"
        ))
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
