//! Logging setup utilities for the Walkie binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Both the Walkie library crates and the binary itself log at `default_log_level`
/// unless `RUST_LOG` says otherwise.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "walkie-server", "walkie-client")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use walkie_shared::logger::setup_logger;
///
/// setup_logger("walkie-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    let default_filter = default_directives(binary_name, default_log_level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the fallback filter used when `RUST_LOG` is not set.
fn default_directives(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");
    [
        "walkie_shared",
        "walkie_server",
        "walkie_client",
        "tower_http",
    ]
    .iter()
    .map(|target| format!("{}={}", target, default_log_level))
    .chain(std::iter::once(format!(
        "{}={}",
        binary_target, default_log_level
    )))
    .collect::<Vec<_>>()
    .join(",")
}
