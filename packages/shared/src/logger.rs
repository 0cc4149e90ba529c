//! Logging setup for the trivia-relay binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Library crate whose spans and events every binary wants to see.
const SERVER_CRATE: &str = "trivia_relay_server";

/// Build the default `EnvFilter` directive for a binary.
///
/// Enables the server library crate, the binary itself and `tower_http` at
/// `default_log_level`. A target is listed once even when the binary shares
/// its name with the library crate.
fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    let binary = binary_name.replace('-', "_");
    let mut targets: Vec<&str> = Vec::new();
    for target in [SERVER_CRATE, binary.as_str(), "tower_http"] {
        if !targets.contains(&target) {
            targets.push(target);
        }
    }

    targets
        .iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "trivia-relay-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use trivia_relay_shared::logger::setup_logger;
///
/// setup_logger("trivia-relay-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
