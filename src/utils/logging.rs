//! Logging initialization
//!
//! Simple, non-overengineered tracing setup:
//! - Respects the RUST_LOG environment variable
//! - Falls back to a caller-supplied filter, then to "info"
//! - Respects NO_COLOR

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging for the server process
///
/// RUST_LOG takes precedence over the supplied filter; with neither set
/// the level defaults to "info". Call once at startup.
///
/// # Example
/// ```rust,no_run
/// use fieldlink_server::utils::init_logging;
///
/// init_logging(None); // RUST_LOG or "info"
/// init_logging(Some("fieldlink_server=debug"));
/// ```
pub fn init_logging(filter: Option<&str>) {
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(filter.unwrap_or("info"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_ansi(std::env::var("NO_COLOR").is_err()),
        )
        .with(env_filter)
        .init();
}

#[cfg(test)]
mod tests {
    // Initialization is global and would conflict across tests; coverage
    // comes from the integration tests running with a subscriber absent.
}
