//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Installs a stderr formatter. `RUST_LOG` overrides the default level.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "plastic_flows=debug"
    } else {
        "plastic_flows=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A second call (e.g. from tests) leaves the first subscriber in place.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
