use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber, `RUST_LOG` wins over `verbose`
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // a second init (tests, embedding apps) keeps the first subscriber
    let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}
