use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when RUST_LOG is not set.
pub const DEFAULT_FILTER: &str = "bookshelf=warn";
pub const VERBOSE_FILTER: &str = "bookshelf=debug";

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins unless `verbose` is set, which always logs debug and up
/// for the bookshelf crate.
pub fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let installed = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();

    if let Err(e) = installed {
        eprintln!("Warning: logging not initialised: {}", e);
    }
}
