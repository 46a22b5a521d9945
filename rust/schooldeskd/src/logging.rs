use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "schooldeskd=info";

/// Initialize tracing on stderr; stdout carries the IPC responses.
///
/// `RUST_LOG` overrides the default `schooldeskd=info` filter.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
