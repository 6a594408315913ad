use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "metis_api=info,tower_http=info";

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter; calling this more than once is harmless.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
