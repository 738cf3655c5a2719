use tracing_subscriber::{fmt, EnvFilter};

/// Initialize a tracing subscriber writing to stdout.
/// - Respects `RUST_LOG` if set
/// - Falls back to `info,mockdoc_memory=debug`
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging_default() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mockdoc_memory=debug"));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}
