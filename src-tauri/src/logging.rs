use env_logger::Env;

/// Installs the global logger. `RUST_LOG` overrides the default `info` filter.
/// Calling it again is a no-op.
pub fn init() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
