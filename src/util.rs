use tracing_subscriber::{fmt, EnvFilter};


/// `RUST_LOG`-driven fmt subscriber, `info` when unset.
pub fn init_tracing() {
let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}
