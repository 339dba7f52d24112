//! Trellis - tiling window manager core tooling.
//!
//! Logging goes to stderr and is controlled by `TRELLIS_LOG`
//! (e.g. `TRELLIS_LOG=trellis_lib=debug`); the default level is `info`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "TRELLIS_LOG";

fn main() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    if let Err(err) = trellis_lib::cli::run() {
        eprintln!("trellis: {err}");
        std::process::exit(1);
    }
}
