//! Diagnostic logging
//!
//! Diagnostics go to stderr through `tracing`; command results stay on stdout.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `RUST_LOG` wins when set. Otherwise `info`, or `debug` with `--verbose`.
/// Calling this twice is harmless.
pub fn init(verbose: bool) {
  let default_level = if verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_ansi(false)
    .with_writer(std::io::stderr)
    .try_init();
}
