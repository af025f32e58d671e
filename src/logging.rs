//! Diagnostics for the engine and the binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left to the
//! host. The `steply-mask` binary calls [`init`], which writes to stderr and honours
//! `RUST_LOG`:
//! - `RUST_LOG=debug` - rejected edits and config loading
//! - `RUST_LOG=steply_mask::widgets::inputs::masked=trace` - every filtered change

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true);

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();
}
