//! Log output for hosts without their own subscriber.
//!
//! The crate only emits `tracing` events. Hosts that already install a
//! subscriber need nothing from here.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "hda_format=info";

/// Install a formatted stderr subscriber filtered by `RUST_LOG`.
///
/// Returns false if a global subscriber was already set.
pub fn init() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init()
        .is_ok()
}
