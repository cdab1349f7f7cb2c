//! `fxc`: the offline effect compiler driver.
//!
//! Loads an effect manifest, links every program through [`fx_link`] with
//! the naga backend and writes one artifact per program. `dump` reads an
//! artifact back for inspection.

pub mod commands;
pub mod manifest;

use std::sync::Once;

pub use manifest::{Manifest, ManifestError};

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber. Only called by the binary, and a no-op
/// unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
