//! Reflection header scanner.
//!
//! Library half of the `reflc` binary: command-line configuration and the
//! `lex` command, which runs one token reader per header file in parallel
//! and collects every diagnostic into a shared log.

pub mod commands;
mod config;

use std::sync::Once;

pub use config::{ConfigError, LexConfig};

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber.
///
/// Only does anything when `RUST_LOG` is set, e.g.
/// `RUST_LOG=refl_lexer=debug reflc lex Actor.h`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
