#![forbid(unsafe_code)]
#![deny(warnings, unused_must_use, dead_code, missing_debug_implementations)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub mod config;
pub mod contract;
pub mod dispatch;
pub mod engine;

pub use contract::{compile, compile_to_dir};

/// Initialize tracing for the CLI.
pub fn init_tracing() {
    let crate_root = module_path!().to_string();

    // OASGATE_LOG controls log level: "trace", "debug", "info", "warn", "error"
    // or a full tracing filter spec like "oasgate=debug,tower_http=warn"
    let filter = match std::env::var("OASGATE_LOG") {
        Ok(level) if is_plain_level(&level) => {
            format!("{crate_root}={level}")
        }
        Ok(spec) => spec,
        Err(_) => format!("{crate_root}=info"),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
