//! Logging setup shared by the binaries.
//!
//! Logs go through `tracing`; the filter honours `RUST_LOG` with INFO as the
//! floor. The tool server keeps stdout for protocol traffic, so it logs to
//! stderr.

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    Stderr,
}

pub fn init_tracing(target: LogTarget) {
    let filter = EnvFilter::from_default_env().add_directive(Level::INFO.into());

    match target {
        LogTarget::Stdout => {
            let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .init();
        }
        LogTarget::Stderr => {
            let stderr_layer = tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
        }
    }
}
