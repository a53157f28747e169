//! Logging setup.
//!
//! stdout is reserved for pipeline output; all diagnostics go to
//! stderr, either human-readable for interactive use or JSONL for
//! machine consumption. `SCRUB_LOG` / `RUST_LOG` override the computed
//! filter.

use std::io::IsTerminal;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Human,
    Jsonl,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Human => write!(f, "human"),
            LogFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Initialize the logging subsystem. Call once at startup.
///
/// Verbosity maps `-q` to errors only, the default to warnings, `-v`
/// to info, `-vv` to debug, and `-vvv` to trace.
pub fn init_logging(verbose: u8, quiet: bool, format: LogFormat) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_env("SCRUB_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "scrub_core={level},scrub_redact={level},scrub_config={level}"
            ))
        });

    match format {
        LogFormat::Human => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal())
                .without_time();
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        LogFormat::Jsonl => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .json()
                .with_current_span(false)
                .with_span_list(false);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }
}
