// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Logging setup for controllers built on this crate.
//!
//! Output format: timestamp file:line LEVEL message, as compact text or JSON.
//! `RUST_LOG` overrides the configured level when it is set.
//!
//! ```rust,ignore
//! #[derive(clap::Parser)]
//! struct Cli {
//!     #[command(flatten)]
//!     log: LogOptions,
//! }
//!
//! let cli = Cli::parse();
//! init_logging(&cli.log)?;
//! ```

use anyhow::anyhow;
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Output encoding of log lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogEncoding {
    #[default]
    Json,
    Console,
}

/// Minimum level of log lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Error,
}

impl LogLevel {
    /// The `EnvFilter` directive for this level.
    #[must_use]
    pub fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// Command-line and config-file logging options.
#[derive(Args, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogOptions {
    /// Log encoding format.
    #[arg(long = "log-encoding", value_enum, default_value_t = LogEncoding::Json)]
    pub log_encoding: LogEncoding,

    /// Log verbosity level.
    #[arg(long = "log-level", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl LogOptions {
    /// The filter to install: `RUST_LOG` if set, otherwise the configured level.
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_level.as_directive()))
    }
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(options: &LogOptions) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(options.env_filter())
        .with_file(true)
        .with_line_number(true)
        .with_thread_names(true)
        .with_target(false);

    let result = match options.log_encoding {
        LogEncoding::Json => builder.json().try_init(),
        LogEncoding::Console => builder.with_ansi(true).compact().try_init(),
    };

    result.map_err(|e| anyhow!("failed to initialize logging: {e}"))
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod logging_tests;
