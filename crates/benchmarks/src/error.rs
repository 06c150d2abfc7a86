// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for loading, running and reporting benchmark results.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the result pipeline.
#[derive(Debug, Error)]
pub enum BenchError {
    /// The path is neither a benchmark executable nor a result document.
    #[error("Invalid input file: {reason}")]
    InvalidInput {
        /// Offending path.
        path: PathBuf,
        /// Human readable classification failure.
        reason: String,
    },

    /// The benchmark program exited unsuccessfully.
    #[error("benchmark '{program}' failed with {}", exit_description(.code))]
    ExecutionFailure {
        /// Program that was run.
        program: String,
        /// Exit code, `None` when terminated by a signal.
        code: Option<i32>,
    },

    /// A result document could not be parsed.
    #[error("failed to parse result document {}: {reason}", .path.display())]
    ParseFailure {
        /// Document path.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// An output format other than JSON was requested for the captured results.
    #[error("passing '--benchmark_out_format={format}' is not supported")]
    UnsupportedOutputOverride {
        /// Requested format.
        format: String,
    },

    /// A name or label pattern failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        /// Pattern text.
        pattern: String,
        /// Compiler error.
        #[source]
        source: regex::Error,
    },

    /// Settings could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Filesystem or process spawn error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "termination by signal".to_string(),
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, BenchError>;
