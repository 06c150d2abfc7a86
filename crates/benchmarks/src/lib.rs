// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark result ingestion, comparison and reporting.
//!
//! This crate loads the JSON result documents written by benchmark programs
//! (or runs the program to capture one), compares two runs, and renders
//! results as a colourized diff, CSV, a text table, or HTML charts spanning
//! many historical result files.
//!
//! # Quick Start
//!
//! ```no_run
//! use benchscope_results::{compare, obtain, render};
//!
//! let baseline = obtain("before.json", &[])?;
//! let candidate = obtain("./bench_sort", &["--benchmark_repetitions=3".to_string()])?;
//!
//! for line in render::diff::render_diff(&compare(&baseline, &candidate)) {
//!     println!("{}", line);
//! }
//! # Ok::<(), benchscope_results::BenchError>(())
//! ```
//!
//! # Modules
//!
//! - [`result`] - result documents and records
//! - [`classify`] - executable vs. result document detection
//! - [`runner`] - loading documents and running benchmark programs
//! - [`align`] - per-name series across many result files
//! - [`grouping`] - pattern extraction for chart keys
//! - [`compare`] - two-run relative change and significance bands
//! - [`render`] - diff, CSV, table and chart output
//! - [`config`] - chart aggregation settings

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod align;
pub mod classify;
pub mod compare;
pub mod config;
pub mod error;
pub mod grouping;
pub mod render;
pub mod result;
pub mod runner;

pub use align::{align, AlignWarning, History, Sample, Series, SourceFile};
pub use classify::{classify, InputKind};
pub use compare::{compare, Band, BenchmarkDelta, Comparison};
pub use crate::config::AggregateSettings;
pub use error::{BenchError, Result};
pub use result::{BenchmarkRecord, ResultDocument};
pub use runner::{check_passthrough, obtain, FlagWarning};
