// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Output views over loaded results.
//!
//! - [`diff`] - colourized two-run comparison
//! - [`csv`] - one CSV row per benchmark
//! - [`table`] - fixed-width text table
//! - [`chart`] - HTML charts over many historical result files

pub mod chart;
pub mod csv;
pub mod diff;
pub mod table;
