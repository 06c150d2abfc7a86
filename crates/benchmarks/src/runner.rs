// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Obtaining result documents: load a captured file or run a benchmark program.
//!
//! Programs are driven through the [`BenchmarkProgram`] capability. The
//! runner owns a private temporary output file for each run and removes it on
//! every exit path, including process and parse failures.

use crate::classify::{classify, InputKind};
use crate::error::{BenchError, Result};
use crate::result::ResultDocument;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{error, info, warn};

/// Flag prefix telling a benchmark program where to write its results.
pub const OUTPUT_FLAG: &str = "--benchmark_out=";

/// Flag prefix selecting the serialization of the results file.
pub const OUTPUT_FORMAT_FLAG: &str = "--benchmark_out_format=";

/// A benchmark program seen only through its process contract.
pub trait BenchmarkProgram {
    /// Human readable command name for logs and errors.
    fn describe(&self) -> String;

    /// Run with `args` plus the output flag pointing at `output`.
    ///
    /// Returns the exit code, `None` when the process was terminated by a signal.
    fn run(&self, args: &[String], output: &Path) -> Result<Option<i32>>;
}

/// A native executable on disk, run as a child process.
///
/// The child inherits stdout and stderr so its progress stays visible live.
#[derive(Debug, Clone)]
pub struct ProcessProgram {
    path: PathBuf,
}

impl ProcessProgram {
    /// Wrap the executable at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BenchmarkProgram for ProcessProgram {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn run(&self, args: &[String], output: &Path) -> Result<Option<i32>> {
        let status = Command::new(&self.path)
            .args(args)
            .arg(format!("{}{}", OUTPUT_FLAG, output.display()))
            .status()?;
        Ok(status.code())
    }
}

/// Value of the last pass-through flag starting with `prefix`.
pub fn find_flag<'a>(prefix: &str, flags: &'a [String]) -> Option<&'a str> {
    flags
        .iter()
        .rev()
        .find_map(|flag| flag.strip_prefix(prefix))
}

/// Non-fatal problem with the pass-through flags of one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagWarning {
    /// An executable was given its own output path, which the runner replaces.
    OutputOverwritten {
        /// Path given with `--benchmark_out=`.
        output: String,
    },
    /// Flags were given alongside a result document.
    NoEffect,
}

impl fmt::Display for FlagWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagWarning::OutputOverwritten { output } => write!(
                f,
                "'{}{}' will be passed to the benchmark causing it to be overwritten",
                OUTPUT_FLAG, output
            ),
            FlagWarning::NoEffect => {
                write!(f, "passing benchmark flags has no effect on a result file")
            }
        }
    }
}

/// Diagnose pass-through flags before anything is run.
///
/// Fails when an output format other than JSON is requested, since the
/// captured file is parsed as a result document afterwards. Other problems
/// are returned as warnings.
pub fn check_passthrough(kind: &InputKind, flags: &[String]) -> Result<Vec<FlagWarning>> {
    if let Some(format) = find_flag(OUTPUT_FORMAT_FLAG, flags) {
        if format != "json" {
            return Err(BenchError::UnsupportedOutputOverride {
                format: format.to_string(),
            });
        }
    }

    let mut warnings = Vec::new();
    match kind {
        InputKind::Executable => {
            if let Some(output) = find_flag(OUTPUT_FLAG, flags) {
                warnings.push(FlagWarning::OutputOverwritten {
                    output: output.to_string(),
                });
            }
        }
        InputKind::ResultDocument if !flags.is_empty() => warnings.push(FlagWarning::NoEffect),
        _ => {}
    }
    Ok(warnings)
}

/// Load `path` if it is a result document, or run it if it is an executable.
///
/// Flag warnings are logged; an unsupported output format is an error.
pub fn obtain(path: impl AsRef<Path>, extra_args: &[String]) -> Result<ResultDocument> {
    let path = path.as_ref();
    let kind = match classify(path) {
        InputKind::Invalid(reason) => {
            return Err(BenchError::InvalidInput {
                path: path.to_path_buf(),
                reason,
            })
        }
        kind => kind,
    };
    for warning in check_passthrough(&kind, extra_args)? {
        warn!("{}: {}", path.display(), warning);
    }
    match kind {
        InputKind::Executable => run_program(&ProcessProgram::new(path), extra_args),
        _ => ResultDocument::from_path(path),
    }
}

/// Run `program` and parse the result document it writes.
pub fn run_program(program: &dyn BenchmarkProgram, args: &[String]) -> Result<ResultDocument> {
    // Closed handle; the file is deleted when `output` drops.
    let output = tempfile::Builder::new()
        .prefix("benchscope-")
        .suffix(".json")
        .tempfile()?
        .into_temp_path();

    let mut command_line = vec![program.describe()];
    command_line.extend(args.iter().cloned());
    info!("RUNNING: {}", command_line.join(" "));

    let code = program.run(args, &output)?;
    if code != Some(0) {
        error!("TEST FAILED...");
        return Err(BenchError::ExecutionFailure {
            program: program.describe(),
            code,
        });
    }

    let document = ResultDocument::from_path(&output)?;
    output.close()?;
    Ok(document)
}
