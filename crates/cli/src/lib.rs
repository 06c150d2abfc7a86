// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI for benchscope.
//!
//! This crate provides the command-line interface over
//! `benchscope-results`: two-run comparison, CSV and table dumps of a single
//! run, and HTML chart aggregation over a directory of historical results.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

use anyhow::Context;
use benchscope_results::render::{chart, csv, diff, table};
use benchscope_results::{
    check_passthrough, classify, compare, obtain, AggregateSettings, BenchError, InputKind,
    ResultDocument,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Benchmark result comparison and reporting.
#[derive(Parser, Debug)]
#[command(name = "benchscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// When to colour terminal output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Colour when stdout is a terminal.
    Auto,
    /// Always emit colour codes.
    Always,
    /// Never emit colour codes.
    Never,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare two benchmark executables or result files.
    ///
    /// Prints, for every benchmark of the first run also present in the
    /// second, the relative change of real time and CPU time.
    Compare {
        /// When to colour the diff.
        #[arg(long, value_enum, default_value = "auto")]
        color: ColorChoice,

        /// Baseline executable or result file.
        baseline: PathBuf,

        /// Candidate executable or result file.
        candidate: PathBuf,

        /// Flags passed to benchmark executables.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        benchmark_options: Vec<String>,
    },

    /// Print the results of a benchmark executable or result file as CSV.
    Csv {
        /// Benchmark executable or result file.
        test: PathBuf,

        /// Flags passed to the benchmark executable.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        benchmark_options: Vec<String>,
    },

    /// Print the results of a benchmark executable or result file as a table.
    Table {
        /// Benchmark executable or result file.
        test: PathBuf,

        /// Flags passed to the benchmark executable.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        benchmark_options: Vec<String>,
    },

    /// Write an HTML document charting every result file of a directory.
    ChartAggregate(ChartArgs),
}

/// Options of `chart-aggregate`; unset options fall back to the settings file, then defaults.
#[derive(clap::Args, Debug, Default)]
pub struct ChartArgs {
    /// Settings file (TOML, JSON or YAML).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory containing result files [default: .]
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Metric to track [default: real_time]
    #[arg(short, long)]
    pub metric: Option<String>,

    /// chart.js chart type [default: line]
    #[arg(short = 't', long)]
    pub chart_type: Option<String>,

    /// HTML file to write [default: charts.html]
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Keep only the N most recent files per chart (0 or negative keeps all)
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub max_entries: Option<i64>,

    /// Only chart benchmarks whose name matches this pattern [default: .*]
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Pattern deriving the group of a benchmark (capture groups are concatenated)
    #[arg(short, long)]
    pub group: Option<String>,

    /// Pattern deriving the chart title; equal titles share a chart [default: (.+)/]
    #[arg(short, long)]
    pub chart: Option<String>,

    /// Pattern deriving the legend label [default: ([^/]+$)]
    #[arg(short = 'b', long)]
    pub legend: Option<String>,

    /// Pattern deriving axis labels from file paths
    #[arg(short, long)]
    pub label: Option<String>,

    /// HTML fragment inserted after the script includes
    #[arg(short = 'i', long)]
    pub header_file: Option<PathBuf>,
}

impl ChartArgs {
    /// Layer these options over the settings file (if any) and the defaults.
    pub fn settings(&self) -> Result<AggregateSettings, BenchError> {
        let mut settings = match &self.config {
            Some(path) => AggregateSettings::from_file(path)?,
            None => AggregateSettings::default(),
        };
        if let Some(directory) = &self.directory {
            settings.directory = directory.clone();
        }
        if let Some(metric) = &self.metric {
            settings.metric = metric.clone();
        }
        if let Some(chart_type) = &self.chart_type {
            settings.chart_type = chart_type.clone();
        }
        if let Some(out) = &self.out {
            settings.output = out.clone();
        }
        if let Some(max_entries) = self.max_entries {
            settings.max_entries = Some(max_entries);
        }
        if let Some(filter) = &self.filter {
            settings.filter = filter.clone();
        }
        if let Some(group) = &self.group {
            settings.group = Some(group.clone());
        }
        if let Some(chart) = &self.chart {
            settings.chart = chart.clone();
        }
        if let Some(legend) = &self.legend {
            settings.legend = legend.clone();
        }
        if let Some(label) = &self.label {
            settings.label = label.clone();
        }
        if let Some(header_file) = &self.header_file {
            settings.header_file = Some(header_file.clone());
        }
        Ok(settings)
    }
}

/// Install the stderr log subscriber.
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Process exit code for a failed command.
///
/// A failed benchmark run exits with the benchmark's own code.
pub fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<BenchError>() {
        Some(BenchError::ExecutionFailure {
            code: Some(code), ..
        }) if *code != 0 => *code,
        _ => 1,
    }
}

/// Classify an input and vet its pass-through flags, before anything runs.
fn check_input(path: &Path, flags: &[String]) -> Result<(), BenchError> {
    match classify(path) {
        InputKind::Invalid(reason) => Err(BenchError::InvalidInput {
            path: path.to_path_buf(),
            reason,
        }),
        // Warnings are logged by `obtain`.
        kind => check_passthrough(&kind, flags).map(|_| ()),
    }
}

fn load(path: &Path, flags: &[String]) -> anyhow::Result<ResultDocument> {
    obtain(path, flags).with_context(|| format!("failed to obtain results from {}", path.display()))
}

/// Run a parsed command line.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Compare {
            color,
            baseline,
            candidate,
            benchmark_options,
        } => {
            check_input(&baseline, &benchmark_options)?;
            check_input(&candidate, &benchmark_options)?;
            let before = load(&baseline, &benchmark_options)?;
            let after = load(&candidate, &benchmark_options)?;

            match color {
                ColorChoice::Auto => colored::control::unset_override(),
                ColorChoice::Always => colored::control::set_override(true),
                ColorChoice::Never => colored::control::set_override(false),
            }
            for line in diff::render_diff(&compare(&before, &after)) {
                println!("{}", line);
            }
            Ok(())
        }
        Commands::Csv {
            test,
            benchmark_options,
        } => {
            check_input(&test, &benchmark_options)?;
            let document = load(&test, &benchmark_options)?;
            print!("{}", csv::render_csv(&document)?);
            Ok(())
        }
        Commands::Table {
            test,
            benchmark_options,
        } => {
            check_input(&test, &benchmark_options)?;
            let document = load(&test, &benchmark_options)?;
            for line in table::render_table(&document) {
                println!("{}", line);
            }
            Ok(())
        }
        Commands::ChartAggregate(args) => {
            let settings = args.settings()?;
            let Some(report) = chart::aggregate(&settings)? else {
                println!(
                    "Found 0 json files in dir: {}",
                    settings.directory.display()
                );
                return Ok(());
            };

            for skipped in &report.skipped {
                warn!("skipped {}: {}", skipped.path.display(), skipped.reason);
            }
            fs::write(&settings.output, &report.html)
                .with_context(|| format!("failed to write {}", settings.output.display()))?;
            info!(
                "Wrote {} charts in {} groups to {}",
                report.charts,
                report.groups,
                settings.output.display()
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_collects_passthrough_flags() {
        let cli = Cli::try_parse_from([
            "benchscope",
            "compare",
            "a.json",
            "b.json",
            "--benchmark_filter=BM_Sort",
            "--benchmark_repetitions=3",
        ])
        .unwrap();
        match cli.command {
            Commands::Compare {
                baseline,
                candidate,
                benchmark_options,
                color,
            } => {
                assert_eq!(baseline, PathBuf::from("a.json"));
                assert_eq!(candidate, PathBuf::from("b.json"));
                assert_eq!(
                    benchmark_options,
                    vec!["--benchmark_filter=BM_Sort", "--benchmark_repetitions=3"]
                );
                assert_eq!(color, ColorChoice::Auto);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_compare_requires_two_inputs() {
        assert!(Cli::try_parse_from(["benchscope", "compare", "a.json"]).is_err());
    }

    #[test]
    fn test_chart_args_override_defaults() {
        let cli = Cli::try_parse_from([
            "benchscope",
            "chart-aggregate",
            "-d",
            "results",
            "--metric",
            "cpu_time",
            "-n",
            "5",
            "--group",
            "^BM_(\\w+)",
        ])
        .unwrap();
        let Commands::ChartAggregate(args) = cli.command else {
            panic!("expected chart-aggregate");
        };
        let settings = args.settings().unwrap();
        assert_eq!(settings.directory, PathBuf::from("results"));
        assert_eq!(settings.metric, "cpu_time");
        assert_eq!(settings.max_entries, Some(5));
        assert_eq!(settings.group.as_deref(), Some("^BM_(\\w+)"));
        assert_eq!(settings.chart, AggregateSettings::default().chart);
    }

    #[test]
    fn test_negative_max_entries_means_unlimited() {
        let cli =
            Cli::try_parse_from(["benchscope", "chart-aggregate", "-d", "results", "-n", "-1"])
                .unwrap();
        let Commands::ChartAggregate(args) = cli.command else {
            panic!("expected chart-aggregate");
        };
        let settings = args.settings().unwrap();
        assert_eq!(settings.max_entries, Some(-1));
        assert_eq!(settings.entry_limit(), None);
    }

    #[test]
    fn test_cli_flags_win_over_settings_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("charts.toml");
        fs::write(&path, "metric = \"cpu_time\"\nchart_type = \"bar\"\n").unwrap();
        let args = ChartArgs {
            config: Some(path),
            metric: Some("real_time".into()),
            ..Default::default()
        };
        let settings = args.settings().unwrap();
        assert_eq!(settings.metric, "real_time");
        assert_eq!(settings.chart_type, "bar");
    }

    #[test]
    fn test_exit_code_follows_benchmark() {
        let failed = anyhow::Error::new(BenchError::ExecutionFailure {
            program: "bench".into(),
            code: Some(3),
        });
        assert_eq!(exit_code(&failed), 3);

        let signalled = anyhow::Error::new(BenchError::ExecutionFailure {
            program: "bench".into(),
            code: None,
        });
        assert_eq!(exit_code(&signalled), 1);
        assert_eq!(exit_code(&anyhow::anyhow!("other")), 1);
    }
}
