// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Chart aggregation settings.
//!
//! Settings come from three layers: built-in defaults, an optional settings
//! file (TOML, JSON or YAML, read with the `config` crate) and command-line
//! overrides applied by the caller.

use crate::error::{BenchError, Result};
use crate::grouping::NamePatterns;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings of a `chart-aggregate` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateSettings {
    /// Directory scanned for `.json` result files.
    pub directory: PathBuf,
    /// Metric plotted on the y axis.
    pub metric: String,
    /// chart.js chart type.
    pub chart_type: String,
    /// HTML file written.
    pub output: PathBuf,
    /// Most recent files shown per chart; `None` or any value <= 0 shows all.
    pub max_entries: Option<i64>,
    /// Only benchmark names matching this pattern are charted.
    pub filter: String,
    /// Pattern deriving the collapsible group of a benchmark.
    pub group: Option<String>,
    /// Pattern deriving the chart title; equal titles share a chart.
    pub chart: String,
    /// Pattern deriving the legend label of a series.
    pub legend: String,
    /// Pattern deriving axis labels from file paths.
    pub label: String,
    /// HTML fragment inserted after the script includes.
    pub header_file: Option<PathBuf>,
}

impl Default for AggregateSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            metric: "real_time".to_string(),
            chart_type: "line".to_string(),
            output: PathBuf::from("charts.html"),
            max_entries: None,
            filter: ".*".to_string(),
            group: None,
            chart: "(.+)/".to_string(),
            legend: "([^/]+$)".to_string(),
            label: r"(?i)([^/|^\\]+)\.json$".to_string(),
            header_file: None,
        }
    }
}

/// Compiled patterns of [`AggregateSettings`].
#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    /// Benchmark name filter.
    pub filter: Regex,
    /// Key derivation rules.
    pub names: NamePatterns,
}

impl AggregateSettings {
    /// Load settings from a file; keys absent from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Effective entry limit, treating values <= 0 as unlimited.
    pub fn entry_limit(&self) -> Option<usize> {
        self.max_entries
            .filter(|&n| n > 0)
            .and_then(|n| usize::try_from(n).ok())
    }

    /// Compile every pattern, reporting the first invalid one.
    pub fn compile(&self) -> Result<CompiledPatterns> {
        Ok(CompiledPatterns {
            filter: compile(&self.filter)?,
            names: NamePatterns {
                group: self.group.as_deref().map(compile).transpose()?,
                chart: compile(&self.chart)?,
                legend: compile(&self.legend)?,
                label: compile(&self.label)?,
            },
        })
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| BenchError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_compile() {
        let settings = AggregateSettings::default();
        let compiled = settings.compile().unwrap();
        assert!(compiled.filter.is_match("anything"));
        assert!(compiled.names.group.is_none());
        assert_eq!(compiled.names.chart_key("BM_Sort/8"), "BM_Sort");
        assert_eq!(settings.entry_limit(), None);
    }

    #[test]
    fn test_invalid_pattern() {
        let settings = AggregateSettings {
            chart: "(unclosed".to_string(),
            ..Default::default()
        };
        match settings.compile() {
            Err(BenchError::Pattern { pattern, .. }) => assert_eq!(pattern, "(unclosed"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_non_positive_entries_are_unlimited() {
        for n in [0, -1, -20] {
            let settings = AggregateSettings {
                max_entries: Some(n),
                ..Default::default()
            };
            assert_eq!(settings.entry_limit(), None);
        }
        let settings = AggregateSettings {
            max_entries: Some(3),
            ..Default::default()
        };
        assert_eq!(settings.entry_limit(), Some(3));
    }

    #[test]
    fn test_from_toml_file_keeps_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("charts.toml");
        fs::write(
            &path,
            "metric = \"cpu_time\"\nmax_entries = 10\ngroup = \"^BM_([A-Za-z]+)\"\n",
        )
        .unwrap();
        let settings = AggregateSettings::from_file(&path).unwrap();
        assert_eq!(settings.metric, "cpu_time");
        assert_eq!(settings.max_entries, Some(10));
        assert_eq!(settings.group.as_deref(), Some("^BM_([A-Za-z]+)"));
        assert_eq!(settings.chart_type, "line");
        assert_eq!(settings.output, PathBuf::from("charts.html"));
    }

    #[test]
    fn test_missing_settings_file() {
        let err = AggregateSettings::from_file(Path::new("/nonexistent/charts.toml")).unwrap_err();
        assert!(matches!(err, BenchError::Config(_)));
    }
}
