// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pattern extraction for deriving group, chart, legend and label keys.

use regex::Regex;

/// Concatenation of the capture groups of the first match of `pattern` in `text`.
///
/// A pattern without capture groups yields the whole match; groups that did
/// not participate contribute nothing. `None` when the pattern does not match.
pub fn extract(pattern: &Regex, text: &str) -> Option<String> {
    let captures = pattern.captures(text)?;
    if captures.len() == 1 {
        return Some(captures[0].to_string());
    }
    Some(
        captures
            .iter()
            .skip(1)
            .map(|group| group.map_or("", |m| m.as_str()))
            .collect(),
    )
}

/// Like [`extract`], falling back to `text` unchanged when nothing matches.
pub fn extract_or_input(pattern: &Regex, text: &str) -> String {
    extract(pattern, text).unwrap_or_else(|| text.to_string())
}

/// Compiled rules turning benchmark names and file paths into display keys.
#[derive(Debug, Clone)]
pub struct NamePatterns {
    /// Group key rule; no rule means every chart is ungrouped.
    pub group: Option<Regex>,
    /// Chart key rule; names with equal chart keys share a chart.
    pub chart: Regex,
    /// Legend label rule for one data series.
    pub legend: Regex,
    /// Label rule applied to result file paths.
    pub label: Regex,
}

impl NamePatterns {
    /// Group of a benchmark; empty when ungrouped.
    pub fn group_key(&self, name: &str) -> String {
        self.group
            .as_ref()
            .and_then(|pattern| extract(pattern, name))
            .unwrap_or_default()
    }

    /// Chart title of a benchmark.
    pub fn chart_key(&self, name: &str) -> String {
        extract_or_input(&self.chart, name)
    }

    /// Legend label of a benchmark.
    pub fn legend_label(&self, name: &str) -> String {
        extract_or_input(&self.legend, name)
    }

    /// Axis label of a result file.
    pub fn file_label(&self, path: &str) -> String {
        extract_or_input(&self.label, path)
    }
}
