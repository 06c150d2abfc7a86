// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Colourized two-run diff.

use crate::compare::{Band, Comparison, MetricDelta};
use colored::{Color, Colorize};

/// Named styles used by the diff output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Benchmark names.
    Header,
    /// Regression band.
    Regression,
    /// Neutral band.
    Neutral,
    /// Improvement band.
    Improvement,
}

impl Style {
    /// Style of a significance band.
    pub fn for_band(band: Band) -> Self {
        match band {
            Band::Regression => Style::Regression,
            Band::Neutral => Style::Neutral,
            Band::Improvement => Style::Improvement,
        }
    }

    /// Terminal colour of the style.
    pub fn color(self) -> Color {
        match self {
            Style::Header => Color::BrightGreen,
            Style::Regression => Color::BrightRed,
            Style::Neutral => Color::BrightWhite,
            Style::Improvement => Color::BrightCyan,
        }
    }
}

fn paint(text: String, style: Style) -> String {
    text.color(style.color()).to_string()
}

fn delta_cell(metric: MetricDelta) -> String {
    paint(format!("{:+.2}", metric.delta), Style::for_band(metric.band))
}

/// One line per compared benchmark: padded name, real-time change, cpu-time change.
pub fn render_diff(comparison: &Comparison) -> Vec<String> {
    comparison
        .deltas
        .iter()
        .map(|delta| {
            let [real, cpu] = delta.metrics();
            format!(
                "{}    {}     {}",
                paint(
                    format!("{:<width$}", delta.name, width = comparison.name_width),
                    Style::Header
                ),
                delta_cell(real),
                delta_cell(cpu)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::compare;
    use crate::result::{BenchmarkRecord, ResultDocument};
    use serde_json::Map;

    fn run(records: &[(&str, f64, f64)]) -> ResultDocument {
        ResultDocument::new(
            Map::new(),
            records
                .iter()
                .map(|(n, r, c)| {
                    BenchmarkRecord::new(*n)
                        .with("real_time", *r)
                        .with("cpu_time", *c)
                })
                .collect(),
        )
    }

    #[test]
    fn test_diff_lines_carry_band_colours() {
        colored::control::set_override(true);
        let base = run(&[("BM_A", 100.0, 100.0), ("BM_Long", 100.0, 0.0)]);
        let cand = run(&[("BM_A", 110.0, 92.0), ("BM_Long", 97.0, 0.0)]);
        let lines = render_diff(&compare(&base, &cand));

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "\u{1b}[92mBM_A      \u{1b}[0m    \u{1b}[91m+0.10\u{1b}[0m     \u{1b}[96m-0.08\u{1b}[0m"
        );
        assert_eq!(
            lines[1],
            "\u{1b}[92mBM_Long   \u{1b}[0m    \u{1b}[97m-0.03\u{1b}[0m     \u{1b}[97mNaN\u{1b}[0m"
        );
    }

    #[test]
    fn test_styles() {
        assert_eq!(Style::for_band(Band::Regression), Style::Regression);
        assert_eq!(Style::Improvement.color(), Color::BrightCyan);
        assert_eq!(Style::Header.color(), Color::BrightGreen);
    }
}
