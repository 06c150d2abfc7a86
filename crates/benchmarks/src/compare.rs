// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Two-run comparison.
//!
//! Compares a candidate result document against a baseline, benchmark by
//! benchmark, and classifies every relative change into a [`Band`]. Output is
//! plain numbers; colouring belongs to [`crate::render::diff`].

use crate::result::ResultDocument;
use serde::Serialize;

/// Metrics compared between two runs.
pub const TRACKED_METRICS: [&str; 2] = ["real_time", "cpu_time"];

/// Changes above this fraction are regressions.
pub const REGRESSION_THRESHOLD: f64 = 0.05;

/// Changes at or below this fraction are improvements.
pub const IMPROVEMENT_THRESHOLD: f64 = -0.07;

/// Padding added to the longest baseline name for the name column.
pub const NAME_PADDING: usize = 3;

/// Significance band of a relative change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    /// Slower by more than 5%.
    Regression,
    /// Within the noise window.
    Neutral,
    /// Faster by at least 7%.
    Improvement,
}

impl Band {
    /// Band of a relative change. `NaN` is neutral.
    pub fn classify(delta: f64) -> Self {
        if delta > REGRESSION_THRESHOLD {
            Band::Regression
        } else if delta <= IMPROVEMENT_THRESHOLD {
            Band::Improvement
        } else {
            Band::Neutral
        }
    }
}

/// Relative change of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricDelta {
    /// `(candidate - baseline) / |baseline|`.
    pub delta: f64,
    /// Band of `delta`.
    pub band: Band,
}

impl MetricDelta {
    fn new(delta: f64) -> Self {
        Self {
            delta,
            band: Band::classify(delta),
        }
    }
}

/// Changes of one benchmark present in both runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkDelta {
    /// Benchmark name.
    pub name: String,
    /// Change of `real_time`.
    pub real_time: MetricDelta,
    /// Change of `cpu_time`.
    pub cpu_time: MetricDelta,
}

impl BenchmarkDelta {
    /// Deltas in [`TRACKED_METRICS`] order.
    pub fn metrics(&self) -> [MetricDelta; 2] {
        [self.real_time, self.cpu_time]
    }
}

/// Result of comparing two runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    /// Width of the name column: longest baseline name plus [`NAME_PADDING`].
    pub name_width: usize,
    /// One entry per baseline benchmark found in the candidate, in baseline order.
    pub deltas: Vec<BenchmarkDelta>,
}

/// Relative change from `old` to `new`.
///
/// A zero baseline is not guarded: the IEEE result (`+inf`, `-inf` or `NaN`)
/// is returned as is.
pub fn relative_change(old: f64, new: f64) -> f64 {
    (new - old) / old.abs()
}

/// Compare `candidate` against `baseline`.
///
/// Names are matched exactly. Baseline benchmarks missing from the candidate
/// are skipped, as are candidate-only benchmarks. A tracked metric that is
/// missing or non-numeric on either side yields a `NaN` delta.
pub fn compare(baseline: &ResultDocument, candidate: &ResultDocument) -> Comparison {
    let deltas = baseline
        .benchmarks
        .iter()
        .filter_map(|base| {
            let other = candidate.find(&base.name)?;
            let change = |metric: &str| match (base.metric(metric), other.metric(metric)) {
                (Some(old), Some(new)) => MetricDelta::new(relative_change(old, new)),
                _ => MetricDelta::new(f64::NAN),
            };
            Some(BenchmarkDelta {
                name: base.name.clone(),
                real_time: change(TRACKED_METRICS[0]),
                cpu_time: change(TRACKED_METRICS[1]),
            })
        })
        .collect();

    Comparison {
        name_width: baseline.longest_name() + NAME_PADDING,
        deltas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::BenchmarkRecord;
    use serde_json::Map;

    fn run(records: &[(&str, f64, f64)]) -> ResultDocument {
        ResultDocument::new(
            Map::new(),
            records
                .iter()
                .map(|(name, real, cpu)| {
                    BenchmarkRecord::new(*name)
                        .with("real_time", *real)
                        .with("cpu_time", *cpu)
                })
                .collect(),
        )
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_bands() {
        let base = run(&[("up", 100.0, 100.0), ("down", 100.0, 100.0), ("flat", 100.0, 100.0)]);
        let cand = run(&[("up", 110.0, 105.0), ("down", 92.0, 93.0), ("flat", 97.0, 100.0)]);
        let result = compare(&base, &cand);

        let up = &result.deltas[0];
        assert!(close(up.real_time.delta, 0.10));
        assert_eq!(up.real_time.band, Band::Regression);
        // Exactly +5% stays neutral.
        assert_eq!(up.cpu_time.band, Band::Neutral);

        let down = &result.deltas[1];
        assert!(close(down.real_time.delta, -0.08));
        assert_eq!(down.real_time.band, Band::Improvement);
        // Exactly -7% is an improvement.
        assert_eq!(down.cpu_time.band, Band::Improvement);

        let flat = &result.deltas[2];
        assert!(close(flat.real_time.delta, -0.03));
        assert_eq!(flat.real_time.band, Band::Neutral);
    }

    #[test]
    fn test_baseline_only_names_are_skipped() {
        let base = run(&[("a", 1.0, 1.0), ("gone", 1.0, 1.0), ("b", 1.0, 1.0)]);
        let cand = run(&[("b", 2.0, 2.0), ("new", 1.0, 1.0), ("a", 1.0, 1.0)]);
        let result = compare(&base, &cand);
        let names: Vec<_> = result.deltas.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_name_width_uses_baseline() {
        let base = run(&[("short", 1.0, 1.0)]);
        let cand = run(&[("a_much_longer_name", 1.0, 1.0)]);
        assert_eq!(compare(&base, &cand).name_width, 5 + NAME_PADDING);
    }

    #[test]
    fn test_zero_baseline_propagates() {
        let base = run(&[("z", 0.0, 0.0)]);
        let cand = run(&[("z", 5.0, 0.0)]);
        let delta = &compare(&base, &cand).deltas[0];
        assert_eq!(delta.real_time.delta, f64::INFINITY);
        assert_eq!(delta.real_time.band, Band::Regression);
        assert!(delta.cpu_time.delta.is_nan());
        assert_eq!(delta.cpu_time.band, Band::Neutral);
    }

    #[test]
    fn test_negative_baseline_uses_magnitude() {
        assert!(close(relative_change(-100.0, -90.0), 0.10));
    }

    #[test]
    fn test_missing_metric_is_nan() {
        let base = ResultDocument::new(
            Map::new(),
            vec![BenchmarkRecord::new("m").with("real_time", 1.0)],
        );
        let cand = run(&[("m", 1.0, 1.0)]);
        let delta = &compare(&base, &cand).deltas[0];
        assert_eq!(delta.real_time.delta, 0.0);
        assert!(delta.cpu_time.delta.is_nan());
    }
}
