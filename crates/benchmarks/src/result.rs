// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark result document types.
//!
//! A result document is the JSON file a benchmark program writes when asked to
//! via `--benchmark_out=<path>`: a `context` object describing the run and an
//! ordered `benchmarks` list. Records are schema-on-read: apart from `name`
//! every key is kept verbatim in insertion order.

use crate::error::{BenchError, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Context key holding the run timestamp.
pub const DATE_KEY: &str = "date";

/// `chrono` layout for a context date once the offset colons are removed.
const DATE_FORMAT: &str = "%Y-%m-%dT%H%M%S%z";

/// One loaded or captured result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultDocument {
    /// Run metadata (host, date, library build type, ...).
    #[serde(default)]
    pub context: Map<String, Value>,
    /// Measurement records in emission order.
    pub benchmarks: Vec<BenchmarkRecord>,
}

/// One named measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    /// Benchmark name, e.g. `BM_Sort/1024`.
    pub name: String,
    /// Every other key of the record (`real_time`, `cpu_time`, `time_unit`, counters...).
    #[serde(flatten)]
    pub metrics: Map<String, Value>,
}

impl BenchmarkRecord {
    /// Create a record with no metrics.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metrics: Map::new(),
        }
    }

    /// Builder-style metric insertion.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metrics.insert(key.into(), value.into());
        self
    }

    /// Numeric value of a metric, `None` when absent or not a number.
    pub fn metric(&self, key: &str) -> Option<f64> {
        self.metrics.get(key).and_then(Value::as_f64)
    }

    /// Text of a column for tabular output; `name` maps to the record name and
    /// absent keys render as an empty string.
    pub fn field_text(&self, column: &str) -> String {
        if column == "name" {
            return self.name.clone();
        }
        self.metrics.get(column).map(display_value).unwrap_or_default()
    }
}

impl ResultDocument {
    /// Create a document from its parts.
    pub fn new(context: Map<String, Value>, benchmarks: Vec<BenchmarkRecord>) -> Self {
        Self {
            context,
            benchmarks,
        }
    }

    /// Read and parse a result document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        Self::from_slice(&bytes).map_err(|reason| BenchError::ParseFailure {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse a result document from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> std::result::Result<Self, String> {
        let document: ResultDocument =
            serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        if let Some(index) = document.benchmarks.iter().position(|b| b.name.is_empty()) {
            return Err(format!("benchmark #{} has an empty name", index));
        }
        Ok(document)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> String {
        // Maps of JSON values with string keys always serialize.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// First record with the given name.
    pub fn find(&self, name: &str) -> Option<&BenchmarkRecord> {
        self.benchmarks.iter().find(|b| b.name == name)
    }

    /// Length of the longest benchmark name, at least 1.
    pub fn longest_name(&self) -> usize {
        self.benchmarks
            .iter()
            .map(|b| b.name.chars().count())
            .max()
            .unwrap_or(0)
            .max(1)
    }

    /// Union of every key used by any record, `name` first, then first-seen order.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = vec!["name".to_string()];
        for record in &self.benchmarks {
            for key in record.metrics.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        columns
    }

    /// Timestamp of the run from `context.date`.
    pub fn date(&self) -> std::result::Result<DateTime<FixedOffset>, String> {
        let raw = self
            .context
            .get(DATE_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| "context.date is missing or not a string".to_string())?;
        parse_date(raw)
    }
}

/// Parse a context date such as `2021-05-01T12:00:00+00:00`.
///
/// Colons are stripped first, so `2021-05-01T120000+0000` is accepted as well.
pub fn parse_date(raw: &str) -> std::result::Result<DateTime<FixedOffset>, String> {
    let compact = raw.replace(':', "");
    DateTime::parse_from_str(&compact, DATE_FORMAT)
        .map_err(|e| format!("unparseable date '{}': {}", raw, e))
}

/// Render a JSON scalar the way it appears in text reports.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ResultDocument {
        serde_json::from_value(json!({
            "context": { "date": "2021-05-01T12:00:00+02:00", "host_name": "ci" },
            "benchmarks": [
                { "name": "BM_Sort/8", "iterations": 10, "real_time": 12.5, "cpu_time": 12.0, "time_unit": "ns" },
                { "name": "BM_Sort/1024", "real_time": 400.0, "cpu_time": 390.0, "label": "fast" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_record_keeps_unknown_keys_in_order() {
        let doc = sample();
        let keys: Vec<_> = doc.benchmarks[0].metrics.keys().cloned().collect();
        assert_eq!(keys, vec!["iterations", "real_time", "cpu_time", "time_unit"]);
        assert_eq!(doc.benchmarks[1].field_text("label"), "fast");
        assert_eq!(doc.benchmarks[1].field_text("iterations"), "");
        assert_eq!(doc.benchmarks[0].field_text("name"), "BM_Sort/8");
    }

    #[test]
    fn test_columns_union_has_name_first() {
        let doc = sample();
        assert_eq!(
            doc.columns(),
            vec!["name", "iterations", "real_time", "cpu_time", "time_unit", "label"]
        );
    }

    #[test]
    fn test_metric_requires_number() {
        let doc = sample();
        assert_eq!(doc.benchmarks[0].metric("real_time"), Some(12.5));
        assert_eq!(doc.benchmarks[0].metric("time_unit"), None);
        assert_eq!(doc.benchmarks[0].metric("missing"), None);
    }

    #[test]
    fn test_date_with_and_without_offset_colon() {
        let doc = sample();
        let date = doc.date().unwrap();
        assert_eq!(date.to_rfc3339(), "2021-05-01T12:00:00+02:00");

        let compact = parse_date("2021-05-01T120000+0000").unwrap();
        assert_eq!(compact.to_rfc3339(), "2021-05-01T12:00:00+00:00");

        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_missing_date_is_reported() {
        let doc = ResultDocument::new(Map::new(), vec![]);
        assert!(doc.date().unwrap_err().contains("context.date"));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let err = ResultDocument::from_slice(br#"{"benchmarks":[{"name":""}]}"#).unwrap_err();
        assert!(err.contains("empty name"));
    }

    #[test]
    fn test_missing_benchmarks_is_rejected() {
        assert!(ResultDocument::from_slice(br#"{"context":{}}"#).is_err());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let doc = sample();
        let parsed = ResultDocument::from_slice(doc.to_json_string().as_bytes()).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_longest_name() {
        assert_eq!(sample().longest_name(), "BM_Sort/1024".len());
        assert_eq!(ResultDocument::new(Map::new(), vec![]).longest_name(), 1);
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!(null)), "");
        assert_eq!(display_value(&json!("ns")), "ns");
        assert_eq!(display_value(&json!(10)), "10");
        assert_eq!(display_value(&json!(1.5)), "1.5");
        assert_eq!(display_value(&json!(true)), "true");
    }
}
