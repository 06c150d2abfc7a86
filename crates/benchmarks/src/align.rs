// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Historical alignment of benchmark series across many result files.
//!
//! A [`History`] collects, for every benchmark name, the value of one metric
//! in each result file that contains it. [`History::align`] then lays a set of
//! names out on a shared, timestamp-ordered file axis, marking the files a
//! name is absent from with [`Sample::Missing`].
//!
//! # Invariants
//!
//! - A name contributes at most one value per file; later duplicates within
//!   the same file are dropped and reported as [`AlignWarning::Duplicate`].
//! - Aligned rows always have exactly one sample per file on the axis.

use crate::error::Result;
use crate::result::ResultDocument;
use chrono::{DateTime, FixedOffset};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// A result file on the history axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path the document was read from.
    pub path: PathBuf,
    /// Run timestamp from the document context.
    pub date: DateTime<FixedOffset>,
}

impl SourceFile {
    /// Path as displayed in chart metadata.
    pub fn path_text(&self) -> String {
        self.path.display().to_string()
    }

    /// Timestamp as displayed in chart metadata, e.g. `2021-05-01 12:00:00+00:00`.
    pub fn date_text(&self) -> String {
        self.date.format("%Y-%m-%d %H:%M:%S%:z").to_string()
    }
}

/// One aligned value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// Value recorded in the file.
    Value(f64),
    /// The file has no record for the name.
    Missing,
}

impl Sample {
    /// Recorded value, if any.
    pub fn value(self) -> Option<f64> {
        match self {
            Sample::Value(v) => Some(v),
            Sample::Missing => None,
        }
    }
}

impl Serialize for Sample {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Sample::Value(v) => serializer.serialize_f64(*v),
            Sample::Missing => serializer.serialize_none(),
        }
    }
}

/// Values of one benchmark, keyed by file index into [`History::files`].
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Benchmark name.
    pub name: String,
    values: BTreeMap<usize, f64>,
}

impl Series {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            values: BTreeMap::new(),
        }
    }

    /// Value recorded for a file index.
    pub fn get(&self, file: usize) -> Option<f64> {
        self.values.get(&file).copied()
    }

    /// Indices of the files holding a value.
    pub fn files(&self) -> impl Iterator<Item = usize> + '_ {
        self.values.keys().copied()
    }

    /// Number of recorded values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no value was recorded.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Non-fatal conditions met while collecting series.
#[derive(Debug, Clone, PartialEq)]
pub enum AlignWarning {
    /// A name appeared more than once in one file; the first occurrence was kept.
    Duplicate {
        /// Benchmark name.
        name: String,
        /// File containing the repeat.
        path: PathBuf,
    },
    /// A record lacked a numeric value for the tracked metric.
    MissingMetric {
        /// Benchmark name.
        name: String,
        /// File containing the record.
        path: PathBuf,
    },
}

/// A file left out of the history, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    /// Path of the file.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: String,
}

/// Names laid out on a shared file axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedChart {
    /// Files, oldest to newest.
    pub files: Vec<SourceFile>,
    /// One row per requested name, in request order.
    pub rows: Vec<AlignedRow>,
}

/// Samples of one name, one per file of the axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    /// Benchmark name.
    pub name: String,
    /// Samples in axis order.
    pub samples: Vec<Sample>,
}

impl AlignedRow {
    /// Whether at least one sample holds a value.
    pub fn has_data(&self) -> bool {
        self.samples.iter().any(|s| s.value().is_some())
    }
}

/// Series of one metric collected over many result files.
#[derive(Debug, Clone)]
pub struct History {
    metric: String,
    filter: Regex,
    files: Vec<SourceFile>,
    series: Vec<Series>,
    index: HashMap<String, usize>,
    /// Duplicate and missing-metric reports, in discovery order.
    pub warnings: Vec<AlignWarning>,
    /// Files that could not be used.
    pub skipped: Vec<SkippedFile>,
}

impl History {
    /// Empty history tracking `metric` for names matching `filter`.
    pub fn new(metric: impl Into<String>, filter: Regex) -> Self {
        Self {
            metric: metric.into(),
            filter,
            files: Vec::new(),
            series: Vec::new(),
            index: HashMap::new(),
            warnings: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Tracked metric.
    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Files accepted so far, in the order they were added.
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Series in first-seen order.
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Series of one benchmark.
    pub fn get(&self, name: &str) -> Option<&Series> {
        self.index.get(name).map(|&i| &self.series[i])
    }

    /// Series keyed by benchmark name.
    pub fn by_name(&self) -> HashMap<&str, &Series> {
        self.series.iter().map(|s| (s.name.as_str(), s)).collect()
    }

    /// Read and add one result file; unreadable or undated files are skipped.
    pub fn load_file(&mut self, path: &Path) {
        info!("Parsing {}", path.display());
        match ResultDocument::from_path(path) {
            Ok(document) => self.add_document(path, &document),
            Err(e) => self.skip(path, e.to_string()),
        }
    }

    /// Add an already parsed document read from `path`.
    pub fn add_document(&mut self, path: &Path, document: &ResultDocument) {
        let date = match document.date() {
            Ok(date) => date,
            Err(reason) => return self.skip(path, reason),
        };
        info!(
            "Found {} benchmarks in {}",
            document.benchmarks.len(),
            path.display()
        );

        let file = self.files.len();
        self.files.push(SourceFile {
            path: path.to_path_buf(),
            date,
        });

        let mut seen = HashSet::new();
        for record in &document.benchmarks {
            if !self.filter.is_match(&record.name) {
                continue;
            }
            if !seen.insert(record.name.as_str()) {
                warn!(
                    "Ignoring duplicate benchmark \"{}\" in: {}",
                    record.name,
                    path.display()
                );
                self.warnings.push(AlignWarning::Duplicate {
                    name: record.name.clone(),
                    path: path.to_path_buf(),
                });
                continue;
            }
            let Some(value) = record.metric(&self.metric) else {
                warn!(
                    "Benchmark \"{}\" in {} has no numeric '{}'",
                    record.name,
                    path.display(),
                    self.metric
                );
                self.warnings.push(AlignWarning::MissingMetric {
                    name: record.name.clone(),
                    path: path.to_path_buf(),
                });
                continue;
            };
            let slot = match self.index.get(&record.name) {
                Some(&slot) => slot,
                None => {
                    self.series.push(Series::new(&record.name));
                    self.index.insert(record.name.clone(), self.series.len() - 1);
                    self.series.len() - 1
                }
            };
            self.series[slot].values.insert(file, value);
        }
    }

    fn skip(&mut self, path: &Path, reason: String) {
        warn!("Benchmark json parse failed: {} ({})", path.display(), reason);
        self.skipped.push(SkippedFile {
            path: path.to_path_buf(),
            reason,
        });
    }

    /// Lay `names` out on the union of their files, oldest to newest.
    ///
    /// With `max_entries`, only that many of the most recent files are kept.
    /// Unknown names produce rows of [`Sample::Missing`].
    pub fn align(&self, names: &[&str], max_entries: Option<usize>) -> AlignedChart {
        let used: BTreeSet<usize> = names
            .iter()
            .filter_map(|name| self.get(name))
            .flat_map(Series::files)
            .collect();

        let mut axis: Vec<usize> = used.into_iter().collect();
        axis.sort_by(|&a, &b| {
            let (a, b) = (&self.files[a], &self.files[b]);
            a.date.cmp(&b.date).then_with(|| a.path.cmp(&b.path))
        });
        if let Some(limit) = max_entries.filter(|&n| n > 0) {
            if axis.len() > limit {
                axis.drain(..axis.len() - limit);
            }
        }

        let rows = names
            .iter()
            .map(|name| {
                let series = self.get(name);
                let samples = axis
                    .iter()
                    .map(|&file| match series.and_then(|s| s.get(file)) {
                        Some(value) => Sample::Value(value),
                        None => Sample::Missing,
                    })
                    .collect();
                AlignedRow {
                    name: name.to_string(),
                    samples,
                }
            })
            .collect();

        AlignedChart {
            files: axis.iter().map(|&file| self.files[file].clone()).collect(),
            rows,
        }
    }

    /// Log how many samples each series holds.
    pub fn log_summary(&self) {
        for series in &self.series {
            debug!(
                "found {} benchmark records for benchmark {}",
                series.len(),
                series.name
            );
        }
    }
}

/// Collect series from already parsed documents, in the given order.
pub fn align(files: &[(PathBuf, ResultDocument)], metric: &str, filter: Regex) -> History {
    let mut history = History::new(metric, filter);
    for (path, document) in files {
        history.add_document(path, document);
    }
    history
}

/// `.json` files directly inside `dir`, newest modification time first.
///
/// Symlinks are followed. Entries that cannot be inspected are skipped with a
/// warning.
pub fn discover_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                warn!("Skipping unreadable entry of {}: {}", dir.display(), e);
                continue;
            }
        };
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if !is_json {
            continue;
        }
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        if metadata.is_file() {
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            files.push((modified, path));
        }
    }
    files.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

/// Read every file of `paths`, in order, skipping the unusable ones.
pub fn load_files(paths: &[PathBuf], metric: &str, filter: Regex) -> History {
    let mut history = History::new(metric, filter);
    for path in paths {
        history.load_file(path);
    }
    history.log_summary();
    history
}
