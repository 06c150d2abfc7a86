// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTML chart aggregation over historical result files.
//!
//! Benchmarks are clustered into groups and charts by their derived keys.
//! Every chart gets its own file axis (see [`History::align`]) and one
//! dataset per legend label. Charts without any data are dropped, and so are
//! groups left without charts.

use crate::align::{discover_files, load_files, History, Sample, SkippedFile};
use crate::config::AggregateSettings;
use crate::error::Result;
use crate::grouping::NamePatterns;
use serde::Serialize;
use serde_json::json;
use std::fs;
use tracing::info;

const HTML_HEAD: &str = r#"
<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/materialize/1.0.0/css/materialize.min.css">
<script src="https://cdnjs.cloudflare.com/ajax/libs/materialize/1.0.0/js/materialize.min.js"></script>
<script src="https://cdnjs.cloudflare.com/ajax/libs/Chart.js/3.1.1/chart.min.js"></script>
<script>var allcharts = []</script>
"#;

const HTML_FOOT: &str = "</ul><script>M.AutoInit()</script>";

/// One data series of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    /// Legend label.
    pub label: String,
    /// Aligned samples, `null` where a file lacks the benchmark.
    pub data: Vec<Sample>,
}

/// One chart and its aligned data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    /// Chart key, used as the title.
    #[serde(skip)]
    pub title: String,
    /// Axis labels derived from file paths.
    pub labels: Vec<String>,
    /// File paths, oldest to newest.
    pub files: Vec<String>,
    /// File timestamps, oldest to newest.
    pub dates: Vec<String>,
    /// Non-empty series.
    pub datasets: Vec<Dataset>,
}

impl Chart {
    /// chart.js configuration object.
    pub fn to_chartjs(&self, chart_type: &str, metric: &str) -> serde_json::Value {
        json!({
            "type": chart_type,
            "data": self,
            "options": {
                "plugins": { "title": { "text": self.title } },
                "scales": { "y": { "title": { "text": metric } } }
            }
        })
    }
}

/// Charts sharing a group key.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGroup {
    /// Group key; empty for ungrouped charts.
    pub name: String,
    /// Surviving charts.
    pub charts: Vec<Chart>,
}

/// Cluster the series of `history` into groups and charts.
///
/// Groups, charts and datasets keep the order in which their first
/// benchmark was seen.
pub fn build_groups(
    history: &History,
    patterns: &NamePatterns,
    max_entries: Option<usize>,
) -> Vec<ChartGroup> {
    let mut layout: Vec<(String, Vec<(String, Vec<&str>)>)> = Vec::new();
    for series in history.series() {
        let group = patterns.group_key(&series.name);
        let chart = patterns.chart_key(&series.name);

        let slot = match layout.iter().position(|(name, _)| *name == group) {
            Some(i) => i,
            None => {
                layout.push((group, Vec::new()));
                layout.len() - 1
            }
        };
        let charts = &mut layout[slot].1;
        match charts.iter_mut().find(|(title, _)| *title == chart) {
            Some((_, names)) => names.push(&series.name),
            None => charts.push((chart, vec![series.name.as_str()])),
        }
    }

    layout
        .into_iter()
        .filter_map(|(name, charts)| {
            let charts: Vec<Chart> = charts
                .into_iter()
                .filter_map(|(title, names)| build_chart(history, patterns, title, &names, max_entries))
                .collect();
            (!charts.is_empty()).then_some(ChartGroup { name, charts })
        })
        .collect()
}

fn build_chart(
    history: &History,
    patterns: &NamePatterns,
    title: String,
    names: &[&str],
    max_entries: Option<usize>,
) -> Option<Chart> {
    let aligned = history.align(names, max_entries);
    let datasets: Vec<Dataset> = aligned
        .rows
        .into_iter()
        .filter(|row| row.has_data())
        .map(|row| Dataset {
            label: patterns.legend_label(&row.name),
            data: row.samples,
        })
        .collect();
    if datasets.is_empty() {
        return None;
    }

    Some(Chart {
        title,
        labels: aligned
            .files
            .iter()
            .map(|file| patterns.file_label(&file.path_text()))
            .collect(),
        files: aligned.files.iter().map(|file| file.path_text()).collect(),
        dates: aligned.files.iter().map(|file| file.date_text()).collect(),
        datasets,
    })
}

/// Render groups into a standalone HTML document.
///
/// `header` is inserted verbatim after the script includes.
pub fn render_html(groups: &[ChartGroup], chart_type: &str, metric: &str, header: &str) -> String {
    let mut html = String::from(HTML_HEAD);
    html.push_str(header);
    html.push_str("\n<ul class=\"collapsible\">");

    for group in groups {
        if !group.name.is_empty() {
            html.push_str(&format!(
                "<li><div class=\"collapsible-header\">{}</div><div class=\"collapsible-body\">",
                escape_html(&group.name)
            ));
        }
        for chart in &group.charts {
            let config = chart.to_chartjs(chart_type, metric).to_string();
            html.push_str(&format!(
                "<canvas width=\"18\" height=\"8\"></canvas><script>allcharts.push(new Chart([...document.getElementsByTagName(\"canvas\")].slice(-1)[0].getContext(\"2d\"), {}));</script>",
                config.replace("</", "<\\/")
            ));
        }
        if !group.name.is_empty() {
            html.push_str("</div></li>");
        }
    }

    html.push_str(HTML_FOOT);
    html
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Outcome of a chart aggregation run.
#[derive(Debug, Clone)]
pub struct ChartReport {
    /// Complete HTML document.
    pub html: String,
    /// Groups rendered.
    pub groups: usize,
    /// Charts rendered.
    pub charts: usize,
    /// Result files that could not be used.
    pub skipped: Vec<SkippedFile>,
}

/// Aggregate every result file of `settings.directory` into an HTML report.
///
/// Returns `None` when the directory holds no `.json` files.
pub fn aggregate(settings: &AggregateSettings) -> Result<Option<ChartReport>> {
    let patterns = settings.compile()?;
    let files = discover_files(&settings.directory)?;
    if files.is_empty() {
        info!(
            "Found 0 json files in dir: {}",
            settings.directory.display()
        );
        return Ok(None);
    }

    let history = load_files(&files, &settings.metric, patterns.filter);

    let header = match &settings.header_file {
        Some(path) => fs::read_to_string(path)?,
        None => String::new(),
    };

    let groups = build_groups(&history, &patterns.names, settings.entry_limit());
    let html = render_html(&groups, &settings.chart_type, &settings.metric, &header);
    Ok(Some(ChartReport {
        groups: groups.len(),
        charts: groups.iter().map(|g| g.charts.len()).sum(),
        html,
        skipped: history.skipped,
    }))
}
