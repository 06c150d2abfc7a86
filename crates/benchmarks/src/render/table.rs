// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Fixed-width text table of one result document.
//!
//! Columns other than `name` are collected into a set, so they appear in
//! sorted order rather than the order records declare them.

use crate::result::ResultDocument;
use std::collections::BTreeSet;

/// Separator between columns; its length is also the width of every column.
pub const INDENT: &str = "             ";

/// Render `document` as a header, a dashed rule and one line per record.
pub fn render_table(document: &ResultDocument) -> Vec<String> {
    let name_width = document.longest_name() + 1;
    let columns: BTreeSet<&str> = document
        .benchmarks
        .iter()
        .flat_map(|record| record.metrics.keys().map(String::as_str))
        .filter(|key| *key != "name")
        .collect();

    let row = |first: &str, cells: Vec<String>| {
        let cells: Vec<String> = cells
            .iter()
            .map(|cell| format!("{:<width$}", cell, width = INDENT.len()))
            .collect();
        format!("{:<width$}{}", first, cells.join(INDENT), width = name_width)
    };

    let header = row(
        "Benchmark",
        columns.iter().map(|column| column.to_string()).collect(),
    );
    let rule = "-".repeat(header.chars().count());

    let mut lines = vec![header, rule];
    for record in &document.benchmarks {
        lines.push(row(
            &record.name,
            columns.iter().map(|column| record.field_text(column)).collect(),
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_layout() {
        let document: ResultDocument = serde_json::from_value(json!({
            "benchmarks": [
                { "name": "BM_Short", "real_time": 1.5, "cpu_time": 1.25 },
                { "name": "BM_Longer", "real_time": 2 }
            ]
        }))
        .unwrap();

        let lines = render_table(&document);
        let width = "BM_Longer".len() + 1;
        let pad = INDENT.len();

        let expected_header = format!(
            "{:<width$}{:<pad$}{}{:<pad$}",
            "Benchmark", "cpu_time", INDENT, "real_time"
        );
        assert_eq!(lines[0], expected_header);
        assert_eq!(lines[1], "-".repeat(expected_header.len()));
        assert_eq!(
            lines[2],
            format!("{:<width$}{:<pad$}{}{:<pad$}", "BM_Short", "1.25", INDENT, "1.5")
        );
        assert_eq!(
            lines[3],
            format!("{:<width$}{:<pad$}{}{:<pad$}", "BM_Longer", "", INDENT, "2")
        );
    }

    #[test]
    fn test_name_only_document() {
        let document: ResultDocument =
            serde_json::from_value(json!({ "benchmarks": [ { "name": "BM_X" } ] })).unwrap();
        let lines = render_table(&document);
        assert_eq!(lines[0], "Benchmark");
        assert_eq!(lines[1], "---------");
        assert_eq!(lines[2], "BM_X ");
    }
}
