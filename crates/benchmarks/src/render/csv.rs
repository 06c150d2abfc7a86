// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! CSV rendering of one result document.

use crate::error::Result;
use crate::result::ResultDocument;
use std::io;

/// Render `document` as CSV: a header of every key used by any record
/// (`name` first), then one row per record with empty cells for absent keys.
///
/// Fields are quoted only when they contain a delimiter, quote or newline.
pub fn render_csv(document: &ResultDocument) -> Result<String> {
    let columns = document.columns();
    let mut writer = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&columns).map_err(io::Error::from)?;
    for record in &document.benchmarks {
        writer
            .write_record(columns.iter().map(|column| record.field_text(column)))
            .map_err(io::Error::from)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}
