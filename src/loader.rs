use crate::config::{RecordLayout, TemplateLayout};
use crate::error::Result;
use crate::parser::parse_tags;
use crate::source::{RowSource, Table};
use crate::value::{OverlayRecord, RecordId, TYPE_FILE, TYPE_TEXT};
use std::path::Path;
use tracing::{debug, info, warn};

fn is_row_index(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Read overlay records from a template sheet.
///
/// Scanning stops at the first empty index cell, the first empty content cell,
/// the first content string that is not a well-formed tag string, or right
/// after a record whose `Type` is neither `Text` nor `File`. That last record
/// is still returned. Rows whose index is not a number are skipped.
pub fn load_template<S: RowSource + ?Sized>(
    source: &S,
    layout: &TemplateLayout,
) -> Vec<OverlayRecord> {
    let mut overlays = Vec::new();

    for row in layout.first_data_row..source.row_count() {
        let Some(index) = source.filled_cell(row, layout.index_column) else {
            break;
        };
        if !is_row_index(index) {
            warn!(row, index, "skipping row with non-numeric index");
            continue;
        }

        let Some(content) = source.filled_cell(row, layout.content_column) else {
            warn!(index, "template terminated by empty content");
            break;
        };
        if !(content.starts_with('<')
            && content.ends_with('>')
            && content.chars().count() > layout.min_tag_length)
        {
            warn!(index, content, "malformed content, stopping");
            break;
        }

        let parse_cell = |column| source.cell(row, column).and_then(parse_tags);
        // Well-formed content without any tag still yields a record; it has
        // no `Type`, so the scan stops after it below.
        let record = OverlayRecord::new(
            source.cell(row, layout.name_column).unwrap_or_default(),
            parse_tags(content).unwrap_or_default(),
            parse_cell(layout.param_column),
            parse_cell(layout.preprocess_column),
        );

        let type_name = record.type_name().map(str::to_string);
        debug!(index, name = record.name(), kind = ?type_name, "loaded overlay");
        // Appended before the type check: the record of an unknown type is
        // part of the result even though scanning ends here.
        overlays.push(record);

        match type_name.as_deref() {
            Some(TYPE_TEXT) | Some(TYPE_FILE) => {}
            other => {
                warn!(index, kind = ?other, "undefined overlay type, stopping");
                break;
            }
        }
    }

    info!(count = overlays.len(), "template loaded");
    overlays
}

/// Open a CSV template and load it. A missing file fails before any row is read.
pub fn load_template_file(path: &Path, layout: &TemplateLayout) -> Result<Vec<OverlayRecord>> {
    let table = Table::from_csv_path(path)?;
    Ok(load_template(&table, layout))
}

/// Read the list of records to render.
///
/// Same termination rules as the template: an empty index ends the list, a
/// non-numeric index is skipped, an empty or non-numeric key ends the list.
pub fn load_record_ids<S: RowSource + ?Sized>(source: &S, layout: &RecordLayout) -> Vec<RecordId> {
    let mut records = Vec::new();

    for row in layout.first_data_row..source.row_count() {
        let Some(index) = source.filled_cell(row, layout.index_column) else {
            break;
        };
        if !is_row_index(index) {
            warn!(row, index, "skipping row with non-numeric index");
            continue;
        }

        let Some(key) = source.filled_cell(row, layout.key_column) else {
            warn!(index, "record list terminated by empty key");
            break;
        };
        let key = key.trim();
        let parsed = if is_row_index(key) {
            key.parse::<u64>().ok()
        } else {
            None
        };
        let Some(parsed) = parsed else {
            warn!(index, key, "non-numeric record key, stopping");
            break;
        };

        records.push(RecordId {
            key: parsed,
            identifier: source
                .cell(row, layout.identifier_column)
                .unwrap_or_default()
                .to_string(),
        });
    }

    info!(count = records.len(), "record ids loaded");
    records
}
