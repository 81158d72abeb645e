use crate::error::{Result, TemplateError};
use crate::source::{RowSource, SourceBook};
use crate::value::OverlayRecord;
use tracing::{debug, warn};

/// Distinct file names referenced by `File` overlays, in first-seen order.
pub fn collect_files(records: &[OverlayRecord]) -> Vec<String> {
    let mut files: Vec<String> = Vec::new();
    for file in records.iter().filter_map(OverlayRecord::file_name) {
        if !files.contains(&file) {
            debug!(file = %file, "found source file");
            files.push(file);
        }
    }
    files
}

/// Spreadsheet column letters to a 0-based index: `A` is 0, `AA` is 26.
pub fn column_index(letters: &str) -> Result<usize> {
    let letters = letters.trim();
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(TemplateError::InvalidColumn(letters.to_string()));
    }
    let mut index: usize = 0;
    for c in letters.chars() {
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index
            .checked_mul(26)
            .and_then(|i| i.checked_add(digit))
            .ok_or_else(|| TemplateError::InvalidColumn(letters.to_string()))?;
    }
    Ok(index - 1)
}

/// Find `primary_key` in `key_col` of a source sheet and return the `value_col`
/// cell of that row.
///
/// Row 0 is the sheet header and is never matched. An empty value cell of a
/// matching row reads as the empty string. `Ok(None)` means no row matched.
pub fn lookup_value(
    book: &SourceBook,
    file: &str,
    sheet: &str,
    primary_key: &str,
    key_col: &str,
    value_col: &str,
) -> Result<Option<String>> {
    let table = book.sheet(file, sheet)?;
    let key_index = column_index(key_col)?;
    let value_index = column_index(value_col)?;

    for row in 1..table.row_count() {
        if table.cell(row, key_index).unwrap_or_default() == primary_key {
            let value = table.cell(row, value_index).unwrap_or_default().to_string();
            debug!(file, key = primary_key, value = %value, "resolved source value");
            return Ok(Some(value));
        }
    }

    warn!(file, sheet, key = primary_key, "primary key not found");
    Ok(None)
}
