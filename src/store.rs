use crate::error::{Result, TemplateError};
use crate::files::{collect_files, lookup_value};
use crate::preprocess::preprocess;
use crate::source::SourceBook;
use crate::value::{
    OverlayKind, OverlayRecord, TAG_FILE, TAG_KEY_COL, TAG_SHEET, TAG_VALUE_COL,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

lazy_static! {
    static ref CONCAT: Regex = Regex::new(r"^!<CONCAT><([^>]+)>$").unwrap();
}

/// Name prefix marking a template row as a concatenation directive.
pub const CONCAT_PREFIX: &str = "!<CONCAT>";

/// Owns the overlay records between loading and rendering.
///
/// Record text only changes through the methods here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayStore {
    records: Vec<OverlayRecord>,
}

impl OverlayStore {
    pub fn new(records: Vec<OverlayRecord>) -> Self {
        OverlayStore { records }
    }

    pub fn records(&self) -> &[OverlayRecord] {
        &self.records
    }

    pub fn get(&self, name: &str) -> Option<&OverlayRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Source files the `File` overlays read from.
    pub fn files(&self) -> Vec<String> {
        collect_files(&self.records)
    }

    /// Append `text` to every record named by a `!<CONCAT><NAME>` directive.
    ///
    /// Returns how many records were updated; zero when no record has that
    /// name. A record without text is treated as empty.
    pub fn concat(&mut self, directive: &str, text: &str) -> Result<usize> {
        let Some(caps) = CONCAT.captures(directive) else {
            warn!(directive, "malformed concatenation directive");
            return Err(TemplateError::MalformedDirective(directive.to_string()));
        };
        let target = &caps[1];

        let mut updated = 0;
        for record in self.records.iter_mut().filter(|r| r.name == target) {
            debug!(name = target, text, "concatenating");
            record.text.get_or_insert_with(String::new).push_str(text);
            updated += 1;
        }
        Ok(updated)
    }

    /// Fill in the text of every `File` overlay from the source workbooks,
    /// looking up `primary_key`. Failures are returned, not fatal: the
    /// affected record keeps no text and the rest are still resolved.
    pub fn resolve_files(&mut self, book: &SourceBook, primary_key: &str) -> Vec<TemplateError> {
        let mut errors = Vec::new();
        for record in &mut self.records {
            if record.kind() != Some(OverlayKind::File) {
                continue;
            }
            match resolve_record(record, book, primary_key) {
                Ok(text) => record.text = text,
                Err(err) => {
                    warn!(name = %record.name, error = %err, "cannot resolve file overlay");
                    record.text = None;
                    errors.push(err);
                }
            }
        }
        errors
    }

    /// Run each record's preprocess function over its current text.
    pub fn apply_preprocess(&mut self) {
        for record in &mut self.records {
            if let Some(text) = record.text.take() {
                record.text = Some(preprocess(&text, record.pre_process.as_ref()));
            }
        }
    }

    /// Apply every record named `!<CONCAT><NAME>`: its text goes onto the end
    /// of the records named `NAME`, in template order.
    pub fn apply_directives(&mut self) -> Vec<TemplateError> {
        let directives: Vec<(String, String)> = self
            .records
            .iter()
            .filter(|r| r.name.starts_with(CONCAT_PREFIX))
            .map(|r| (r.name.clone(), r.text.clone().unwrap_or_default()))
            .collect();

        directives
            .into_iter()
            .filter_map(|(directive, text)| self.concat(&directive, &text).err())
            .collect()
    }

    /// Resolve file values, preprocess, then apply concatenation directives.
    pub fn render(&mut self, book: &SourceBook, primary_key: &str) -> Vec<TemplateError> {
        let mut errors = self.resolve_files(book, primary_key);
        self.apply_preprocess();
        errors.extend(self.apply_directives());
        errors
    }
}

fn resolve_record(
    record: &OverlayRecord,
    book: &SourceBook,
    primary_key: &str,
) -> Result<Option<String>> {
    let tag = |key: &str| {
        record
            .content
            .text(key)
            .ok_or_else(|| TemplateError::MissingTag {
                name: record.name.clone(),
                key: key.to_string(),
            })
    };
    lookup_value(
        book,
        &tag(TAG_FILE)?,
        &tag(TAG_SHEET)?,
        primary_key,
        &tag(TAG_KEY_COL)?,
        &tag(TAG_VALUE_COL)?,
    )
}
